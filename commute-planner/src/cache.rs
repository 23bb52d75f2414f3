//! Caching layer for data-source responses.
//!
//! Incremental search tends to repeat terms (typing, deleting, retyping),
//! and both commute legs often ask for the same origin's board. Responses
//! are cached for a short TTL so those repeats do not reach the API.
//! Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{DeparturesResult, RouteType, Stop, StopId};
use crate::ptv::{DataSource, PtvError, SearchResults};

/// Cache key for searches: (normalised term, route type filter).
type SearchKey = (String, Vec<RouteType>);

/// Cache key for departure boards: (stop, route type, limit).
type BoardKey = (StopId, RouteType, u32);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// A data source with cached responses.
///
/// Wraps any [`DataSource`] and is one itself, so it can be slotted in
/// front of the live client without the rest of the planner noticing.
pub struct CachedSource<S> {
    inner: S,
    searches: MokaCache<SearchKey, Arc<Vec<Stop>>>,
    boards: MokaCache<BoardKey, Arc<DeparturesResult>>,
}

impl<S: DataSource> CachedSource<S> {
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            searches,
            boards,
        }
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.searches.invalidate_all();
        self.boards.invalidate_all();
    }

    async fn cached_search(
        &self,
        term: &str,
        route_types: &[RouteType],
    ) -> Result<SearchResults, PtvError> {
        let key = (term.trim().to_lowercase(), route_types.to_vec());

        if let Some(stops) = self.searches.get(&key).await {
            debug!(term, "search cache hit");
            return Ok(SearchResults {
                stops: stops.as_ref().clone(),
            });
        }

        let results = self.inner.search(term, route_types).await?;
        self.searches
            .insert(key, Arc::new(results.stops.clone()))
            .await;
        Ok(results)
    }

    async fn cached_departures(
        &self,
        stop_id: StopId,
        route_type: RouteType,
        limit: u32,
    ) -> Result<DeparturesResult, PtvError> {
        let key = (stop_id, route_type, limit);

        if let Some(board) = self.boards.get(&key).await {
            debug!(%stop_id, "departures cache hit");
            return Ok(board.as_ref().clone());
        }

        let board = self.inner.departures(stop_id, route_type, limit).await?;
        self.boards.insert(key, Arc::new(board.clone())).await;
        Ok(board)
    }
}

impl<S: DataSource> DataSource for CachedSource<S> {
    fn search<'a>(
        &'a self,
        term: &'a str,
        route_types: &'a [RouteType],
    ) -> BoxFuture<'a, Result<SearchResults, PtvError>> {
        Box::pin(self.cached_search(term, route_types))
    }

    fn departures(
        &self,
        stop_id: StopId,
        route_type: RouteType,
        limit: u32,
    ) -> BoxFuture<'_, Result<DeparturesResult, PtvError>> {
        Box::pin(self.cached_departures(stop_id, route_type, limit))
    }
}
