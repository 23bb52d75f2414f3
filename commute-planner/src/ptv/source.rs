//! The data-source contract shared by the live client and the mock.

use futures::future::BoxFuture;

use crate::domain::{DeparturesResult, RouteType, Stop, StopId};

use super::error::PtvError;

/// Stops matching a search term.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub stops: Vec<Stop>,
}

/// A provider of stop searches and departure boards.
///
/// Object safe so the active implementation can be chosen at startup and
/// passed around as `Arc<dyn DataSource>`.
pub trait DataSource: Send + Sync {
    /// Stops whose name matches `term`. An empty `route_types` means any mode.
    fn search<'a>(
        &'a self,
        term: &'a str,
        route_types: &'a [RouteType],
    ) -> BoxFuture<'a, Result<SearchResults, PtvError>>;

    /// Up to `limit` upcoming departures from a stop.
    fn departures(
        &self,
        stop_id: StopId,
        route_type: RouteType,
        limit: u32,
    ) -> BoxFuture<'_, Result<DeparturesResult, PtvError>>;
}
