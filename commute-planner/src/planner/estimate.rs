//! Journey-time estimation between two stops.
//!
//! There is no routing data behind this yet: [`PlaceholderEstimator`]
//! derives a plausible duration from the station pair alone. Callers treat
//! the value as stable for a pair, which [`CachedEstimator`] guarantees for
//! any inner estimator.

use std::sync::Arc;

use moka::sync::Cache;

use crate::domain::StopId;

/// Shortest estimate the placeholder produces, in minutes.
pub const MIN_ESTIMATE_MINS: u32 = 15;

/// Longest estimate the placeholder produces, in minutes.
pub const MAX_ESTIMATE_MINS: u32 = 45;

/// Maps an origin/destination pair to a journey duration in minutes.
pub trait JourneyEstimator: Send + Sync {
    fn estimate(&self, from: StopId, to: StopId) -> u32;
}

/// Deterministic stand-in: a hash of the pair folded into
/// `MIN_ESTIMATE_MINS..=MAX_ESTIMATE_MINS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEstimator;

impl JourneyEstimator for PlaceholderEstimator {
    fn estimate(&self, from: StopId, to: StopId) -> u32 {
        let span = u64::from(MAX_ESTIMATE_MINS - MIN_ESTIMATE_MINS + 1);
        let mixed = splitmix64((u64::from(from.0) << 32) | u64::from(to.0));
        // mixed % span < 31, fits in u32
        MIN_ESTIMATE_MINS + (mixed % span) as u32
    }
}

/// SplitMix64 finaliser: spreads nearby ids across the output range.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// Memoises another estimator per (origin, destination) for as long as the
/// cache lives.
pub struct CachedEstimator {
    inner: Arc<dyn JourneyEstimator>,
    cache: Cache<(StopId, StopId), u32>,
}

impl CachedEstimator {
    /// Default upper bound on remembered pairs.
    const DEFAULT_CAPACITY: u64 = 1024;

    pub fn new(inner: Arc<dyn JourneyEstimator>) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: Arc<dyn JourneyEstimator>, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// Number of cached pairs.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl JourneyEstimator for CachedEstimator {
    fn estimate(&self, from: StopId, to: StopId) -> u32 {
        self.cache
            .get_with((from, to), || self.inner.estimate(from, to))
    }
}
