//! Departure planning logic.
//!
//! Pure functions and small services that sit between the data source and
//! the selectors: filtering a board down to the requested time of day, and
//! estimating how long the journey takes.

mod config;
mod estimate;
mod filter;

pub use config::PlannerConfig;
pub use estimate::{
    CachedEstimator, JourneyEstimator, MAX_ESTIMATE_MINS, MIN_ESTIMATE_MINS, PlaceholderEstimator,
};
pub use filter::filter_departures_by_time;
