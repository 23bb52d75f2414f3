//! Planner configuration.

use std::time::Duration;

use crate::domain::{RouteType, TimeOfDay};

/// Tunables for the station search and route selectors.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Quiet period after the last keystroke before a search fires.
    pub debounce: Duration,

    /// Minimum trimmed query length that triggers a search.
    pub min_query_chars: usize,

    /// Route types passed to station search.
    pub search_route_types: Vec<RouteType>,

    /// Route type used for departures.
    pub departures_route_type: RouteType,

    /// Maximum departures fetched per search.
    pub departures_limit: u32,

    /// Initial time of day for the morning selector.
    pub morning_time: TimeOfDay,

    /// Initial time of day for the evening selector.
    pub evening_time: TimeOfDay,
}

impl PlannerConfig {
    /// Set the debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the departures limit.
    pub fn with_departures_limit(mut self, limit: u32) -> Self {
        self.departures_limit = limit;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
            search_route_types: vec![RouteType::TRAIN],
            departures_route_type: RouteType::TRAIN,
            departures_limit: 10,
            morning_time: TimeOfDay::new(8, 0).unwrap_or_default(),
            evening_time: TimeOfDay::new(17, 30).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.min_query_chars, 2);
        assert_eq!(config.search_route_types, vec![RouteType::TRAIN]);
        assert_eq!(config.departures_route_type, RouteType::TRAIN);
        assert_eq!(config.departures_limit, 10);
        assert_eq!(config.morning_time.to_string(), "08:00");
        assert_eq!(config.evening_time.to_string(), "17:30");
    }

    #[test]
    fn builder_methods() {
        let config = PlannerConfig::default()
            .with_debounce(Duration::from_millis(50))
            .with_departures_limit(3);

        assert_eq!(config.debounce, Duration::from_millis(50));
        assert_eq!(config.departures_limit, 3);
    }
}
