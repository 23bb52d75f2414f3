//! Departures and the lookup tables that travel with them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stop::{Stop, StopId};

/// Route identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub u32);

/// Run (single vehicle trip) identifier. The API issues negative ids for
/// some scheduled runs, hence signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub i64);

/// Direction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionId(pub u32);

/// One vehicle trip along a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub id: RunId,
    pub destination_name: String,
    pub route_id: RouteId,
}

/// A named orientation of a route ("City (Flinders Street)", "Pakenham").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
    pub id: DirectionId,
    pub name: String,
    pub route_id: RouteId,
}

/// A single departure event at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub stop_id: StopId,
    pub route_id: RouteId,
    pub run_id: RunId,
    pub direction_id: DirectionId,
    pub scheduled: DateTime<Utc>,
    pub estimated: Option<DateTime<Utc>>,
    pub platform: Option<String>,
}

impl Departure {
    /// The time to use for every comparison and display: the realtime
    /// estimate when one exists, otherwise the timetable.
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.estimated.unwrap_or(self.scheduled)
    }
}

/// Departures for one stop plus the lookups needed to name them.
#[derive(Debug, Clone, Default)]
pub struct DeparturesResult {
    pub departures: Vec<Departure>,
    pub stops: HashMap<StopId, Stop>,
    pub runs: HashMap<RunId, Run>,
    pub directions: HashMap<DirectionId, Direction>,
}

impl DeparturesResult {
    /// Same lookups, different departure list.
    pub fn with_departures(&self, departures: Vec<Departure>) -> Self {
        Self {
            departures,
            stops: self.stops.clone(),
            runs: self.runs.clone(),
            directions: self.directions.clone(),
        }
    }

    pub fn run(&self, id: RunId) -> Option<&Run> {
        self.runs.get(&id)
    }

    pub fn direction(&self, id: DirectionId) -> Option<&Direction> {
        self.directions.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn departure(scheduled: DateTime<Utc>, estimated: Option<DateTime<Utc>>) -> Departure {
        Departure {
            stop_id: StopId(1071),
            route_id: RouteId(1),
            run_id: RunId(100),
            direction_id: DirectionId(1),
            scheduled,
            estimated,
            platform: None,
        }
    }

    #[test]
    fn effective_time_prefers_estimate() {
        let scheduled = Utc.with_ymd_and_hms(2026, 3, 2, 21, 0, 0).unwrap();
        let estimated = Utc.with_ymd_and_hms(2026, 3, 2, 21, 4, 0).unwrap();

        assert_eq!(departure(scheduled, None).effective_time(), scheduled);
        assert_eq!(
            departure(scheduled, Some(estimated)).effective_time(),
            estimated
        );
    }

    #[test]
    fn early_estimate_still_wins() {
        let scheduled = Utc.with_ymd_and_hms(2026, 3, 2, 21, 0, 0).unwrap();
        let estimated = Utc.with_ymd_and_hms(2026, 3, 2, 20, 58, 0).unwrap();
        assert_eq!(
            departure(scheduled, Some(estimated)).effective_time(),
            estimated
        );
    }

    #[test]
    fn with_departures_keeps_lookups() {
        let mut result = DeparturesResult::default();
        result.runs.insert(
            RunId(100),
            Run {
                id: RunId(100),
                destination_name: "Flinders Street".into(),
                route_id: RouteId(1),
            },
        );
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 21, 0, 0).unwrap();
        result.departures.push(departure(at, None));

        let emptied = result.with_departures(Vec::new());
        assert!(emptied.is_empty());
        assert_eq!(
            emptied.run(RunId(100)).map(|r| r.destination_name.as_str()),
            Some("Flinders Street")
        );
    }
}
