//! Synthetic data source for running without API credentials.
//!
//! Serves a fixed set of Melbourne metropolitan stations and generates a
//! departure every ten minutes starting five minutes from now, so the UI
//! always has something current to show.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use tracing::debug;

use crate::domain::{
    Departure, DeparturesResult, Direction, DirectionId, RouteId, RouteType, Run, RunId, Stop,
    StopId,
};

use super::error::PtvError;
use super::source::{DataSource, SearchResults};

const SEARCH_LATENCY: Duration = Duration::from_millis(500);
const DEPARTURES_LATENCY: Duration = Duration::from_millis(800);

/// (id, name, suburb)
const STATIONS: &[(u32, &str, &str)] = &[
    (1071, "Flinders Street", "Melbourne"),
    (1181, "Southern Cross", "Melbourne"),
    (1162, "Richmond", "Richmond"),
    (1068, "South Yarra", "South Yarra"),
    (1154, "Caulfield", "Caulfield"),
    (1151, "Clayton", "Clayton"),
    (1001, "Dandenong", "Dandenong"),
    (1121, "Pakenham", "Pakenham"),
    (1091, "Lilydale", "Lilydale"),
    (1030, "Belgrave", "Belgrave"),
    (1220, "Williamstown", "Williamstown"),
    (1101, "Werribee", "Werribee"),
];

/// (direction/route id, direction name, run destination)
const LINES: &[(u32, &str, &str)] = &[
    (1, "City (Flinders Street)", "Flinders Street"),
    (2, "Pakenham", "Pakenham"),
    (3, "Lilydale", "Lilydale"),
    (4, "Belgrave", "Belgrave"),
    (5, "Werribee", "Werribee"),
];

const FIRST_RUN_ID: i64 = 100;

/// Mock data source with the same contract as the live client.
#[derive(Debug, Clone)]
pub struct MockPtvClient {
    stations: Vec<Stop>,
    search_latency: Duration,
    departures_latency: Duration,
}

impl MockPtvClient {
    /// Create a mock with simulated network latency.
    pub fn new() -> Self {
        let stations = STATIONS
            .iter()
            .map(|&(id, name, suburb)| {
                Stop::new(StopId(id), name, RouteType::TRAIN).with_suburb(suburb)
            })
            .collect();

        Self {
            stations,
            search_latency: SEARCH_LATENCY,
            departures_latency: DEPARTURES_LATENCY,
        }
    }

    /// Respond immediately (for tests).
    pub fn without_latency(mut self) -> Self {
        self.search_latency = Duration::ZERO;
        self.departures_latency = Duration::ZERO;
        self
    }

    /// All stations known to the mock.
    pub fn stations(&self) -> &[Stop] {
        &self.stations
    }

    /// Case-insensitive substring match on station name.
    pub fn find_stops(&self, term: &str, route_types: &[RouteType]) -> Vec<Stop> {
        let needle = term.to_lowercase();
        self.stations
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .filter(|s| route_types.is_empty() || route_types.contains(&s.route_type))
            .cloned()
            .collect()
    }

    /// Build a departures board for a stop as of `now`.
    pub fn board(
        &self,
        stop_id: StopId,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<DeparturesResult, PtvError> {
        let station = self
            .stations
            .iter()
            .find(|s| s.id == stop_id)
            .ok_or(PtvError::StopNotFound(stop_id))?;

        Ok(DeparturesResult {
            departures: generate_departures(stop_id, limit, now),
            stops: HashMap::from([(stop_id, station.clone())]),
            runs: mock_runs(),
            directions: mock_directions(),
        })
    }
}

impl Default for MockPtvClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for MockPtvClient {
    fn search<'a>(
        &'a self,
        term: &'a str,
        route_types: &'a [RouteType],
    ) -> BoxFuture<'a, Result<SearchResults, PtvError>> {
        Box::pin(async move {
            debug!(term, "mock search");
            if !self.search_latency.is_zero() {
                tokio::time::sleep(self.search_latency).await;
            }
            Ok(SearchResults {
                stops: self.find_stops(term, route_types),
            })
        })
    }

    fn departures(
        &self,
        stop_id: StopId,
        route_type: RouteType,
        limit: u32,
    ) -> BoxFuture<'_, Result<DeparturesResult, PtvError>> {
        Box::pin(async move {
            debug!(%stop_id, %route_type, limit, "mock departures");
            if !self.departures_latency.is_zero() {
                tokio::time::sleep(self.departures_latency).await;
            }
            self.board(stop_id, limit, Utc::now())
        })
    }
}

/// Departure `i` leaves at `now + (10i + 5)` minutes, cycling through the
/// five mock lines, on platform `(i % 10) + 1`.
pub fn generate_departures(stop_id: StopId, count: u32, now: DateTime<Utc>) -> Vec<Departure> {
    (0..count)
        .map(|i| {
            let line = i % LINES.len() as u32;
            Departure {
                stop_id,
                route_id: RouteId(line + 1),
                run_id: RunId(FIRST_RUN_ID + i64::from(line)),
                direction_id: DirectionId(line + 1),
                scheduled: now + chrono::Duration::minutes(i64::from(i) * 10 + 5),
                estimated: None,
                platform: Some(((i % 10) + 1).to_string()),
            }
        })
        .collect()
}

fn mock_runs() -> HashMap<RunId, Run> {
    LINES
        .iter()
        .enumerate()
        .map(|(i, &(route, _, destination))| {
            let id = RunId(FIRST_RUN_ID + i as i64);
            let run = Run {
                id,
                destination_name: destination.to_string(),
                route_id: RouteId(route),
            };
            (id, run)
        })
        .collect()
}

fn mock_directions() -> HashMap<DirectionId, Direction> {
    LINES
        .iter()
        .map(|&(id, name, _)| {
            let direction = Direction {
                id: DirectionId(id),
                name: name.to_string(),
                route_id: RouteId(id),
            };
            (direction.id, direction)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 21, 0, 0).unwrap()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mock = MockPtvClient::new();
        let names: Vec<String> = mock
            .find_stops("SOUTH", &[RouteType::TRAIN])
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Southern Cross".to_string(), "South Yarra".to_string()]);

        let names: Vec<String> = mock
            .find_stops("er", &[])
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert!(names.contains(&"Flinders Street".to_string()));
        assert!(names.contains(&"Southern Cross".to_string()));
        assert!(names.contains(&"Werribee".to_string()));
    }

    #[test]
    fn search_honours_route_type_filter() {
        let mock = MockPtvClient::new();
        assert!(mock.find_stops("Flinders", &[RouteType::TRAM]).is_empty());
        assert_eq!(mock.find_stops("Flinders", &[RouteType::TRAIN]).len(), 1);
    }

    #[test]
    fn generated_departure_layout() {
        let deps = generate_departures(StopId(1071), 12, now());
        assert_eq!(deps.len(), 12);

        assert_eq!(deps[0].scheduled, now() + chrono::Duration::minutes(5));
        assert_eq!(deps[3].scheduled, now() + chrono::Duration::minutes(35));
        assert_eq!(deps[0].run_id, RunId(100));
        assert_eq!(deps[4].run_id, RunId(104));
        assert_eq!(deps[5].run_id, RunId(100));
        assert_eq!(deps[6].direction_id, DirectionId(2));
        assert_eq!(deps[9].platform.as_deref(), Some("10"));
        assert_eq!(deps[10].platform.as_deref(), Some("1"));
        assert!(deps.iter().all(|d| d.estimated.is_none()));
    }

    #[test]
    fn board_resolves_names() {
        let mock = MockPtvClient::new();
        let board = mock.board(StopId(1162), 5, now()).unwrap();

        assert_eq!(board.len(), 5);
        assert_eq!(board.stops[&StopId(1162)].name, "Richmond");
        for d in &board.departures {
            assert!(board.run(d.run_id).is_some());
            assert!(board.direction(d.direction_id).is_some());
        }
        assert_eq!(
            board.run(RunId(101)).map(|r| r.destination_name.as_str()),
            Some("Pakenham")
        );
    }

    #[test]
    fn unknown_stop_is_an_error() {
        let mock = MockPtvClient::new();
        assert!(matches!(
            mock.board(StopId(9999), 5, now()),
            Err(PtvError::StopNotFound(StopId(9999)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn data_source_contract() {
        let mock = MockPtvClient::new();
        let results = mock.search("rich", &[RouteType::TRAIN]).await.unwrap();
        assert_eq!(results.stops.len(), 1);
        assert_eq!(results.stops[0].id, StopId(1162));

        let board = mock
            .departures(StopId(1162), RouteType::TRAIN, 10)
            .await
            .unwrap();
        assert_eq!(board.len(), 10);
    }
}
