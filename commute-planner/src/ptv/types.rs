//! PTV Timetable API v3 response DTOs.
//!
//! These map directly onto the JSON the API returns. Most fields are
//! optional because the API omits them depending on `expand` flags and
//! route type.

use std::collections::HashMap;

use serde::Deserialize;

/// Response from `/v3/search/{term}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub stops: Vec<StopDto>,
}

/// A stop as returned by search or in a departures `stops` map.
///
/// Search responses name the suburb `stop_suburb`; some older payloads use
/// `suburb`. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub stop_id: u32,
    pub stop_name: String,
    #[serde(default)]
    pub route_type: u8,
    pub stop_suburb: Option<String>,
    pub suburb: Option<String>,
}

/// A run in a departures `runs` map.
#[derive(Debug, Clone, Deserialize)]
pub struct RunDto {
    pub run_id: i64,
    pub route_id: Option<u32>,
    pub route_type: Option<u8>,
    pub final_stop_id: Option<u32>,
    pub destination_name: Option<String>,
}

/// A direction in a departures `directions` map.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionDto {
    pub direction_id: u32,
    pub direction_name: String,
    pub route_id: Option<u32>,
    pub route_type: Option<u8>,
}

/// One departure.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartureDto {
    pub stop_id: u32,
    pub route_id: u32,
    pub run_id: i64,
    pub direction_id: u32,

    /// ISO 8601 UTC, e.g. "2026-03-02T21:05:00Z".
    pub scheduled_departure_utc: String,

    /// Realtime estimate, null when the vehicle is not tracked.
    pub estimated_departure_utc: Option<String>,

    pub platform_number: Option<String>,
    pub at_platform: Option<bool>,
    pub disruption_ids: Option<Vec<i64>>,
    pub flags: Option<String>,
    pub departure_sequence: Option<u32>,
}

/// Response from `/v3/departures/route_type/{rt}/stop/{id}`.
///
/// The lookup maps are keyed by the stringified id.
#[derive(Debug, Clone, Deserialize)]
pub struct DeparturesResponse {
    #[serde(default)]
    pub departures: Vec<DepartureDto>,
    #[serde(default)]
    pub stops: HashMap<String, StopDto>,
    #[serde(default)]
    pub runs: HashMap<String, RunDto>,
    #[serde(default)]
    pub directions: HashMap<String, DirectionDto>,
}
