//! Conversion from PTV DTOs to domain types.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{
    Departure, DeparturesResult, Direction, DirectionId, RouteId, RouteType, Run, RunId, Stop,
    StopId,
};

use super::types::{DepartureDto, DeparturesResponse, DirectionDto, RunDto, SearchResponse, StopDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a timestamp
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Convert a search response to stops, in response order.
pub fn convert_search_response(response: &SearchResponse) -> Vec<Stop> {
    response.stops.iter().map(convert_stop).collect()
}

pub fn convert_stop(dto: &StopDto) -> Stop {
    Stop {
        id: StopId(dto.stop_id),
        name: dto.stop_name.clone(),
        route_type: RouteType(dto.route_type),
        suburb: dto
            .stop_suburb
            .clone()
            .or_else(|| dto.suburb.clone())
            .filter(|s| !s.is_empty()),
    }
}

fn convert_run(dto: &RunDto) -> Run {
    Run {
        id: RunId(dto.run_id),
        destination_name: dto.destination_name.clone().unwrap_or_default(),
        route_id: RouteId(dto.route_id.unwrap_or_default()),
    }
}

fn convert_direction(dto: &DirectionDto) -> Direction {
    Direction {
        id: DirectionId(dto.direction_id),
        name: dto.direction_name.clone(),
        route_id: RouteId(dto.route_id.unwrap_or_default()),
    }
}

/// Convert a single departure.
pub fn convert_departure(dto: &DepartureDto) -> Result<Departure, ConversionError> {
    let scheduled = parse_utc(&dto.scheduled_departure_utc)?;
    let estimated = dto
        .estimated_departure_utc
        .as_deref()
        .map(parse_utc)
        .transpose()?;

    Ok(Departure {
        stop_id: StopId(dto.stop_id),
        route_id: RouteId(dto.route_id),
        run_id: RunId(dto.run_id),
        direction_id: DirectionId(dto.direction_id),
        scheduled,
        estimated,
        platform: dto.platform_number.clone().filter(|p| !p.is_empty()),
    })
}

/// Convert a departures response to domain types.
///
/// Departures with unparseable timestamps are logged and skipped rather
/// than failing the whole board. Lookup maps are re-keyed by the id inside
/// each entry, not by the map key string.
pub fn convert_departures_response(response: &DeparturesResponse) -> DeparturesResult {
    let departures = response
        .departures
        .iter()
        .filter_map(|dto| match convert_departure(dto) {
            Ok(departure) => Some(departure),
            Err(e) => {
                warn!(run_id = dto.run_id, error = %e, "skipping departure");
                None
            }
        })
        .collect();

    DeparturesResult {
        departures,
        stops: response
            .stops
            .values()
            .map(|dto| (StopId(dto.stop_id), convert_stop(dto)))
            .collect(),
        runs: response
            .runs
            .values()
            .map(|dto| (RunId(dto.run_id), convert_run(dto)))
            .collect(),
        directions: response
            .directions
            .values()
            .map(|dto| (DirectionId(dto.direction_id), convert_direction(dto)))
            .collect(),
    }
}

fn parse_utc(s: &str) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ConversionError::InvalidTimestamp(s.to_string()))
}
