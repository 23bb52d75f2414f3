//! User-facing messages and selector errors.

use serde::Serialize;

use crate::domain::{StopId, TimeError};

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// A message shown inline next to the control that caused it.
///
/// Empty results and failures share this type; only the severity tells
/// them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MissingOrigin,
    InvalidTime,
    ReadOnly,
    NoStations,
    SearchFailed,
    NoDepartures,
    DeparturesFailed,
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::NoStations | Notice::NoDepartures => Severity::Info,
            Notice::MissingOrigin
            | Notice::InvalidTime
            | Notice::ReadOnly
            | Notice::SearchFailed
            | Notice::DeparturesFailed => Severity::Error,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::MissingOrigin => "Please select a departure station",
            Notice::InvalidTime => "Please enter a time as HH:MM",
            Notice::ReadOnly => "This route mirrors the morning commute",
            Notice::NoStations => "No stations found. Try a different search term.",
            Notice::SearchFailed => "Failed to search for stations. Please try again.",
            Notice::NoDepartures => "No departures found for this station at the selected time.",
            Notice::DeparturesFailed => "Failed to load departures. Please try again.",
        }
    }
}

/// Rejected selector operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Departures requested with no origin selected
    #[error("no departure station selected")]
    MissingOrigin,

    /// Station or time edit on a mirrored route
    #[error("route is mirrored and read-only")]
    ReadOnly,

    /// Time-of-day string did not parse
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// Selected stop is not among the current search results
    #[error("stop {0} is not in the current results")]
    UnknownStop(StopId),
}

impl RouteError {
    /// The inline message for this error, if it has one.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            RouteError::MissingOrigin => Some(Notice::MissingOrigin),
            RouteError::ReadOnly => Some(Notice::ReadOnly),
            RouteError::InvalidTime(_) => Some(Notice::InvalidTime),
            RouteError::UnknownStop(_) => None,
        }
    }
}
