//! PTV Timetable API access.
//!
//! This module provides the [`DataSource`] contract and its two
//! implementations: an HTTP client for the PTV Timetable API v3, and a
//! synthetic generator for development without credentials.
//!
//! Key characteristics of the API:
//! - Every request is signed (HMAC-SHA1 of path + `devid`)
//! - Timestamps are ISO 8601 UTC
//! - Departure responses carry lookup maps for runs, stops and directions
//!   when `expand` asks for them

mod client;
mod convert;
mod error;
mod mock;
mod signing;
mod source;
mod types;

pub use client::{PtvClient, PtvConfig, departures_path, search_path};
pub use convert::ConversionError;
pub use error::PtvError;
pub use mock::{MockPtvClient, generate_departures};
pub use signing::RequestSigner;
pub use source::{DataSource, SearchResults};
pub use types::{DepartureDto, DeparturesResponse, DirectionDto, RunDto, SearchResponse, StopDto};
