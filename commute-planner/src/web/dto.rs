//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::domain::StopId;

/// Body of `POST /api/mirror`.
#[derive(Debug, Deserialize)]
pub struct MirrorRequest {
    pub enabled: bool,
}

/// Body of `POST /api/routes/:route/time`.
#[derive(Debug, Deserialize)]
pub struct TimeRequest {
    /// `HH:MM`, 24-hour.
    pub time: String,
}

/// Body of `POST .../stations/:role/query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub q: String,
}

/// Body of `POST .../stations/:role/select`.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub stop_id: StopId,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
