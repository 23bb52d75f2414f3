//! Process configuration from the environment.

use std::net::SocketAddr;

use tracing::warn;

use crate::ptv::PtvConfig;

/// Default listen address.
pub const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Which data source to serve from.
#[derive(Debug, Clone)]
pub enum SourceChoice {
    /// The live timetable API.
    Live(PtvConfig),
    /// Synthetic stations and departures.
    Mock,
}

/// Everything `main` needs to start serving.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub source: SourceChoice,
    pub static_dir: String,
}

impl AppConfig {
    /// Read `PTV_DEV_ID`, `PTV_API_KEY`, `PTV_USE_MOCK` and `PLANNER_ADDR`
    /// from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// Missing credentials fall back to the mock source with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let use_mock = var("PTV_USE_MOCK").is_some_and(|v| is_truthy(&v));
        let source = if use_mock {
            SourceChoice::Mock
        } else {
            match (var("PTV_DEV_ID"), var("PTV_API_KEY")) {
                (Some(dev_id), Some(api_key)) => SourceChoice::Live(PtvConfig::new(dev_id, api_key)),
                _ => {
                    warn!("PTV_DEV_ID or PTV_API_KEY not set, serving mock data");
                    SourceChoice::Mock
                }
            }
        };

        let addr = match var("PLANNER_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(addr = %raw, error = %e, "invalid PLANNER_ADDR, using default");
                SocketAddr::from(DEFAULT_ADDR)
            }),
            None => SocketAddr::from(DEFAULT_ADDR),
        };

        let static_dir = var("PLANNER_STATIC_DIR")
            .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string());

        Self {
            addr,
            source,
            static_dir,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
