//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::PlannerConfig;
use crate::ptv::DataSource;
use crate::session::Session;

/// Shared application state.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The one planner session this server hosts
    pub session: Session,

    /// Short name of the active data source, shown in the page footer
    pub source_name: &'static str,
}

impl AppState {
    /// Create a new app state.
    pub fn new(source: Arc<dyn DataSource>, source_name: &'static str, config: PlannerConfig) -> Self {
        Self {
            session: Session::new(source, config),
            source_name,
        }
    }
}
