//! Web layer for the commute planner.
//!
//! Serves the planner page and a small API that drives the session, with
//! HTML fragments for the page and JSON for everything else.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
