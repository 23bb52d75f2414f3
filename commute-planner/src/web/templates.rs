//! Askama templates for the web frontend.

use askama::Template;

use crate::commute::{PlanView, RoutePanelView, StationView};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with both commute panels.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub plan: PlanView,
    pub source_name: &'static str,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Mirror toggle plus both panels.
#[derive(Template)]
#[template(path = "plan.html")]
pub struct PlanTemplate {
    pub plan: PlanView,
}

/// One commute panel.
#[derive(Template)]
#[template(path = "route_panel.html")]
pub struct RoutePanelTemplate {
    pub panel: RoutePanelView,
}

/// One station picker.
#[derive(Template)]
#[template(path = "station_picker.html")]
pub struct StationPickerTemplate {
    pub station: StationView,
}
