//! HTTP route handlers.
//!
//! Every handler answers with an HTML fragment when the request accepts
//! `text/html` and JSON otherwise. Validation problems are part of the
//! rendered state (inline notices), so HTML callers always get the updated
//! fragment; JSON callers get a 4xx with the same message instead.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{debug, error};

use crate::commute::{Commute, PlanView, RouteError, RoutePanelView, StationRole, StationView};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/plan", get(get_plan))
        .route("/api/mirror", post(set_mirror))
        .route("/api/routes/:route", get(get_route))
        .route("/api/routes/:route/time", post(set_time))
        .route("/api/routes/:route/departures", post(search_departures))
        .route("/api/routes/:route/stations/:role", get(get_station))
        .route("/api/routes/:route/stations/:role/query", post(query_station))
        .route("/api/routes/:route/stations/:role/select", post(select_station))
        .route("/api/routes/:route/stations/:role/clear", post(clear_station))
        .route("/api/routes/:route/stations/:role/dismiss", post(dismiss_station))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Planner page.
async fn index_page(State(state): State<AppState>) -> Result<Response, AppError> {
    let template = IndexTemplate {
        plan: state.session.view().await,
        source_name: state.source_name,
    };
    Ok(Html(render(&template)?).into_response())
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<String, AppError> {
    template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// HTML callers see a rejected edit as an inline notice; JSON callers get
/// the error.
fn settle<T>(outcome: Result<T, RouteError>, headers: &HeaderMap) -> Result<(), AppError> {
    match outcome {
        Ok(_) => Ok(()),
        Err(e) if accepts_html(headers) => {
            debug!(error = %e, "rejected edit rendered inline");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn plan_response(headers: &HeaderMap, plan: PlanView) -> Result<Response, AppError> {
    if accepts_html(headers) {
        Ok(Html(render(&PlanTemplate { plan })?).into_response())
    } else {
        Ok(Json(plan).into_response())
    }
}

fn panel_response(headers: &HeaderMap, panel: RoutePanelView) -> Result<Response, AppError> {
    if accepts_html(headers) {
        Ok(Html(render(&RoutePanelTemplate { panel })?).into_response())
    } else {
        Ok(Json(panel).into_response())
    }
}

fn station_response(headers: &HeaderMap, station: StationView) -> Result<Response, AppError> {
    if accepts_html(headers) {
        Ok(Html(render(&StationPickerTemplate { station })?).into_response())
    } else {
        Ok(Json(station).into_response())
    }
}

/// Both panels and the mirror flag.
async fn get_plan(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    plan_response(&headers, state.session.view().await)
}

/// Turn mirroring on or off.
async fn set_mirror(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<MirrorRequest>,
) -> Result<Response, AppError> {
    state.session.set_mirror(req.enabled).await;
    plan_response(&headers, state.session.view().await)
}

/// One commute panel.
async fn get_route(
    State(state): State<AppState>,
    Path(route): Path<Commute>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    panel_response(&headers, state.session.panel(route).await)
}

/// Change a panel's time of day.
async fn set_time(
    State(state): State<AppState>,
    Path(route): Path<Commute>,
    headers: HeaderMap,
    Json(req): Json<TimeRequest>,
) -> Result<Response, AppError> {
    settle(state.session.set_time(route, &req.time).await, &headers)?;
    panel_response(&headers, state.session.panel(route).await)
}

/// Fetch departures for a panel's origin.
async fn search_departures(
    State(state): State<AppState>,
    Path(route): Path<Commute>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    settle(state.session.search_departures(route).await, &headers)?;
    panel_response(&headers, state.session.panel(route).await)
}

/// One station picker.
async fn get_station(
    State(state): State<AppState>,
    Path((route, role)): Path<(Commute, StationRole)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    station_response(&headers, state.session.station(route, role).await)
}

/// Feed the picker's text; the search itself runs after the debounce.
async fn query_station(
    State(state): State<AppState>,
    Path((route, role)): Path<(Commute, StationRole)>,
    headers: HeaderMap,
    Json(req): Json<QueryRequest>,
) -> Result<Response, AppError> {
    settle(state.session.type_query(route, role, &req.q).await, &headers)?;
    station_response(&headers, state.session.station(route, role).await)
}

/// Commit a search result. Returns the whole plan, since a morning change
/// can rewrite the mirrored evening panel.
async fn select_station(
    State(state): State<AppState>,
    Path((route, role)): Path<(Commute, StationRole)>,
    headers: HeaderMap,
    Json(req): Json<SelectRequest>,
) -> Result<Response, AppError> {
    settle(
        state.session.select_station(route, role, req.stop_id).await,
        &headers,
    )?;
    plan_response(&headers, state.session.view().await)
}

/// Clear a picker's station.
async fn clear_station(
    State(state): State<AppState>,
    Path((route, role)): Path<(Commute, StationRole)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    settle(state.session.clear_station(route, role).await, &headers)?;
    plan_response(&headers, state.session.view().await)
}

/// Close a picker's result list.
async fn dismiss_station(
    State(state): State<AppState>,
    Path((route, role)): Path<(Commute, StationRole)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    state.session.dismiss_search(route, role).await;
    station_response(&headers, state.session.station(route, role).await)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::UnknownStop(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e
                    .notice()
                    .map(|n| n.message().to_string())
                    .unwrap_or_else(|| e.to_string()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
