use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commute_planner::cache::{CacheConfig, CachedSource};
use commute_planner::config::{AppConfig, SourceChoice};
use commute_planner::planner::PlannerConfig;
use commute_planner::ptv::{DataSource, MockPtvClient, PtvClient};
use commute_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();

    // Pick the data source; a live client that cannot be built falls back to mock data
    let (source, source_name): (Arc<dyn DataSource>, &'static str) = match config.source {
        SourceChoice::Live(ptv_config) => match PtvClient::new(ptv_config) {
            Ok(client) => {
                let cached = CachedSource::new(client, &CacheConfig::default());
                (Arc::new(cached), "PTV Timetable API")
            }
            Err(e) => {
                warn!(error = %e, "failed to create PTV client, serving mock data");
                (Arc::new(MockPtvClient::new()), "mock data")
            }
        },
        SourceChoice::Mock => (Arc::new(MockPtvClient::new()), "mock data"),
    };

    let state = AppState::new(source, source_name, PlannerConfig::default());
    let session = state.session.clone();
    let app = create_router(state, &config.static_dir);

    let addr = config.addr;
    info!(%addr, source = source_name, "commute planner listening");
    println!("Commute Planner listening on http://{addr}");
    println!();
    println!("Open http://{addr} in your browser for the web interface.");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health                                  - Health check");
    println!("  GET  /api/plan                                - Both commute panels");
    println!("  POST /api/mirror                              - Toggle evening mirroring");
    println!("  POST /api/routes/:route/time                  - Set departure time");
    println!("  POST /api/routes/:route/departures            - Search departures");
    println!("  POST /api/routes/:route/stations/:role/query  - Search stations");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
        .expect("Server error");

    session.shutdown().await;
    info!("shut down");
}
