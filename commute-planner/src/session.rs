//! Async driver for the planner state.
//!
//! A [`Session`] owns the one [`CommutePlan`] behind a tokio mutex and is
//! the only thing that talks to the data source. The lock is released for
//! the duration of every network call; request tokens in the plan decide
//! whether a response is still wanted when it comes back.
//!
//! Debounce timers are spawned tasks sleeping until the search deadline.
//! A timer that wakes up after a later keystroke moved the deadline finds
//! nothing due and exits, so only the last timer in a burst searches.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::commute::{
    Commute, CommutePlan, PlanView, RouteError, RoutePanelView, StationRole, StationView,
};
use crate::domain::{Stop, StopId, TimeOfDay};
use crate::planner::{CachedEstimator, JourneyEstimator, PlaceholderEstimator, PlannerConfig};
use crate::ptv::DataSource;

type PickerKey = (Commute, StationRole);

/// Shared handle to the planner. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    source: Arc<dyn DataSource>,
    plan: Arc<Mutex<CommutePlan>>,
    config: Arc<PlannerConfig>,
    timers: Arc<Mutex<HashMap<PickerKey, Vec<JoinHandle<()>>>>>,
}

impl Session {
    /// Create a session with the placeholder journey estimator.
    pub fn new(source: Arc<dyn DataSource>, config: PlannerConfig) -> Self {
        let estimator = CachedEstimator::new(Arc::new(PlaceholderEstimator));
        Self::with_estimator(source, config, Arc::new(estimator))
    }

    pub fn with_estimator(
        source: Arc<dyn DataSource>,
        config: PlannerConfig,
        estimator: Arc<dyn JourneyEstimator>,
    ) -> Self {
        let plan = CommutePlan::new(&config, estimator);
        Self {
            source,
            plan: Arc::new(Mutex::new(plan)),
            config: Arc::new(config),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub async fn view(&self) -> PlanView {
        self.plan.lock().await.view(&Local::now())
    }

    pub async fn panel(&self, commute: Commute) -> RoutePanelView {
        self.plan
            .lock()
            .await
            .route(commute)
            .view(commute, &Local::now())
    }

    pub async fn station(&self, commute: Commute, role: StationRole) -> StationView {
        self.plan
            .lock()
            .await
            .route(commute)
            .station_view(commute, role)
    }

    /// Feed the picker's current text and arm the debounce timer.
    pub async fn type_query(
        &self,
        commute: Commute,
        role: StationRole,
        text: &str,
    ) -> Result<(), RouteError> {
        let deadline = self
            .plan
            .lock()
            .await
            .input_query(commute, role, text, Instant::now())?;

        if let Some(due) = deadline {
            let session = self.clone();
            let timer = tokio::spawn(async move {
                session.run_search_timer(commute, role, due).await;
            });
            self.track(commute, role, timer).await;
        }
        Ok(())
    }

    async fn run_search_timer(&self, commute: Commute, role: StationRole, due: Instant) {
        tokio::time::sleep_until(due).await;

        let request = self
            .plan
            .lock()
            .await
            .poll_search(commute, role, Instant::now());
        let Some(request) = request else {
            return;
        };

        debug!(%commute, %role, term = %request.term, "searching stations");
        let outcome = self
            .source
            .search(&request.term, &self.config.search_route_types)
            .await
            .map(|results| results.stops);

        self.plan
            .lock()
            .await
            .complete_search(commute, role, request.token, outcome);
    }

    pub async fn select_station(
        &self,
        commute: Commute,
        role: StationRole,
        stop_id: StopId,
    ) -> Result<Stop, RouteError> {
        let stop = self
            .plan
            .lock()
            .await
            .select_station(commute, role, stop_id)?;
        self.abort_timers(commute, role).await;
        info!(%commute, %role, stop = %stop.name, "station selected");
        Ok(stop)
    }

    pub async fn clear_station(&self, commute: Commute, role: StationRole) -> Result<(), RouteError> {
        self.plan.lock().await.clear_station(commute, role)
    }

    pub async fn dismiss_search(&self, commute: Commute, role: StationRole) {
        self.plan.lock().await.dismiss_search(commute, role);
    }

    /// Parse and apply a time of day. Loaded departures are re-filtered,
    /// never re-fetched.
    pub async fn set_time(&self, commute: Commute, raw: &str) -> Result<(), RouteError> {
        let mut plan = self.plan.lock().await;
        let time = match TimeOfDay::parse_hhmm(raw) {
            Ok(time) => time,
            Err(e) => {
                let err = RouteError::from(e);
                plan.reject_time(commute, &err);
                return Err(err);
            }
        };
        plan.set_time(commute, time, &Local::now())
    }

    /// Toggle mirroring. Enabling it tears down the evening pickers'
    /// timers and searches.
    pub async fn set_mirror(&self, enabled: bool) {
        if enabled {
            for role in [StationRole::From, StationRole::To] {
                self.abort_timers(Commute::Evening, role).await;
            }
        }
        self.plan.lock().await.set_mirror(enabled);
        info!(enabled, "mirror set");
    }

    /// Fetch departures for a leg's origin and filter them by its time.
    pub async fn search_departures(&self, commute: Commute) -> Result<(), RouteError> {
        let query = self.plan.lock().await.begin_departures(commute)?;

        debug!(%commute, stop_id = %query.stop_id, "fetching departures");
        let outcome = self
            .source
            .departures(query.stop_id, query.route_type, query.limit)
            .await;

        self.plan
            .lock()
            .await
            .complete_departures(commute, query.token, outcome, &Local::now());
        Ok(())
    }

    /// Abort every timer and in-flight search.
    pub async fn shutdown(&self) {
        let mut timers = self.timers.lock().await;
        for (_, handles) in timers.drain() {
            for handle in handles {
                handle.abort();
            }
        }
        let mut plan = self.plan.lock().await;
        plan.cancel_searches(Commute::Morning);
        plan.cancel_searches(Commute::Evening);
    }

    async fn track(&self, commute: Commute, role: StationRole, timer: JoinHandle<()>) {
        let mut timers = self.timers.lock().await;
        let handles = timers.entry((commute, role)).or_default();
        handles.retain(|h| !h.is_finished());
        handles.push(timer);
    }

    async fn abort_timers(&self, commute: Commute, role: StationRole) {
        let handles = self.timers.lock().await.remove(&(commute, role));
        for handle in handles.into_iter().flatten() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
