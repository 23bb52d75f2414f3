//! Morning and evening legs plus the mirror toggle.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{DeparturesResult, Stop, StopId, TimeOfDay};
use crate::planner::{JourneyEstimator, PlannerConfig};
use crate::ptv::PtvError;

use super::notice::RouteError;
use super::route::{Commute, DeparturesQuery, DeparturesToken, RouteSelector, StationRole};
use super::station_search::{SearchRequest, SearchToken};

/// The whole planner state.
///
/// While mirroring is on, the evening leg's stations are always the morning
/// leg's stations swapped, and the evening pickers refuse direct edits.
#[derive(Debug)]
pub struct CommutePlan {
    morning: RouteSelector,
    evening: RouteSelector,
    mirror: bool,
}

impl CommutePlan {
    pub fn new(config: &PlannerConfig, estimator: Arc<dyn JourneyEstimator>) -> Self {
        Self {
            morning: RouteSelector::new(
                Commute::Morning.title(),
                config.morning_time,
                config,
                estimator.clone(),
            ),
            evening: RouteSelector::new(
                Commute::Evening.title(),
                config.evening_time,
                config,
                estimator,
            ),
            mirror: false,
        }
    }

    pub fn route(&self, commute: Commute) -> &RouteSelector {
        match commute {
            Commute::Morning => &self.morning,
            Commute::Evening => &self.evening,
        }
    }

    fn route_mut(&mut self, commute: Commute) -> &mut RouteSelector {
        match commute {
            Commute::Morning => &mut self.morning,
            Commute::Evening => &mut self.evening,
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror
    }

    /// Turn mirroring on or off. The morning leg is never touched.
    pub fn set_mirror(&mut self, enabled: bool) {
        if enabled == self.mirror {
            return;
        }
        self.mirror = enabled;
        debug!(enabled, "mirror toggled");

        if enabled {
            let (from, to) = self.swapped_morning();
            self.evening.enter_mirror(from, to);
        } else {
            self.evening.leave_mirror();
        }
    }

    /// Feed a keystroke to a picker's search box.
    pub fn input_query(
        &mut self,
        commute: Commute,
        role: StationRole,
        text: &str,
        now: Instant,
    ) -> Result<Option<Instant>, RouteError> {
        let route = self.route_mut(commute);
        let deadline = route.search_mut(role).map(|search| search.input(text, now));
        deadline.inspect_err(|e| route.reject(e))
    }

    /// Take a due search for a picker, if any.
    pub fn poll_search(
        &mut self,
        commute: Commute,
        role: StationRole,
        now: Instant,
    ) -> Option<SearchRequest> {
        self.route_mut(commute)
            .search_mut(role)
            .ok()?
            .poll_due(now)
    }

    /// Apply a search outcome. Returns `false` if it was stale or the
    /// picker has since become read-only.
    pub fn complete_search(
        &mut self,
        commute: Commute,
        role: StationRole,
        token: SearchToken,
        outcome: Result<Vec<Stop>, PtvError>,
    ) -> bool {
        match self.route_mut(commute).search_mut(role) {
            Ok(search) => search.complete(token, outcome),
            Err(_) => false,
        }
    }

    /// Commit a search result as the picker's station.
    pub fn select_station(
        &mut self,
        commute: Commute,
        role: StationRole,
        stop_id: StopId,
    ) -> Result<Stop, RouteError> {
        let route = self.route_mut(commute);
        let stop = route
            .search_mut(role)?
            .select(stop_id)
            .ok_or(RouteError::UnknownStop(stop_id))?;
        route.set_station(role, Some(stop.clone()))?;
        self.after_station_change(commute);
        Ok(stop)
    }

    /// Clear a picker's station (the "Change" action).
    pub fn clear_station(&mut self, commute: Commute, role: StationRole) -> Result<(), RouteError> {
        let route = self.route_mut(commute);
        if let Err(e) = route.set_station(role, None) {
            route.reject(&e);
            return Err(e);
        }
        self.after_station_change(commute);
        Ok(())
    }

    pub fn dismiss_search(&mut self, commute: Commute, role: StationRole) {
        if let Ok(search) = self.route_mut(commute).search_mut(role) {
            search.dismiss();
        }
    }

    /// Cancel pending and in-flight searches for every picker on a leg.
    pub fn cancel_searches(&mut self, commute: Commute) {
        let route = self.route_mut(commute);
        for role in [StationRole::From, StationRole::To] {
            if let Ok(search) = route.search_mut(role) {
                search.cancel();
            }
        }
    }

    pub fn set_time<Tz: TimeZone>(
        &mut self,
        commute: Commute,
        time: TimeOfDay,
        now: &DateTime<Tz>,
    ) -> Result<(), RouteError> {
        let route = self.route_mut(commute);
        route.set_time(time, now).inspect_err(|e| route.reject(e))
    }

    /// Record a time string that failed to parse.
    pub fn reject_time(&mut self, commute: Commute, err: &RouteError) {
        self.route_mut(commute).reject(err);
    }

    pub fn begin_departures(&mut self, commute: Commute) -> Result<DeparturesQuery, RouteError> {
        self.route_mut(commute).begin_departures()
    }

    pub fn complete_departures<Tz: TimeZone>(
        &mut self,
        commute: Commute,
        token: DeparturesToken,
        outcome: Result<DeparturesResult, PtvError>,
        now: &DateTime<Tz>,
    ) -> bool {
        self.route_mut(commute)
            .complete_departures(token, outcome, now)
    }

    fn after_station_change(&mut self, commute: Commute) {
        if self.mirror && commute == Commute::Morning {
            let (from, to) = self.swapped_morning();
            self.evening.apply_mirror(from, to);
        }
    }

    fn swapped_morning(&self) -> (Option<Stop>, Option<Stop>) {
        (self.morning.to().cloned(), self.morning.from().cloned())
    }
}
