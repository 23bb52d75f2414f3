//! One commute leg: origin, destination, time of day and departures.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{DeparturesResult, RouteType, Stop, StopId, TimeOfDay};
use crate::planner::{JourneyEstimator, PlannerConfig, filter_departures_by_time};
use crate::ptv::PtvError;

use super::notice::{Notice, RouteError};
use super::station_search::StationSearch;

/// Which of the two commute legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commute {
    Morning,
    Evening,
}

impl Commute {
    pub fn title(&self) -> &'static str {
        match self {
            Commute::Morning => "Morning Commute",
            Commute::Evening => "Evening Commute",
        }
    }
}

impl fmt::Display for Commute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commute::Morning => write!(f, "morning"),
            Commute::Evening => write!(f, "evening"),
        }
    }
}

/// Origin or destination picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationRole {
    From,
    To,
}

impl fmt::Display for StationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationRole::From => write!(f, "from"),
            StationRole::To => write!(f, "to"),
        }
    }
}

/// Whether the stations and time can be edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerMode {
    Editable,
    Mirrored,
}

/// Identifies one departures fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeparturesToken(u64);

/// A departures fetch the caller should run now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeparturesQuery {
    pub token: DeparturesToken,
    pub stop_id: StopId,
    pub route_type: RouteType,
    pub limit: u32,
}

/// State for one commute leg.
///
/// `departures` holds what the data source returned; `filtered` is always
/// `departures` narrowed by the current time of day, so a time change only
/// needs a re-filter.
pub struct RouteSelector {
    title: String,
    mode: PickerMode,
    from: Option<Stop>,
    to: Option<Stop>,
    time: TimeOfDay,
    journey_minutes: Option<u32>,
    departures: Option<DeparturesResult>,
    filtered: Option<DeparturesResult>,
    notice: Option<Notice>,
    fetches: u64,
    latest_fetch: Option<DeparturesToken>,
    from_search: StationSearch,
    to_search: StationSearch,
    estimator: Arc<dyn JourneyEstimator>,
    route_type: RouteType,
    limit: u32,
}

impl RouteSelector {
    pub fn new(
        title: impl Into<String>,
        time: TimeOfDay,
        config: &PlannerConfig,
        estimator: Arc<dyn JourneyEstimator>,
    ) -> Self {
        Self {
            title: title.into(),
            mode: PickerMode::Editable,
            from: None,
            to: None,
            time,
            journey_minutes: None,
            departures: None,
            filtered: None,
            notice: None,
            fetches: 0,
            latest_fetch: None,
            from_search: StationSearch::from_config(config),
            to_search: StationSearch::from_config(config),
            estimator,
            route_type: config.departures_route_type,
            limit: config.departures_limit,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> PickerMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == PickerMode::Mirrored
    }

    pub fn from(&self) -> Option<&Stop> {
        self.from.as_ref()
    }

    pub fn to(&self) -> Option<&Stop> {
        self.to.as_ref()
    }

    pub fn station(&self, role: StationRole) -> Option<&Stop> {
        match role {
            StationRole::From => self.from(),
            StationRole::To => self.to(),
        }
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn journey_minutes(&self) -> Option<u32> {
        self.journey_minutes
    }

    /// Departures as returned by the data source.
    pub fn departures(&self) -> Option<&DeparturesResult> {
        self.departures.as_ref()
    }

    /// Departures at or after the selected time of day.
    pub fn filtered(&self) -> Option<&DeparturesResult> {
        self.filtered.as_ref()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn is_loading(&self) -> bool {
        self.latest_fetch.is_some()
    }

    pub fn search(&self, role: StationRole) -> &StationSearch {
        match role {
            StationRole::From => &self.from_search,
            StationRole::To => &self.to_search,
        }
    }

    /// Mutable access to a picker's search box; refused while mirrored.
    pub fn search_mut(&mut self, role: StationRole) -> Result<&mut StationSearch, RouteError> {
        self.ensure_editable()?;
        Ok(match role {
            StationRole::From => &mut self.from_search,
            StationRole::To => &mut self.to_search,
        })
    }

    /// Set or clear a station by role.
    pub fn set_station(&mut self, role: StationRole, stop: Option<Stop>) -> Result<(), RouteError> {
        match role {
            StationRole::From => self.set_from(stop),
            StationRole::To => self.set_to(stop),
        }
    }

    /// Change the origin. Everything derived from the old origin goes with
    /// it: destination, estimate, departures and any notice.
    pub fn set_from(&mut self, stop: Option<Stop>) -> Result<(), RouteError> {
        self.ensure_editable()?;
        self.replace_from(stop);
        Ok(())
    }

    pub fn set_to(&mut self, stop: Option<Stop>) -> Result<(), RouteError> {
        self.ensure_editable()?;
        self.to = stop;
        self.update_estimate();
        Ok(())
    }

    /// Change the time of day and re-filter what is already loaded.
    pub fn set_time<Tz: TimeZone>(
        &mut self,
        time: TimeOfDay,
        now: &DateTime<Tz>,
    ) -> Result<(), RouteError> {
        self.ensure_editable()?;
        self.time = time;
        self.refilter(now);
        Ok(())
    }

    /// Record a rejected edit so it shows next to the picker.
    pub fn reject(&mut self, err: &RouteError) {
        if let Some(notice) = err.notice() {
            self.notice = Some(notice);
        }
    }

    /// Start a departures fetch for the current origin.
    ///
    /// Issuing a new query makes any earlier in-flight fetch stale.
    pub fn begin_departures(&mut self) -> Result<DeparturesQuery, RouteError> {
        let Some(from) = &self.from else {
            self.notice = Some(Notice::MissingOrigin);
            return Err(RouteError::MissingOrigin);
        };

        self.fetches += 1;
        let token = DeparturesToken(self.fetches);
        self.latest_fetch = Some(token);
        self.notice = None;

        Ok(DeparturesQuery {
            token,
            stop_id: from.id,
            route_type: self.route_type,
            limit: self.limit,
        })
    }

    /// Apply the outcome of a departures fetch. Returns `false` if it was
    /// stale.
    pub fn complete_departures<Tz: TimeZone>(
        &mut self,
        token: DeparturesToken,
        outcome: Result<DeparturesResult, PtvError>,
        now: &DateTime<Tz>,
    ) -> bool {
        if self.latest_fetch != Some(token) {
            debug!(title = %self.title, ?token, "discarding stale departures");
            return false;
        }
        self.latest_fetch = None;

        match outcome {
            Ok(result) => {
                self.departures = Some(result);
                self.refilter(now);
            }
            Err(e) => {
                warn!(title = %self.title, error = %e, "departures fetch failed");
                self.notice = Some(Notice::DeparturesFailed);
            }
        }
        true
    }

    /// Switch to mirrored mode showing the given stations.
    pub fn enter_mirror(&mut self, from: Option<Stop>, to: Option<Stop>) {
        self.mode = PickerMode::Mirrored;
        self.from_search.cancel();
        self.to_search.cancel();
        self.apply_mirror(from, to);
    }

    /// Overwrite the stations from the mirrored leg.
    ///
    /// Departures survive if the origin did not actually change.
    pub fn apply_mirror(&mut self, from: Option<Stop>, to: Option<Stop>) {
        if from != self.from {
            self.replace_from(from);
        }
        self.to = to;
        self.update_estimate();
    }

    /// Return to editable mode with empty stations.
    pub fn leave_mirror(&mut self) {
        self.mode = PickerMode::Editable;
        self.replace_from(None);
    }

    fn ensure_editable(&self) -> Result<(), RouteError> {
        if self.is_read_only() {
            return Err(RouteError::ReadOnly);
        }
        Ok(())
    }

    fn replace_from(&mut self, stop: Option<Stop>) {
        self.from = stop;
        self.to = None;
        self.journey_minutes = None;
        self.departures = None;
        self.filtered = None;
        self.latest_fetch = None;
        self.notice = None;
    }

    fn update_estimate(&mut self) {
        self.journey_minutes = match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some(self.estimator.estimate(from.id, to.id)),
            _ => None,
        };
    }

    fn refilter<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        let Some(all) = &self.departures else {
            return;
        };
        let kept = filter_departures_by_time(&all.departures, Some(self.time), now);
        self.notice = kept.is_empty().then_some(Notice::NoDepartures);
        self.filtered = Some(all.with_departures(kept));
    }
}

impl fmt::Debug for RouteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSelector")
            .field("title", &self.title)
            .field("mode", &self.mode)
            .field("from", &self.from.as_ref().map(|s| &s.name))
            .field("to", &self.to.as_ref().map(|s| &s.name))
            .field("time", &self.time)
            .field("journey_minutes", &self.journey_minutes)
            .finish_non_exhaustive()
    }
}
