//! Serializable snapshots of the planner for rendering.
//!
//! Everything here is computed from the state machines plus a `now`; views
//! are rebuilt on every request and never fed back in.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::domain::time::{estimated_arrival, format_display_time, time_until};
use crate::domain::{Departure, DeparturesResult, RunId, Stop, StopId};

use super::notice::{Notice, Severity};
use super::plan::CommutePlan;
use super::route::{Commute, PickerMode, RouteSelector, StationRole};
use super::station_search::SearchPhase;

/// Shown when a fetched board has nothing after filtering.
pub const EMPTY_BOARD_MESSAGE: &str = "No departures available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub severity: Severity,
    pub message: &'static str,
}

impl NoticeView {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            severity: notice.severity(),
            message: notice.message(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StopView {
    pub id: StopId,
    pub name: String,
    pub suburb: Option<String>,
}

impl From<&Stop> for StopView {
    fn from(stop: &Stop) -> Self {
        Self {
            id: stop.id,
            name: stop.name.clone(),
            suburb: stop.suburb.clone(),
        }
    }
}

/// One station picker: either the committed station or the search box.
#[derive(Debug, Clone, Serialize)]
pub struct StationView {
    pub commute: Commute,
    pub role: StationRole,
    pub label: &'static str,
    pub read_only: bool,
    pub selected: Option<StopView>,
    pub query: String,
    pub phase: SearchPhase,
    pub busy: bool,
    /// Only populated while the result list is open.
    pub results: Vec<StopView>,
    pub notice: Option<NoticeView>,
}

/// Arrival at the destination for one departure.
#[derive(Debug, Clone, Serialize)]
pub struct ArrivalView {
    /// First word of the destination name.
    pub station: String,
    pub time: String,
    pub minutes: u32,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartureView {
    pub run_id: RunId,
    pub destination: String,
    pub line: Option<String>,
    pub platform: Option<String>,
    pub scheduled: String,
    pub estimated: Option<String>,
    pub time_until: String,
    pub is_now: bool,
    pub arrival: Option<ArrivalView>,
}

impl DepartureView {
    pub fn build<Tz>(
        departure: &Departure,
        board: &DeparturesResult,
        destination: Option<&Stop>,
        journey_minutes: Option<u32>,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let tz = now.timezone();
        let effective = departure.effective_time();
        let until = time_until(effective, now);

        let arrival = match (destination, journey_minutes) {
            (Some(stop), Some(minutes)) => Some(ArrivalView {
                station: stop.short_name().to_string(),
                time: estimated_arrival(effective, minutes, &tz),
                minutes,
                tooltip: format!(
                    "Estimated arrival at {} after ~{} min journey. Calculated from departure time.",
                    stop.name, minutes
                ),
            }),
            _ => None,
        };

        Self {
            run_id: departure.run_id,
            destination: board
                .run(departure.run_id)
                .map(|run| run.destination_name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            line: board
                .direction(departure.direction_id)
                .map(|direction| format!("{} Line", direction.name)),
            platform: departure.platform.clone(),
            scheduled: format_display_time(departure.scheduled, &tz),
            estimated: departure.estimated.map(|t| format_display_time(t, &tz)),
            time_until: until.to_string(),
            is_now: until.is_now(),
            arrival,
        }
    }
}

/// Origin → destination summary with the journey estimate.
#[derive(Debug, Clone, Serialize)]
pub struct JourneyView {
    pub from: String,
    pub to: String,
    pub minutes: u32,
}

/// Everything one commute panel shows.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePanelView {
    pub commute: Commute,
    pub title: String,
    pub mode: PickerMode,
    pub read_only: bool,
    pub time: String,
    pub loading: bool,
    pub journey: Option<JourneyView>,
    pub from: StationView,
    pub to: StationView,
    pub notice: Option<NoticeView>,
    /// `None` until departures have been fetched.
    pub departures: Option<Vec<DepartureView>>,
    pub empty_message: &'static str,
}

impl RoutePanelView {
    /// Both pickers, origin first.
    pub fn stations(&self) -> [&StationView; 2] {
        [&self.from, &self.to]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    pub mirror: bool,
    pub morning: RoutePanelView,
    pub evening: RoutePanelView,
}

impl PlanView {
    /// Both panels, morning first.
    pub fn panels(&self) -> [&RoutePanelView; 2] {
        [&self.morning, &self.evening]
    }
}

impl RouteSelector {
    pub fn station_view(&self, commute: Commute, role: StationRole) -> StationView {
        let search = self.search(role);
        let results = if search.phase() == SearchPhase::Open {
            search.results().iter().map(StopView::from).collect()
        } else {
            Vec::new()
        };

        StationView {
            commute,
            role,
            label: match role {
                StationRole::From => "From",
                StationRole::To => "To",
            },
            read_only: self.is_read_only(),
            selected: self.station(role).map(StopView::from),
            query: search.query().to_string(),
            phase: search.phase(),
            busy: search.is_busy(),
            results,
            notice: search.notice().map(NoticeView::from),
        }
    }

    pub fn view<Tz>(&self, commute: Commute, now: &DateTime<Tz>) -> RoutePanelView
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let journey = match (self.from(), self.to(), self.journey_minutes()) {
            (Some(from), Some(to), Some(minutes)) => Some(JourneyView {
                from: from.name.clone(),
                to: to.name.clone(),
                minutes,
            }),
            _ => None,
        };

        let departures = self.filtered().map(|board| {
            board
                .departures
                .iter()
                .map(|d| DepartureView::build(d, board, self.to(), self.journey_minutes(), now))
                .collect()
        });

        RoutePanelView {
            commute,
            title: self.title().to_string(),
            mode: self.mode(),
            read_only: self.is_read_only(),
            time: self.time().to_string(),
            loading: self.is_loading(),
            journey,
            from: self.station_view(commute, StationRole::From),
            to: self.station_view(commute, StationRole::To),
            notice: self.notice().map(NoticeView::from),
            departures,
            empty_message: EMPTY_BOARD_MESSAGE,
        }
    }
}

impl CommutePlan {
    pub fn view<Tz>(&self, now: &DateTime<Tz>) -> PlanView
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        PlanView {
            mirror: self.is_mirrored(),
            morning: self.route(Commute::Morning).view(Commute::Morning, now),
            evening: self.route(Commute::Evening).view(Commute::Evening, now),
        }
    }
}
