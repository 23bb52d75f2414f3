//! Incremental station search.
//!
//! A sans-IO state machine: callers feed it keystrokes and clock readings,
//! ask it which search (if any) is due, run that search themselves, and
//! hand the outcome back with the token they were given. Only the outcome
//! of the most recently issued search is ever applied.
//!
//! ```text
//! Idle ──input(≥ min chars)──▶ Searching ──results──▶ Open
//!  ▲                              │                     │
//!  └──── empty / failure / short query / select / dismiss
//! ```

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{Stop, StopId};
use crate::planner::PlannerConfig;
use crate::ptv::PtvError;

use super::notice::Notice;

/// Where the search box is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    /// Nothing shown, nothing pending.
    Idle,
    /// A search is waiting out the debounce or in flight.
    Searching,
    /// Results are shown.
    Open,
}

/// Identifies one fired search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchToken(u64);

/// A search the caller should run now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: SearchToken,
    pub term: String,
}

#[derive(Debug, Clone)]
struct Pending {
    term: String,
    due: Instant,
}

/// Debounced search state for one station picker.
#[derive(Debug, Clone)]
pub struct StationSearch {
    query: String,
    phase: SearchPhase,
    results: Vec<Stop>,
    notice: Option<Notice>,
    pending: Option<Pending>,
    issued: u64,
    latest: Option<SearchToken>,
    debounce: Duration,
    min_chars: usize,
}

impl StationSearch {
    pub fn new(debounce: Duration, min_chars: usize) -> Self {
        Self {
            query: String::new(),
            phase: SearchPhase::Idle,
            results: Vec::new(),
            notice: None,
            pending: None,
            issued: 0,
            latest: None,
            debounce,
            min_chars,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.debounce, config.min_query_chars)
    }

    /// Raw text as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Results of the last applied search. Only meaningful while `Open`.
    pub fn results(&self) -> &[Stop] {
        &self.results
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Whether a search is pending or in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.latest.is_some()
    }

    /// When the pending search becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Record a change to the input text.
    ///
    /// Returns the new deadline when the trimmed text is long enough to
    /// search. Shorter text drops any pending search and never reaches the
    /// data source.
    pub fn input(&mut self, text: &str, now: Instant) -> Option<Instant> {
        self.query = text.to_string();
        self.notice = None;

        let term = text.trim();
        if term.chars().count() < self.min_chars {
            self.pending = None;
            self.latest = None;
            self.results.clear();
            self.phase = SearchPhase::Idle;
            return None;
        }

        let due = now + self.debounce;
        self.pending = Some(Pending {
            term: term.to_string(),
            due,
        });
        self.phase = SearchPhase::Searching;
        Some(due)
    }

    /// Take the pending search if its debounce has elapsed.
    ///
    /// Issuing a new token makes every earlier in-flight search stale.
    pub fn poll_due(&mut self, now: Instant) -> Option<SearchRequest> {
        if self.pending.as_ref().is_none_or(|p| p.due > now) {
            return None;
        }
        let pending = self.pending.take()?;

        self.issued += 1;
        let token = SearchToken(self.issued);
        self.latest = Some(token);
        debug!(term = %pending.term, token = self.issued, "station search due");

        Some(SearchRequest {
            token,
            term: pending.term,
        })
    }

    /// Apply the outcome of a search. Returns `false` if it was stale.
    pub fn complete(&mut self, token: SearchToken, outcome: Result<Vec<Stop>, PtvError>) -> bool {
        if self.latest != Some(token) {
            debug!(?token, "discarding stale station search");
            return false;
        }
        self.latest = None;

        match outcome {
            Ok(stops) if stops.is_empty() => {
                self.results.clear();
                self.notice = Some(Notice::NoStations);
                self.phase = SearchPhase::Idle;
            }
            Ok(stops) => {
                self.results = stops;
                self.notice = None;
                self.phase = SearchPhase::Open;
            }
            Err(e) => {
                warn!(error = %e, "station search failed");
                self.results.clear();
                self.notice = Some(Notice::SearchFailed);
                self.phase = SearchPhase::Idle;
            }
        }

        // A newer keystroke is still waiting out its debounce.
        if self.pending.is_some() {
            self.phase = SearchPhase::Searching;
        }
        true
    }

    /// Commit to one of the shown results, resetting the box.
    pub fn select(&mut self, stop_id: StopId) -> Option<Stop> {
        let stop = self.results.iter().find(|s| s.id == stop_id)?.clone();
        self.reset();
        Some(stop)
    }

    /// Close the result list (click outside the picker).
    pub fn dismiss(&mut self) {
        if self.phase == SearchPhase::Open {
            self.phase = SearchPhase::Idle;
            self.results.clear();
        }
    }

    /// Drop everything, including pending and in-flight searches.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.query.clear();
        self.results.clear();
        self.notice = None;
        self.pending = None;
        self.latest = None;
        self.phase = SearchPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteType;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn search() -> StationSearch {
        StationSearch::new(DEBOUNCE, 2)
    }

    fn stop(id: u32, name: &str) -> Stop {
        Stop::new(StopId(id), name, RouteType::TRAIN)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn short_query_stays_idle() {
        let t0 = Instant::now();
        let mut s = search();

        assert_eq!(s.input("F", t0), None);
        assert_eq!(s.input("  F  ", t0), None);
        assert_eq!(s.phase(), SearchPhase::Idle);
        assert_eq!(s.poll_due(t0 + ms(10_000)), None);
        assert_eq!(s.query(), "  F  ");
    }

    #[test]
    fn fires_after_debounce() {
        let t0 = Instant::now();
        let mut s = search();

        assert_eq!(s.input("Fl", t0), Some(t0 + DEBOUNCE));
        assert_eq!(s.phase(), SearchPhase::Searching);
        assert_eq!(s.poll_due(t0 + ms(299)), None);

        let request = s.poll_due(t0 + DEBOUNCE).unwrap();
        assert_eq!(request.term, "Fl");
        assert_eq!(s.poll_due(t0 + ms(1000)), None);
    }

    #[test]
    fn keystroke_replaces_pending_search() {
        let t0 = Instant::now();
        let mut s = search();

        s.input("Fl", t0);
        s.input("Fli", t0 + ms(200));
        // The first deadline passes without anything firing.
        assert_eq!(s.poll_due(t0 + ms(300)), None);

        let request = s.poll_due(t0 + ms(500)).unwrap();
        assert_eq!(request.term, "Fli");
    }

    #[test]
    fn term_is_trimmed() {
        let t0 = Instant::now();
        let mut s = search();
        s.input("  Rich ", t0);
        assert_eq!(s.poll_due(t0 + DEBOUNCE).unwrap().term, "Rich");
    }

    #[test]
    fn shortening_cancels_pending() {
        let t0 = Instant::now();
        let mut s = search();

        s.input("Fl", t0);
        s.input("F", t0 + ms(100));
        assert_eq!(s.deadline(), None);
        assert_eq!(s.poll_due(t0 + ms(1000)), None);
        assert!(!s.is_busy());
    }

    #[test]
    fn results_open_the_list() {
        let t0 = Instant::now();
        let mut s = search();
        s.input("Fli", t0);
        let request = s.poll_due(t0 + DEBOUNCE).unwrap();

        assert!(s.complete(request.token, Ok(vec![stop(1071, "Flinders Street")])));
        assert_eq!(s.phase(), SearchPhase::Open);
        assert_eq!(s.results().len(), 1);
        assert_eq!(s.notice(), None);
    }

    #[test]
    fn no_results_is_informational() {
        let t0 = Instant::now();
        let mut s = search();
        s.input("zzz", t0);
        let request = s.poll_due(t0 + DEBOUNCE).unwrap();

        assert!(s.complete(request.token, Ok(vec![])));
        assert_eq!(s.phase(), SearchPhase::Idle);
        assert_eq!(s.notice(), Some(Notice::NoStations));
    }

    #[test]
    fn failure_closes_with_generic_notice() {
        let t0 = Instant::now();
        let mut s = search();
        s.input("Fli", t0);
        let request = s.poll_due(t0 + DEBOUNCE).unwrap();

        let err = PtvError::Api {
            status: 503,
            message: "upstream exploded".into(),
        };
        assert!(s.complete(request.token, Err(err)));
        assert_eq!(s.phase(), SearchPhase::Idle);
        assert_eq!(s.notice(), Some(Notice::SearchFailed));
        assert!(!Notice::SearchFailed.message().contains("exploded"));
    }

    #[test]
    fn stale_response_is_discarded() {
        let t0 = Instant::now();
        let mut s = search();

        s.input("Fli", t0);
        let slow = s.poll_due(t0 + ms(300)).unwrap();
        s.input("Rich", t0 + ms(400));
        let fast = s.poll_due(t0 + ms(700)).unwrap();

        assert!(s.complete(fast.token, Ok(vec![stop(1162, "Richmond")])));
        assert!(!s.complete(slow.token, Ok(vec![stop(1071, "Flinders Street")])));
        assert_eq!(s.results()[0].name, "Richmond");
    }

    #[test]
    fn response_before_next_fire_still_applies() {
        let t0 = Instant::now();
        let mut s = search();

        s.input("Fli", t0);
        let first = s.poll_due(t0 + ms(300)).unwrap();
        s.input("Flin", t0 + ms(350));

        assert!(s.complete(first.token, Ok(vec![stop(1071, "Flinders Street")])));
        // Still waiting on the newer keystroke.
        assert_eq!(s.phase(), SearchPhase::Searching);
        assert!(s.poll_due(t0 + ms(650)).is_some());
    }

    #[test]
    fn select_commits_and_resets() {
        let t0 = Instant::now();
        let mut s = search();
        s.input("Rich", t0);
        let request = s.poll_due(t0 + DEBOUNCE).unwrap();
        s.complete(request.token, Ok(vec![stop(1162, "Richmond")]));

        assert_eq!(s.select(StopId(9999)), None);
        let chosen = s.select(StopId(1162)).unwrap();
        assert_eq!(chosen.name, "Richmond");
        assert_eq!(s.query(), "");
        assert!(s.results().is_empty());
        assert_eq!(s.phase(), SearchPhase::Idle);
    }

    #[test]
    fn dismiss_closes_open_list() {
        let t0 = Instant::now();
        let mut s = search();
        s.input("Rich", t0);
        let request = s.poll_due(t0 + DEBOUNCE).unwrap();
        s.complete(request.token, Ok(vec![stop(1162, "Richmond")]));

        s.dismiss();
        assert_eq!(s.phase(), SearchPhase::Idle);
        assert!(s.results().is_empty());
        assert_eq!(s.select(StopId(1162)), None);
    }

    #[test]
    fn cancel_invalidates_in_flight() {
        let t0 = Instant::now();
        let mut s = search();
        s.input("Rich", t0);
        let request = s.poll_due(t0 + DEBOUNCE).unwrap();

        s.cancel();
        assert!(!s.complete(request.token, Ok(vec![stop(1162, "Richmond")])));
        assert!(s.results().is_empty());
        assert_eq!(s.phase(), SearchPhase::Idle);
    }
}
