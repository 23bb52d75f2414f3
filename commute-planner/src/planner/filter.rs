//! Time-window filtering of departures.

use chrono::{DateTime, TimeZone};

use crate::domain::{Departure, TimeOfDay};

/// Keep the departures whose effective time is at or after `cutoff` today.
///
/// "Today" is `now`'s local date; the cutoff never carries over midnight,
/// so a late-evening cutoff hides early-morning departures of the next
/// day. Order is preserved. With no cutoff the input is returned as is.
pub fn filter_departures_by_time<Tz: TimeZone>(
    departures: &[Departure],
    cutoff: Option<TimeOfDay>,
    now: &DateTime<Tz>,
) -> Vec<Departure> {
    let Some(cutoff) = cutoff else {
        return departures.to_vec();
    };
    let threshold = cutoff.today_at(now);

    departures
        .iter()
        .filter(|d| d.effective_time() >= threshold)
        .cloned()
        .collect()
}
