//! Time handling for departures.
//!
//! The timetable API reports instants in UTC. Users think in wall-clock time
//! of their own zone, so everything shown or compared against a user-entered
//! time goes through the viewer's [`TimeZone`]. Functions here take the zone
//! (or a `now` carrying it) explicitly, which keeps them pure.

use std::fmt;

use chrono::{DateTime, Duration, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid time-of-day string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day with minute precision, as entered in the time
/// picker.
///
/// # Examples
///
/// ```
/// use commute_planner::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse_hhmm("08:05").unwrap();
/// assert_eq!(t.to_string(), "08:05");
///
/// assert!(TimeOfDay::parse_hhmm("8:05").is_err());
/// assert!(TimeOfDay::parse_hhmm("24:00").is_err());
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// Create from components, rejecting out-of-range values.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self { hour, minute })
    }

    /// Parse "HH:MM" (exactly five characters, 24-hour clock).
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // Range checked at construction.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The instant at which this time of day occurs on `now`'s local date.
    ///
    /// Never rolls over to another day. A time skipped by a forward DST
    /// transition resolves an hour later (02:30 becomes 03:30); a repeated
    /// time resolves to its first occurrence.
    pub fn today_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Utc> {
        let tz = now.timezone();
        let naive = now.date_naive().and_time(self.to_naive_time());

        tz.from_local_datetime(&naive)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| {
                let offset = i64::from(now.offset().fix().local_minus_utc());
                Utc.from_utc_datetime(&(naive - Duration::seconds(offset)))
            })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({:02}:{:02})", self.hour, self.minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        }
        _ => None,
    }
}

/// How long until a departure, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUntil {
    Departed,
    Now,
    Minutes(i64),
    HoursMinutes(i64, i64),
}

impl TimeUntil {
    /// Classify a whole-minute difference (already floored).
    pub fn from_minutes(minutes: i64) -> Self {
        match minutes {
            m if m < 0 => TimeUntil::Departed,
            0 => TimeUntil::Now,
            m if m < 60 => TimeUntil::Minutes(m),
            m => TimeUntil::HoursMinutes(m / 60, m % 60),
        }
    }

    pub fn is_now(&self) -> bool {
        matches!(self, TimeUntil::Now)
    }
}

impl fmt::Display for TimeUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUntil::Departed => f.write_str("Departed"),
            TimeUntil::Now => f.write_str("Now"),
            TimeUntil::Minutes(m) => write!(f, "{m} min"),
            TimeUntil::HoursMinutes(h, m) => write!(f, "{h}h {m}m"),
        }
    }
}

/// Time remaining until `at`, floored to whole minutes.
///
/// Anything strictly in the past, even by a fraction of a millisecond, is
/// reported as departed.
pub fn time_until<Tz: TimeZone>(at: DateTime<Utc>, now: &DateTime<Tz>) -> TimeUntil {
    let diff = at.signed_duration_since(now.with_timezone(&Utc));
    if diff < Duration::zero() {
        return TimeUntil::Departed;
    }
    TimeUntil::from_minutes(diff.num_minutes())
}

/// 12-hour display form in the viewer's zone, e.g. "08:05 AM".
pub fn format_display_time<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.with_timezone(tz).format("%I:%M %p").to_string()
}

/// Departure time plus the journey duration, formatted for display.
pub fn estimated_arrival<Tz>(departure: DateTime<Utc>, journey_minutes: u32, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format_display_time(departure + Duration::minutes(i64::from(journey_minutes)), tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use chrono_tz::Australia::Melbourne;

    fn melbourne() -> FixedOffset {
        FixedOffset::east_opt(10 * 3600).unwrap()
    }

    fn utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, s).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        let t = TimeOfDay::parse_hhmm("00:00").unwrap();
        assert_eq!((t.hour(), t.minute()), (0, 0));

        let t = TimeOfDay::parse_hhmm("23:59").unwrap();
        assert_eq!((t.hour(), t.minute()), (23, 59));

        let t = TimeOfDay::parse_hhmm("17:30").unwrap();
        assert_eq!(t.to_string(), "17:30");
    }

    #[test]
    fn parse_invalid_format() {
        assert!(TimeOfDay::parse_hhmm("").is_err());
        assert!(TimeOfDay::parse_hhmm("1730").is_err());
        assert!(TimeOfDay::parse_hhmm("17-30").is_err());
        assert!(TimeOfDay::parse_hhmm("7:30").is_err());
        assert!(TimeOfDay::parse_hhmm("ab:cd").is_err());
        assert!(TimeOfDay::parse_hhmm("17:30:00").is_err());
    }

    #[test]
    fn parse_invalid_values() {
        assert!(TimeOfDay::parse_hhmm("24:00").is_err());
        assert!(TimeOfDay::parse_hhmm("12:60").is_err());
        assert!(TimeOfDay::new(25, 0).is_err());
    }

    #[test]
    fn serde_uses_hhmm_string() {
        let t: TimeOfDay = serde_json::from_str("\"08:00\"").unwrap();
        assert_eq!(t, TimeOfDay::new(8, 0).unwrap());
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"08:00\"");
        assert!(serde_json::from_str::<TimeOfDay>("\"8am\"").is_err());
    }

    #[test]
    fn today_at_uses_local_date() {
        // 2026-03-02 21:30 UTC is 2026-03-03 07:30 in UTC+10.
        let now = utc(21, 30, 0).with_timezone(&melbourne());
        let cutoff = TimeOfDay::new(8, 0).unwrap().today_at(&now);
        // 08:00 local on the 3rd is 22:00 UTC on the 2nd.
        assert_eq!(cutoff, utc(22, 0, 0));
    }

    #[test]
    fn today_at_never_rolls_forward() {
        let now = utc(12, 0, 0).with_timezone(&melbourne()); // 22:00 local
        let cutoff = TimeOfDay::new(6, 0).unwrap().today_at(&now);
        let local = cutoff.with_timezone(&melbourne());
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert!(cutoff < now.with_timezone(&Utc));
    }

    #[test]
    fn time_until_boundaries() {
        let now = utc(10, 0, 0);

        assert_eq!(time_until(utc(9, 59, 0), &now), TimeUntil::Departed);
        assert_eq!(time_until(utc(9, 59, 59), &now), TimeUntil::Departed);
        assert_eq!(time_until(utc(10, 0, 0), &now), TimeUntil::Now);
        assert_eq!(time_until(utc(10, 0, 59), &now), TimeUntil::Now);
        assert_eq!(time_until(utc(10, 1, 0), &now), TimeUntil::Minutes(1));
        assert_eq!(time_until(utc(10, 59, 59), &now), TimeUntil::Minutes(59));
        assert_eq!(time_until(utc(11, 0, 0), &now), TimeUntil::HoursMinutes(1, 0));
        assert_eq!(time_until(utc(12, 25, 0), &now), TimeUntil::HoursMinutes(2, 25));
    }

    #[test]
    fn sub_millisecond_past_is_departed() {
        let at = utc(10, 0, 0);
        assert_eq!(time_until(at, &(at + Duration::microseconds(500))), TimeUntil::Departed);
        assert_eq!(time_until(at, &(at + Duration::nanoseconds(1))), TimeUntil::Departed);
        assert_eq!(time_until(at, &(at - Duration::microseconds(500))), TimeUntil::Now);
    }

    #[test]
    fn cutoff_in_spring_forward_gap_moves_an_hour_later() {
        // Melbourne skips 02:00-03:00 on 2026-10-04; 02:30 becomes 03:30 AEDT.
        let now = Melbourne.with_ymd_and_hms(2026, 10, 4, 9, 0, 0).unwrap();
        let cutoff = TimeOfDay::new(2, 30).unwrap().today_at(&now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 10, 3, 16, 30, 0).unwrap());
    }

    #[test]
    fn repeated_cutoff_takes_first_occurrence() {
        // 02:00-03:00 happens twice on 2026-04-05; the AEDT 02:30 comes first.
        let now = Melbourne.with_ymd_and_hms(2026, 4, 5, 9, 0, 0).unwrap();
        let cutoff = TimeOfDay::new(2, 30).unwrap().today_at(&now);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 4, 4, 15, 30, 0).unwrap());
    }

    #[test]
    fn time_until_display() {
        assert_eq!(TimeUntil::Departed.to_string(), "Departed");
        assert_eq!(TimeUntil::Now.to_string(), "Now");
        assert_eq!(TimeUntil::Minutes(7).to_string(), "7 min");
        assert_eq!(TimeUntil::HoursMinutes(1, 5).to_string(), "1h 5m");
        assert!(TimeUntil::Now.is_now());
        assert!(!TimeUntil::Minutes(1).is_now());
    }

    #[test]
    fn display_time_is_local_twelve_hour() {
        // 22:05 UTC is 08:05 the next morning in UTC+10.
        assert_eq!(format_display_time(utc(22, 5, 0), &melbourne()), "08:05 AM");
        assert_eq!(format_display_time(utc(7, 30, 0), &melbourne()), "05:30 PM");
        assert_eq!(format_display_time(utc(2, 0, 0), &melbourne()), "12:00 PM");
        assert_eq!(format_display_time(utc(14, 0, 0), &melbourne()), "12:00 AM");
    }

    #[test]
    fn estimated_arrival_adds_duration() {
        assert_eq!(
            estimated_arrival(utc(22, 5, 0), 25, &melbourne()),
            "08:30 AM"
        );
        assert_eq!(
            estimated_arrival(utc(1, 50, 0), 15, &melbourne()),
            "12:05 PM"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn valid_hhmm_roundtrips(hour in 0u32..24, minute in 0u32..60) {
            let s = format!("{hour:02}:{minute:02}");
            let t = TimeOfDay::parse_hhmm(&s).unwrap();
            prop_assert_eq!(t.to_string(), s);
        }

        #[test]
        fn time_until_matches_floor(offset_secs in -7200i64..7200) {
            let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
            let at = now + Duration::seconds(offset_secs);
            let expected = TimeUntil::from_minutes(offset_secs.div_euclid(60));
            prop_assert_eq!(time_until(at, &now), expected);
        }

        #[test]
        fn anything_before_now_is_departed(offset_micros in 1i64..120_000_000) {
            let at = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
            let now = at + Duration::microseconds(offset_micros);
            prop_assert_eq!(time_until(at, &now), TimeUntil::Departed);
        }
    }
}
