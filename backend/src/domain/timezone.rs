//! Per-request display timezone.
//!
//! The timezone middleware opens a [`DisplayTimezone::scope`] around each
//! request using the signed-in user's preference, or the configured default
//! for anonymous calls. Within the scope, naive timestamps submitted by the
//! client are read in that zone and outgoing timestamps are rendered in it.
//! Leaving the scope restores whatever was active before, so nothing leaks
//! from one request into the next.

use std::fmt;
use std::future::Future;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use tokio::task_local;

task_local! {
    static DISPLAY_TIMEZONE: Tz;
}

/// Accessors for the timezone active on the current task.
///
/// # Examples
/// ```
/// use roombook::domain::DisplayTimezone;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let zone = chrono_tz::Europe::Warsaw;
/// let seen = DisplayTimezone::scope(zone, async { DisplayTimezone::current() }).await;
/// assert_eq!(seen, zone);
/// assert_eq!(DisplayTimezone::current(), chrono_tz::UTC);
/// # });
/// ```
pub struct DisplayTimezone;

impl DisplayTimezone {
    /// Active zone, or UTC outside any scope.
    pub fn current() -> Tz {
        DISPLAY_TIMEZONE.try_with(|tz| *tz).unwrap_or(chrono_tz::UTC)
    }

    /// Run `fut` with `tz` as the display timezone.
    pub async fn scope<Fut>(tz: Tz, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        DISPLAY_TIMEZONE.scope(tz, fut).await
    }
}

/// Reasons a client timestamp could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Neither RFC 3339 nor a recognised naive layout.
    Malformed,
    /// The naive local time occurs twice in the active zone (DST fall-back).
    Ambiguous { timezone: String },
    /// The naive local time is skipped in the active zone (DST spring-forward).
    Nonexistent { timezone: String },
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "timestamp must be an ISO 8601 date-time"),
            Self::Ambiguous { timezone } => {
                write!(f, "local time is ambiguous in timezone {timezone}")
            }
            Self::Nonexistent { timezone } => {
                write!(f, "local time does not exist in timezone {timezone}")
            }
        }
    }
}

impl std::error::Error for TimestampError {}

impl TimestampError {
    /// Stable code reported to clients in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed => "invalid_timestamp",
            Self::Ambiguous { .. } => "ambiguous_local_time",
            Self::Nonexistent { .. } => "nonexistent_local_time",
        }
    }
}

const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a client timestamp.
///
/// Values with an explicit offset (`Z`, `+02:00`) are honoured as given;
/// naive values are read in `tz`.
pub fn parse_timestamp_in(raw: &str, tz: Tz) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let naive = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .ok_or(TimestampError::Malformed)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(local) => Ok(local.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, _) => Err(TimestampError::Ambiguous {
            timezone: tz.name().to_owned(),
        }),
        LocalResult::None => Err(TimestampError::Nonexistent {
            timezone: tz.name().to_owned(),
        }),
    }
}

/// [`parse_timestamp_in`] using the active display timezone.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    parse_timestamp_in(raw, DisplayTimezone::current())
}

/// Render `instant` as RFC 3339 in `tz`.
///
/// UTC renders with a `Z` suffix; fractional seconds appear only when
/// non-zero.
pub fn format_timestamp_in(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// [`format_timestamp_in`] using the active display timezone.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    format_timestamp_in(instant, DisplayTimezone::current())
}

/// UTC half-open range `[start, end)` covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    /// Range spanning `date` as observed in `tz`.
    pub fn for_local_date(date: NaiveDate, tz: Tz) -> Self {
        let start = local_midnight(date, tz);
        let end = date
            .succ_opt()
            .map_or(start + TimeDelta::days(1), |next| local_midnight(next, tz));
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// First instant of `date` in `tz`.
///
/// A few zones skip midnight on DST changes; the day then starts at the
/// first local time that exists.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let mut candidate = date.and_time(NaiveTime::MIN);
    for _ in 0..=24 {
        if let Some(local) = tz.from_local_datetime(&candidate).earliest() {
            return local.with_timezone(&Utc);
        }
        candidate += TimeDelta::minutes(30);
    }
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America, Europe, UTC};
    use rstest::rstest;

    fn utc(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("valid fixture timestamp")
            .with_timezone(&Utc)
    }

    #[rstest]
    #[case("2222-12-12T06:00:00", Europe::Warsaw, "2222-12-12T05:00:00Z")]
    #[case("2222-12-12T06:00", Europe::Warsaw, "2222-12-12T05:00:00Z")]
    #[case("2222-12-12 06:00:00", UTC, "2222-12-12T06:00:00Z")]
    #[case("2222-12-12T06:00:00+03:00", Europe::Warsaw, "2222-12-12T03:00:00Z")]
    #[case("2222-12-12T06:00:00Z", America::New_York, "2222-12-12T06:00:00Z")]
    fn parses_naive_values_in_the_given_zone(
        #[case] raw: &str,
        #[case] tz: Tz,
        #[case] expected: &str,
    ) {
        assert_eq!(parse_timestamp_in(raw, tz), Ok(utc(expected)));
    }

    #[rstest]
    fn rejects_malformed_values() {
        assert_eq!(
            parse_timestamp_in("tomorrow at noon", UTC),
            Err(TimestampError::Malformed)
        );
    }

    #[rstest]
    fn rejects_skipped_local_times() {
        let err = parse_timestamp_in("2030-03-31T02:30:00", Europe::Warsaw).expect_err("gap");
        assert_eq!(err.code(), "nonexistent_local_time");
    }

    #[rstest]
    fn rejects_repeated_local_times() {
        let err = parse_timestamp_in("2030-10-27T02:30:00", Europe::Warsaw).expect_err("overlap");
        assert_eq!(err.code(), "ambiguous_local_time");
    }

    #[rstest]
    #[case("2222-12-12T05:00:00Z", UTC, "2222-12-12T05:00:00Z")]
    #[case("2222-12-12T05:00:00Z", Europe::Warsaw, "2222-12-12T06:00:00+01:00")]
    #[case("2222-12-12T05:00:00.250Z", UTC, "2222-12-12T05:00:00.250Z")]
    fn formats_in_the_given_zone(#[case] raw: &str, #[case] tz: Tz, #[case] expected: &str) {
        assert_eq!(format_timestamp_in(utc(raw), tz), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn scope_drives_parse_and_format() {
        let (parsed, rendered) = DisplayTimezone::scope(Europe::Warsaw, async {
            let parsed = parse_timestamp("2222-12-12T06:00:00").expect("valid");
            (parsed, format_timestamp(parsed))
        })
        .await;
        assert_eq!(parsed, utc("2222-12-12T05:00:00Z"));
        assert_eq!(rendered, "2222-12-12T06:00:00+01:00");
        assert_eq!(DisplayTimezone::current(), UTC);
    }

    #[rstest]
    fn day_range_follows_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2222, 12, 12).expect("valid date");
        let range = DayRange::for_local_date(date, Europe::Warsaw);
        assert_eq!(range.start, utc("2222-12-11T23:00:00Z"));
        assert_eq!(range.end, utc("2222-12-12T23:00:00Z"));
        assert!(range.contains(utc("2222-12-12T05:00:00Z")));
        assert!(!range.contains(range.end));
    }

    #[rstest]
    fn day_range_spans_short_dst_days() {
        let date = NaiveDate::from_ymd_opt(2030, 3, 31).expect("valid date");
        let range = DayRange::for_local_date(date, Europe::Warsaw);
        assert_eq!(range.end - range.start, TimeDelta::hours(23));
    }
}
