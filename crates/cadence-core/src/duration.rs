use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AnalysisError;

/// Default clock-skew tolerance between event sources, in seconds.
///
/// Commit timestamps come from developer machines while comments and
/// pipelines are stamped server-side, so small negative gaps are expected.
pub const CLOCK_SKEW_TOLERANCE_SECS: i64 = 5;

/// Parse an RFC3339 instant, naming the record field on failure.
pub fn parse_instant(field: &str, value: &str) -> Result<OffsetDateTime, AnalysisError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| AnalysisError::InvalidInstant {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Render an instant as RFC3339. Used for output and error reporting.
pub fn format_instant(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

/// Whole-second interval from `start` to `end`, rounded from milliseconds.
///
/// A negative interval within `tolerance_secs` is absorbed to 0; beyond the
/// tolerance it is an ordering violation.
pub fn interval_seconds(
    start: OffsetDateTime,
    end: OffsetDateTime,
    tolerance_secs: i64,
) -> Result<i64, AnalysisError> {
    let delta: time::Duration = end - start;
    let secs = (delta.whole_milliseconds() as f64 / 1000.0).round() as i64;
    if secs >= 0 {
        return Ok(secs);
    }
    if -secs <= tolerance_secs {
        return Ok(0);
    }
    Err(AnalysisError::OrderingViolation {
        earlier: format_instant(end),
        later: format_instant(start),
        delta_secs: -secs,
        tolerance_secs,
    })
}

/// Format a duration using the coarsest unit that keeps the value >= 1.
///
/// Seconds below a minute, minutes+seconds below an hour, hours+minutes
/// below a day, days+hours otherwise. A zero remainder in the finer unit is
/// omitted.
pub fn format_duration(seconds: i64) -> Result<String, AnalysisError> {
    if seconds < 0 {
        return Err(AnalysisError::NegativeDuration(seconds));
    }
    let out = if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        let m = seconds / 60;
        let s = seconds % 60;
        if s == 0 {
            format!("{m}m")
        } else {
            format!("{m}m {s}s")
        }
    } else if seconds < 86_400 {
        let h = seconds / 3600;
        let m = (seconds % 3600) / 60;
        if m == 0 {
            format!("{h}h")
        } else {
            format!("{h}h {m}m")
        }
    } else {
        let d = seconds / 86_400;
        let h = (seconds % 86_400) / 3600;
        if h == 0 {
            format!("{d}d")
        } else {
            format!("{d}d {h}h")
        }
    };
    Ok(out)
}
