use thiserror::Error;

/// Errors raised while analyzing a single change.
///
/// All variants are fatal for the change they occur in and carry the
/// offending value; the caller surfaces them without retrying.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A timestamp that could not be parsed as RFC3339.
    #[error("invalid instant {value:?} in {field}")]
    InvalidInstant { field: String, value: String },

    /// Two instants out of order by more than the clock-skew tolerance.
    #[error(
        "event ordering violation: {later} precedes {earlier} by {delta_secs}s \
         (tolerance {tolerance_secs}s)"
    )]
    OrderingViolation {
        earlier: String,
        later: String,
        delta_secs: i64,
        tolerance_secs: i64,
    },

    /// The change record carries no creation instant.
    #[error("change {change} has no creation instant")]
    MissingCreation { change: String },

    /// A negative value passed to duration formatting.
    #[error("cannot format negative duration: {0}s")]
    NegativeDuration(i64),
}
