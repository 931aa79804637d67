//! Phase segmentation: convert discovered milestones into contiguous,
//! percentage-normalized phases.

use cadence_core::duration::{interval_seconds, CLOCK_SKEW_TOLERANCE_SECS};
use cadence_core::{AnalysisError, EventKind, KeyState, Phase, PhaseEnd, TimelineEvent};
use time::OffsetDateTime;

use crate::keystate::extract_key_states;

/// Total lifecycle duration in seconds: creation to merge, or creation to
/// `now` for an unintegrated change. 0 for an empty timeline.
pub fn total_lifecycle_seconds(
    events: &[TimelineEvent],
    now: OffsetDateTime,
) -> Result<i64, AnalysisError> {
    let Some(first) = events.first() else {
        return Ok(0);
    };
    match events.iter().find(|e| e.kind == EventKind::Merged) {
        Some(merge) => interval_seconds(first.ts, merge.ts, CLOCK_SKEW_TOLERANCE_SECS),
        None => interval_seconds(first.ts, now, CLOCK_SKEW_TOLERANCE_SECS),
    }
}

fn percent_share(seconds: i64, total_secs: i64) -> f64 {
    (seconds as f64 / total_secs as f64 * 1000.0).round() / 10.0
}

/// Segment a timeline into phases between temporally adjacent milestones.
///
/// Discovered states are ordered by actual instant, never canonical order:
/// a human review that lands before the first automated review yields
/// phases in that actual order. An unmerged change gets a trailing phase to
/// `now` when that tail has positive duration. A degenerate lifecycle
/// (zero total, no discovered states) yields an empty vec, not an error.
pub fn segment_phases(
    events: &[TimelineEvent],
    total_secs: i64,
    now: OffsetDateTime,
) -> Result<Vec<Phase>, AnalysisError> {
    if total_secs <= 0 {
        return Ok(Vec::new());
    }

    let mut states: Vec<(KeyState, TimelineEvent)> =
        extract_key_states(events).into_iter().collect();
    if states.is_empty() {
        return Ok(Vec::new());
    }
    states.sort_by_key(|(_, event)| (event.ts, event.seq));

    // A milestone stamped after the merge (say, a review comment posted
    // post-merge) cannot start or end a lifecycle phase; the merge closes
    // the lifecycle.
    if let Some(pos) = states
        .iter()
        .position(|(state, _)| *state == KeyState::Merged)
    {
        states.truncate(pos + 1);
    }

    let mut phases = Vec::new();
    for pair in states.windows(2) {
        let (from, from_event) = &pair[0];
        let (to, to_event) = &pair[1];
        let seconds = interval_seconds(from_event.ts, to_event.ts, CLOCK_SKEW_TOLERANCE_SECS)?;
        phases.push(Phase {
            from: *from,
            to: PhaseEnd::State(*to),
            seconds,
            percent: percent_share(seconds, total_secs),
        });
    }

    let merged = states.iter().any(|(state, _)| *state == KeyState::Merged);
    if !merged {
        let (last_state, last_event) = states.last().expect("states checked non-empty");
        let tail = interval_seconds(last_event.ts, now, CLOCK_SKEW_TOLERANCE_SECS)?;
        if tail > 0 {
            phases.push(Phase {
                from: *last_state,
                to: PhaseEnd::Now,
                seconds: tail,
                percent: percent_share(tail, total_secs),
            });
        }
    }

    Ok(phases)
}
