//! Batch filter evaluation with short-circuit exclusion accounting.
//!
//! Bounds are checked in a fixed order and evaluation stops at the first
//! failing bound, which alone is charged for the exclusion. Bounds after
//! the failure point are never charged, so per-bound exclusion counts are
//! lower bounds on each bound's true restrictiveness. That accounting is
//! part of the reported output format and is kept as-is.

use std::collections::BTreeMap;

use cadence_core::Phase;
use serde::{Deserialize, Serialize};

use crate::bounds::{bound_name, FilterConfigError, FilterPhase, Measure, PhaseFilter};

/// Aggregated measures for one filter phase of one change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseValue {
    pub seconds: i64,
    pub percent: f64,
    pub days: f64,
}

/// One change's phase shares, keyed by filter phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub id: String,
    pub phases: BTreeMap<FilterPhase, PhaseValue>,
}

impl ChangeSummary {
    /// Fold a segmented phase list into per-filter-phase totals. The two
    /// review milestones can both start a span; their spans merge into the
    /// single review phase.
    pub fn from_phases(id: impl Into<String>, phases: &[Phase]) -> Self {
        let mut map: BTreeMap<FilterPhase, PhaseValue> = BTreeMap::new();
        for phase in phases {
            let Some(filter_phase) = FilterPhase::from_key_state(phase.from) else {
                continue;
            };
            let entry = map.entry(filter_phase).or_default();
            entry.seconds += phase.seconds;
            entry.percent += phase.percent;
            entry.days = entry.seconds as f64 / 86_400.0;
        }
        Self {
            id: id.into(),
            phases: map,
        }
    }

    fn value(&self, phase: FilterPhase, measure: Measure) -> Option<f64> {
        self.phases.get(&phase).map(|v| match measure {
            Measure::Percent => v.percent,
            Measure::Days => v.days,
        })
    }
}

/// A change that passed every present bound, with the phases that had any
/// bound evaluated against them (for highlighting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeMatch {
    pub id: String,
    pub matched_phases: Vec<FilterPhase>,
}

/// Aggregate batch statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterStats {
    pub total: usize,
    pub passed: usize,
    /// Bound name -> number of changes it alone excluded.
    pub excluded_by: BTreeMap<String, usize>,
}

/// The result of applying a filter across a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub passed: Vec<ChangeMatch>,
    pub stats: FilterStats,
}

/// The first failing bound for a change, if any, plus the phases touched
/// before (and at) the failure point.
fn evaluate(change: &ChangeSummary, filter: &PhaseFilter) -> (Option<String>, Vec<FilterPhase>) {
    let mut touched = Vec::new();
    for phase in FilterPhase::ALL {
        let bounds = filter.bounds(phase);
        for measure in [Measure::Percent, Measure::Days] {
            let bound = bounds.bound(measure);
            if bound.is_empty() {
                continue;
            }
            if !touched.contains(&phase) {
                touched.push(phase);
            }
            let value = change.value(phase, measure);
            if let Some(min) = bound.min {
                // An absent phase cannot fall inside the range.
                if value.map_or(true, |v| v < min) {
                    return (Some(bound_name(phase, measure, "min")), touched);
                }
            }
            if let Some(max) = bound.max {
                if value.map_or(true, |v| v > max) {
                    return (Some(bound_name(phase, measure, "max")), touched);
                }
            }
        }
    }
    (None, touched)
}

/// Apply a validated filter across a batch of change summaries.
///
/// Validation runs up front; no change is evaluated against a
/// misconfigured filter.
pub fn apply(
    changes: &[ChangeSummary],
    filter: &PhaseFilter,
) -> Result<FilterOutcome, FilterConfigError> {
    filter.validate()?;

    let mut outcome = FilterOutcome {
        passed: Vec::new(),
        stats: FilterStats {
            total: changes.len(),
            ..Default::default()
        },
    };

    for change in changes {
        match evaluate(change, filter) {
            (Some(failed_bound), _) => {
                *outcome.stats.excluded_by.entry(failed_bound).or_insert(0) += 1;
            }
            (None, touched) => {
                outcome.stats.passed += 1;
                outcome.passed.push(ChangeMatch {
                    id: change.id.clone(),
                    matched_phases: touched,
                });
            }
        }
    }

    Ok(outcome)
}
