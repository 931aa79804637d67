//! Filter bounds: up to sixteen optional numeric limits over four canonical
//! phases and two measures, with up-front validation that collects every
//! violation before any change is evaluated.

use std::fmt;

use cadence_core::KeyState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four canonical filter phases, mapped from a phase's from-milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterPhase {
    #[serde(rename = "dev")]
    Development,
    #[serde(rename = "wait")]
    Wait,
    #[serde(rename = "review")]
    Review,
    #[serde(rename = "merge")]
    Merge,
}

impl FilterPhase {
    /// Fixed evaluation order.
    pub const ALL: [FilterPhase; 4] = [
        FilterPhase::Development,
        FilterPhase::Wait,
        FilterPhase::Review,
        FilterPhase::Merge,
    ];

    /// Map a lifecycle phase to a filter phase by its from-milestone.
    /// Both review milestones feed the review phase; the merged milestone
    /// never starts a phase.
    pub fn from_key_state(from: KeyState) -> Option<FilterPhase> {
        match from {
            KeyState::Created => Some(FilterPhase::Development),
            KeyState::FirstCommit => Some(FilterPhase::Wait),
            KeyState::FirstAutomatedReview | KeyState::FirstHumanReview => {
                Some(FilterPhase::Review)
            }
            KeyState::Approved => Some(FilterPhase::Merge),
            KeyState::Merged => None,
        }
    }
}

impl fmt::Display for FilterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterPhase::Development => write!(f, "dev"),
            FilterPhase::Wait => write!(f, "wait"),
            FilterPhase::Review => write!(f, "review"),
            FilterPhase::Merge => write!(f, "merge"),
        }
    }
}

/// What a bound measures: percentage share or absolute days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Percent,
    Days,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Percent => write!(f, "percent"),
            Measure::Days => write!(f, "days"),
        }
    }
}

/// Diagnostic name for one bound, e.g. "wait-percent-min".
pub fn bound_name(phase: FilterPhase, measure: Measure, end: &str) -> String {
    format!("{phase}-{measure}-{end}")
}

/// An optional min/max pair over one measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Bound {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// The percent and days bounds for one filter phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseBounds {
    #[serde(default)]
    pub percent: Bound,
    #[serde(default)]
    pub days: Bound,
}

impl PhaseBounds {
    pub fn is_empty(&self) -> bool {
        self.percent.is_empty() && self.days.is_empty()
    }

    pub fn bound(&self, measure: Measure) -> &Bound {
        match measure {
            Measure::Percent => &self.percent,
            Measure::Days => &self.days,
        }
    }
}

/// Up to sixteen optional numeric bounds: four phases, two measures,
/// min and max each. A change passes only if it matches every present
/// bound (AND semantics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseFilter {
    #[serde(default)]
    pub development: PhaseBounds,
    #[serde(default)]
    pub wait: PhaseBounds,
    #[serde(default)]
    pub review: PhaseBounds,
    #[serde(default)]
    pub merge: PhaseBounds,
}

impl PhaseFilter {
    pub fn bounds(&self, phase: FilterPhase) -> &PhaseBounds {
        match phase {
            FilterPhase::Development => &self.development,
            FilterPhase::Wait => &self.wait,
            FilterPhase::Review => &self.review,
            FilterPhase::Merge => &self.merge,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterPhase::ALL.iter().all(|p| self.bounds(*p).is_empty())
    }

    /// Validate every bound, collecting all violations in one pass:
    /// percent bounds must lie in 0-100, day bounds must be non-negative,
    /// a present min must not exceed a present max, and at least one bound
    /// must be supplied.
    pub fn validate(&self) -> Result<(), FilterConfigError> {
        let mut violations = Vec::new();

        if self.is_empty() {
            violations.push("no bounds supplied".to_string());
        }

        for phase in FilterPhase::ALL {
            for measure in [Measure::Percent, Measure::Days] {
                let bound = self.bounds(phase).bound(measure);
                for (end, value) in [("min", bound.min), ("max", bound.max)] {
                    let Some(value) = value else { continue };
                    let name = bound_name(phase, measure, end);
                    match measure {
                        Measure::Percent => {
                            if !(0.0..=100.0).contains(&value) {
                                violations
                                    .push(format!("{name} ({value}) must be between 0 and 100"));
                            }
                        }
                        Measure::Days => {
                            if value < 0.0 {
                                violations.push(format!("{name} ({value}) must not be negative"));
                            }
                        }
                    }
                }
                if let (Some(min), Some(max)) = (bound.min, bound.max) {
                    if min > max {
                        violations.push(format!(
                            "{} ({min}) exceeds {} ({max})",
                            bound_name(phase, measure, "min"),
                            bound_name(phase, measure, "max"),
                        ));
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(FilterConfigError { violations })
        }
    }
}

/// Filter misconfiguration: every violation found in one validation pass.
#[derive(Debug, Error)]
#[error("invalid phase filter: {}", .violations.join("; "))]
pub struct FilterConfigError {
    pub violations: Vec<String>,
}
