pub mod bounds;
pub mod engine;

pub use bounds::{Bound, FilterConfigError, FilterPhase, Measure, PhaseBounds, PhaseFilter};
pub use engine::{apply, ChangeMatch, ChangeSummary, FilterOutcome, FilterStats, PhaseValue};
