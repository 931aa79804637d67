pub mod builder;
pub mod keystate;
pub mod segment;

pub use builder::build_timeline;
pub use keystate::extract_key_states;
pub use segment::{segment_phases, total_lifecycle_seconds};
