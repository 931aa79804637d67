pub mod duration;
pub mod error;
pub mod record;
pub mod types;

pub use error::AnalysisError;
pub use types::*;
