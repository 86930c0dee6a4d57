//! Signal generation
//!
//! Filters grouped wallet events into directional signal records.

pub mod generator;
pub mod policy;
pub mod types;

pub use generator::{normalize_timestamp, Generation, GenerationStats, SignalFilterConfig, SignalGenerator};
pub use policy::PerpEligibilityPolicy;
pub use types::{Signal, SignalType};
