//! Normalized event intake
//!
//! Event records arrive from external connectors already decoded. This
//! module defines their shape, groups them per (wallet, asset), and hosts
//! the [`EventSource`] seam.

pub mod grouper;
pub mod source;
pub mod types;

pub use grouper::{group_events, EventGroup, GroupKey, GroupedEvents};
pub use source::{EventSource, FileEventSource, MockEventSource};
pub use types::{
    decode_perp_batch, decode_spot_batch, Direction, EventBatch, PerpEvent, PerpEventType, Side,
    SpotEvent,
};
