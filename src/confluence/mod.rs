//! Confluence resolution and alert assembly
//!
//! # Architecture
//!
//! ```text
//! signals ──► ConfluenceResolver ──► Resolution (bias, strength, mode)
//!                                         │
//!                       MIXED / NONE ◄────┤ dropped
//!                                         ▼
//!                    SetupGenerator ──► AlertAssembler ──► Alert
//! ```

pub mod alert;
pub mod resolver;
pub mod setup;

pub use alert::{Alert, AlertAssembler, AlertType, PerpContext, SpotContext};
pub use resolver::{decide, Bias, ConfluenceResolver, Mode, Resolution, SignalStrength};
pub use setup::{Market, SetupGenerator, SetupMode, TradeSetup};
