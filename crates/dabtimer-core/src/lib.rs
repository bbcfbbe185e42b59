//! # Dabtimer Core Library
//!
//! This library provides the core logic for the dabtimer heat/cool timer.
//! Every operation is available through the standalone CLI binary; the
//! library itself has no I/O beyond the storage module.
//!
//! ## Architecture
//!
//! - **Catalog**: Ordered, immutable table of materials, heaters,
//!   concentrates and rigs with their base times and modifiers
//! - **Duration**: Pure calculator turning a selection (or a custom
//!   override) into heat and cool seconds
//! - **Timer**: Two-phase countdown state machine driven by one-second ticks
//! - **Ledger**: Append-only record of completed cycles and its aggregator
//! - **Storage**: SQLite cycle storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Catalog`]: Lookup table behind every duration
//! - [`compute_durations`]: Selection to `(heat, cool)` seconds
//! - [`TimerMachine`]: Heating / Cooling state machine
//! - [`UsageLedger`]: Completed cycles and [`UsageStats`]
//! - [`Database`]: Cycle persistence
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod duration;
pub mod error;
pub mod events;
pub mod ledger;
pub mod storage;
pub mod timer;

pub use catalog::{Catalog, Category};
pub use duration::{
    compute_durations, explain_durations, CustomDurations, CycleDurations, DurationBounds,
    DurationBreakdown, DurationSource, Selection,
};
pub use error::{ConfigError, CoreError, DatabaseError, Result};
pub use events::Event;
pub use ledger::{CategoryCount, CompletedCycle, StatsRange, UsageLedger, UsageStats};
pub use storage::{Config, Database};
pub use timer::{DriveOutcome, Phase, StopHandle, TickDriver, TimerMachine, TimerSnapshot};
