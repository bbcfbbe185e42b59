use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::DurationSource;
use crate::ledger::CompletedCycle;
use crate::timer::Phase;

/// Every state change of the cycle machine produces an Event.
/// The CLI prints them; outer layers may log or forward them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CycleInitialized {
        heat_secs: u32,
        cool_secs: u32,
        source: DurationSource,
        /// An unfinished cycle was discarded without completion.
        replaced_in_progress: bool,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Heating finished and cooling began.
    PhaseChanged {
        from: Phase,
        to: Phase,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycle: CompletedCycle,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        running: bool,
        remaining_secs: u32,
        total_secs: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}
