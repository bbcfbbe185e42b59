mod driver;
mod engine;

pub use driver::{DriveOutcome, StopHandle, TickDriver};
pub use engine::{TimerMachine, TimerSnapshot};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of a heat/cool cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Heating,
    Cooling,
    Complete,
}

impl Phase {
    /// Phases in which the countdown can run.
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Heating | Phase::Cooling)
    }

    /// Label shown on the timer face.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "READY",
            Phase::Heating => "HEAT UP",
            Phase::Cooling => "COOL DOWN",
            Phase::Complete => "DONE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Heating => "heating",
            Phase::Cooling => "cooling",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}
