//! Cycle state machine.
//!
//! The machine counts down whole seconds. It has no clock and no thread: the
//! caller (usually a [`TickDriver`](super::TickDriver)) invokes `tick()` once
//! per elapsed second while the machine is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -initialize-> Heating -ticks-> Cooling -ticks-> Complete
//!                    (running is orthogonal: start/pause toggle it)
//! any -reset-> Idle
//! any -initialize-> Heating (in-progress cycle discarded)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut machine = TimerMachine::new();
//! machine.initialize(durations)?;
//! machine.start()?;
//! // Once per second:
//! if let Some(Event::CycleCompleted { cycle }) = machine.tick()? { ledger.record(cycle); }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Phase;
use crate::duration::CycleDurations;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::ledger::CompletedCycle;

/// What a renderer needs to draw the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub running: bool,
    pub remaining_secs: u32,
    pub total_secs: u32,
}

impl TimerSnapshot {
    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (f64::from(self.remaining_secs) / f64::from(self.total_secs))
    }

    /// `m:ss`, the way the timer face shows it.
    pub fn clock(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

type SnapshotListener = Box<dyn FnMut(&TimerSnapshot) + Send>;
type CompleteListener = Box<dyn FnMut(&CompletedCycle) + Send>;

#[derive(Default)]
struct Listeners {
    snapshot: Vec<SnapshotListener>,
    complete: Vec<CompleteListener>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("snapshot", &self.snapshot.len())
            .field("complete", &self.complete.len())
            .finish()
    }
}

/// Two-phase countdown.
///
/// Serializable so a caller can persist it between process runs; listeners
/// are not persisted and must be re-registered after loading.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TimerMachine {
    phase: Phase,
    running: bool,
    remaining_secs: u32,
    /// Length of the current phase.
    total_secs: u32,
    /// Durations of the live cycle. `None` exactly when the phase is Idle.
    durations: Option<CycleDurations>,
    /// Set by the first `initialize()`; survives `reset()`.
    #[serde(default)]
    initialized: bool,
    #[serde(skip)]
    listeners: Listeners,
}

impl TimerMachine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Called after every state change with the new snapshot.
    pub fn on_snapshot<F>(&mut self, listener: F)
    where
        F: FnMut(&TimerSnapshot) + Send + 'static,
    {
        self.listeners.snapshot.push(Box::new(listener));
    }

    /// Called once per completed cycle.
    pub fn on_complete<F>(&mut self, listener: F)
    where
        F: FnMut(&CompletedCycle) + Send + 'static,
    {
        self.listeners.complete.push(Box::new(listener));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn durations(&self) -> Option<&CycleDurations> {
        self.durations.as_ref()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        let snap = self.snapshot();
        Event::StateSnapshot {
            phase: snap.phase,
            running: snap.running,
            remaining_secs: snap.remaining_secs,
            total_secs: snap.total_secs,
            progress: snap.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load fresh durations and enter Heating, paused.
    ///
    /// Any in-progress cycle is discarded without a completion. Zero-second
    /// phases are rejected and leave the machine untouched.
    pub fn initialize(&mut self, durations: CycleDurations) -> Result<Event> {
        for (phase, secs) in [
            (Phase::Heating, durations.heat_secs),
            (Phase::Cooling, durations.cool_secs),
        ] {
            if secs == 0 {
                return Err(CoreError::InvalidDuration { phase, value: 0.0 });
            }
        }
        let replaced_in_progress = self.phase.is_active();
        if replaced_in_progress {
            tracing::debug!(
                phase = %self.phase,
                remaining_secs = self.remaining_secs,
                "discarding in-progress cycle"
            );
        }
        self.running = false;
        self.phase = Phase::Heating;
        self.remaining_secs = durations.heat_secs;
        self.total_secs = durations.heat_secs;
        let event = Event::CycleInitialized {
            heat_secs: durations.heat_secs,
            cool_secs: durations.cool_secs,
            source: durations.source,
            replaced_in_progress,
            at: Utc::now(),
        };
        self.durations = Some(durations);
        self.initialized = true;
        self.notify_snapshot();
        Ok(event)
    }

    /// Begin or resume counting down.
    ///
    /// Fails with `NotInitialized` from Idle and Complete: a fresh cycle
    /// needs `initialize()` first.
    pub fn start(&mut self) -> Result<Option<Event>> {
        if !self.phase.is_active() {
            return Err(CoreError::NotInitialized);
        }
        if self.running {
            return Ok(None);
        }
        self.running = true;
        tracing::debug!(phase = %self.phase, remaining_secs = self.remaining_secs, "timer started");
        self.notify_snapshot();
        Ok(Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }))
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(phase = %self.phase, remaining_secs = self.remaining_secs, "timer paused");
        self.notify_snapshot();
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Pause when running, start otherwise.
    pub fn toggle(&mut self) -> Result<Option<Event>> {
        if self.running {
            Ok(self.pause())
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Event {
        self.phase = Phase::Idle;
        self.running = false;
        self.remaining_secs = 0;
        self.total_secs = 0;
        self.durations = None;
        self.notify_snapshot();
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance one second. See [`tick_at`](Self::tick_at).
    pub fn tick(&mut self) -> Result<Option<Event>> {
        self.tick_at(Utc::now())
    }

    /// Advance one second, stamping any completion with `now`.
    ///
    /// A no-op while paused, complete, or idle after a reset. Only a machine
    /// that was never initialized fails. Returns `PhaseChanged` on the
    /// Heating→Cooling edge and `CycleCompleted` exactly once when cooling
    /// runs out.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<Option<Event>> {
        if !self.initialized && self.durations.is_none() {
            return Err(CoreError::NotInitialized);
        }
        if !self.running {
            return Ok(None);
        }
        let Some(durations) = self.durations.as_ref() else {
            return Ok(None);
        };

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let mut event = None;
        if self.remaining_secs == 0 {
            match self.phase {
                Phase::Heating => {
                    let cool_secs = durations.cool_secs;
                    self.phase = Phase::Cooling;
                    self.remaining_secs = cool_secs;
                    self.total_secs = cool_secs;
                    tracing::debug!(cool_secs, "heat phase finished, cooling");
                    event = Some(Event::PhaseChanged {
                        from: Phase::Heating,
                        to: Phase::Cooling,
                        duration_secs: cool_secs,
                        at: now,
                    });
                }
                Phase::Cooling => {
                    let cycle = CompletedCycle::from_durations(durations, now);
                    self.phase = Phase::Complete;
                    self.running = false;
                    tracing::info!(
                        material = %cycle.material,
                        concentrate = %cycle.concentrate,
                        heat_secs = cycle.heat_secs,
                        cool_secs = cycle.cool_secs,
                        "cycle complete"
                    );
                    for listener in &mut self.listeners.complete {
                        listener(&cycle);
                    }
                    event = Some(Event::CycleCompleted { cycle });
                }
                Phase::Idle | Phase::Complete => {}
            }
        }
        self.notify_snapshot();
        Ok(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn notify_snapshot(&mut self) {
        if self.listeners.snapshot.is_empty() {
            return;
        }
        let snap = self.snapshot();
        for listener in &mut self.listeners.snapshot {
            listener(&snap);
        }
    }
}
