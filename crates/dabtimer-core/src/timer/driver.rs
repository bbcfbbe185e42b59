//! Periodic tick source for a [`TimerMachine`].
//!
//! The driver owns the tick lifecycle: it starts the machine, ticks it once
//! per period on a `tokio::time::interval`, and pauses it when stopped so no
//! tick outlives a stop request.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::TimerMachine;
use crate::error::Result;
use crate::events::Event;
use crate::ledger::CompletedCycle;

/// How a drive ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DriveOutcome {
    Completed(CompletedCycle),
    /// Stopped before completion; the machine is paused and can be resumed.
    Stopped,
}

/// Cloneable handle that stops a running [`TickDriver`].
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<watch::Sender<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        // No receiver means the driver is already gone.
        let _ = self.0.send(true);
    }
}

#[derive(Debug)]
pub struct TickDriver {
    period: Duration,
    stop: watch::Receiver<bool>,
    stop_open: bool,
}

impl TickDriver {
    pub fn new(period: Duration) -> (Self, StopHandle) {
        let (tx, rx) = watch::channel(false);
        let driver = Self {
            period,
            stop: rx,
            stop_open: true,
        };
        (driver, StopHandle(Arc::new(tx)))
    }

    /// One tick per second.
    pub fn per_second() -> (Self, StopHandle) {
        Self::new(Duration::from_secs(1))
    }

    /// Tick `machine` until its cycle completes or a stop is requested.
    pub async fn run(&mut self, machine: &mut TimerMachine) -> Result<DriveOutcome> {
        if *self.stop.borrow_and_update() {
            machine.pause();
            return Ok(DriveOutcome::Stopped);
        }
        machine.start()?;

        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(Event::CycleCompleted { cycle }) = machine.tick()? {
                        return Ok(DriveOutcome::Completed(cycle));
                    }
                    if !machine.is_running() {
                        tracing::warn!(phase = %machine.phase(), "machine stopped outside the driver");
                        return Ok(DriveOutcome::Stopped);
                    }
                }
                changed = self.stop.changed(), if self.stop_open => {
                    match changed {
                        Ok(()) if *self.stop.borrow_and_update() => {
                            machine.pause();
                            tracing::debug!(remaining_secs = machine.remaining_secs(), "driver stopped");
                            return Ok(DriveOutcome::Stopped);
                        }
                        Ok(()) => {}
                        // Every handle dropped; keep ticking to completion.
                        Err(_) => self.stop_open = false,
                    }
                }
            }
        }
    }
}
