use std::time::Duration;

use clap::Subcommand;
use dabtimer_core::storage::Database;
use dabtimer_core::{Config, DriveOutcome, Event, TickDriver, TimerMachine};

const MACHINE_KEY: &str = "timer_machine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a full cycle in the foreground (Ctrl-C pauses and saves it)
    Run {
        /// Tick period in milliseconds (defaults to timer.tick_ms)
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Load durations for the configured selection, paused in Heating
    Init,
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Pause when running, start otherwise
    Toggle,
    /// Advance the countdown by whole seconds
    Tick {
        /// Number of ticks
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Reset to idle state
    Reset,
    /// Print current timer state as JSON
    Status,
}

fn load_machine(db: &Database) -> TimerMachine {
    match db.kv_get(MACHINE_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<TimerMachine>(&json) {
            Ok(machine) => return machine,
            Err(e) => tracing::warn!(error = %e, "discarding unreadable timer state"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not read timer state"),
    }
    TimerMachine::new()
}

fn save_machine(db: &Database, machine: &TimerMachine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(machine)?;
    db.kv_set(MACHINE_KEY, &json)?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Persist a completion carried by `event`.
fn record_completion(db: &Database, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    if let Event::CycleCompleted { cycle } = event {
        db.record_cycle(cycle)?;
    }
    Ok(())
}

fn fresh_machine(machine: &mut TimerMachine) -> Result<Event, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = config.catalog()?;
    let durations = config.durations(&catalog)?;
    Ok(machine.initialize(durations)?)
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut machine = load_machine(&db);

    match action {
        TimerAction::Run { tick_ms } => {
            let tick_ms = match tick_ms {
                Some(ms) => ms,
                None => Config::load()?.timer.tick_ms,
            };
            drive(&db, &mut machine, Duration::from_millis(tick_ms.max(1)))?;
        }
        TimerAction::Init => {
            let event = fresh_machine(&mut machine)?;
            print_event(&event)?;
        }
        TimerAction::Start => match machine.start()? {
            Some(event) => print_event(&event)?,
            None => print_event(&machine.snapshot_event())?,
        },
        TimerAction::Pause => match machine.pause() {
            Some(event) => print_event(&event)?,
            None => print_event(&machine.snapshot_event())?,
        },
        TimerAction::Toggle => match machine.toggle()? {
            Some(event) => print_event(&event)?,
            None => print_event(&machine.snapshot_event())?,
        },
        TimerAction::Tick { count } => {
            for _ in 0..count {
                if !machine.is_running() {
                    break;
                }
                if let Some(event) = machine.tick()? {
                    record_completion(&db, &event)?;
                    print_event(&event)?;
                }
            }
            print_event(&machine.snapshot_event())?;
        }
        TimerAction::Reset => {
            let event = machine.reset();
            print_event(&event)?;
        }
        TimerAction::Status => {
            print_event(&machine.snapshot_event())?;
        }
    }

    save_machine(&db, &machine)?;
    Ok(())
}

/// Drive `machine` to completion on a tokio runtime.
///
/// A paused in-progress cycle is resumed; anything else starts fresh.
fn drive(
    db: &Database,
    machine: &mut TimerMachine,
    period: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    if !machine.phase().is_active() {
        let event = fresh_machine(machine)?;
        print_event(&event)?;
    }

    machine.on_snapshot(|snap| {
        if snap.running {
            println!("{:>9}  {}", snap.phase.label(), snap.clock());
        }
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let (mut driver, stop) = TickDriver::new(period);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.stop();
            }
        });
        driver.run(machine).await
    })?;

    match outcome {
        DriveOutcome::Completed(cycle) => {
            db.record_cycle(&cycle)?;
            print_event(&Event::CycleCompleted { cycle })?;
        }
        DriveOutcome::Stopped => {
            tracing::info!(remaining_secs = machine.remaining_secs(), "cycle paused");
            print_event(&machine.snapshot_event())?;
        }
    }
    Ok(())
}
