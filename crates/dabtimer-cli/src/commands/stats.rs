use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use dabtimer_core::storage::Database;
use dabtimer_core::{Config, StatsRange};

#[derive(Args)]
pub struct WindowArgs {
    /// day, week, month or year (defaults to stats.default_range)
    #[arg(long)]
    range: Option<StatsRange>,
    /// Date the range is built around, YYYY-MM-DD (defaults to today, UTC)
    #[arg(long)]
    anchor: Option<NaiveDate>,
    /// Move the window by whole ranges; -1 is the previous one
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i32,
}

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate statistics for a window
    Show(WindowArgs),
    /// Completed cycles in a window, newest first
    History(WindowArgs),
    /// Delete every recorded cycle
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl WindowArgs {
    fn resolve(&self, config: &Config) -> Result<(StatsRange, NaiveDate), Box<dyn std::error::Error>> {
        let range = self.range.unwrap_or(config.stats.default_range);
        let anchor = self.anchor.unwrap_or_else(|| Utc::now().date_naive());
        let anchor = range
            .shift(anchor, self.offset)
            .ok_or_else(|| format!("offset {} moves the window out of range", self.offset))?;
        Ok((range, anchor))
    }
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Show(window) => {
            let config = Config::load()?;
            let catalog = config.catalog()?;
            let (range, anchor) = window.resolve(&config)?;
            let stats = db.load_ledger()?.aggregate_range(range, anchor, &catalog)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History(window) => {
            let config = Config::load()?;
            let (range, anchor) = window.resolve(&config)?;
            let (start, end) = range.window(anchor)?;
            let ledger = db.load_ledger()?;
            let history = ledger.history(start, end);
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        StatsAction::Clear { yes } => {
            if !yes {
                return Err("refusing to delete history without --yes".into());
            }
            let removed = db.clear_cycles()?;
            println!("removed {removed} cycles");
        }
    }
    Ok(())
}
