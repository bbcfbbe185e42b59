use clap::Subcommand;
use dabtimer_core::{Config, CustomDurations};

#[derive(Subcommand)]
pub enum CustomAction {
    /// Set and enable custom durations
    Set {
        /// Heat seconds
        #[arg(long)]
        heat: u32,
        /// Cool seconds
        #[arg(long)]
        cool: u32,
    },
    /// Use the stored custom durations
    Enable,
    /// Go back to computed durations
    Disable,
    /// Print the custom durations and their bounds
    Show,
}

pub fn run(action: CustomAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    match action {
        CustomAction::Set { heat, cool } => {
            config.custom = CustomDurations::new(heat, cool, &config.bounds)?;
            config.save()?;
            println!("ok");
        }
        CustomAction::Enable => {
            config.custom.validate(&config.bounds)?;
            config.custom.enabled = true;
            config.save()?;
            println!("ok");
        }
        CustomAction::Disable => {
            config.custom.enabled = false;
            config.save()?;
            println!("ok");
        }
        CustomAction::Show => {
            let json = serde_json::json!({
                "custom": config.custom,
                "bounds": config.bounds,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
