use clap::Args;
use dabtimer_core::{compute_durations, explain_durations, Config, Selection};

#[derive(Args)]
pub struct DurationsArgs {
    /// Material key (defaults to the configured selection)
    #[arg(long)]
    material: Option<String>,
    /// Thickness key, for materials with thickness variants
    #[arg(long)]
    thickness: Option<String>,
    /// Concentrate key
    #[arg(long)]
    concentrate: Option<String>,
    /// Heater key
    #[arg(long)]
    heater: Option<String>,
    /// Rig key
    #[arg(long)]
    rig: Option<String>,
    /// Print every factor of the formula instead of the final durations
    #[arg(long)]
    explain: bool,
}

impl DurationsArgs {
    /// Overlay the flags on the configured selection.
    fn selection(self, base: &Selection) -> Selection {
        let material_changed = self.material.is_some();
        Selection {
            material: self.material.unwrap_or_else(|| base.material.clone()),
            // A different material does not inherit the configured thickness.
            thickness: self
                .thickness
                .or_else(|| (!material_changed).then(|| base.thickness.clone()).flatten()),
            concentrate: self.concentrate.unwrap_or_else(|| base.concentrate.clone()),
            heater: self.heater.unwrap_or_else(|| base.heater.clone()),
            rig: self.rig.or_else(|| base.rig.clone()),
        }
    }
}

pub fn run(args: DurationsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let catalog = config.catalog()?;
    let explain = args.explain;
    let selection = args.selection(&config.selection);

    if explain {
        let breakdown = explain_durations(&selection, &catalog)?;
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        let durations = compute_durations(&selection, &catalog, Some(&config.custom), &config.bounds)?;
        println!("{}", serde_json::to_string_pretty(&durations)?);
    }
    Ok(())
}
