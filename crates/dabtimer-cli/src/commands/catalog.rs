use clap::Subcommand;
use dabtimer_core::{Category, Config};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Print the active catalog
    List {
        /// Only print keys, in declaration order
        #[arg(long)]
        keys: bool,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Config::load()?.catalog()?;

    match action {
        CatalogAction::List { keys: true } => {
            for category in [
                Category::Material,
                Category::Concentrate,
                Category::Heater,
                Category::Rig,
            ] {
                println!("{category}: {}", catalog.keys(category).join(", "));
            }
        }
        CatalogAction::List { keys: false } => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
    }
    Ok(())
}
