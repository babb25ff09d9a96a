use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;

use travbot_app::{
    app::BotBus,
    command_handlers::{
        ConstructBuildingCommandHandler, DemolishBuildingsCommandHandler,
        LevelUpBuildingCommandHandler,
    },
    config::Config,
    cqrs::{
        commands::{ConstructBuilding, DemolishBuildings, LevelUpBuilding},
        queries::{GetBuildings, GetVillageSnapshot},
    },
    driver::TokioClock,
    queries_handlers::{GetBuildingsHandler, GetVillageSnapshotHandler},
    workflow::BuildOptions,
};
use travbot_game::catalog::Catalog;
use travbot_types::{buildings::BuildingName, errors::ApplicationError};

mod chromium;
mod logs;
use chromium::ChromiumDriver;
use logs::setup_logging;

/// Builds, upgrades and demolishes buildings of a Travian village.
#[derive(Parser, Debug)]
#[command(name = "travbot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every building of the village
    Snapshot,
    /// Print the occurrences of one building, lowest level first
    Buildings { name: BuildingName },
    /// Construct a building, or report the site it already stands on
    Construct {
        name: BuildingName,
        #[command(flatten)]
        options: OptionsArgs,
    },
    /// Raise the building on a site by one level
    LevelUp {
        site_id: u8,
        #[command(flatten)]
        options: OptionsArgs,
    },
    /// Take one level off each site, in the given order
    Demolish {
        #[arg(required = true)]
        site_ids: Vec<u8>,
    },
    /// Print the catalog entry of a building, no browser needed
    Catalog { name: BuildingName },
}

#[derive(clap::Args, Debug)]
struct OptionsArgs {
    /// Build missing requirements and wait out every blocker
    #[arg(long)]
    forced: bool,
    /// Return only once the construction is over
    #[arg(long)]
    wait: bool,
}

impl From<OptionsArgs> for BuildOptions {
    fn from(args: OptionsArgs) -> Self {
        BuildOptions::new(args.forced, args.wait)
    }
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<(), ApplicationError> {
    let _log_guard = setup_logging();
    let cli = Cli::parse();

    let config = load_config();
    let catalog = load_catalog(&config);

    if let Commands::Catalog { name } = cli.command {
        return print_json(catalog.building(&name));
    }

    let bus = setup_bus(config, catalog).await?;
    bus.login().await?;

    match cli.command {
        Commands::Snapshot => {
            let snapshot = bus
                .query(GetVillageSnapshot, GetVillageSnapshotHandler::new())
                .await?;
            print_json(&snapshot)
        }
        Commands::Buildings { name } => {
            let buildings = bus
                .query(GetBuildings { name }, GetBuildingsHandler::new())
                .await?;
            print_json(&buildings)
        }
        Commands::Construct { name, options } => {
            let outcome = bus
                .execute(
                    ConstructBuilding {
                        name,
                        options: options.into(),
                    },
                    ConstructBuildingCommandHandler::new(),
                )
                .await?;
            print_json(&outcome)
        }
        Commands::LevelUp { site_id, options } => {
            let outcome = bus
                .execute(
                    LevelUpBuilding {
                        site_id,
                        options: options.into(),
                    },
                    LevelUpBuildingCommandHandler::new(),
                )
                .await?;
            print_json(&outcome)
        }
        Commands::Demolish { site_ids } => {
            let report = bus
                .execute(
                    DemolishBuildings { site_ids },
                    DemolishBuildingsCommandHandler::new(),
                )
                .await?;
            print_json(&report)
        }
        Commands::Catalog { .. } => Ok(()),
    }
}

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    }
}

fn load_catalog(config: &Config) -> Catalog {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path),
        None => Catalog::embedded(),
    };

    match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Error loading the catalog: {e}");
            std::process::exit(1);
        }
    }
}

async fn setup_bus(config: Config, catalog: Catalog) -> Result<BotBus, ApplicationError> {
    let driver = ChromiumDriver::launch(&config).await?;

    Ok(BotBus::new(
        Arc::new(driver),
        Arc::new(TokioClock),
        Arc::new(catalog),
        Arc::new(config),
    ))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ApplicationError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
