#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the crisis response console.
//!
//! With no subcommand it opens the interactive console over a fresh
//! in-memory store. Subcommands list the ward configuration, list the
//! built-in scenarios, or replay a scenario non-interactively.
//!
//! Uses `indicatif-log-bridge` (via [`crisis_response_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod interactive;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crisis_response_cli_utils::IndicatifProgress;
use crisis_response_incident::registry::{
    default_definitions, load_definitions_from_path, pools_from_definitions,
};
use crisis_response_incident::{IncidentStore, WardDefinition};
use crisis_response_scenario::{all_scenarios, load_scenario, run_scenario};

#[derive(Parser)]
#[command(name = "crisis_response", about = "Municipal incident response console")]
struct Cli {
    /// Ward configuration TOML (defaults to the built-in wards)
    #[arg(long, global = true, env = "CRISIS_RESPONSE_WARDS")]
    wards: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured wards and their resources
    Wards,
    /// List built-in scenarios
    Scenarios,
    /// Replay a scenario against a fresh store
    Run {
        /// Built-in scenario id or path to a scenario TOML file
        scenario: String,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crisis_response_cli_utils::init_logger();
    let cli = Cli::parse();

    let custom_wards: Option<Vec<WardDefinition>> = cli
        .wards
        .as_deref()
        .map(load_definitions_from_path)
        .transpose()?;

    let Some(command) = cli.command else {
        let store = match &custom_wards {
            Some(definitions) => IncidentStore::from_definitions(definitions)?,
            None => IncidentStore::with_default_wards(),
        };
        return interactive::run(store);
    };

    match command {
        Commands::Wards => {
            let definitions = custom_wards.unwrap_or_else(default_definitions);
            render::ward_table(&pools_from_definitions(&definitions)?);
        }
        Commands::Scenarios => render::scenario_table(&all_scenarios()),
        Commands::Run { scenario, json } => {
            let mut definition = load_scenario(&scenario)?;
            if definition.wards.is_empty()
                && let Some(wards) = custom_wards
            {
                definition.wards = wards;
            }

            let progress = IndicatifProgress::steps_bar(
                &multi,
                definition.id(),
                definition.steps.len() as u64,
            );
            let report = run_scenario(&definition, progress.as_ref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render::scenario_report(&report);
            }
        }
    }

    Ok(())
}
