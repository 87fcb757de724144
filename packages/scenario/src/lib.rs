#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scripted scenario replay.
//!
//! A scenario is applied to a fresh [`IncidentStore`], step by step, and
//! produces a [`ScenarioReport`] with each step's outcome, the escalation
//! alerts delivered through a store subscription, and the final state.

pub mod progress;
pub mod registry;

use std::collections::BTreeMap;
use std::sync::mpsc;

use crisis_response_incident::{IncidentStore, StoreEvent, WardConfigError};
use crisis_response_scenario_models::{
    ScenarioDefinition, ScenarioReport, ScenarioStep, StepOutcome,
};

pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use registry::{all_scenarios, find_scenario, load_scenario, parse_scenario};

/// Errors that can occur while loading or replaying a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The scenario TOML could not be parsed.
    #[error("Failed to parse scenario: {0}")]
    Toml(#[from] toml::de::Error),

    /// The scenario file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The scenario's inline wards are invalid.
    #[error("Invalid scenario wards: {0}")]
    Wards(#[from] WardConfigError),

    /// No registered scenario has this id and no file exists at the path.
    #[error("Unknown scenario: {id}")]
    UnknownScenario {
        /// Requested id or path.
        id: String,
    },

    /// A step referenced an alias no earlier step reported.
    #[error("Step {step}: unknown incident alias '{alias}'")]
    UnknownAlias {
        /// 1-based step number.
        step: usize,
        /// The unresolved alias.
        alias: String,
    },

    /// A report step reused an alias.
    #[error("Step {step}: incident alias '{alias}' is already in use")]
    DuplicateAlias {
        /// 1-based step number.
        step: usize,
        /// The repeated alias.
        alias: String,
    },
}

fn lookup<'a>(
    aliases: &'a BTreeMap<String, String>,
    step: usize,
    alias: &str,
) -> Result<&'a str, ScenarioError> {
    aliases
        .get(alias)
        .map(String::as_str)
        .ok_or_else(|| ScenarioError::UnknownAlias {
            step,
            alias: alias.to_string(),
        })
}

/// Replays `scenario` against a fresh store.
///
/// Reports without an explicit ward are filed against whichever ward is
/// selected at that point in the run.
///
/// # Errors
///
/// Returns [`ScenarioError::Wards`] if the inline wards are invalid, or an
/// alias error if a step refers to an incident that was never reported.
pub fn run_scenario(
    scenario: &ScenarioDefinition,
    progress: &dyn ProgressCallback,
) -> Result<ScenarioReport, ScenarioError> {
    let mut store = if scenario.wards.is_empty() {
        IncidentStore::with_default_wards()
    } else {
        IncidentStore::from_definitions(&scenario.wards)?
    };

    let (tx, rx) = mpsc::channel();
    store.subscribe(move |event| {
        if let StoreEvent::Escalated(notification) = event {
            tx.send(notification.clone()).ok(); // Receiver is drained after the last step
        }
    });

    log::info!(
        "Running scenario '{}' ({} step(s))",
        scenario.id,
        scenario.steps.len()
    );
    progress.set_total(scenario.steps.len() as u64);

    let mut aliases: BTreeMap<String, String> = BTreeMap::new();
    let mut steps = Vec::with_capacity(scenario.steps.len());

    for (idx, step) in scenario.steps.iter().enumerate() {
        let number = idx + 1;
        progress.set_message(step.label());
        log::debug!("Step {number}: {}", step.label());

        let outcome = match step {
            ScenarioStep::Report {
                alias,
                incident_type,
                severity,
                latitude,
                longitude,
                ward,
            } => {
                if aliases.contains_key(alias) {
                    return Err(ScenarioError::DuplicateAlias {
                        step: number,
                        alias: alias.clone(),
                    });
                }
                let ward_id = ward
                    .clone()
                    .unwrap_or_else(|| store.selected_ward_id().to_string());
                let incident =
                    store.report_incident(*incident_type, *severity, *latitude, *longitude, &ward_id);
                let incident_id = incident.id.clone();
                let assigned_ward = incident.assigned_ward.clone();
                aliases.insert(alias.clone(), incident_id.clone());
                StepOutcome::Reported {
                    alias: alias.clone(),
                    incident_id,
                    assigned_ward,
                }
            }
            ScenarioStep::Start { alias } => {
                let id = lookup(&aliases, number, alias)?;
                StepOutcome::Started {
                    alias: alias.clone(),
                    outcome: store.start_handling(id),
                }
            }
            ScenarioStep::Resolve { alias } => {
                let id = lookup(&aliases, number, alias)?;
                StepOutcome::Resolved {
                    alias: alias.clone(),
                    resolved: store.resolve_incident(id),
                }
            }
            ScenarioStep::SelectWard { ward } => StepOutcome::WardSelected {
                ward: ward.clone(),
                selected: store.select_ward(ward),
            },
        };

        steps.push(outcome);
        progress.inc(1);
    }

    let alerts: Vec<_> = rx.try_iter().collect();

    progress.finish(format!(
        "{}: {} step(s), {} escalation(s)",
        scenario.id,
        steps.len(),
        alerts.len()
    ));

    Ok(ScenarioReport {
        scenario_id: scenario.id.clone(),
        steps,
        alerts,
        snapshot: store.snapshot(),
    })
}
