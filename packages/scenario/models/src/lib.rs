#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scripted simulation scenario schema and replay result types.
//!
//! A scenario is a TOML file listing store operations in order. Steps
//! refer to incidents by a scenario-local alias because incident ids are
//! generated at report time.

use crisis_response_incident_models::{
    EscalationNotification, HandlingOutcome, IncidentType, Severity, StoreSnapshot,
    WardDefinition,
};
use serde::{Deserialize, Serialize};

/// A scripted run against a fresh incident store, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Unique identifier (e.g., `"escalation_demo"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the scenario demonstrates.
    #[serde(default)]
    pub description: Option<String>,
    /// Wards to start with. Empty means the default wards.
    #[serde(default)]
    pub wards: Vec<WardDefinition>,
    /// Operations to apply, in order.
    pub steps: Vec<ScenarioStep>,
}

impl ScenarioDefinition {
    /// Returns the scenario identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scenario description, if one was written.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// One store operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// File a new incident and remember it as `alias`.
    Report {
        /// Scenario-local name for the incident.
        alias: String,
        /// Kind of incident.
        #[serde(rename = "type")]
        incident_type: IncidentType,
        /// Severity.
        severity: Severity,
        /// Latitude.
        latitude: f64,
        /// Longitude.
        longitude: f64,
        /// Target ward id. Defaults to the selected ward.
        #[serde(default)]
        ward: Option<String>,
    },
    /// Start handling the incident known as `alias`.
    Start {
        /// Incident alias.
        alias: String,
    },
    /// Resolve the incident known as `alias`.
    Resolve {
        /// Incident alias.
        alias: String,
    },
    /// Change the selected ward.
    SelectWard {
        /// Ward id to select.
        ward: String,
    },
}

impl ScenarioStep {
    /// Short description for progress output.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Report {
                alias,
                incident_type,
                severity,
                ..
            } => format!("report {alias} ({severity} {incident_type})"),
            Self::Start { alias } => format!("start {alias}"),
            Self::Resolve { alias } => format!("resolve {alias}"),
            Self::SelectWard { ward } => format!("select {ward}"),
        }
    }
}

/// What a step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepOutcome {
    /// An incident was created.
    Reported {
        /// Scenario-local name.
        alias: String,
        /// Generated incident id.
        incident_id: String,
        /// Ward the incident was filed against.
        assigned_ward: String,
    },
    /// Handling was attempted.
    Started {
        /// Scenario-local name.
        alias: String,
        /// Store result.
        outcome: HandlingOutcome,
    },
    /// Resolution was attempted.
    Resolved {
        /// Scenario-local name.
        alias: String,
        /// Whether the incident actually moved to RESOLVED.
        resolved: bool,
    },
    /// Ward selection was attempted.
    WardSelected {
        /// Requested ward id.
        ward: String,
        /// Whether the ward exists and is now selected.
        selected: bool,
    },
}

/// Result of replaying a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    /// Which scenario ran.
    pub scenario_id: String,
    /// One outcome per step, in order.
    pub steps: Vec<StepOutcome>,
    /// Escalation alerts delivered during the run, in order.
    pub alerts: Vec<EscalationNotification>,
    /// Store state after the last step.
    pub snapshot: StoreSnapshot,
}
