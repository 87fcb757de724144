#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for incident dashboards, ward comparison, and map
//! projections.
//!
//! Every type here is derived from a store snapshot and carries no state
//! of its own.

use crisis_response_incident_models::{Incident, IncidentStatus, IncidentType, Severity};
use serde::{Deserialize, Serialize};

/// Headline incident counts and rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSummary {
    /// Every incident ever reported.
    pub total: u64,
    /// Incidents still NEW.
    pub new: u64,
    /// Incidents IN_PROGRESS.
    pub in_progress: u64,
    /// Incidents ESCALATED.
    pub escalated: u64,
    /// Incidents RESOLVED.
    pub resolved: u64,
    /// Escalated share of all incidents, in percent. 0 when there are none.
    pub escalation_rate: f64,
    /// Resolved share of all incidents, in percent. 0 when there are none.
    pub resolution_rate: f64,
}

/// A labelled count, used for per-type, per-severity, and per-status
/// breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedCount {
    /// Variant name (`SCREAMING_SNAKE_CASE`).
    pub name: String,
    /// Number of incidents.
    pub count: u64,
}

/// Resource usage of one ward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUtilization {
    /// Ward identifier.
    pub ward_id: String,
    /// Resources reserved by in-progress incidents.
    pub used: u32,
    /// Resources free.
    pub available: u32,
    /// Capacity.
    pub total: u32,
    /// `used / total` in percent.
    pub utilization_percent: f64,
}

/// One row of the ward comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardComparisonRow {
    /// Ward identifier.
    pub ward_id: String,
    /// Display name.
    pub ward_name: String,
    /// Display color.
    pub color: String,
    /// Incidents filed against the ward.
    pub total_incidents: u64,
    /// Filed incidents not yet resolved (includes escalated).
    pub active_incidents: u64,
    /// Filed incidents escalated to the city.
    pub escalated_incidents: u64,
    /// Filed incidents resolved by the ward.
    pub resolved_incidents: u64,
    /// Resources free.
    pub available_resources: u32,
    /// Capacity.
    pub total_resources: u32,
    /// Reserved share of capacity, in percent.
    pub utilization_percent: f64,
}

/// City-wide totals across all wards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityTotals {
    /// Number of wards.
    pub ward_count: u64,
    /// Sum of free resources.
    pub available_resources: u64,
    /// Sum of capacities.
    pub total_resources: u64,
    /// Incidents not yet resolved.
    pub active_incidents: u64,
    /// Incidents currently escalated.
    pub escalated_incidents: u64,
}

/// Side-by-side view of every ward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardComparison {
    /// One row per ward, in configuration order.
    pub wards: Vec<WardComparisonRow>,
    /// City-wide totals.
    pub totals: CityTotals,
}

/// An active ward-level incident and whether the ward could take it on now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// The incident.
    pub incident: Incident,
    /// Resources handling it reserves.
    pub required_resources: u32,
    /// `true` if the incident is NEW and the ward has enough free
    /// resources. Starting a NEW incident that is not affordable escalates
    /// it.
    pub affordable: bool,
}

/// A single ward's control-center view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardDashboard {
    /// Ward identifier.
    pub ward_id: String,
    /// Display name.
    pub ward_name: String,
    /// Ward-level incidents still NEW.
    pub new_count: u64,
    /// Ward-level incidents IN_PROGRESS.
    pub in_progress_count: u64,
    /// Ward-level incidents RESOLVED.
    pub resolved_count: u64,
    /// Resources free.
    pub available_resources: u32,
    /// Capacity.
    pub total_resources: u32,
    /// Free share of capacity, in percent.
    pub available_percent: f64,
    /// Unresolved ward-level incidents, NEW before IN_PROGRESS, otherwise
    /// in report order.
    pub queue: Vec<QueueEntry>,
    /// Resolved ward-level incidents, in report order.
    pub resolved: Vec<Incident>,
    /// Incidents of this ward that were escalated to the city.
    pub escalated: Vec<Incident>,
}

/// City authority's view of escalations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDashboard {
    /// Incidents currently ESCALATED, in report order.
    pub escalated: Vec<Incident>,
    /// Incidents whose escalation level is CITY.
    pub city_level_count: u64,
}

/// Geographic window the map view covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            min_lat: 28.5,
            max_lat: 28.7,
            min_lng: 77.1,
            max_lng: 77.3,
        }
    }
}

/// An incident placed on the map canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Incident identifier.
    pub incident_id: String,
    /// Kind of incident.
    pub incident_type: IncidentType,
    /// Severity.
    pub severity: Severity,
    /// Status.
    pub status: IncidentStatus,
    /// Horizontal position in percent of canvas width, `5..=95`.
    pub x: f64,
    /// Vertical position in percent of canvas height (north at the top),
    /// `5..=95`.
    pub y: f64,
}

/// Severity-weighted incident density over a square grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    /// Cells per side.
    pub grid_size: usize,
    /// `cells[row][column]`, row 0 is the northern edge.
    pub cells: Vec<Vec<u32>>,
    /// Largest cell value, at least 1.
    pub max_density: u32,
}

/// Simulated response-time figures per severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeTarget {
    /// Severity the figures apply to.
    pub severity: Severity,
    /// Average response time in minutes.
    pub average_minutes: u32,
    /// Target response time in minutes.
    pub target_minutes: u32,
}
