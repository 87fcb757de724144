#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident lifecycle and ward resource pool types.
//!
//! This crate defines the data model shared by the incident store, the
//! analytics projections, and the CLI. Incidents move through a strictly
//! linear lifecycle (see [`IncidentStatus::can_transition_to`]) and reserve
//! resources from the ward they were filed against while they are being
//! handled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of incident reported by a citizen.
///
/// Purely descriptive: the type has no effect on allocation or escalation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum IncidentType {
    /// Flooding or water-logging
    Flood,
    /// Building, vehicle, or open fire
    Fire,
    /// Seismic event or structural collapse
    Earthquake,
    /// Road or industrial accident
    Accident,
}

impl IncidentType {
    /// Returns a human-readable label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flood => "Flood",
            Self::Fire => "Fire",
            Self::Earthquake => "Earthquake",
            Self::Accident => "Accident",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Flood, Self::Fire, Self::Earthquake, Self::Accident]
    }
}

/// Severity of an incident. Determines how many ward resources handling
/// the incident reserves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Severity {
    /// Costs 1 resource
    Low,
    /// Costs 2 resources
    Medium,
    /// Costs 3 resources
    High,
}

impl Severity {
    /// Returns the number of ward resources reserved while an incident of
    /// this severity is in progress.
    #[must_use]
    pub const fn resource_requirement(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Lifecycle status of an incident.
///
/// ```text
/// NEW ──▶ IN_PROGRESS ──▶ RESOLVED
///  └────▶ ESCALATED
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum IncidentStatus {
    /// Reported, not yet picked up by the ward
    New,
    /// Being handled by the ward; holds a resource reservation
    InProgress,
    /// Handed to the city because the ward could not afford it
    Escalated,
    /// Handled and closed by the ward
    Resolved,
}

impl IncidentStatus {
    /// Returns `true` if the lifecycle allows moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::InProgress | Self::Escalated) | (Self::InProgress, Self::Resolved)
        )
    }

    /// Returns `true` for statuses with no outgoing transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Escalated | Self::Resolved)
    }

    /// Returns `true` for every status other than [`Self::Resolved`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Resolved)
    }

    /// Position of this status in dashboard listings.
    #[must_use]
    pub const fn sort_order(self) -> u8 {
        match self {
            Self::New => 0,
            Self::InProgress => 1,
            Self::Escalated => 2,
            Self::Resolved => 3,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::New, Self::InProgress, Self::Escalated, Self::Resolved]
    }
}

/// Which authority is responsible for an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EscalationLevel {
    /// The ward the incident was filed against
    Ward,
    /// City-level authority
    City,
}

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in degrees, `-90..=90`.
    pub latitude: f64,
    /// Longitude in degrees, `-180..=180`.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair after range-checking both components.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is non-finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinatesError> {
        if Self::in_range(latitude, longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(InvalidCoordinatesError {
                latitude,
                longitude,
            })
        }
    }

    /// Returns `true` if the pair lies within `-90..=90` / `-180..=180`.
    #[must_use]
    pub fn in_range(latitude: f64, longitude: f64) -> bool {
        (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
    }
}

/// Error returned when constructing [`Coordinates`] from out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinatesError {
    /// The rejected latitude.
    pub latitude: f64,
    /// The rejected longitude.
    pub longitude: f64,
}

impl std::fmt::Display for InvalidCoordinatesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinates ({}, {}): expected latitude -90 to 90 and longitude -180 to 180",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinatesError {}

/// A reported incident.
///
/// Incidents are never deleted; resolved and escalated incidents stay in
/// the store for history and analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique identifier assigned at creation.
    pub id: String,
    /// Kind of incident.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Severity; fixes the resource cost.
    pub severity: Severity,
    /// Reported latitude.
    pub latitude: f64,
    /// Reported longitude.
    pub longitude: f64,
    /// Current lifecycle status.
    pub status: IncidentStatus,
    /// Responsible authority. Becomes [`EscalationLevel::City`] exactly when
    /// the status becomes [`IncidentStatus::Escalated`].
    pub escalation_level: EscalationLevel,
    /// Why the incident was escalated, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
    /// Name of the ward the incident was filed against.
    pub assigned_ward: String,
    /// When the incident was reported.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every status transition.
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Resources this incident reserves while in progress.
    #[must_use]
    pub const fn resource_requirement(&self) -> u32 {
        self.severity.resource_requirement()
    }
}

/// Mutable resource pool belonging to one ward.
///
/// Invariant: `available_resources <= total_resources` and
/// `total_resources > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardResourcePool {
    /// Unique ward identifier (e.g., `"ward-1"`).
    pub ward_id: String,
    /// Display name; matched against [`Incident::assigned_ward`].
    pub ward_name: String,
    /// Resources not currently reserved.
    pub available_resources: u32,
    /// Fixed capacity.
    pub total_resources: u32,
    /// Display color (CSS color string).
    pub color: String,
}

impl WardResourcePool {
    /// Returns `true` if `required` resources can be reserved right now.
    #[must_use]
    pub const fn can_afford(&self, required: u32) -> bool {
        self.available_resources >= required
    }

    /// Reserves `required` resources. Returns `false` and leaves the pool
    /// untouched if not enough are available.
    pub const fn reserve(&mut self, required: u32) -> bool {
        if !self.can_afford(required) {
            return false;
        }
        self.available_resources -= required;
        true
    }

    /// Returns `amount` resources to the pool, never exceeding capacity.
    ///
    /// Returns how many resources were actually restored.
    pub fn release(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.used_resources());
        self.available_resources += restored;
        restored
    }

    /// Resources currently reserved by in-progress incidents.
    #[must_use]
    pub const fn used_resources(&self) -> u32 {
        self.total_resources.saturating_sub(self.available_resources)
    }
}

/// A ward as written in configuration, before it becomes a live pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardDefinition {
    /// Unique ward identifier.
    pub ward_id: String,
    /// Display name.
    pub ward_name: String,
    /// Fixed capacity; must be positive.
    pub total_resources: u32,
    /// Starting availability. Defaults to `total_resources`.
    #[serde(default)]
    pub available_resources: Option<u32>,
    /// Display color. Defaults to a neutral grey.
    #[serde(default)]
    pub color: Option<String>,
}

/// Color given to wards that do not configure one.
pub const DEFAULT_WARD_COLOR: &str = "hsl(220, 10%, 50%)";

impl WardDefinition {
    /// Builds the live pool for this ward. Does not validate; see the
    /// incident crate's ward registry for validation.
    #[must_use]
    pub fn to_pool(&self) -> WardResourcePool {
        WardResourcePool {
            ward_id: self.ward_id.clone(),
            ward_name: self.ward_name.clone(),
            available_resources: self.available_resources.unwrap_or(self.total_resources),
            total_resources: self.total_resources,
            color: self
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_WARD_COLOR.to_string()),
        }
    }
}

/// Result of attempting to start handling an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlingOutcome {
    /// Whether the incident changed status.
    pub success: bool,
    /// Whether the change was an escalation to the city.
    pub escalated: bool,
}

impl HandlingOutcome {
    /// Nothing changed (unknown incident, missing pool, or wrong status).
    pub const REJECTED: Self = Self {
        success: false,
        escalated: false,
    };

    /// Resources were reserved and the incident is in progress.
    pub const ALLOCATED: Self = Self {
        success: true,
        escalated: false,
    };

    /// The ward could not afford the incident; it went to the city.
    pub const ESCALATED: Self = Self {
        success: true,
        escalated: true,
    };
}

/// One entry in the escalation feed, appended exactly once per
/// NEW → ESCALATED transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationNotification {
    /// The escalated incident.
    pub incident_id: String,
    /// Ward that could not afford it.
    pub ward_name: String,
    /// Kind of incident.
    pub incident_type: IncidentType,
    /// Severity of the incident.
    pub severity: Severity,
    /// Shortfall description.
    pub reason: String,
    /// When the escalation happened.
    pub timestamp: DateTime<Utc>,
}

/// Full observable state of the store at one instant.
///
/// Every dashboard is a pure function of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Incremented by every committed mutation.
    pub revision: u64,
    /// All incidents, oldest first.
    pub incidents: Vec<Incident>,
    /// All ward pools, in configuration order.
    pub wards: Vec<WardResourcePool>,
    /// Ward that reports target unless the caller picks another.
    pub selected_ward_id: String,
    /// Escalation feed, oldest first.
    pub escalations: Vec<EscalationNotification>,
}

impl StoreSnapshot {
    /// Escalations recorded after `previous` was taken.
    ///
    /// Incidents that were already escalated in `previous` are not
    /// reported again.
    #[must_use]
    pub fn escalations_since(&self, previous: &Self) -> &[EscalationNotification] {
        self.escalations
            .get(previous.escalations.len()..)
            .unwrap_or(&[])
    }

    /// Looks up a ward pool by its display name.
    #[must_use]
    pub fn ward_by_name(&self, ward_name: &str) -> Option<&WardResourcePool> {
        self.wards.iter().find(|w| w.ward_name == ward_name)
    }

    /// Looks up a ward pool by its identifier.
    #[must_use]
    pub fn ward(&self, ward_id: &str) -> Option<&WardResourcePool> {
        self.wards.iter().find(|w| w.ward_id == ward_id)
    }
}
