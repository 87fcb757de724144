#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory incident store.
//!
//! [`IncidentStore`] owns every reported incident and the fixed set of ward
//! resource pools. It exposes three mutations (report, start handling,
//! resolve), read accessors, synchronous change subscriptions, and an
//! append-only escalation feed that alerting consumers read through an
//! [`EscalationCursor`].
//!
//! None of the store operations fail. Unknown ids and missing pools are
//! logged and answered with a negative result; see [`HandlingOutcome`].

pub mod events;
pub mod feed;
pub mod registry;
pub mod report;
pub mod store;

pub use crisis_response_incident_models::{
    Coordinates, EscalationLevel, EscalationNotification, HandlingOutcome, Incident,
    IncidentStatus, IncidentType, Severity, StoreSnapshot, WardDefinition, WardResourcePool,
};
pub use events::{StoreEvent, SubscriptionId};
pub use feed::EscalationCursor;
pub use store::IncidentStore;

/// Errors raised while loading or validating ward configuration.
#[derive(Debug, thiserror::Error)]
pub enum WardConfigError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse ward configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The ward file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No wards were configured.
    #[error("Ward configuration must define at least one ward")]
    Empty,

    /// Two wards share an identifier.
    #[error("Duplicate ward id: {ward_id}")]
    DuplicateId {
        /// The repeated identifier.
        ward_id: String,
    },

    /// Two wards share a display name, which would make incident lookup
    /// ambiguous.
    #[error("Duplicate ward name: {ward_name}")]
    DuplicateName {
        /// The repeated name.
        ward_name: String,
    },

    /// A ward has no capacity.
    #[error("Ward {ward_id} must have a positive total_resources")]
    ZeroCapacity {
        /// The offending ward.
        ward_id: String,
    },

    /// A ward starts with more available resources than its capacity.
    #[error("Ward {ward_id} has {available} available resources but only {total} total")]
    OverCapacity {
        /// The offending ward.
        ward_id: String,
        /// Configured availability.
        available: u32,
        /// Configured capacity.
        total: u32,
    },
}
