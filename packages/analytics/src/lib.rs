#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only projections of incident store snapshots.
//!
//! Each public function corresponds to one view: the analytics summary,
//! the ward control center, the city escalation desk, the ward comparison
//! table, and the incident map. Functions take a [`StoreSnapshot`] and
//! never mutate it.
//!
//! [`StoreSnapshot`]: crisis_response_incident_models::StoreSnapshot

pub mod dashboards;
pub mod map;
pub mod stats;

use thiserror::Error;

/// Errors that can occur while building a projection.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The requested ward is not configured.
    #[error("Unknown ward: {ward_id}")]
    UnknownWard {
        /// The requested identifier.
        ward_id: String,
    },

    /// A map grid needs at least one cell per side.
    #[error("Heatmap grid size must be positive")]
    EmptyGrid,
}

/// `part / whole` in percent, or 0 when `whole` is 0.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
