//! Citizen report form validation.
//!
//! The store assumes sanitized input. [`ReportForm`] is the boundary that
//! turns free-text form fields into a [`ReportRequest`] the store can take.

use std::str::FromStr;

use crisis_response_incident_models::{Coordinates, Incident, IncidentType, Severity};

use crate::IncidentStore;

/// Coordinates offered by the form's "use sample location" shortcut
/// (New Delhi).
pub const SAMPLE_LOCATION: Coordinates = Coordinates {
    latitude: 28.6139,
    longitude: 77.2090,
};

/// Reasons a report form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// At least one field is blank.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Incident type not recognized.
    #[error("Unknown incident type: {0}")]
    UnknownType(String),

    /// Severity not recognized.
    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    /// Latitude or longitude is not a number.
    #[error("Please enter valid coordinates")]
    InvalidCoordinates,

    /// Latitude or longitude is out of range.
    #[error("Please enter valid latitude (-90 to 90) and longitude (-180 to 180)")]
    CoordinatesOutOfRange,
}

/// Raw form fields as typed by the citizen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    /// Incident type, e.g. `"FIRE"`.
    pub incident_type: String,
    /// Severity, e.g. `"HIGH"`.
    pub severity: String,
    /// Latitude as typed.
    pub latitude: String,
    /// Longitude as typed.
    pub longitude: String,
}

/// A validated report, ready for [`IncidentStore::report_incident`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRequest {
    /// Kind of incident.
    pub incident_type: IncidentType,
    /// Severity.
    pub severity: Severity,
    /// Location.
    pub coordinates: Coordinates,
}

impl ReportForm {
    /// Fills the coordinate fields with [`SAMPLE_LOCATION`].
    pub fn fill_sample_location(&mut self) {
        self.latitude = SAMPLE_LOCATION.latitude.to_string();
        self.longitude = SAMPLE_LOCATION.longitude.to_string();
    }

    /// Validates the form. Checks run in the order the form reports them:
    /// blank fields, then enum values, then number parsing, then ranges.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn validate(&self) -> Result<ReportRequest, ReportError> {
        let fields = [
            &self.incident_type,
            &self.severity,
            &self.latitude,
            &self.longitude,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ReportError::MissingFields);
        }

        let incident_type = IncidentType::from_str(self.incident_type.trim())
            .map_err(|_| ReportError::UnknownType(self.incident_type.clone()))?;
        let severity = Severity::from_str(self.severity.trim())
            .map_err(|_| ReportError::UnknownSeverity(self.severity.clone()))?;

        let latitude = parse_number(&self.latitude)?;
        let longitude = parse_number(&self.longitude)?;

        let coordinates = Coordinates::new(latitude, longitude)
            .map_err(|_| ReportError::CoordinatesOutOfRange)?;

        Ok(ReportRequest {
            incident_type,
            severity,
            coordinates,
        })
    }
}

fn parse_number(field: &str) -> Result<f64, ReportError> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or(ReportError::InvalidCoordinates)
}

impl ReportRequest {
    /// Files this report against `ward_id`.
    pub fn submit<'a>(&self, store: &'a mut IncidentStore, ward_id: &str) -> &'a Incident {
        store.report_incident(
            self.incident_type,
            self.severity,
            self.coordinates.latitude,
            self.coordinates.longitude,
            ward_id,
        )
    }
}
