//! Ward configuration loading.
//!
//! The default ward list is embedded via `include_str!`. Custom lists use
//! the same TOML schema: a `[[wards]]` array of [`WardDefinition`]s.

use std::collections::BTreeSet;
use std::path::Path;

use crisis_response_incident_models::{WardDefinition, WardResourcePool};
use serde::Deserialize;

use crate::WardConfigError;

/// Number of wards in the embedded default configuration. Enforced by a
/// test.
#[cfg(test)]
const EXPECTED_DEFAULT_WARD_COUNT: usize = 4;

/// Embedded default ward configuration.
const DEFAULT_WARDS_TOML: &str = include_str!("../wards/default.toml");

#[derive(Debug, Deserialize)]
struct WardFile {
    wards: Vec<WardDefinition>,
}

/// Parses a ward TOML document without validating it.
///
/// # Errors
///
/// Returns [`WardConfigError::Toml`] if the document is malformed.
pub fn parse_definitions(toml_str: &str) -> Result<Vec<WardDefinition>, WardConfigError> {
    let file: WardFile = toml::de::from_str(toml_str)?;
    Ok(file.wards)
}

/// Checks the pool invariants a store relies on: at least one ward, unique
/// ids and names, positive capacity, and availability within capacity.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_pools(pools: &[WardResourcePool]) -> Result<(), WardConfigError> {
    if pools.is_empty() {
        return Err(WardConfigError::Empty);
    }

    let mut ids = BTreeSet::new();
    let mut names = BTreeSet::new();

    for pool in pools {
        if !ids.insert(pool.ward_id.as_str()) {
            return Err(WardConfigError::DuplicateId {
                ward_id: pool.ward_id.clone(),
            });
        }
        if !names.insert(pool.ward_name.as_str()) {
            return Err(WardConfigError::DuplicateName {
                ward_name: pool.ward_name.clone(),
            });
        }
        if pool.total_resources == 0 {
            return Err(WardConfigError::ZeroCapacity {
                ward_id: pool.ward_id.clone(),
            });
        }
        if pool.available_resources > pool.total_resources {
            return Err(WardConfigError::OverCapacity {
                ward_id: pool.ward_id.clone(),
                available: pool.available_resources,
                total: pool.total_resources,
            });
        }
    }

    Ok(())
}

/// Turns definitions into validated live pools.
///
/// # Errors
///
/// Returns an error if the resulting pools violate [`validate_pools`].
pub fn pools_from_definitions(
    definitions: &[WardDefinition],
) -> Result<Vec<WardResourcePool>, WardConfigError> {
    let pools: Vec<WardResourcePool> = definitions.iter().map(WardDefinition::to_pool).collect();
    validate_pools(&pools)?;
    Ok(pools)
}

/// Parses and validates a ward TOML document.
///
/// # Errors
///
/// Returns an error if parsing or validation fails.
pub fn load_wards(toml_str: &str) -> Result<Vec<WardResourcePool>, WardConfigError> {
    pools_from_definitions(&parse_definitions(toml_str)?)
}

/// Reads, parses, and validates a ward TOML file, returning the
/// definitions so callers can hand them to a store or a scenario.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_definitions_from_path(path: &Path) -> Result<Vec<WardDefinition>, WardConfigError> {
    let definitions = parse_definitions(&std::fs::read_to_string(path)?)?;
    pools_from_definitions(&definitions)?;
    log::info!("Loaded {} ward(s) from {}", definitions.len(), path.display());
    Ok(definitions)
}

/// Returns the embedded default ward definitions.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse. It is a compile-time
/// constant, so a failure is a development error caught by the tests.
#[must_use]
pub fn default_definitions() -> Vec<WardDefinition> {
    parse_definitions(DEFAULT_WARDS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded default wards: {e}"))
}

/// Returns live pools for the embedded default wards.
///
/// # Panics
///
/// Panics if the embedded configuration is invalid.
#[must_use]
pub fn default_wards() -> Vec<WardResourcePool> {
    pools_from_definitions(&default_definitions())
        .unwrap_or_else(|e| panic!("Embedded default wards are invalid: {e}"))
}
