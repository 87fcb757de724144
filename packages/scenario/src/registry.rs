//! Compile-time registry of demo scenarios.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a scenario requires creating a TOML file in `scenarios/` and
//! adding a corresponding entry here.

use std::path::Path;

use crisis_response_scenario_models::ScenarioDefinition;

use crate::ScenarioError;

/// Number of registered scenarios. Enforced by a test.
#[cfg(test)]
const EXPECTED_SCENARIO_COUNT: usize = 3;

/// Embedded TOML scenario definitions.
const SCENARIO_TOMLS: &[(&str, &str)] = &[
    (
        "escalation_demo",
        include_str!("../scenarios/escalation_demo.toml"),
    ),
    ("busy_day", include_str!("../scenarios/busy_day.toml")),
    (
        "constrained_ward",
        include_str!("../scenarios/constrained_ward.toml"),
    ),
];

/// Parses a scenario TOML document.
///
/// # Errors
///
/// Returns [`ScenarioError::Toml`] if the document is malformed.
pub fn parse_scenario(toml_str: &str) -> Result<ScenarioDefinition, ScenarioError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Returns all registered scenarios.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. These are compile-time
/// constants, so a failure is a development error caught by the tests.
#[must_use]
pub fn all_scenarios() -> Vec<ScenarioDefinition> {
    SCENARIO_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            parse_scenario(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse scenario '{name}': {e}"))
        })
        .collect()
}

/// Finds a registered scenario by id.
#[must_use]
pub fn find_scenario(id: &str) -> Option<ScenarioDefinition> {
    all_scenarios().into_iter().find(|s| s.id == id)
}

/// Resolves `id_or_path` as a registered scenario id first, then as a
/// path to a TOML file.
///
/// # Errors
///
/// Returns [`ScenarioError::UnknownScenario`] if neither matches, or a
/// read/parse error for an existing file.
pub fn load_scenario(id_or_path: &str) -> Result<ScenarioDefinition, ScenarioError> {
    if let Some(scenario) = find_scenario(id_or_path) {
        return Ok(scenario);
    }

    let path = Path::new(id_or_path);
    if !path.is_file() {
        return Err(ScenarioError::UnknownScenario {
            id: id_or_path.to_string(),
        });
    }

    log::info!("Loading scenario from {}", path.display());
    parse_scenario(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crisis_response_incident::registry::pools_from_definitions;
    use crisis_response_scenario_models::ScenarioStep;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_scenarios() {
        let scenarios = all_scenarios();
        assert_eq!(
            scenarios.len(),
            EXPECTED_SCENARIO_COUNT,
            "Expected {EXPECTED_SCENARIO_COUNT} scenarios, found {}. \
             Update EXPECTED_SCENARIO_COUNT after adding/removing scenarios.",
            scenarios.len()
        );
    }

    #[test]
    fn scenario_ids_are_unique_and_match_registry_names() {
        let mut seen = BTreeSet::new();
        for ((name, _), scenario) in SCENARIO_TOMLS.iter().zip(all_scenarios()) {
            assert_eq!(*name, scenario.id, "Registry name differs from scenario id");
            assert!(seen.insert(scenario.id.clone()), "Duplicate scenario ID: {}", scenario.id);
        }
    }

    #[test]
    fn scenarios_have_steps_and_valid_wards() {
        for scenario in all_scenarios() {
            assert!(!scenario.name.is_empty(), "{} has empty name", scenario.id);
            assert!(!scenario.steps.is_empty(), "{} has no steps", scenario.id);
            if !scenario.wards.is_empty() {
                pools_from_definitions(&scenario.wards)
                    .unwrap_or_else(|e| panic!("{} has invalid wards: {e}", scenario.id));
            }
        }
    }

    #[test]
    fn parses_tagged_steps() {
        let scenario = parse_scenario(
            r#"
            id = "t"
            name = "T"

            [[steps]]
            action = "report"
            alias = "x"
            type = "flood"
            severity = "LOW"
            latitude = 1.0
            longitude = 2.0

            [[steps]]
            action = "select_ward"
            ward = "ward-2"
            "#,
        );
        // Enum values on the wire are SCREAMING_SNAKE_CASE only.
        assert!(matches!(scenario, Err(ScenarioError::Toml(_))));

        let scenario = parse_scenario(
            r#"
            id = "t"
            name = "T"

            [[steps]]
            action = "report"
            alias = "x"
            type = "FLOOD"
            severity = "LOW"
            latitude = 1.0
            longitude = 2.0

            [[steps]]
            action = "select_ward"
            ward = "ward-2"
            "#,
        )
        .unwrap();
        assert!(matches!(
            &scenario.steps[0],
            ScenarioStep::Report { ward: None, .. }
        ));
        assert_eq!(
            scenario.steps[1],
            ScenarioStep::SelectWard {
                ward: "ward-2".to_string()
            }
        );
    }

    #[test]
    fn unknown_id_that_is_not_a_file_is_rejected() {
        assert!(matches!(
            load_scenario("no_such_scenario"),
            Err(ScenarioError::UnknownScenario { .. })
        ));
        assert_eq!(load_scenario("busy_day").unwrap().id, "busy_day");
    }
}
