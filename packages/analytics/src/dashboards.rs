//! Ward, city, and comparison views.

use crisis_response_analytics_models::{
    CityDashboard, CityTotals, QueueEntry, WardComparison, WardComparisonRow, WardDashboard,
};
use crisis_response_incident_models::{
    EscalationLevel, Incident, IncidentStatus, StoreSnapshot, WardResourcePool,
};

use crate::{AnalyticsError, percent};

fn filed_against<'a>(
    incidents: &'a [Incident],
    pool: &'a WardResourcePool,
) -> impl Iterator<Item = &'a Incident> + 'a {
    incidents
        .iter()
        .filter(move |i| i.assigned_ward == pool.ward_name)
}

/// Builds the control-center view for one ward.
///
/// Only ward-level incidents appear in the counts and the queue; the
/// ward's escalated incidents are listed separately.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownWard`] if `ward_id` is not configured.
pub fn ward_dashboard(
    snapshot: &StoreSnapshot,
    ward_id: &str,
) -> Result<WardDashboard, AnalyticsError> {
    let pool = snapshot
        .ward(ward_id)
        .ok_or_else(|| AnalyticsError::UnknownWard {
            ward_id: ward_id.to_string(),
        })?;

    let ward_level: Vec<&Incident> = filed_against(&snapshot.incidents, pool)
        .filter(|i| i.escalation_level == EscalationLevel::Ward)
        .collect();
    let count = |status: IncidentStatus| {
        ward_level.iter().filter(|i| i.status == status).count() as u64
    };

    let mut queue: Vec<QueueEntry> = ward_level
        .iter()
        .filter(|i| i.status.is_active())
        .map(|&i| QueueEntry {
            incident: i.clone(),
            required_resources: i.resource_requirement(),
            affordable: i.status == IncidentStatus::New
                && pool.can_afford(i.resource_requirement()),
        })
        .collect();
    queue.sort_by_key(|e| e.incident.status.sort_order());

    let resolved = ward_level
        .iter()
        .filter(|i| i.status == IncidentStatus::Resolved)
        .map(|&i| i.clone())
        .collect();

    let escalated = filed_against(&snapshot.incidents, pool)
        .filter(|i| i.status == IncidentStatus::Escalated)
        .cloned()
        .collect();

    Ok(WardDashboard {
        ward_id: pool.ward_id.clone(),
        ward_name: pool.ward_name.clone(),
        new_count: count(IncidentStatus::New),
        in_progress_count: count(IncidentStatus::InProgress),
        resolved_count: count(IncidentStatus::Resolved),
        available_resources: pool.available_resources,
        total_resources: pool.total_resources,
        available_percent: percent(
            u64::from(pool.available_resources),
            u64::from(pool.total_resources),
        ),
        queue,
        resolved,
        escalated,
    })
}

/// Builds the city escalation desk, newest escalated incident first.
#[must_use]
pub fn city_dashboard(snapshot: &StoreSnapshot) -> CityDashboard {
    let mut escalated: Vec<Incident> = snapshot
        .incidents
        .iter()
        .filter(|i| i.status == IncidentStatus::Escalated)
        .cloned()
        .collect();
    escalated.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    CityDashboard {
        escalated,
        city_level_count: snapshot
            .incidents
            .iter()
            .filter(|i| i.escalation_level == EscalationLevel::City)
            .count() as u64,
    }
}

/// Builds the side-by-side comparison of every ward plus city totals.
#[must_use]
pub fn ward_comparison(snapshot: &StoreSnapshot) -> WardComparison {
    let wards = snapshot
        .wards
        .iter()
        .map(|pool| {
            let filed: Vec<&Incident> = filed_against(&snapshot.incidents, pool).collect();
            let count =
                |pred: fn(&Incident) -> bool| filed.iter().filter(|&&i| pred(i)).count() as u64;

            WardComparisonRow {
                ward_id: pool.ward_id.clone(),
                ward_name: pool.ward_name.clone(),
                color: pool.color.clone(),
                total_incidents: filed.len() as u64,
                active_incidents: count(|i| i.status.is_active()),
                escalated_incidents: count(|i| i.status == IncidentStatus::Escalated),
                resolved_incidents: count(|i| i.status == IncidentStatus::Resolved),
                available_resources: pool.available_resources,
                total_resources: pool.total_resources,
                utilization_percent: percent(
                    u64::from(pool.used_resources()),
                    u64::from(pool.total_resources),
                ),
            }
        })
        .collect();

    let totals = CityTotals {
        ward_count: snapshot.wards.len() as u64,
        available_resources: snapshot
            .wards
            .iter()
            .map(|w| u64::from(w.available_resources))
            .sum(),
        total_resources: snapshot
            .wards
            .iter()
            .map(|w| u64::from(w.total_resources))
            .sum(),
        active_incidents: snapshot
            .incidents
            .iter()
            .filter(|i| i.status.is_active())
            .count() as u64,
        escalated_incidents: snapshot
            .incidents
            .iter()
            .filter(|i| i.status == IncidentStatus::Escalated)
            .count() as u64,
    };

    log::debug!(
        "Ward comparison over {} ward(s), {} incident(s)",
        totals.ward_count,
        snapshot.incidents.len()
    );

    WardComparison { wards, totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{incident, snapshot, ward};
    use crisis_response_incident_models::Severity;

    fn sample() -> StoreSnapshot {
        snapshot(
            vec![
                incident("r", "Central", Severity::Low, IncidentStatus::Resolved),
                incident("p", "Central", Severity::Medium, IncidentStatus::InProgress),
                incident("n1", "Central", Severity::High, IncidentStatus::New),
                incident("e", "Central", Severity::High, IncidentStatus::Escalated),
                incident("n2", "Central", Severity::Low, IncidentStatus::New),
                incident("x", "North", Severity::Low, IncidentStatus::New),
            ],
            vec![ward("ward-1", "Central", 2, 5), ward("ward-2", "North", 4, 6)],
        )
    }

    #[test]
    fn ward_dashboard_counts_ward_level_only() {
        let dash = ward_dashboard(&sample(), "ward-1").unwrap();
        assert_eq!(dash.new_count, 2);
        assert_eq!(dash.in_progress_count, 1);
        assert_eq!(dash.resolved_count, 1);
        assert_eq!(
            dash.escalated
                .iter()
                .map(|i| i.id.as_str())
                .collect::<Vec<_>>(),
            vec!["e"]
        );
        assert!((dash.available_percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn ward_queue_is_sorted_by_status_then_report_order() {
        let dash = ward_dashboard(&sample(), "ward-1").unwrap();
        let ids: Vec<&str> = dash.queue.iter().map(|e| e.incident.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n2", "p"]);
    }

    #[test]
    fn queue_marks_affordability() {
        let dash = ward_dashboard(&sample(), "ward-1").unwrap();
        let affordable: Vec<(&str, bool)> = dash
            .queue
            .iter()
            .map(|e| (e.incident.id.as_str(), e.affordable))
            .collect();
        // HIGH costs 3 with 2 available; LOW costs 1.
        assert_eq!(affordable, vec![("n1", false), ("n2", true), ("p", false)]);
    }

    #[test]
    fn unknown_ward_is_an_error() {
        assert!(matches!(
            ward_dashboard(&sample(), "ward-9"),
            Err(AnalyticsError::UnknownWard { .. })
        ));
    }

    #[test]
    fn city_dashboard_lists_escalations() {
        let dash = city_dashboard(&sample());
        assert_eq!(dash.escalated.len(), 1);
        assert_eq!(dash.city_level_count, 1);
    }

    #[test]
    fn city_dashboard_lists_newest_escalation_first() {
        let newer = incident("newer", "Central", Severity::Low, IncidentStatus::Escalated);
        let mut older = incident("older", "North", Severity::High, IncidentStatus::Escalated);
        older.created_at = newer.created_at - chrono::Duration::minutes(5);

        let dash = city_dashboard(&snapshot(
            vec![
                older,
                incident("n", "Central", Severity::Low, IncidentStatus::New),
                newer,
            ],
            vec![ward("ward-1", "Central", 5, 5), ward("ward-2", "North", 6, 6)],
        ));
        let ids: Vec<&str> = dash.escalated.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
        assert_eq!(dash.city_level_count, 2);
    }

    #[test]
    fn comparison_rows_and_totals() {
        let cmp = ward_comparison(&sample());
        assert_eq!(cmp.wards.len(), 2);

        let central = &cmp.wards[0];
        assert_eq!(central.total_incidents, 5);
        assert_eq!(central.active_incidents, 4);
        assert_eq!(central.escalated_incidents, 1);
        assert_eq!(central.resolved_incidents, 1);
        assert!((central.utilization_percent - 60.0).abs() < 1e-9);

        assert_eq!(
            cmp.totals,
            CityTotals {
                ward_count: 2,
                available_resources: 6,
                total_resources: 11,
                active_incidents: 5,
                escalated_incidents: 1,
            }
        );
    }
}
