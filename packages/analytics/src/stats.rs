//! Headline statistics and breakdowns for the analytics view.

use crisis_response_analytics_models::{
    IncidentSummary, NamedCount, ResourceUtilization, ResponseTimeTarget,
};
use crisis_response_incident_models::{
    Incident, IncidentStatus, IncidentType, Severity, WardResourcePool,
};

use crate::percent;

fn count_where(incidents: &[Incident], pred: impl Fn(&Incident) -> bool) -> u64 {
    incidents.iter().filter(|&i| pred(i)).count() as u64
}

/// Counts incidents per status and derives escalation/resolution rates.
#[must_use]
pub fn incident_summary(incidents: &[Incident]) -> IncidentSummary {
    let total = incidents.len() as u64;
    let escalated = count_where(incidents, |i| i.status == IncidentStatus::Escalated);
    let resolved = count_where(incidents, |i| i.status == IncidentStatus::Resolved);

    IncidentSummary {
        total,
        new: count_where(incidents, |i| i.status == IncidentStatus::New),
        in_progress: count_where(incidents, |i| i.status == IncidentStatus::InProgress),
        escalated,
        resolved,
        escalation_rate: percent(escalated, total),
        resolution_rate: percent(resolved, total),
    }
}

fn breakdown<T: Copy + PartialEq + AsRef<str>>(
    variants: &[T],
    incidents: &[Incident],
    key: impl Fn(&Incident) -> T,
) -> Vec<NamedCount> {
    variants
        .iter()
        .map(|&variant| NamedCount {
            name: variant.as_ref().to_string(),
            count: count_where(incidents, |i| key(i) == variant),
        })
        .collect()
}

/// Incidents per type, every type present, in declaration order.
#[must_use]
pub fn count_by_type(incidents: &[Incident]) -> Vec<NamedCount> {
    breakdown(IncidentType::all(), incidents, |i| i.incident_type)
}

/// Incidents per severity, every severity present, in declaration order.
#[must_use]
pub fn count_by_severity(incidents: &[Incident]) -> Vec<NamedCount> {
    breakdown(Severity::all(), incidents, |i| i.severity)
}

/// Incidents per status, every status present, in lifecycle order.
#[must_use]
pub fn count_by_status(incidents: &[Incident]) -> Vec<NamedCount> {
    breakdown(IncidentStatus::all(), incidents, |i| i.status)
}

/// Used/available split of one ward's pool.
#[must_use]
pub fn resource_utilization(pool: &WardResourcePool) -> ResourceUtilization {
    let used = pool.used_resources();
    ResourceUtilization {
        ward_id: pool.ward_id.clone(),
        used,
        available: pool.available_resources,
        total: pool.total_resources,
        utilization_percent: percent(u64::from(used), u64::from(pool.total_resources)),
    }
}

/// The fixed simulated response-time table shown next to the charts.
#[must_use]
pub const fn response_time_targets() -> [ResponseTimeTarget; 3] {
    [
        ResponseTimeTarget {
            severity: Severity::Low,
            average_minutes: 15,
            target_minutes: 20,
        },
        ResponseTimeTarget {
            severity: Severity::Medium,
            average_minutes: 25,
            target_minutes: 15,
        },
        ResponseTimeTarget {
            severity: Severity::High,
            average_minutes: 8,
            target_minutes: 5,
        },
    ]
}
