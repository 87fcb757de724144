//! Plain-text rendering of store state and analytics views.

use crisis_response_analytics::{dashboards, map, stats};
use crisis_response_analytics_models::{
    CityDashboard, Heatmap, MapBounds, MapPoint, WardComparison, WardDashboard,
};
use crisis_response_incident::{
    EscalationNotification, Incident, IncidentStatus, StoreSnapshot, WardResourcePool,
};
use crisis_response_scenario_models::{ScenarioDefinition, ScenarioReport, StepOutcome};

const BAR_WIDTH: usize = 20;
const CANVAS_WIDTH: usize = 48;
const CANVAS_HEIGHT: usize = 16;
const SHADES: &[char] = &[' ', '.', ':', '*', '#'];

/// `[#####-----]` style gauge of available resources.
pub fn resource_bar(available: u32, total: u32) -> String {
    let filled = if total == 0 {
        0
    } else {
        (available as usize * BAR_WIDTH / total as usize).min(BAR_WIDTH)
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Picks a shade for `value` relative to `max`.
pub fn shade(value: u32, max: u32) -> char {
    if value == 0 || max == 0 {
        return SHADES[0];
    }
    let steps = SHADES.len() - 1;
    let idx = (value as usize * steps).div_ceil(max as usize).min(steps);
    SHADES[idx]
}

const fn status_marker(status: IncidentStatus) -> char {
    match status {
        IncidentStatus::New => 'N',
        IncidentStatus::InProgress => 'P',
        IncidentStatus::Escalated => 'E',
        IncidentStatus::Resolved => 'R',
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// One-line incident summary used in every list.
pub fn incident_line(incident: &Incident) -> String {
    format!(
        "{} {:<10} {:<6} {:<11} {} ({:.4}, {:.4}) {}",
        short_id(&incident.id),
        incident.incident_type.label(),
        incident.severity.as_ref(),
        incident.status.as_ref(),
        incident.assigned_ward,
        incident.latitude,
        incident.longitude,
        incident.created_at.format("%H:%M:%S"),
    )
}

pub fn ward_table(wards: &[WardResourcePool]) {
    println!("{:<10} {:<20} {:>9} BAR", "ID", "NAME", "RESOURCES");
    println!("{}", "-".repeat(66));
    for ward in wards {
        println!(
            "{:<10} {:<20} {:>9} {}",
            ward.ward_id,
            ward.ward_name,
            format!("{}/{}", ward.available_resources, ward.total_resources),
            resource_bar(ward.available_resources, ward.total_resources),
        );
    }
}

/// Collapses a possibly multi-line TOML description onto one line.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn scenario_table(scenarios: &[ScenarioDefinition]) {
    println!("{:<20} NAME", "ID");
    println!("{}", "-".repeat(60));
    for scenario in scenarios {
        println!("{:<20} {}", scenario.id(), scenario.name());
        if let Some(description) = scenario.description().map(one_line)
            && !description.is_empty()
        {
            println!("{:<20} {description}", "");
        }
    }
}

pub fn alert(notification: &EscalationNotification) {
    println!(
        "\x07ALERT: {} {} incident {} escalated from {} to the city. {}",
        notification.severity,
        notification.incident_type.label(),
        short_id(&notification.incident_id),
        notification.ward_name,
        notification.reason,
    );
}

pub fn ward_dashboard(dash: &WardDashboard) {
    println!("{} control center", dash.ward_name);
    println!(
        "  New: {}  In progress: {}  Resolved: {}",
        dash.new_count, dash.in_progress_count, dash.resolved_count
    );
    println!(
        "  Resources: {}/{} {} {:.0}%",
        dash.available_resources,
        dash.total_resources,
        resource_bar(dash.available_resources, dash.total_resources),
        dash.available_percent,
    );

    println!();
    println!("Active queue:");
    if dash.queue.is_empty() {
        println!("  (empty)");
    }
    for entry in &dash.queue {
        let note = if entry.incident.status != IncidentStatus::New {
            String::new()
        } else if entry.affordable {
            format!("  needs {} - can start", entry.required_resources)
        } else {
            format!("  needs {} - will escalate", entry.required_resources)
        };
        println!("  {}{note}", incident_line(&entry.incident));
    }

    if !dash.escalated.is_empty() {
        println!();
        println!("Escalated to city:");
        for incident in &dash.escalated {
            println!("  {}", incident_line(incident));
        }
    }

    if !dash.resolved.is_empty() {
        println!();
        println!("Resolved:");
        for incident in &dash.resolved {
            println!("  {}", incident_line(incident));
        }
    }
}

pub fn city_dashboard(dash: &CityDashboard) {
    println!(
        "City escalation desk: {} escalated, {} at city level",
        dash.escalated.len(),
        dash.city_level_count
    );
    if dash.escalated.is_empty() {
        println!("  No escalated incidents.");
    }
    for incident in &dash.escalated {
        println!("  {}", incident_line(incident));
        if let Some(reason) = &incident.escalation_reason {
            println!("      {reason}");
        }
    }
}

pub fn comparison(cmp: &WardComparison) {
    println!(
        "{:<20} {:>5} {:>6} {:>9} {:>8} {:>9} {:>6}",
        "WARD", "TOTAL", "ACTIVE", "ESCALATED", "RESOLVED", "RESOURCES", "USED"
    );
    println!("{}", "-".repeat(72));
    for row in &cmp.wards {
        println!(
            "{:<20} {:>5} {:>6} {:>9} {:>8} {:>9} {:>5.0}%",
            row.ward_name,
            row.total_incidents,
            row.active_incidents,
            row.escalated_incidents,
            row.resolved_incidents,
            format!("{}/{}", row.available_resources, row.total_resources),
            row.utilization_percent,
        );
    }
    let totals = &cmp.totals;
    println!("{}", "-".repeat(72));
    println!(
        "{} ward(s), {}/{} resources available, {} active, {} escalated",
        totals.ward_count,
        totals.available_resources,
        totals.total_resources,
        totals.active_incidents,
        totals.escalated_incidents,
    );
}

pub fn analytics(snapshot: &StoreSnapshot) {
    let summary = stats::incident_summary(&snapshot.incidents);
    println!(
        "Incidents: {} (new {}, in progress {}, escalated {}, resolved {})",
        summary.total, summary.new, summary.in_progress, summary.escalated, summary.resolved
    );
    println!(
        "Escalation rate: {:.1}%  Resolution rate: {:.1}%",
        summary.escalation_rate, summary.resolution_rate
    );

    for (title, counts) in [
        ("By type", stats::count_by_type(&snapshot.incidents)),
        ("By severity", stats::count_by_severity(&snapshot.incidents)),
        ("By status", stats::count_by_status(&snapshot.incidents)),
    ] {
        let line = counts
            .iter()
            .map(|c| format!("{} {}", c.name, c.count))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{title}: {line}");
    }

    println!();
    println!("Resource utilization:");
    for ward in &snapshot.wards {
        let util = stats::resource_utilization(ward);
        println!(
            "  {:<20} used {} of {} ({:.0}%)",
            ward.ward_name, util.used, util.total, util.utilization_percent
        );
    }

    println!();
    println!("Response times (simulated, minutes):");
    for target in stats::response_time_targets() {
        println!(
            "  {:<6} avg {:>3}  target {:>3}",
            target.severity.as_ref(),
            target.average_minutes,
            target.target_minutes
        );
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn canvas_cell(percent: f64, cells: usize) -> usize {
    ((percent / 100.0 * (cells - 1) as f64).round() as usize).min(cells - 1)
}

/// Draws map points on a character canvas. Later points overwrite
/// earlier ones in the same cell.
pub fn map_canvas(points: &[MapPoint]) -> Vec<String> {
    let mut canvas = vec![vec!['.'; CANVAS_WIDTH]; CANVAS_HEIGHT];
    for point in points {
        let col = canvas_cell(point.x, CANVAS_WIDTH);
        let row = canvas_cell(point.y, CANVAS_HEIGHT);
        canvas[row][col] = status_marker(point.status);
    }
    canvas.into_iter().map(|row| row.into_iter().collect()).collect()
}

pub fn heatmap(heatmap: &Heatmap, points: &[MapPoint]) {
    println!("Incident map (N new, P in progress, E escalated, R resolved):");
    for line in map_canvas(points) {
        println!("  |{line}|");
    }

    println!();
    println!("Severity-weighted density (max {}):", heatmap.max_density);
    for row in &heatmap.cells {
        let line: String = row
            .iter()
            .flat_map(|&v| [shade(v, heatmap.max_density); 2])
            .collect();
        let values = row
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        println!("  |{line}|  {values}");
    }
}

/// Draws the default-bounds map for a snapshot.
pub fn map_view(snapshot: &StoreSnapshot) -> Result<(), Box<dyn std::error::Error>> {
    let bounds = MapBounds::default();
    let density = map::heatmap(&bounds, &snapshot.incidents, map::DEFAULT_GRID_SIZE)?;
    heatmap(&density, &map::map_points(&bounds, &snapshot.incidents));
    Ok(())
}

fn step_line(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Reported {
            alias,
            incident_id,
            assigned_ward,
        } => format!("reported {alias} as {} in {assigned_ward}", short_id(incident_id)),
        StepOutcome::Started { alias, outcome } => {
            let result = if outcome.escalated {
                "escalated to city"
            } else if outcome.success {
                "handling started"
            } else {
                "rejected"
            };
            format!("start {alias}: {result}")
        }
        StepOutcome::Resolved { alias, resolved } => {
            format!(
                "resolve {alias}: {}",
                if *resolved { "resolved" } else { "no change" }
            )
        }
        StepOutcome::WardSelected { ward, selected } => {
            format!(
                "select {ward}: {}",
                if *selected { "selected" } else { "unknown ward" }
            )
        }
    }
}

pub fn scenario_report(report: &ScenarioReport) {
    println!("Scenario {}", report.scenario_id);
    for (idx, outcome) in report.steps.iter().enumerate() {
        println!("  {:>2}. {}", idx + 1, step_line(outcome));
    }

    let summary = stats::incident_summary(&report.snapshot.incidents);
    println!();
    println!(
        "{} incident(s): {} escalated ({:.0}%), {} resolved ({:.0}%)",
        summary.total,
        summary.escalated,
        summary.escalation_rate,
        summary.resolved,
        summary.resolution_rate
    );

    println!();
    comparison(&dashboards::ward_comparison(&report.snapshot));

    println!();
    city_dashboard(&dashboards::city_dashboard(&report.snapshot));

    if !report.alerts.is_empty() {
        println!();
        for notification in &report.alerts {
            alert(notification);
        }
    }
}
