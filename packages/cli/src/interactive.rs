//! Interactive console over a live incident store.
//!
//! Provides a menu-driven interface using `dialoguer`. Each action runs
//! against the same in-memory store; escalations raised by an action are
//! announced once, right after it.

use crisis_response_analytics::dashboards;
use crisis_response_incident::report::ReportForm;
use crisis_response_incident::{
    EscalationCursor, Incident, IncidentStatus, IncidentStore, IncidentType, Severity,
    StoreEvent,
};
use dialoguer::{Confirm, Input, Select};

use crate::render;

/// Top-level actions available in the console menu.
enum ConsoleAction {
    ReportIncident,
    StartHandling,
    ResolveIncident,
    WardDashboard,
    CityDashboard,
    WardComparison,
    Analytics,
    Map,
    SelectWard,
    Quit,
}

impl ConsoleAction {
    const ALL: &[Self] = &[
        Self::ReportIncident,
        Self::StartHandling,
        Self::ResolveIncident,
        Self::WardDashboard,
        Self::CityDashboard,
        Self::WardComparison,
        Self::Analytics,
        Self::Map,
        Self::SelectWard,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ReportIncident => "Report an incident",
            Self::StartHandling => "Start handling an incident",
            Self::ResolveIncident => "Resolve an incident",
            Self::WardDashboard => "Ward control center",
            Self::CityDashboard => "City escalation desk",
            Self::WardComparison => "Compare wards",
            Self::Analytics => "Analytics",
            Self::Map => "Incident map",
            Self::SelectWard => "Switch ward",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the console loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g., the terminal is closed).
pub fn run(mut store: IncidentStore) -> Result<(), Box<dyn std::error::Error>> {
    store.subscribe(|event| match event {
        StoreEvent::IncidentReported(incident)
        | StoreEvent::HandlingStarted(incident)
        | StoreEvent::Resolved(incident) => {
            log::debug!("{} is now {}", incident.id, incident.status);
        }
        StoreEvent::Escalated(notification) => {
            log::debug!("{} escalated: {}", notification.incident_id, notification.reason);
        }
        StoreEvent::WardSelected { ward_id } => log::debug!("Selected {ward_id}"),
    });

    let mut alerts = EscalationCursor::at_end(&store);
    let labels: Vec<&str> = ConsoleAction::ALL
        .iter()
        .map(ConsoleAction::label)
        .collect();

    println!("Crisis Response Console");

    loop {
        let ward = store.selected_ward();
        println!();
        println!(
            "{}: {}/{} resources available",
            ward.ward_name, ward.available_resources, ward.total_resources
        );

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match ConsoleAction::ALL[idx] {
            ConsoleAction::ReportIncident => report_incident(&mut store)?,
            ConsoleAction::StartHandling => start_handling(&mut store)?,
            ConsoleAction::ResolveIncident => resolve_incident(&mut store)?,
            ConsoleAction::WardDashboard => {
                let dash = dashboards::ward_dashboard(&store.snapshot(), store.selected_ward_id())?;
                render::ward_dashboard(&dash);
            }
            ConsoleAction::CityDashboard => {
                render::city_dashboard(&dashboards::city_dashboard(&store.snapshot()));
            }
            ConsoleAction::WardComparison => {
                render::comparison(&dashboards::ward_comparison(&store.snapshot()));
            }
            ConsoleAction::Analytics => render::analytics(&store.snapshot()),
            ConsoleAction::Map => render::map_view(&store.snapshot())?,
            ConsoleAction::SelectWard => select_ward(&mut store)?,
            ConsoleAction::Quit => break,
        }

        for notification in alerts.poll(&store) {
            render::alert(notification);
        }
    }

    Ok(())
}

fn select_ward(store: &mut IncidentStore) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<String> = store
        .wards()
        .iter()
        .map(|w| {
            format!(
                "{} ({}/{})",
                w.ward_name, w.available_resources, w.total_resources
            )
        })
        .collect();
    let current = store
        .wards()
        .iter()
        .position(|w| w.ward_id == store.selected_ward_id())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Which ward?")
        .items(&labels)
        .default(current)
        .interact()?;

    let ward_id = store.wards()[idx].ward_id.clone();
    store.select_ward(&ward_id);
    Ok(())
}

/// Prompts for the report form fields, validates them, and files the
/// incident against the selected ward.
fn report_incident(store: &mut IncidentStore) -> Result<(), Box<dyn std::error::Error>> {
    let type_labels: Vec<&str> = IncidentType::all().iter().map(|t| t.label()).collect();
    let type_idx = Select::new()
        .with_prompt("Incident type")
        .items(&type_labels)
        .default(0)
        .interact()?;

    let severity_labels: Vec<String> = Severity::all()
        .iter()
        .map(|s| format!("{s} (needs {} resource(s))", s.resource_requirement()))
        .collect();
    let severity_idx = Select::new()
        .with_prompt("Severity")
        .items(&severity_labels)
        .default(0)
        .interact()?;

    let mut form = ReportForm {
        incident_type: IncidentType::all()[type_idx].to_string(),
        severity: Severity::all()[severity_idx].to_string(),
        ..ReportForm::default()
    };

    let use_sample = Confirm::new()
        .with_prompt("Use sample location?")
        .default(true)
        .interact()?;

    if use_sample {
        form.fill_sample_location();
    } else {
        form.latitude = Input::new()
            .with_prompt("Latitude")
            .allow_empty(true)
            .interact_text()?;
        form.longitude = Input::new()
            .with_prompt("Longitude")
            .allow_empty(true)
            .interact_text()?;
    }

    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let ward_id = store.selected_ward_id().to_string();
    let incident = request.submit(store, &ward_id);
    println!("Reported: {}", render::incident_line(incident));
    Ok(())
}

/// Lets the user pick one of the selected ward's incidents in `status`.
fn pick_incident(
    store: &IncidentStore,
    status: IncidentStatus,
    prompt: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let ward_name = &store.selected_ward().ward_name;
    let candidates: Vec<&Incident> = store
        .incidents()
        .iter()
        .filter(|i| i.status == status && &i.assigned_ward == ward_name)
        .collect();

    if candidates.is_empty() {
        println!("No {status} incidents in {ward_name}.");
        return Ok(None);
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|&i| render::incident_line(i))
        .collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Some(candidates[idx].id.clone()))
}

fn start_handling(store: &mut IncidentStore) -> Result<(), Box<dyn std::error::Error>> {
    let Some(id) = pick_incident(store, IncidentStatus::New, "Start handling which incident?")?
    else {
        return Ok(());
    };

    let outcome = store.start_handling(&id);
    let Some(incident) = store.incident(&id) else {
        return Ok(());
    };

    if outcome.escalated {
        println!(
            "Escalated to city: {}",
            incident.escalation_reason.as_deref().unwrap_or_default()
        );
    } else if outcome.success {
        println!(
            "Handling started: {} resource(s) reserved from {}",
            incident.resource_requirement(),
            incident.assigned_ward
        );
    } else {
        println!("Could not start handling {}", incident.id);
    }
    Ok(())
}

fn resolve_incident(store: &mut IncidentStore) -> Result<(), Box<dyn std::error::Error>> {
    let Some(id) = pick_incident(store, IncidentStatus::InProgress, "Resolve which incident?")?
    else {
        return Ok(());
    };

    if store.resolve_incident(&id) {
        println!("Resolved {id}; resources returned to the ward.");
    } else {
        println!("Could not resolve {id}");
    }
    Ok(())
}
