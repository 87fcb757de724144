//! The incident store.
//!
//! Every operation runs to completion before returning and mutates state
//! only through `&mut self`, so calls are serialized by the borrow checker.
//! Sharing a store between threads requires wrapping the whole store in a
//! single mutex; the check-then-reserve in [`IncidentStore::start_handling`]
//! is not safe to split across locks.

use chrono::Utc;
use crisis_response_incident_models::{
    Coordinates, EscalationLevel, EscalationNotification, HandlingOutcome, Incident, IncidentStatus,
    IncidentType, Severity, StoreSnapshot, WardDefinition, WardResourcePool,
};

use crate::WardConfigError;
use crate::events::{StoreEvent, Subscribers, SubscriptionId};
use crate::registry;

/// Owns incidents and ward resource pools and enforces the incident
/// lifecycle.
#[derive(Debug)]
pub struct IncidentStore {
    incidents: Vec<Incident>,
    wards: Vec<WardResourcePool>,
    selected_ward_id: String,
    escalations: Vec<EscalationNotification>,
    revision: u64,
    subscribers: Subscribers,
}

impl IncidentStore {
    /// Creates a store over the given pools. The first pool becomes the
    /// selected ward and the fallback for reports against unknown wards.
    ///
    /// # Errors
    ///
    /// Returns an error if the pools are empty, contain duplicates, or
    /// violate `0 <= available <= total` with `total > 0`.
    pub fn new(wards: Vec<WardResourcePool>) -> Result<Self, WardConfigError> {
        registry::validate_pools(&wards)?;
        let selected_ward_id = wards[0].ward_id.clone();

        log::debug!("Incident store created with {} ward(s)", wards.len());

        Ok(Self {
            incidents: Vec::new(),
            wards,
            selected_ward_id,
            escalations: Vec::new(),
            revision: 0,
            subscribers: Subscribers::default(),
        })
    }

    /// Creates a store from ward definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the definitions are invalid.
    pub fn from_definitions(definitions: &[WardDefinition]) -> Result<Self, WardConfigError> {
        Self::new(registry::pools_from_definitions(definitions)?)
    }

    /// Creates a store over the embedded default wards.
    ///
    /// # Panics
    ///
    /// Panics if the embedded ward configuration is invalid, which the
    /// registry tests rule out.
    #[must_use]
    pub fn with_default_wards() -> Self {
        Self::new(registry::default_wards())
            .unwrap_or_else(|e| panic!("Embedded default wards are invalid: {e}"))
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Files a new incident against `ward_id`.
    ///
    /// No resources are checked or reserved here; that happens in
    /// [`Self::start_handling`]. An unknown `ward_id` is not an error: the
    /// incident is assigned to the default (first configured) ward.
    pub fn report_incident(
        &mut self,
        incident_type: IncidentType,
        severity: Severity,
        latitude: f64,
        longitude: f64,
        ward_id: &str,
    ) -> &Incident {
        if !Coordinates::in_range(latitude, longitude) {
            log::warn!("Incident reported with out-of-range coordinates ({latitude}, {longitude})");
        }

        let assigned_ward = if let Some(pool) = self.ward(ward_id) {
            pool.ward_name.clone()
        } else {
            let fallback = self.default_ward().ward_name.clone();
            log::warn!("Unknown ward '{ward_id}', assigning incident to '{fallback}'");
            fallback
        };

        let now = Utc::now();
        let incident = Incident {
            id: uuid::Uuid::new_v4().to_string(),
            incident_type,
            severity,
            latitude,
            longitude,
            status: IncidentStatus::New,
            escalation_level: EscalationLevel::Ward,
            escalation_reason: None,
            assigned_ward,
            created_at: now,
            updated_at: now,
        };

        log::info!(
            "Reported {} {} incident {} in {}",
            incident.severity,
            incident.incident_type,
            incident.id,
            incident.assigned_ward
        );

        self.incidents.push(incident.clone());
        self.commit(&StoreEvent::IncidentReported(incident));

        let last = self.incidents.len() - 1;
        &self.incidents[last]
    }

    /// Starts handling a NEW incident.
    ///
    /// If the assigned ward can afford the incident's severity cost, the
    /// cost is reserved and the incident moves to IN_PROGRESS. Otherwise no
    /// pool is touched, the incident moves to ESCALATED at city level, and
    /// an [`EscalationNotification`] is appended to the feed.
    ///
    /// Unknown incidents, incidents whose ward pool is missing, and
    /// incidents not in NEW status are rejected without any change.
    pub fn start_handling(&mut self, incident_id: &str) -> HandlingOutcome {
        let Some(idx) = self.incident_index(incident_id) else {
            log::warn!("start_handling: unknown incident {incident_id}");
            return HandlingOutcome::REJECTED;
        };

        let status = self.incidents[idx].status;
        if status != IncidentStatus::New {
            log::warn!("start_handling: incident {incident_id} is {status}, expected NEW");
            return HandlingOutcome::REJECTED;
        }

        let Some(pool_idx) = self.pool_index_by_name(&self.incidents[idx].assigned_ward) else {
            log::warn!(
                "start_handling: no resource pool for ward '{}'",
                self.incidents[idx].assigned_ward
            );
            return HandlingOutcome::REJECTED;
        };

        let required = self.incidents[idx].resource_requirement();
        let pool = &mut self.wards[pool_idx];
        let available = pool.available_resources;
        let now = Utc::now();

        if pool.reserve(required) {
            let incident = &mut self.incidents[idx];
            incident.status = IncidentStatus::InProgress;
            incident.updated_at = now;

            log::info!(
                "Incident {incident_id} in progress; {} reserved {required}, {} left",
                pool.ward_name,
                pool.available_resources
            );

            let event = StoreEvent::HandlingStarted(incident.clone());
            self.commit(&event);
            return HandlingOutcome::ALLOCATED;
        }

        let reason =
            format!("Insufficient ward resources: requires {required}, only {available} available");

        let incident = &mut self.incidents[idx];
        incident.status = IncidentStatus::Escalated;
        incident.escalation_level = EscalationLevel::City;
        incident.escalation_reason = Some(reason.clone());
        incident.updated_at = now;

        log::warn!(
            "Incident {incident_id} escalated to city from {}: {reason}",
            incident.assigned_ward
        );

        let notification = EscalationNotification {
            incident_id: incident.id.clone(),
            ward_name: incident.assigned_ward.clone(),
            incident_type: incident.incident_type,
            severity: incident.severity,
            reason,
            timestamp: now,
        };
        self.escalations.push(notification.clone());
        self.commit(&StoreEvent::Escalated(notification));

        HandlingOutcome::ESCALATED
    }

    /// Resolves an IN_PROGRESS incident and releases its reservation.
    ///
    /// Returns `true` if the incident was resolved. Any other status, an
    /// unknown id, or a missing pool is a silent no-op returning `false`.
    pub fn resolve_incident(&mut self, incident_id: &str) -> bool {
        let Some(idx) = self.incident_index(incident_id) else {
            log::debug!("resolve_incident: unknown incident {incident_id}");
            return false;
        };

        if self.incidents[idx].status != IncidentStatus::InProgress {
            log::debug!(
                "resolve_incident: incident {incident_id} is {}, ignoring",
                self.incidents[idx].status
            );
            return false;
        }

        let Some(pool_idx) = self.pool_index_by_name(&self.incidents[idx].assigned_ward) else {
            log::warn!(
                "resolve_incident: no resource pool for ward '{}'",
                self.incidents[idx].assigned_ward
            );
            return false;
        };

        let required = self.incidents[idx].resource_requirement();
        let pool = &mut self.wards[pool_idx];
        let restored = pool.release(required);
        if restored != required {
            log::warn!(
                "resolve_incident: {} released {restored} of {required}, pool already at capacity",
                pool.ward_name
            );
        }

        let incident = &mut self.incidents[idx];
        incident.status = IncidentStatus::Resolved;
        incident.updated_at = Utc::now();

        log::info!(
            "Incident {incident_id} resolved; {} now has {}/{}",
            pool.ward_name,
            pool.available_resources,
            pool.total_resources
        );

        let event = StoreEvent::Resolved(incident.clone());
        self.commit(&event);
        true
    }

    /// Changes the default target ward for reports. Returns `false` and
    /// keeps the current selection if `ward_id` is unknown.
    pub fn select_ward(&mut self, ward_id: &str) -> bool {
        if self.ward(ward_id).is_none() {
            log::warn!("select_ward: unknown ward {ward_id}");
            return false;
        }
        if self.selected_ward_id != ward_id {
            self.selected_ward_id = ward_id.to_string();
            self.commit(&StoreEvent::WardSelected {
                ward_id: ward_id.to_string(),
            });
        }
        true
    }

    // ── Subscriptions ───────────────────────────────────────────────────

    /// Registers a listener called after every committed mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// All incidents, oldest first.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Looks up an incident by id.
    #[must_use]
    pub fn incident(&self, incident_id: &str) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == incident_id)
    }

    /// All ward pools, in configuration order.
    #[must_use]
    pub fn wards(&self) -> &[WardResourcePool] {
        &self.wards
    }

    /// Looks up a ward pool by id.
    #[must_use]
    pub fn ward(&self, ward_id: &str) -> Option<&WardResourcePool> {
        self.wards.iter().find(|w| w.ward_id == ward_id)
    }

    /// Looks up a ward pool by display name.
    #[must_use]
    pub fn ward_by_name(&self, ward_name: &str) -> Option<&WardResourcePool> {
        self.wards.iter().find(|w| w.ward_name == ward_name)
    }

    /// Identifier of the currently selected ward.
    #[must_use]
    pub fn selected_ward_id(&self) -> &str {
        &self.selected_ward_id
    }

    /// The currently selected ward.
    #[must_use]
    pub fn selected_ward(&self) -> &WardResourcePool {
        self.ward(&self.selected_ward_id)
            .unwrap_or_else(|| self.default_ward())
    }

    /// Every escalation so far, oldest first.
    #[must_use]
    pub fn escalations(&self) -> &[EscalationNotification] {
        &self.escalations
    }

    /// Escalations after the first `cursor` entries.
    #[must_use]
    pub fn escalations_since(&self, cursor: usize) -> &[EscalationNotification] {
        self.escalations.get(cursor..).unwrap_or(&[])
    }

    /// Number of committed mutations.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Clones the full observable state.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            revision: self.revision,
            incidents: self.incidents.clone(),
            wards: self.wards.clone(),
            selected_ward_id: self.selected_ward_id.clone(),
            escalations: self.escalations.clone(),
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn default_ward(&self) -> &WardResourcePool {
        &self.wards[0]
    }

    fn incident_index(&self, incident_id: &str) -> Option<usize> {
        self.incidents.iter().position(|i| i.id == incident_id)
    }

    fn pool_index_by_name(&self, ward_name: &str) -> Option<usize> {
        self.wards.iter().position(|w| w.ward_name == ward_name)
    }

    fn commit(&mut self, event: &StoreEvent) {
        self.revision += 1;
        self.subscribers.notify(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn ward(id: &str, name: &str, available: u32, total: u32) -> WardResourcePool {
        WardResourcePool {
            ward_id: id.to_string(),
            ward_name: name.to_string(),
            available_resources: available,
            total_resources: total,
            color: "red".to_string(),
        }
    }

    fn single_ward_store(available: u32, total: u32) -> IncidentStore {
        IncidentStore::new(vec![ward("ward-1", "Ward 1", available, total)]).unwrap()
    }

    fn report(store: &mut IncidentStore, severity: Severity) -> String {
        store
            .report_incident(IncidentType::Flood, severity, 28.6, 77.2, "ward-1")
            .id
            .clone()
    }

    fn assert_pools_within_capacity(store: &IncidentStore) {
        for pool in store.wards() {
            assert!(
                pool.available_resources <= pool.total_resources,
                "{} has {}/{}",
                pool.ward_id,
                pool.available_resources,
                pool.total_resources
            );
        }
    }

    #[test]
    fn report_creates_new_ward_level_incident() {
        let mut store = single_ward_store(2, 5);
        let incident = store
            .report_incident(IncidentType::Fire, Severity::Medium, 28.6, 77.2, "ward-1")
            .clone();

        assert_eq!(incident.status, IncidentStatus::New);
        assert_eq!(incident.escalation_level, EscalationLevel::Ward);
        assert_eq!(incident.assigned_ward, "Ward 1");
        assert_eq!(incident.created_at, incident.updated_at);
        assert!(incident.escalation_reason.is_none());
        // No reservation at report time.
        assert_eq!(store.wards()[0].available_resources, 2);
    }

    #[test]
    fn report_keeps_insertion_order_and_unique_ids() {
        let mut store = single_ward_store(2, 5);
        let a = report(&mut store, Severity::Low);
        let b = report(&mut store, Severity::High);
        let ids: Vec<&str> = store.incidents().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
        assert_ne!(a, b);
    }

    #[test]
    fn report_against_unknown_ward_falls_back_to_default() {
        let mut store = IncidentStore::with_default_wards();
        let incident = store.report_incident(
            IncidentType::Accident,
            Severity::Low,
            28.6,
            77.2,
            "ward-404",
        );
        assert_eq!(incident.assigned_ward, "Ward 1 - Central");
    }

    #[test]
    fn report_targets_requested_ward() {
        let mut store = IncidentStore::with_default_wards();
        let incident = store.report_incident(
            IncidentType::Earthquake,
            Severity::High,
            28.6,
            77.2,
            "ward-3",
        );
        assert_eq!(incident.assigned_ward, "Ward 3 - South");
        let assigned = incident.assigned_ward.clone();
        assert_eq!(store.ward_by_name(&assigned).unwrap().ward_id, "ward-3");
    }

    #[test]
    fn insufficient_resources_escalate_without_touching_pool() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::High);

        let outcome = store.start_handling(&id);

        assert_eq!(outcome, HandlingOutcome::ESCALATED);
        let incident = store.incident(&id).unwrap();
        assert_eq!(incident.status, IncidentStatus::Escalated);
        assert_eq!(incident.escalation_level, EscalationLevel::City);
        let reason = incident.escalation_reason.as_deref().unwrap();
        assert!(reason.contains("requires 3"), "{reason}");
        assert!(reason.contains("only 2 available"), "{reason}");
        assert!(incident.updated_at >= incident.created_at);
        assert_eq!(store.wards()[0].available_resources, 2);
    }

    #[test]
    fn sufficient_resources_reserve_and_progress() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::Low);

        assert_eq!(store.start_handling(&id), HandlingOutcome::ALLOCATED);
        assert_eq!(store.incident(&id).unwrap().status, IncidentStatus::InProgress);
        assert_eq!(store.wards()[0].available_resources, 1);
        assert!(store.escalations().is_empty());
    }

    #[test]
    fn exact_fit_is_allocated() {
        let mut store = single_ward_store(3, 5);
        let id = report(&mut store, Severity::High);
        assert_eq!(store.start_handling(&id), HandlingOutcome::ALLOCATED);
        assert_eq!(store.wards()[0].available_resources, 0);
    }

    #[test]
    fn resolve_releases_exactly_the_reservation() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::Low);
        store.start_handling(&id);

        assert!(store.resolve_incident(&id));
        assert_eq!(store.incident(&id).unwrap().status, IncidentStatus::Resolved);
        assert_eq!(store.wards()[0].available_resources, 2);
    }

    #[test]
    fn resolving_twice_changes_state_once() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::Medium);
        store.start_handling(&id);

        assert!(store.resolve_incident(&id));
        let after_first = store.snapshot();
        assert!(!store.resolve_incident(&id));
        assert_eq!(store.snapshot(), after_first);
    }

    #[test]
    fn resolve_ignores_new_and_escalated_incidents() {
        let mut store = single_ward_store(2, 5);
        let new_id = report(&mut store, Severity::Low);
        let escalated_id = report(&mut store, Severity::High);
        store.start_handling(&escalated_id);
        let before = store.snapshot();

        assert!(!store.resolve_incident(&new_id));
        assert!(!store.resolve_incident(&escalated_id));
        assert!(!store.resolve_incident("nonexistent"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn unknown_incident_is_rejected_without_change() {
        let mut store = single_ward_store(2, 5);
        report(&mut store, Severity::Low);
        let before = store.snapshot();

        assert_eq!(store.start_handling("nonexistent"), HandlingOutcome::REJECTED);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn second_start_handling_is_rejected() {
        let mut store = single_ward_store(5, 5);
        let id = report(&mut store, Severity::Low);
        store.start_handling(&id);
        let before = store.snapshot();

        assert_eq!(store.start_handling(&id), HandlingOutcome::REJECTED);
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.wards()[0].available_resources, 4);
    }

    #[test]
    fn escalated_incident_cannot_be_restarted() {
        let mut store = single_ward_store(0, 5);
        let id = report(&mut store, Severity::Low);
        assert!(store.start_handling(&id).escalated);
        assert_eq!(store.start_handling(&id), HandlingOutcome::REJECTED);
        assert_eq!(store.escalations().len(), 1);
    }

    #[test]
    fn resources_are_conserved_across_interleaved_handling() {
        let mut store = single_ward_store(5, 5);
        let ids: Vec<String> = [Severity::Low, Severity::Medium, Severity::High, Severity::Low]
            .into_iter()
            .map(|s| report(&mut store, s))
            .collect();

        let outcomes: Vec<HandlingOutcome> =
            ids.iter().map(|id| store.start_handling(id)).collect();
        assert_pools_within_capacity(&store);

        // 1 + 2 fit, 3 does not (2 left), last 1 fits.
        assert_eq!(
            outcomes,
            vec![
                HandlingOutcome::ALLOCATED,
                HandlingOutcome::ALLOCATED,
                HandlingOutcome::ESCALATED,
                HandlingOutcome::ALLOCATED,
            ]
        );
        assert_eq!(store.wards()[0].available_resources, 1);

        for id in ids.iter().rev() {
            store.resolve_incident(id);
            assert_pools_within_capacity(&store);
        }
        assert_eq!(store.wards()[0].available_resources, 5);
    }

    #[test]
    fn wards_are_independent() {
        let mut store = IncidentStore::with_default_wards();
        let id = store
            .report_incident(IncidentType::Fire, Severity::High, 28.6, 77.2, "ward-4")
            .id
            .clone();

        assert_eq!(store.start_handling(&id), HandlingOutcome::ALLOCATED);
        assert_eq!(store.ward("ward-4").unwrap().available_resources, 2);
        assert_eq!(store.ward("ward-1").unwrap().available_resources, 2);
    }

    #[test]
    fn observed_transitions_follow_lifecycle() {
        let mut store = single_ward_store(3, 5);
        let ids: Vec<String> = (0..4)
            .map(|n| {
                let severity = Severity::all()[n % Severity::all().len()];
                report(&mut store, severity)
            })
            .collect();

        let mut previous = store.snapshot();
        let steps = [
            (true, 0),
            (true, 1),
            (false, 0),
            (true, 2),
            (true, 3),
            (false, 1),
        ];
        for (start, n) in steps {
            if start {
                store.start_handling(&ids[n]);
            } else {
                store.resolve_incident(&ids[n]);
            }
            let current = store.snapshot();
            for (before, after) in previous.incidents.iter().zip(&current.incidents) {
                assert!(
                    before.status == after.status || before.status.can_transition_to(after.status),
                    "{:?} -> {:?}",
                    before.status,
                    after.status
                );
                if after.status == IncidentStatus::Escalated {
                    assert_eq!(after.escalation_level, EscalationLevel::City);
                } else {
                    assert_eq!(after.escalation_level, EscalationLevel::Ward);
                }
            }
            assert_pools_within_capacity(&store);
            previous = current;
        }
    }

    #[test]
    fn escalation_is_notified_once_per_transition() {
        let mut store = single_ward_store(2, 5);
        let escalations = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&escalations);
        store.subscribe(move |event| {
            if let StoreEvent::Escalated(n) = event {
                sink.lock().unwrap().push(n.incident_id.clone());
            }
        });

        let id = report(&mut store, Severity::High);
        let first = store.snapshot();
        store.start_handling(&id);
        let second = store.snapshot();
        store.start_handling(&id);
        let third = store.snapshot();

        assert_eq!(*escalations.lock().unwrap(), vec![id.clone()]);
        assert_eq!(second.escalations_since(&first).len(), 1);
        // Escalated in two consecutive snapshots, reported once.
        assert!(third.escalations_since(&second).is_empty());

        let notification = &store.escalations()[0];
        assert_eq!(notification.ward_name, "Ward 1");
        assert_eq!(notification.severity, Severity::High);
        assert_eq!(notification.incident_type, IncidentType::Flood);
    }

    #[test]
    fn subscribers_see_every_committed_mutation() {
        let mut store = single_ward_store(2, 5);
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let sub = store.subscribe(move |event| {
            let tag = match event {
                StoreEvent::IncidentReported(_) => "reported",
                StoreEvent::HandlingStarted(_) => "started",
                StoreEvent::Escalated(_) => "escalated",
                StoreEvent::Resolved(_) => "resolved",
                StoreEvent::WardSelected { .. } => "selected",
            };
            sink.lock().unwrap().push(tag);
        });

        let id = report(&mut store, Severity::Low);
        store.start_handling(&id);
        store.start_handling("nonexistent");
        store.resolve_incident(&id);
        store.resolve_incident(&id);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["reported", "started", "resolved"]
        );
        assert_eq!(store.revision(), 3);

        assert!(store.unsubscribe(sub));
        assert_eq!(store.subscriber_count(), 0);
        report(&mut store, Severity::Low);
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn handling_event_carries_post_transition_state() {
        let mut store = single_ward_store(2, 5);
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        store.subscribe(move |event| {
            if let StoreEvent::HandlingStarted(incident) = event {
                *sink.lock().unwrap() = Some(incident.status);
            }
        });

        let id = report(&mut store, Severity::Low);
        store.start_handling(&id);
        assert_eq!(*seen.lock().unwrap(), Some(IncidentStatus::InProgress));
    }

    #[test]
    fn select_ward_only_accepts_known_wards() {
        let mut store = IncidentStore::with_default_wards();
        assert_eq!(store.selected_ward_id(), "ward-1");

        assert!(store.select_ward("ward-2"));
        assert_eq!(store.selected_ward().ward_name, "Ward 2 - North");

        assert!(!store.select_ward("ward-99"));
        assert_eq!(store.selected_ward_id(), "ward-2");
    }

    #[test]
    fn missing_pool_is_rejected_without_change() {
        let mut store = single_ward_store(5, 5);
        let id = report(&mut store, Severity::Low);
        // Simulate a ward rename that orphans the incident.
        store.wards[0].ward_name = "Renamed".to_string();
        let before = store.snapshot();

        assert_eq!(store.start_handling(&id), HandlingOutcome::REJECTED);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn release_is_clamped_at_capacity() {
        let mut store = single_ward_store(5, 5);
        let id = report(&mut store, Severity::High);
        store.start_handling(&id);
        // Simulate a double release elsewhere.
        store.wards[0].available_resources = 4;

        assert!(store.resolve_incident(&id));
        assert_eq!(store.wards()[0].available_resources, 5);
    }

    #[test]
    fn new_rejects_invalid_pools() {
        assert!(matches!(
            IncidentStore::new(Vec::new()),
            Err(WardConfigError::Empty)
        ));
        assert!(matches!(
            IncidentStore::new(vec![ward("a", "A", 6, 5)]),
            Err(WardConfigError::OverCapacity { .. })
        ));
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let mut store = single_ward_store(2, 5);
        report(&mut store, Severity::Low);
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["selectedWardId"], "ward-1");
        assert_eq!(json["wards"][0]["availableResources"], 2);
        assert_eq!(json["incidents"][0]["status"], "NEW");
    }

    fn backdate(store: &mut IncidentStore, id: &str) -> chrono::DateTime<Utc> {
        let past = Utc::now() - chrono::Duration::minutes(5);
        let idx = store.incident_index(id).unwrap();
        store.incidents[idx].updated_at = past;
        past
    }

    #[test]
    fn allocation_refreshes_updated_at() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::Low);
        let past = backdate(&mut store, &id);

        assert_eq!(store.start_handling(&id), HandlingOutcome::ALLOCATED);
        assert!(store.incident(&id).unwrap().updated_at > past);
    }

    #[test]
    fn escalation_refreshes_updated_at() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::High);
        let past = backdate(&mut store, &id);

        assert_eq!(store.start_handling(&id), HandlingOutcome::ESCALATED);
        let incident = store.incident(&id).unwrap();
        assert!(incident.updated_at > past);
        assert_eq!(incident.updated_at, store.escalations()[0].timestamp);
    }

    #[test]
    fn resolve_refreshes_updated_at() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::Low);
        store.start_handling(&id);
        let past = backdate(&mut store, &id);

        assert!(store.resolve_incident(&id));
        assert!(store.incident(&id).unwrap().updated_at > past);
    }

    #[test]
    fn rejected_and_no_op_calls_keep_updated_at() {
        let mut store = single_ward_store(2, 5);
        let id = report(&mut store, Severity::Low);
        store.start_handling(&id);
        let past = backdate(&mut store, &id);

        // Already IN_PROGRESS.
        assert_eq!(store.start_handling(&id), HandlingOutcome::REJECTED);
        assert_eq!(store.incident(&id).unwrap().updated_at, past);

        let fresh = report(&mut store, Severity::Low);
        let fresh_past = backdate(&mut store, &fresh);
        // Still NEW.
        assert!(!store.resolve_incident(&fresh));
        assert_eq!(store.incident(&fresh).unwrap().updated_at, fresh_past);

        assert!(store.resolve_incident(&id));
        let resolved_at = store.incident(&id).unwrap().updated_at;
        assert!(!store.resolve_incident(&id));
        assert_eq!(store.incident(&id).unwrap().updated_at, resolved_at);
    }
}
