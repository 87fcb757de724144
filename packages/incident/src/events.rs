//! Store change notifications.
//!
//! Listeners run synchronously, in registration order, after a mutation
//! has been committed. A listener therefore always observes the store's
//! post-transition state in the event payload.

use crisis_response_incident_models::{EscalationNotification, Incident};

/// A committed change to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A new incident was appended.
    IncidentReported(Incident),
    /// An incident reserved resources and is now in progress.
    HandlingStarted(Incident),
    /// An incident was escalated to the city. Emitted exactly once per
    /// incident.
    Escalated(EscalationNotification),
    /// An in-progress incident was resolved and released its resources.
    Resolved(Incident),
    /// The default target ward for reports changed.
    WardSelected {
        /// The newly selected ward.
        ward_id: String,
    },
}

/// Handle returned by [`crate::IncidentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

/// Registered listeners.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, event: &StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
