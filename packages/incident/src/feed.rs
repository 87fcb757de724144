//! Consumer-side position in the escalation feed.

use crisis_response_incident_models::EscalationNotification;

use crate::IncidentStore;

/// Tracks how much of the escalation feed a consumer has already seen.
///
/// Each [`poll`](Self::poll) returns only escalations recorded since the
/// previous poll, so an alert fires once per escalation no matter how
/// often the consumer re-reads the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscalationCursor {
    position: usize,
}

impl EscalationCursor {
    /// A cursor at the start of the feed; the first poll returns every
    /// escalation so far.
    #[must_use]
    pub const fn new() -> Self {
        Self { position: 0 }
    }

    /// A cursor past every escalation already in `store`.
    #[must_use]
    pub fn at_end(store: &IncidentStore) -> Self {
        Self {
            position: store.escalations().len(),
        }
    }

    /// Returns escalations appended since the last poll and advances.
    pub fn poll<'a>(&mut self, store: &'a IncidentStore) -> &'a [EscalationNotification] {
        let fresh = store.escalations_since(self.position);
        self.position += fresh.len();
        fresh
    }

    /// Number of escalations consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}
