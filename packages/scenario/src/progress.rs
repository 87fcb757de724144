//! Progress reporting for scenario replay.
//!
//! [`ProgressCallback`] decouples the runner from any rendering backend.
//! The CLI supplies an `indicatif` implementation; tests use
//! [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a running scenario.
pub trait ProgressCallback: Send + Sync {
    /// Set the total number of steps.
    fn set_total(&self, total: u64);

    /// Advance by `delta` steps.
    fn inc(&self, delta: u64);

    /// Describe the step currently running.
    fn set_message(&self, msg: String);

    /// Mark the run complete with a final message.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
