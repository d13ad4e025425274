/// Trait for reporting progress of deferred actions.
///
/// The CLI implements it with indicatif bars; a UI would repaint its status
/// bar. All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_action_start(&self, _name: &str) {}
    fn on_action_progress(&self, _fraction: f64) {}
    fn on_action_complete(&self, _name: &str, _steps: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
