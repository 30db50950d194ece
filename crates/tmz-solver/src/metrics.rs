//! Per-step metrics for the solver.
//!
//! [`StepMetrics`] is refreshed after every successful `step()` and
//! zeroed by init and reset.

/// Counters and timing for the most recent step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Steps since the last init or reset.
    pub steps: u64,
    /// Simulated time since the last init or reset, in seconds.
    pub simulated_time_s: f64,
    /// Wall-clock time of the last step, in microseconds.
    pub step_us: u64,
    /// Cells updated per step.
    pub cells: usize,
}

impl StepMetrics {
    /// Cell updates per second implied by the last step, `None` when the
    /// step was too fast to time.
    pub fn cell_rate(&self) -> Option<f64> {
        (self.step_us > 0).then(|| self.cells as f64 * 1e6 / self.step_us as f64)
    }
}
