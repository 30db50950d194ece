//! C-compatible step metrics.

use tmz_solver::StepMetrics;

/// Counters and timing of the most recent step, read with
/// `tmz_step_metrics_get`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TmzStepMetrics {
    /// Steps since the last init or reset.
    pub steps: u64,
    /// Simulated time since the last init or reset, in seconds.
    pub simulated_time_s: f64,
    /// Wall-clock time of the last step, in microseconds.
    pub step_us: u64,
    /// Cells updated per step.
    /// Fixed-width `u64` for ABI portability (not `usize`).
    pub cells: u64,
}

impl TmzStepMetrics {
    pub(crate) fn from_rust(m: &StepMetrics) -> Self {
        Self {
            steps: m.steps,
            simulated_time_s: m.simulated_time_s,
            step_us: m.step_us,
            cells: m.cells as u64,
        }
    }
}
