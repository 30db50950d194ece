//! Point source: position, waveform and phase accumulator.
//!
//! All waveforms are driven by a phase `θ` that advances by `2π·S/ppw` per
//! step, so one temporal period spans `ppw/S` steps and one spatial
//! wavelength spans `ppw` cells. Retuning changes only the increment,
//! which keeps the phase continuous. Square and sawtooth are generated
//! without band limiting; grid dispersion is the only smoothing.

use std::f64::consts::{PI, TAU};

use tmz_core::{Injection, SourceKind};

use crate::config::SourceConfig;
use crate::geometry::GridGeometry;

/// State of the single point source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceModel {
    kind: SourceKind,
    injection: Injection,
    ppw: f64,
    amplitude: f64,
    delay_multiplier: f64,
    courant: f64,
    x: f64,
    y: f64,
    cell: (usize, usize),
    theta: f64,
    steps: u64,
}

impl SourceModel {
    /// Smallest points-per-wavelength value; coarser sampling aliases.
    pub const MIN_PPW: f64 = 2.0;

    /// Largest points-per-wavelength value.
    pub const MAX_PPW: f64 = 1.0e6;

    /// Source at the origin node with the configured waveform.
    pub fn new(config: &SourceConfig, courant: f64) -> Self {
        Self {
            kind: config.kind,
            injection: config.injection,
            ppw: clamp_ppw(config.ppw),
            amplitude: config.amplitude,
            delay_multiplier: config.delay_multiplier,
            courant,
            x: 0.0,
            y: 0.0,
            cell: (0, 0),
            theta: 0.0,
            steps: 0,
        }
    }

    /// Waveform.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Select the waveform. The phase is left untouched.
    pub fn set_kind(&mut self, kind: SourceKind) {
        self.kind = kind;
    }

    /// Injection mode.
    pub fn injection(&self) -> Injection {
        self.injection
    }

    /// Select additive (`true`) or hardwired (`false`) injection.
    pub fn set_additive(&mut self, additive: bool) {
        self.injection = Injection::from_additive(additive);
    }

    /// Current points per wavelength.
    pub fn ppw(&self) -> f64 {
        self.ppw
    }

    /// Shift ppw by `delta`, clamped to
    /// [`MIN_PPW`](Self::MIN_PPW)..=[`MAX_PPW`](Self::MAX_PPW). Returns the
    /// new value.
    pub fn tune(&mut self, delta: f64) -> f64 {
        if delta.is_finite() {
            self.ppw = clamp_ppw(self.ppw + delta);
        }
        self.ppw
    }

    /// Peak value.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Physical position, always inside the grid extent.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Node that receives the injection.
    pub fn cell(&self) -> (usize, usize) {
        self.cell
    }

    /// Move to the grid centre.
    pub fn center(&mut self, geometry: &GridGeometry) {
        let (x, y) = geometry.center();
        self.place(x, y, geometry);
    }

    /// Move to a physical point, clamped into the grid.
    pub fn place(&mut self, x: f64, y: f64, geometry: &GridGeometry) {
        let (x, y) = geometry.clamp(x, y);
        self.x = x;
        self.y = y;
        self.cell = geometry.nearest_cell(x, y);
    }

    /// Shift by a physical offset, clamped into the grid.
    pub fn shift(&mut self, dx: f64, dy: f64, geometry: &GridGeometry) {
        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };
        self.place(self.x + dx, self.y + dy, geometry);
    }

    /// Running phase in radians.
    pub fn phase(&self) -> f64 {
        self.theta
    }

    /// Steps since the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Restart the waveform.
    pub fn reset_timing(&mut self) {
        self.theta = 0.0;
        self.steps = 0;
    }

    /// Phase advance per step.
    pub fn radians_per_step(&self) -> f64 {
        TAU * self.courant / self.ppw
    }

    /// Steps from pulse start to Ricker peak, `floor(delay·ppw/S)`, at least 1.
    pub fn ricker_delay(&self) -> u64 {
        ((self.delay_multiplier * self.ppw / self.courant).floor() as u64).max(1)
    }

    /// Value to inject this step, `None` when the source is off.
    pub fn sample(&self) -> Option<f64> {
        let a = self.amplitude;
        let value = match self.kind {
            SourceKind::Off => return None,
            SourceKind::Mono => a * self.theta.sin(),
            SourceKind::Square => {
                if self.theta.sin() < 0.0 {
                    -a
                } else {
                    a
                }
            }
            SourceKind::Sawtooth => a * (2.0 * (self.theta / TAU).rem_euclid(1.0) - 1.0),
            SourceKind::Ricker => {
                let qd = self.ricker_delay();
                let q = (self.steps % qd.saturating_mul(2)) as f64;
                let eta = PI * self.courant * (q - qd as f64) / self.ppw;
                let eta2 = eta * eta;
                a * (-eta2).exp() * (1.0 - 2.0 * eta2)
            }
        };
        Some(value)
    }

    /// Advance phase and step counter by one step.
    pub fn advance(&mut self) {
        self.theta += self.radians_per_step();
        self.steps += 1;
    }
}

fn clamp_ppw(ppw: f64) -> f64 {
    if ppw.is_nan() {
        SourceModel::MIN_PPW
    } else {
        ppw.clamp(SourceModel::MIN_PPW, SourceModel::MAX_PPW)
    }
}
