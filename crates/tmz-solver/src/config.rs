//! Solver configuration and validation.

use tmz_core::constants::{DEFAULT_COURANT_FACTOR, MAX_COURANT_FACTOR_2D};
use tmz_core::{ConfigError, Injection, SourceKind};

/// Initial state of the point source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    /// Waveform. Default: [`SourceKind::Mono`].
    pub kind: SourceKind,
    /// Injection mode. Default: [`Injection::Additive`].
    pub injection: Injection,
    /// Points per wavelength. Default: 30. Clamped to
    /// [`SourceModel::MIN_PPW`](crate::SourceModel::MIN_PPW)..=
    /// [`SourceModel::MAX_PPW`](crate::SourceModel::MAX_PPW).
    pub ppw: f64,
    /// Peak waveform value. Default: 1.
    pub amplitude: f64,
    /// Ricker pulse delay in periods. Default: 2.
    pub delay_multiplier: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Mono,
            injection: Injection::Additive,
            ppw: 30.0,
            amplitude: 1.0,
            delay_multiplier: 2.0,
        }
    }
}

/// Everything fixed for the lifetime of a [`Solver`](crate::Solver).
///
/// Cell size and origin are not part of this struct; they are supplied to
/// [`Solver::init`](crate::Solver::init) and may change on re-init.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Cells along x. Default: 200.
    pub nx: u32,
    /// Cells along y. Default: 120.
    pub ny: u32,
    /// Courant factor `S = c0·dt/Δ`. Must lie in `(0, 1/√2]`.
    pub courant_factor: f64,
    /// Halfband filter half-width `K`. Default: 5.
    pub filter_half_width: usize,
    /// Source defaults, restored on every init.
    pub source: SourceConfig,
}

impl SolverConfig {
    /// Largest supported halfband filter half-width.
    pub const MAX_FILTER_HALF_WIDTH: usize = 64;

    /// Default configuration for an `nx` × `ny` grid.
    pub fn new(nx: u32, ny: u32) -> Self {
        Self {
            nx,
            ny,
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::EmptyGrid {
                nx: self.nx,
                ny: self.ny,
            });
        }
        let s = self.courant_factor;
        if !(s > 0.0 && s <= MAX_COURANT_FACTOR_2D) {
            return Err(ConfigError::CourantOutOfRange {
                value: s,
                max: MAX_COURANT_FACTOR_2D,
            });
        }
        if self.filter_half_width == 0 || self.filter_half_width > Self::MAX_FILTER_HALF_WIDTH {
            return Err(ConfigError::InvalidFilterWidth {
                value: self.filter_half_width,
            });
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            nx: 200,
            ny: 120,
            courant_factor: DEFAULT_COURANT_FACTOR,
            filter_half_width: 5,
            source: SourceConfig::default(),
        }
    }
}
