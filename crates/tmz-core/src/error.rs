//! Error types for the TMz solver.
//!
//! Configuration errors are detected when a simulator is created or a
//! solver is initialised and keep the solver out of the running state.
//! Out-of-range runtime inputs are clamped, never reported, so there is no
//! error type for them.

use std::error::Error;
use std::fmt;

/// Errors detected while validating solver configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The grid has zero cells along at least one axis.
    EmptyGrid {
        /// Requested cell count along x.
        nx: u32,
        /// Requested cell count along y.
        ny: u32,
    },
    /// Cell size is NaN, infinite, zero, or negative.
    InvalidCellSize {
        /// The rejected value, in meters.
        value: f64,
    },
    /// Grid origin is NaN or infinite.
    InvalidOrigin {
        /// Origin x coordinate.
        x: f64,
        /// Origin y coordinate.
        y: f64,
    },
    /// Courant factor is outside `(0, max]` for a 2-D grid.
    CourantOutOfRange {
        /// The rejected factor.
        value: f64,
        /// The stability bound.
        max: f64,
    },
    /// The memory arena cannot hold the solver state.
    ArenaTooSmall {
        /// Bytes needed by the solver region.
        required: usize,
        /// Bytes still available in the arena.
        capacity: usize,
    },
    /// Halfband filter half-width is zero or too large for the grid.
    InvalidFilterWidth {
        /// The rejected half-width.
        value: usize,
    },
    /// Relative permittivity or permeability is not finite and positive.
    InvalidMedium {
        /// Relative permeability.
        mu_r: f64,
        /// Relative permittivity.
        eps_r: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { nx, ny } => {
                write!(f, "grid must have at least one cell per axis, got {nx}x{ny}")
            }
            Self::InvalidCellSize { value } => {
                write!(f, "cell size must be finite and > 0, got {value}")
            }
            Self::InvalidOrigin { x, y } => {
                write!(f, "grid origin must be finite, got ({x}, {y})")
            }
            Self::CourantOutOfRange { value, max } => {
                write!(f, "courant factor {value} outside stable range (0, {max}]")
            }
            Self::ArenaTooSmall { required, capacity } => {
                write!(
                    f,
                    "arena too small: solver needs {required} bytes, {capacity} bytes available"
                )
            }
            Self::InvalidFilterWidth { value } => {
                write!(f, "invalid halfband filter half-width {value}")
            }
            Self::InvalidMedium { mu_r, eps_r } => {
                write!(
                    f,
                    "relative medium parameters must be finite and > 0, got mu_r={mu_r}, eps_r={eps_r}"
                )
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors returned by solver operations that need a running solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepError {
    /// `init` has not completed successfully yet.
    NotInitialized,
    /// The solver's arena region is no longer registered with the arena
    /// it is being read from.
    StaleRegion,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "solver is not initialized"),
            Self::StaleRegion => write!(f, "solver region is not registered with this arena"),
        }
    }
}

impl Error for StepError {}

/// Any error a solver operation can return.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// Invalid configuration; the solver did not enter the running state.
    Config(ConfigError),
    /// The operation needs a running solver or a live arena region.
    Step(StepError),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Step(e) => write!(f, "step: {e}"),
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SolverError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for SolverError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_values() {
        let e = ConfigError::CourantOutOfRange { value: 0.9, max: 0.7 };
        let msg = e.to_string();
        assert!(msg.contains("0.9"), "{msg}");

        let e = ConfigError::ArenaTooSmall {
            required: 4096,
            capacity: 1024,
        };
        let msg = e.to_string();
        assert!(msg.contains("4096") && msg.contains("1024"), "{msg}");
    }

    #[test]
    fn step_error_display() {
        assert_eq!(
            StepError::NotInitialized.to_string(),
            "solver is not initialized"
        );
    }

    #[test]
    fn solver_error_wraps_source() {
        let e: SolverError = StepError::StaleRegion.into();
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("step: "));
    }
}
