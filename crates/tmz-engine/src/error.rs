//! Simulator error type.

use std::error::Error;
use std::fmt;

use tmz_arena::ArenaError;
use tmz_core::{ConfigError, SolverError, StepError};
use tmz_render::RenderError;

/// Errors returned by [`Simulator`](crate::Simulator) operations.
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// Invalid configuration or geometry.
    Config(ConfigError),
    /// A field operation could not run.
    Step(StepError),
    /// A host buffer could not be reserved.
    Arena(ArenaError),
    /// Rasterisation failed.
    Render(RenderError),
    /// The reserved image buffer is smaller than the requested image.
    BufferTooSmall {
        /// Pixels needed.
        required: usize,
        /// Pixels reserved.
        provided: usize,
    },
    /// No image buffer has been reserved yet.
    NoImageBuffer,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Step(e) => write!(f, "step: {e}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "image buffer holds {provided} pixels, {required} requested"
                )
            }
            Self::NoImageBuffer => write!(f, "no image buffer reserved"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
            Self::Arena(e) => Some(e),
            Self::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for SimError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

impl From<ArenaError> for SimError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<RenderError> for SimError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl From<SolverError> for SimError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Config(e) => Self::Config(e),
            SolverError::Step(e) => Self::Step(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_error_flattens() {
        let e: SimError = SolverError::Step(StepError::NotInitialized).into();
        assert_eq!(e, SimError::Step(StepError::NotInitialized));
        let e: SimError = SolverError::Config(ConfigError::EmptyGrid { nx: 0, ny: 0 }).into();
        assert!(matches!(e, SimError::Config(_)));
    }

    #[test]
    fn wrapped_errors_expose_source() {
        let e = SimError::from(StepError::StaleRegion);
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("step: "));
        assert!(SimError::NoImageBuffer.source().is_none());
    }
}
