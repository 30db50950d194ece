//! C-compatible status codes.
//!
//! [`TmzStatus`] is a `repr(i32)` enum covering every error the simulator
//! can report. Conversions from each Rust error type are provided.

use tmz_arena::ArenaError;
use tmz_core::{ConfigError, StepError};
use tmz_engine::SimError;
use tmz_render::RenderError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TmzStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null, out of range, or otherwise invalid.
    InvalidArgument = -2,
    /// Configuration or geometry was rejected.
    ConfigError = -3,
    /// The solver has not been initialised.
    NotInitialized = -4,
    /// A region handle no longer belongs to the arena.
    StaleRegion = -5,
    /// The arena has no room for the requested buffer.
    AllocationFailed = -6,
    /// A buffer is smaller than the requested image.
    BufferTooSmall = -7,
    /// No image buffer has been reserved.
    NoImageBuffer = -8,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -9,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&ConfigError> for TmzStatus {
    fn from(_e: &ConfigError) -> Self {
        TmzStatus::ConfigError
    }
}

impl From<&StepError> for TmzStatus {
    fn from(e: &StepError) -> Self {
        match e {
            StepError::NotInitialized => TmzStatus::NotInitialized,
            StepError::StaleRegion => TmzStatus::StaleRegion,
        }
    }
}

impl From<&ArenaError> for TmzStatus {
    fn from(e: &ArenaError) -> Self {
        match e {
            ArenaError::CapacityExceeded { .. } => TmzStatus::AllocationFailed,
            ArenaError::UnknownRegion { .. } => TmzStatus::StaleRegion,
            ArenaError::UnsupportedAlignment { .. } | ArenaError::ZeroSized => {
                TmzStatus::InvalidArgument
            }
        }
    }
}

impl From<&RenderError> for TmzStatus {
    fn from(e: &RenderError) -> Self {
        match e {
            RenderError::EmptyImage { .. } => TmzStatus::InvalidArgument,
            RenderError::BufferTooSmall { .. } => TmzStatus::BufferTooSmall,
        }
    }
}

impl From<&SimError> for TmzStatus {
    fn from(e: &SimError) -> Self {
        match e {
            SimError::Config(e) => e.into(),
            SimError::Step(e) => e.into(),
            SimError::Arena(e) => e.into(),
            SimError::Render(e) => e.into(),
            SimError::BufferTooSmall { .. } => TmzStatus::BufferTooSmall,
            SimError::NoImageBuffer => TmzStatus::NoImageBuffer,
        }
    }
}

impl From<SimError> for TmzStatus {
    fn from(e: SimError) -> Self {
        TmzStatus::from(&e)
    }
}
