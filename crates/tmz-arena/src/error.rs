//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Not enough free space left for the reservation.
    CapacityExceeded {
        /// Number of bytes requested (including alignment padding).
        requested: usize,
        /// Number of bytes still free.
        available: usize,
    },
    /// Alignment is not a power of two or exceeds the storage word size.
    UnsupportedAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// A zero-sized reservation was requested.
    ZeroSized,
    /// No region starts at this offset.
    UnknownRegion {
        /// The offset that was looked up.
        offset: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                available,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, {available} bytes available"
                )
            }
            Self::UnsupportedAlignment { align } => {
                write!(f, "unsupported region alignment {align}")
            }
            Self::ZeroSized => write!(f, "zero-sized region requested"),
            Self::UnknownRegion { offset } => {
                write!(f, "no region registered at offset {offset}")
            }
        }
    }
}

impl Error for ArenaError {}
