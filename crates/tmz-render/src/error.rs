//! Rendering errors.

use std::error::Error;
use std::fmt;

/// Errors from rasterisation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// Image width or height is zero.
    EmptyImage {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// Pixel buffer holds fewer than `width·height` pixels.
    BufferTooSmall {
        /// Pixels needed.
        required: usize,
        /// Pixels available.
        provided: usize,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyImage { width, height } => {
                write!(f, "image must be non-empty, got {width}x{height}")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "pixel buffer too small: need {required} pixels, have {provided}"
                )
            }
        }
    }
}

impl Error for RenderError {}
