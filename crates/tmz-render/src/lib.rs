//! Rendering adapter for the TMz solver.
//!
//! Converts the Ez array into packed RGBA pixels, either through a
//! perceptual colormap or as grayscale. Nothing here writes to solver
//! state; the adapter only reads a [`FieldGrid`](tmz_solver::FieldGrid).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod colormap;
pub mod error;
pub mod raster;

pub use colormap::{pack_rgba, ColorLut, Colormap};
pub use error::RenderError;
pub use raster::{render_ez, render_test_pattern, ColorRange, RenderOptions};
