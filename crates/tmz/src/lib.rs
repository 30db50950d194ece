//! TMz: a 2-D finite-difference time-domain solver for the transverse
//! magnetic (Ez, Hx, Hy) polarisation of Maxwell's equations.
//!
//! This is the facade crate that re-exports the public API of the TMz
//! sub-crates. For most users, adding `tmz` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tmz::prelude::*;
//!
//! // A 64×48 grid of 1 mm cells with absorbing edges.
//! let mut sim = Simulator::new(SimulatorConfig::new(64, 48)).unwrap();
//! sim.init_solver(0.0, 0.0, 1e-3).unwrap();
//! sim.apply_all([
//!     SolverCommand::SetBoundary { axis: Axis::X, kind: BoundaryKind::Absorbing },
//!     SolverCommand::SetBoundary { axis: Axis::Y, kind: BoundaryKind::Absorbing },
//!     SolverCommand::SetSourceKind(SourceKind::Ricker),
//! ])
//! .unwrap();
//! sim.run(50).unwrap();
//! assert!(sim.total_energy().unwrap() > 0.0);
//!
//! // Rasterise Ez into a 160×120 RGBA buffer inside the arena.
//! sim.init_data_buffer(160, 120).unwrap();
//! sim.render_ez(160, 120, RenderOptions::default()).unwrap();
//! assert_eq!(sim.image_pixels().unwrap().len(), 160 * 120);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tmz-core` | Constants, axis/boundary/source enums, commands, errors |
//! | [`arena`] | `tmz-arena` | Word-aligned memory arena and regions |
//! | [`solver`] | `tmz-solver` | Yee grid, boundaries, source, medium, filter, diagnostics |
//! | [`render`] | `tmz-render` | Colormaps and Ez rasterisation |
//! | [`engine`] | `tmz-engine` | The host-facing [`Simulator`](engine::Simulator) |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Physical constants, IDs, commands and error types (`tmz-core`).
pub use tmz_core as types;

/// Word-aligned memory arena (`tmz-arena`).
///
/// The solver region and image buffers are carved from one
/// [`arena::MemoryArena`].
pub use tmz_arena as arena;

/// Field update kernels and solver state (`tmz-solver`).
pub use tmz_solver as solver;

/// Colormaps and rasterisation (`tmz-render`).
pub use tmz_render as render;

/// The host-facing simulator (`tmz-engine`).
pub use tmz_engine as engine;

/// Common imports for typical TMz usage.
///
/// ```rust
/// use tmz::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tmz_core::{Axis, BoundaryKind, Injection, SolverCommand, SourceKind};

    // Errors
    pub use tmz_core::{ConfigError, SolverError, StepError};

    // Solver
    pub use tmz_solver::{FieldGrid, FieldSummary, GridGeometry, StepMetrics};

    // Rendering
    pub use tmz_render::{ColorRange, Colormap, RenderOptions};

    // Engine
    pub use tmz_engine::{ImageBuffer, SimError, Simulator, SimulatorConfig};
}
