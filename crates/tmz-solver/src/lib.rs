//! 2-D TMz finite-difference time-domain solver.
//!
//! One [`Solver`] owns the state of a single NX × NY Yee grid. Field
//! arrays, update coefficients, grid coordinates and boundary history all
//! live in one region of a caller-supplied [`MemoryArena`](tmz_arena::MemoryArena);
//! the solver itself only holds scalar state and the region handle.
//!
//! # Step order
//!
//! 1. Hx, Hy from the curl of Ez (interior).
//! 2. H edge treatment, X then Y.
//! 3. Absorbing-edge history capture.
//! 4. Ez from the curl of H (interior, then periodic edges).
//! 5. Source injection.
//! 6. Ez edge treatment, X then Y. Corner cells follow the Y policy.
//! 7. Source phase, step count and simulated time advance.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod fields;
pub mod filter;
pub mod geometry;
pub mod layout;
pub mod medium;
pub mod metrics;
pub mod solver;
pub mod source;

pub use boundary::BoundaryConditions;
pub use config::{SolverConfig, SourceConfig};
pub use diagnostics::FieldSummary;
pub use fields::{FieldGrid, FieldGridMut};
pub use filter::{FilterEdge, HalfbandFilter};
pub use geometry::GridGeometry;
pub use layout::SolverLayout;
pub use medium::{DampingMedium, UpdateCoefficients};
pub use metrics::StepMetrics;
pub use solver::Solver;
pub use source::SourceModel;
