//! Core types, constants, and errors for the TMz FDTD solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: physical
//! constants, boundary and source enums, error types, and the
//! [`SolverCommand`] enum that hosts use to drive solver mutators.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod constants;
pub mod error;
pub mod id;

pub use command::SolverCommand;
pub use error::{ConfigError, SolverError, StepError};
pub use id::{Axis, BoundaryKind, Injection, SourceKind, StepCount};
