//! Host-facing simulator for the TMz solver.
//!
//! A [`Simulator`] owns one [`MemoryArena`](tmz_arena::MemoryArena), the
//! [`Solver`](tmz_solver::Solver) whose state lives in it, and an optional
//! pixel buffer reserved after the solver region. Hosts drive it either
//! through direct method calls or by dispatching
//! [`SolverCommand`](tmz_core::SolverCommand) values via
//! [`Simulator::apply`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod simulator;

pub use config::SimulatorConfig;
pub use error::SimError;
pub use simulator::{ImageBuffer, Simulator};
