//! Test fixtures for TMz solver development.
//!
//! Pre-configured simulators and initial conditions shared by the
//! integration tests and benchmarks. Fixtures panic on setup failure;
//! they are only meant for tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    gaussian_pulse, load_column_profile, quiet_simulator, relative_change, total_energy,
    TEST_CELL_SIZE,
};
