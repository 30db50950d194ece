//! Benchmark profiles for the TMz solver.
//!
//! - [`reference_profile`]: 256x256 grid (65K cells), absorbing edges
//! - [`stress_profile`]: 1024x1024 grid (~1M cells)
//! - [`ready_simulator`]: an initialised simulator with a pulse in flight

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tmz_arena::ArenaConfig;
use tmz_core::{Axis, BoundaryKind, SourceKind};
use tmz_engine::{Simulator, SimulatorConfig};
use tmz_solver::SolverLayout;

/// Cell size used by every profile, in meters.
pub const BENCH_CELL_SIZE: f64 = 1e-3;

/// Pixel headroom reserved beyond the solver region for image buffers.
const IMAGE_HEADROOM_BYTES: usize = 4 * 1024 * 1024;

/// Configuration for an `nx` × `ny` grid with an arena sized to fit the
/// solver and a render target.
pub fn profile(nx: u32, ny: u32) -> SimulatorConfig {
    let solver_bytes = SolverLayout::new(nx, ny).byte_size().unwrap_or(0);
    let pages = (solver_bytes + IMAGE_HEADROOM_BYTES).div_ceil(ArenaConfig::PAGE_BYTES);
    SimulatorConfig {
        arena_bytes: ArenaConfig::pages(pages).capacity_bytes,
        ..SimulatorConfig::new(nx, ny)
    }
}

/// 256x256 grid (65K cells).
pub fn reference_profile() -> SimulatorConfig {
    profile(256, 256)
}

/// 1024x1024 grid (~1M cells).
pub fn stress_profile() -> SimulatorConfig {
    profile(1024, 1024)
}

/// Create and initialise a simulator from `config` with absorbing edges,
/// a Ricker source and a Gaussian already propagating.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn ready_simulator(config: SimulatorConfig) -> Simulator {
    let (nx, ny) = (config.nx, config.ny);
    let mut sim = Simulator::new(config).unwrap();
    sim.init_solver(0.0, 0.0, BENCH_CELL_SIZE).unwrap();
    sim.set_boundary(Axis::X, BoundaryKind::Absorbing);
    sim.set_boundary(Axis::Y, BoundaryKind::Absorbing);
    sim.set_source_kind(SourceKind::Ricker);
    sim.drop_gaussian(f64::from(nx) / 3.0, f64::from(ny) / 3.0)
        .unwrap();
    sim.run(20).unwrap();
    sim
}
