//! Reusable simulator fixtures.
//!
//! - [`quiet_simulator`]: initialised grid with the source switched off.
//! - [`gaussian_pulse`]: quiet grid with one Gaussian bump in Ez.
//! - [`load_column_profile`]: a y-uniform Gaussian column, i.e. a plane
//!   wave front along x.

use tmz_core::{Axis, BoundaryKind, SourceKind};
use tmz_engine::{Simulator, SimulatorConfig};

/// Cell size used by the fixtures, in meters.
pub const TEST_CELL_SIZE: f64 = 1.0e-3;

/// An initialised `nx` × `ny` simulator with no source and the given
/// boundary on both axes.
pub fn quiet_simulator(nx: u32, ny: u32, boundary: BoundaryKind) -> Simulator {
    let mut sim = Simulator::new(SimulatorConfig::new(nx, ny)).expect("fixture config is valid");
    sim.init_solver(0.0, 0.0, TEST_CELL_SIZE)
        .expect("fixture geometry is valid");
    sim.set_source_kind(SourceKind::Off);
    sim.set_boundary(Axis::X, boundary);
    sim.set_boundary(Axis::Y, boundary);
    sim
}

/// A square quiet grid with the default Gaussian dropped at its centre.
pub fn gaussian_pulse(n: u32, boundary: BoundaryKind) -> Simulator {
    let mut sim = quiet_simulator(n, n, boundary);
    let c = f64::from(n / 2);
    sim.drop_gaussian(c, c).expect("fixture is initialised");
    sim
}

/// Overwrite Ez with `exp(-(ix - x0)²/(2σ²))` on every row.
pub fn load_column_profile(sim: &mut Simulator, x0: f64, sigma: f64) {
    let nx = sim.nx() as usize;
    let ez = sim.ez_mut().expect("fixture is initialised");
    for (i, v) in ez.iter_mut().enumerate() {
        let d = (i % nx) as f64 - x0;
        *v = (-d * d / (2.0 * sigma * sigma)).exp();
    }
}

/// Electric plus magnetic energy.
pub fn total_energy(sim: &Simulator) -> f64 {
    sim.total_energy().expect("fixture is initialised")
}

/// `|b - a| / |a|`.
pub fn relative_change(a: f64, b: f64) -> f64 {
    (b - a).abs() / a.abs()
}
