//! Field extrema and energy integrals.
//!
//! Energies are line densities (J/m): the sum over cells of the energy
//! density times the cell area `Δ²`.
//!
//! Ez after a step sits at time `n+1` and H at `n+½`. The magnetic term
//! pairs the stored H with the H of the following half step, so that in a
//! lossless medium with PEC or periodic walls the total is constant from
//! step to step.

use tmz_core::constants::{VACUUM_PERMEABILITY, VACUUM_PERMITTIVITY};
use tmz_core::Axis;

use crate::boundary::BoundaryConditions;
use crate::fields::FieldGrid;
use crate::medium::DampingMedium;

/// Smallest Ez value.
pub fn minimum_ez(grid: &FieldGrid<'_>) -> f64 {
    grid.ez().iter().copied().fold(f64::INFINITY, f64::min)
}

/// Largest Ez value.
pub fn maximum_ez(grid: &FieldGrid<'_>) -> f64 {
    grid.ez().iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// `Σ ½·ε0·εr·Ez²·Δ²`.
pub fn electric_energy(grid: &FieldGrid<'_>, medium: &DampingMedium, delta: f64) -> f64 {
    let sum: f64 = grid.ez().iter().map(|e| e * e).sum();
    0.5 * VACUUM_PERMITTIVITY * medium.eps_r() * sum * delta * delta
}

/// `Σ ½·μ0·μr·(Hⁿ⁺½·Hⁿ⁺³ᐟ²)·Δ²`, the next-half-step H taken from the
/// current Ez under `boundaries`.
pub fn magnetic_energy(
    grid: &FieldGrid<'_>,
    medium: &DampingMedium,
    boundaries: &BoundaryConditions,
    delta: f64,
) -> f64 {
    let sum = grid.magnetic_overlap(boundaries.wraps(Axis::X), boundaries.wraps(Axis::Y));
    0.5 * VACUUM_PERMEABILITY * medium.mu_r() * sum * delta * delta
}

/// All diagnostics from one pass over the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSummary {
    /// Smallest Ez.
    pub min_ez: f64,
    /// Largest Ez.
    pub max_ez: f64,
    /// Electric energy per unit length.
    pub energy_e: f64,
    /// Magnetic energy per unit length.
    pub energy_b: f64,
}

impl FieldSummary {
    /// Scan the grid.
    pub fn scan(
        grid: &FieldGrid<'_>,
        medium: &DampingMedium,
        boundaries: &BoundaryConditions,
        delta: f64,
    ) -> Self {
        Self {
            min_ez: minimum_ez(grid),
            max_ez: maximum_ez(grid),
            energy_e: electric_energy(grid, medium, delta),
            energy_b: magnetic_energy(grid, medium, boundaries, delta),
        }
    }

    /// Electric plus magnetic energy.
    pub fn total_energy(&self) -> f64 {
        self.energy_e + self.energy_b
    }
}
