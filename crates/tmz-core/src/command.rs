//! Host commands that drive solver mutators.
//!
//! Hosts translate their own input (keys, clicks, scripted scenarios) into
//! [`SolverCommand`] values; the engine dispatches each one to the
//! matching solver setter. How input maps to commands is up to the host.

use crate::id::{Axis, BoundaryKind, SourceKind};

/// A single mutation request for a running solver.
///
/// Positions and shifts for the source are physical coordinates in
/// meters. `DropGaussian` takes fractional cell indices.
///
/// # Examples
///
/// ```
/// use tmz_core::{Axis, BoundaryKind, SolverCommand, SourceKind};
///
/// let script = vec![
///     SolverCommand::SetBoundary { axis: Axis::X, kind: BoundaryKind::Periodic },
///     SolverCommand::SetSourceKind(SourceKind::Ricker),
///     SolverCommand::TuneSource { delta_ppw: -1.0 },
///     SolverCommand::MoveSource { dx: 1.0e-3, dy: 0.0 },
/// ];
///
/// assert!(script.iter().all(|c| !c.is_step()));
/// assert!(SolverCommand::Step.is_step());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SolverCommand {
    /// Advance one leapfrog cycle.
    Step,
    /// Zero all fields and restart source timing.
    Reset,
    /// Set the boundary policy for one axis.
    SetBoundary {
        /// The axis to configure.
        axis: Axis,
        /// The new policy.
        kind: BoundaryKind,
    },
    /// Advance one axis to the next policy in the cycle.
    CycleBoundary {
        /// The axis to cycle.
        axis: Axis,
    },
    /// Make the medium lossless.
    SetVacuum,
    /// Make the medium uniformly lossy with the given skin length.
    SetDamping {
        /// Skin length in grid points.
        skin_length: f64,
    },
    /// Shift the source by a physical offset, clamped to the grid.
    MoveSource {
        /// Shift along x, in meters.
        dx: f64,
        /// Shift along y, in meters.
        dy: f64,
    },
    /// Place the source at a physical coordinate, snapped and clamped.
    PlaceSource {
        /// Target x, in meters.
        x: f64,
        /// Target y, in meters.
        y: f64,
    },
    /// Select the source waveform.
    SetSourceKind(SourceKind),
    /// Change points-per-wavelength by a signed increment.
    TuneSource {
        /// Increment in points per wavelength.
        delta_ppw: f64,
    },
    /// Select additive (`true`) or hardwired (`false`) injection.
    SetSourceAdditive(bool),
    /// Add a Gaussian bump to Ez centred at fractional cell indices.
    DropGaussian {
        /// Centre column.
        x: f64,
        /// Centre row.
        y: f64,
    },
    /// Run the halfband low-pass filter over Ez once.
    ApplyHalfbandFilter,
}

impl SolverCommand {
    /// Whether this command advances simulated time.
    pub fn is_step(&self) -> bool {
        matches!(self, Self::Step)
    }
}
