//! C-compatible enums for axes, boundary policies and source waveforms.
//!
//! Exports take these as raw `i32` so that an out-of-range value from C
//! is rejected with `InvalidArgument` rather than being undefined behavior.

use tmz_core::{Axis, BoundaryKind, SourceKind};

use crate::status::TmzStatus;

/// Grid axis.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TmzAxis {
    /// Columns.
    X = 0,
    /// Rows.
    Y = 1,
}

/// Edge policy of one axis.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TmzBoundary {
    /// Opposite edges are neighbours.
    Periodic = 0,
    /// First-order Mur absorbing edges.
    Absorbing = 1,
    /// Perfect electric conductor.
    Pec = 2,
}

/// Source waveform.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TmzSourceKind {
    /// No injection.
    Off = 0,
    /// Sine.
    Mono = 1,
    /// Repeating Ricker wavelet.
    Ricker = 2,
    /// Square wave.
    Square = 3,
    /// Sawtooth.
    Sawtooth = 4,
}

pub(crate) fn axis_from_raw(raw: i32) -> Result<Axis, TmzStatus> {
    match raw {
        x if x == TmzAxis::X as i32 => Ok(Axis::X),
        x if x == TmzAxis::Y as i32 => Ok(Axis::Y),
        _ => Err(TmzStatus::InvalidArgument),
    }
}

pub(crate) fn boundary_from_raw(raw: i32) -> Result<BoundaryKind, TmzStatus> {
    match raw {
        x if x == TmzBoundary::Periodic as i32 => Ok(BoundaryKind::Periodic),
        x if x == TmzBoundary::Absorbing as i32 => Ok(BoundaryKind::Absorbing),
        x if x == TmzBoundary::Pec as i32 => Ok(BoundaryKind::Pec),
        _ => Err(TmzStatus::InvalidArgument),
    }
}

pub(crate) fn boundary_to_raw(kind: BoundaryKind) -> i32 {
    match kind {
        BoundaryKind::Periodic => TmzBoundary::Periodic as i32,
        BoundaryKind::Absorbing => TmzBoundary::Absorbing as i32,
        BoundaryKind::Pec => TmzBoundary::Pec as i32,
    }
}

pub(crate) fn source_kind_from_raw(raw: i32) -> Result<SourceKind, TmzStatus> {
    match raw {
        x if x == TmzSourceKind::Off as i32 => Ok(SourceKind::Off),
        x if x == TmzSourceKind::Mono as i32 => Ok(SourceKind::Mono),
        x if x == TmzSourceKind::Ricker as i32 => Ok(SourceKind::Ricker),
        x if x == TmzSourceKind::Square as i32 => Ok(SourceKind::Square),
        x if x == TmzSourceKind::Sawtooth as i32 => Ok(SourceKind::Sawtooth),
        _ => Err(TmzStatus::InvalidArgument),
    }
}

pub(crate) fn source_kind_to_raw(kind: SourceKind) -> i32 {
    match kind {
        SourceKind::Off => TmzSourceKind::Off as i32,
        SourceKind::Mono => TmzSourceKind::Mono as i32,
        SourceKind::Ricker => TmzSourceKind::Ricker as i32,
        SourceKind::Square => TmzSourceKind::Square as i32,
        SourceKind::Sawtooth => TmzSourceKind::Sawtooth as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_codes_map_both_ways() {
        for kind in [BoundaryKind::Periodic, BoundaryKind::Absorbing, BoundaryKind::Pec] {
            assert_eq!(boundary_from_raw(boundary_to_raw(kind)), Ok(kind));
        }
        assert_eq!(boundary_from_raw(3), Err(TmzStatus::InvalidArgument));
    }

    #[test]
    fn source_codes_map_both_ways() {
        for kind in [
            SourceKind::Off,
            SourceKind::Mono,
            SourceKind::Ricker,
            SourceKind::Square,
            SourceKind::Sawtooth,
        ] {
            assert_eq!(source_kind_from_raw(source_kind_to_raw(kind)), Ok(kind));
        }
        assert!(source_kind_from_raw(-1).is_err());
    }

    #[test]
    fn axis_codes() {
        assert_eq!(axis_from_raw(0), Ok(Axis::X));
        assert_eq!(axis_from_raw(1), Ok(Axis::Y));
        assert!(axis_from_raw(2).is_err());
    }
}
