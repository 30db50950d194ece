//! C-compatible host commands.
//!
//! [`TmzCommand`] is a flat struct whose fields are read according to
//! `command_type`; it converts to a [`SolverCommand`] at the boundary.

use tmz_core::SolverCommand;

use crate::status::TmzStatus;
use crate::types::{axis_from_raw, boundary_from_raw, source_kind_from_raw};

/// Command discriminator.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TmzCommandType {
    /// Advance one timestep.
    Step = 0,
    /// Zero fields and restart source timing.
    Reset = 1,
    /// Set `axis` to boundary `kind`.
    SetBoundary = 2,
    /// Advance `axis` to its next boundary policy.
    CycleBoundary = 3,
    /// Remove all loss.
    SetVacuum = 4,
    /// Uniform loss with skin length `x`.
    SetDamping = 5,
    /// Shift the source by `(x, y)` meters.
    MoveSource = 6,
    /// Place the source at `(x, y)` meters.
    PlaceSource = 7,
    /// Select waveform `kind`.
    SetSourceKind = 8,
    /// Change points per wavelength by `x`.
    TuneSource = 9,
    /// Additive injection when `flag` is non-zero.
    SetSourceAdditive = 10,
    /// Gaussian bump at fractional cell `(x, y)`.
    DropGaussian = 11,
    /// Halfband-filter Ez once.
    ApplyHalfbandFilter = 12,
}

/// Flat C-compatible command.
///
/// Fields not used by `command_type` are ignored.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct TmzCommand {
    /// [`TmzCommandType`] value, stored raw so that an invalid
    /// discriminator from C is rejected instead of being UB.
    pub command_type: i32,
    /// [`TmzAxis`](crate::types::TmzAxis) value.
    pub axis: i32,
    /// [`TmzBoundary`](crate::types::TmzBoundary) or
    /// [`TmzSourceKind`](crate::types::TmzSourceKind) value.
    pub kind: i32,
    /// Boolean argument.
    pub flag: u8,
    /// First scalar argument.
    pub x: f64,
    /// Second scalar argument.
    pub y: f64,
}

/// Convert a C command.
pub(crate) fn convert_command(cmd: &TmzCommand) -> Result<SolverCommand, TmzStatus> {
    use TmzCommandType as T;
    let t = cmd.command_type;
    let command = match t {
        x if x == T::Step as i32 => SolverCommand::Step,
        x if x == T::Reset as i32 => SolverCommand::Reset,
        x if x == T::SetBoundary as i32 => SolverCommand::SetBoundary {
            axis: axis_from_raw(cmd.axis)?,
            kind: boundary_from_raw(cmd.kind)?,
        },
        x if x == T::CycleBoundary as i32 => SolverCommand::CycleBoundary {
            axis: axis_from_raw(cmd.axis)?,
        },
        x if x == T::SetVacuum as i32 => SolverCommand::SetVacuum,
        x if x == T::SetDamping as i32 => SolverCommand::SetDamping { skin_length: cmd.x },
        x if x == T::MoveSource as i32 => SolverCommand::MoveSource { dx: cmd.x, dy: cmd.y },
        x if x == T::PlaceSource as i32 => SolverCommand::PlaceSource { x: cmd.x, y: cmd.y },
        x if x == T::SetSourceKind as i32 => {
            SolverCommand::SetSourceKind(source_kind_from_raw(cmd.kind)?)
        }
        x if x == T::TuneSource as i32 => SolverCommand::TuneSource { delta_ppw: cmd.x },
        x if x == T::SetSourceAdditive as i32 => SolverCommand::SetSourceAdditive(cmd.flag != 0),
        x if x == T::DropGaussian as i32 => SolverCommand::DropGaussian { x: cmd.x, y: cmd.y },
        x if x == T::ApplyHalfbandFilter as i32 => SolverCommand::ApplyHalfbandFilter,
        _ => return Err(TmzStatus::InvalidArgument),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tmz_core::{Axis, BoundaryKind, SourceKind};

    fn cmd(command_type: TmzCommandType) -> TmzCommand {
        TmzCommand {
            command_type: command_type as i32,
            ..TmzCommand::default()
        }
    }

    #[test]
    fn converts_boundary_command() {
        let c = TmzCommand {
            axis: 1,
            kind: 0,
            ..cmd(TmzCommandType::SetBoundary)
        };
        assert_eq!(
            convert_command(&c),
            Ok(SolverCommand::SetBoundary {
                axis: Axis::Y,
                kind: BoundaryKind::Periodic
            })
        );
    }

    #[test]
    fn converts_scalar_commands() {
        let c = TmzCommand {
            x: 1.5,
            y: -2.0,
            ..cmd(TmzCommandType::MoveSource)
        };
        assert_eq!(
            convert_command(&c),
            Ok(SolverCommand::MoveSource { dx: 1.5, dy: -2.0 })
        );
        let c = TmzCommand {
            kind: 4,
            ..cmd(TmzCommandType::SetSourceKind)
        };
        assert_eq!(
            convert_command(&c),
            Ok(SolverCommand::SetSourceKind(SourceKind::Sawtooth))
        );
        let c = TmzCommand {
            flag: 1,
            ..cmd(TmzCommandType::SetSourceAdditive)
        };
        assert_eq!(convert_command(&c), Ok(SolverCommand::SetSourceAdditive(true)));
    }

    #[test]
    fn rejects_bad_discriminators() {
        let c = TmzCommand {
            command_type: 99,
            ..TmzCommand::default()
        };
        assert_eq!(convert_command(&c), Err(TmzStatus::InvalidArgument));
        let c = TmzCommand {
            axis: 5,
            ..cmd(TmzCommandType::CycleBoundary)
        };
        assert_eq!(convert_command(&c), Err(TmzStatus::InvalidArgument));
    }

    proptest! {
        #[test]
        fn arbitrary_codes_convert_or_reject(
            command_type in -4i32..20,
            axis in -2i32..4,
            kind in -2i32..7,
            flag: u8,
            x in -1e3f64..1e3,
            y in -1e3f64..1e3,
        ) {
            let c = TmzCommand { command_type, axis, kind, flag, x, y };
            match convert_command(&c) {
                Ok(_) => prop_assert!((0..=12).contains(&command_type)),
                Err(status) => prop_assert_eq!(status, TmzStatus::InvalidArgument),
            }
        }
    }
}
