//! C-compatible simulator configuration.

use tmz_core::Injection;
use tmz_engine::SimulatorConfig;

use crate::status::TmzStatus;
use crate::types::{source_kind_from_raw, source_kind_to_raw};

/// Creation-time parameters for `tmz_simulator_create`.
///
/// Fill with [`tmz_simulator_config_default`] and override fields as
/// needed.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TmzSimulatorConfig {
    /// Cells along x.
    pub nx: u32,
    /// Cells along y.
    pub ny: u32,
    /// Arena capacity in bytes.
    pub arena_bytes: u64,
    /// Courant factor, in `(0, 1/√2]`.
    pub courant_factor: f64,
    /// Halfband filter half-width.
    pub filter_half_width: u32,
    /// Initial [`TmzSourceKind`](crate::types::TmzSourceKind).
    pub source_kind: i32,
    /// Initial points per wavelength.
    pub source_ppw: f64,
    /// Source amplitude.
    pub source_amplitude: f64,
    /// Non-zero for additive injection.
    pub source_additive: u8,
}

impl From<&SimulatorConfig> for TmzSimulatorConfig {
    fn from(c: &SimulatorConfig) -> Self {
        Self {
            nx: c.nx,
            ny: c.ny,
            arena_bytes: c.arena_bytes as u64,
            courant_factor: c.courant_factor,
            filter_half_width: c.filter_half_width as u32,
            source_kind: source_kind_to_raw(c.source.kind),
            source_ppw: c.source.ppw,
            source_amplitude: c.source.amplitude,
            source_additive: u8::from(c.source.injection.is_additive()),
        }
    }
}

impl TmzSimulatorConfig {
    pub(crate) fn to_config(self) -> Result<SimulatorConfig, TmzStatus> {
        let mut config = SimulatorConfig::new(self.nx, self.ny);
        config.arena_bytes =
            usize::try_from(self.arena_bytes).map_err(|_| TmzStatus::InvalidArgument)?;
        config.courant_factor = self.courant_factor;
        config.filter_half_width = self.filter_half_width as usize;
        config.source.kind = source_kind_from_raw(self.source_kind)?;
        config.source.ppw = self.source_ppw;
        config.source.amplitude = self.source_amplitude;
        config.source.injection = Injection::from_additive(self.source_additive != 0);
        Ok(config)
    }
}

/// Write the default configuration to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_simulator_config_default(out: *mut TmzSimulatorConfig) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return TmzStatus::InvalidArgument as i32;
        }
        // SAFETY: out is non-null and valid for writes per caller contract.
        unsafe { out.write(TmzSimulatorConfig::from(&SimulatorConfig::default())) };
        TmzStatus::Ok as i32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmz_core::SourceKind;

    #[test]
    fn default_round_trips_through_c_struct() {
        let mut raw = TmzSimulatorConfig::from(&SimulatorConfig::new(1, 1));
        assert_eq!(tmz_simulator_config_default(&mut raw), 0);
        assert_eq!((raw.nx, raw.ny), (200, 120));
        assert_eq!(raw.to_config(), Ok(SimulatorConfig::default()));
    }

    #[test]
    fn fields_are_applied() {
        let raw = TmzSimulatorConfig {
            nx: 10,
            ny: 20,
            source_kind: 2,
            source_additive: 0,
            ..TmzSimulatorConfig::from(&SimulatorConfig::default())
        };
        let config = raw.to_config().unwrap();
        assert_eq!((config.nx, config.ny), (10, 20));
        assert_eq!(config.source.kind, SourceKind::Ricker);
        assert!(!config.source.injection.is_additive());
    }

    #[test]
    fn bad_source_kind_rejected() {
        let raw = TmzSimulatorConfig {
            source_kind: 17,
            ..TmzSimulatorConfig::from(&SimulatorConfig::default())
        };
        assert_eq!(raw.to_config(), Err(TmzStatus::InvalidArgument));
    }

    #[test]
    fn null_out_rejected() {
        assert_eq!(
            tmz_simulator_config_default(std::ptr::null_mut()),
            TmzStatus::InvalidArgument as i32
        );
    }
}
