//! Simulator configuration and validation.
//!
//! [`SimulatorConfig`] fixes everything chosen once per simulator: grid
//! size, arena capacity, Courant factor and filter width. Cell size and
//! origin are runtime parameters of
//! [`Simulator::init_solver`](crate::Simulator::init_solver).

use tmz_arena::ArenaConfig;
use tmz_core::constants::DEFAULT_COURANT_FACTOR;
use tmz_core::ConfigError;
use tmz_solver::{SolverConfig, SolverLayout, SourceConfig};

/// Creation-time parameters for a [`Simulator`](crate::Simulator).
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    /// Cells along x. Default: 200.
    pub nx: u32,
    /// Cells along y. Default: 120.
    pub ny: u32,
    /// Arena capacity in bytes. Default: 512 pages of 64 KiB.
    pub arena_bytes: usize,
    /// Courant factor. Default: `1/√2`.
    pub courant_factor: f64,
    /// Halfband filter half-width. Default: 5.
    pub filter_half_width: usize,
    /// Source settings restored on every init.
    pub source: SourceConfig,
}

impl SimulatorConfig {
    /// Default configuration for an `nx` × `ny` grid.
    pub fn new(nx: u32, ny: u32) -> Self {
        Self {
            nx,
            ny,
            ..Self::default()
        }
    }

    /// Solver half of this configuration.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            nx: self.nx,
            ny: self.ny,
            courant_factor: self.courant_factor,
            filter_half_width: self.filter_half_width,
            source: self.source.clone(),
        }
    }

    /// Arena half of this configuration.
    pub fn arena_config(&self) -> ArenaConfig {
        ArenaConfig::new(self.arena_bytes)
    }

    /// Check the solver parameters and that the arena can hold the
    /// solver region.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver_config().validate()?;
        let capacity = self.arena_config().usable_bytes();
        let required = SolverLayout::new(self.nx, self.ny)
            .byte_size()
            .unwrap_or(usize::MAX);
        if required > capacity {
            return Err(ConfigError::ArenaTooSmall { required, capacity });
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            nx: 200,
            ny: 120,
            arena_bytes: ArenaConfig::default().capacity_bytes,
            courant_factor: DEFAULT_COURANT_FACTOR,
            filter_half_width: 5,
            source: SourceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SimulatorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.arena_bytes, 512 * 65_536);
        assert_eq!(cfg.solver_config(), SolverConfig::default());
    }

    #[test]
    fn small_arena_rejected() {
        let cfg = SimulatorConfig {
            arena_bytes: 1024,
            ..SimulatorConfig::new(64, 64)
        };
        match cfg.validate() {
            Err(ConfigError::ArenaTooSmall { required, capacity }) => {
                assert_eq!(capacity, 1024);
                assert!(required > capacity);
            }
            other => panic!("expected ArenaTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn solver_errors_surface() {
        let cfg = SimulatorConfig::new(0, 10);
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyGrid { nx: 0, ny: 10 }));
        let cfg = SimulatorConfig {
            courant_factor: 1.0,
            ..SimulatorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::CourantOutOfRange { .. })
        ));
    }

    #[test]
    fn huge_grid_reports_overflow_as_too_small() {
        let cfg = SimulatorConfig::new(u32::MAX, u32::MAX);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ArenaTooSmall { .. })
        ));
    }
}
