//! Placement of solver state inside its arena region.
//!
//! The region is one contiguous run of `f64` values:
//!
//! | Block | Length |
//! |-------|--------|
//! | Ez, Hx, Hy | `nx·ny` each |
//! | ceze, cezh, chxe, chye | `nx·ny` each |
//! | x coordinates | `nx` |
//! | y coordinates | `ny` |
//! | x-edge history | `4·ny` |
//! | y-edge history | `4·nx` |
//! | filter line buffer | `max(nx, ny)` |

use tmz_arena::RegionLayout;
use tmz_core::ConfigError;

/// Block sizes of the solver region for a fixed grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverLayout {
    nx: usize,
    ny: usize,
}

impl SolverLayout {
    /// Field arrays per cell (Ez, Hx, Hy).
    pub const FIELD_ARRAYS: usize = 3;
    /// Coefficient arrays per cell (ceze, cezh, chxe, chye).
    pub const COEFFICIENT_ARRAYS: usize = 4;
    /// History values per boundary line: edge and neighbour, both sides.
    pub const HISTORY_PER_LINE: usize = 4;

    /// Layout for an `nx` × `ny` grid.
    pub fn new(nx: u32, ny: u32) -> Self {
        Self {
            nx: nx as usize,
            ny: ny as usize,
        }
    }

    /// Cells along x.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Cells along y.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Cells in the grid.
    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Values of x-edge history (one entry per row).
    pub fn x_history_len(&self) -> usize {
        Self::HISTORY_PER_LINE * self.ny
    }

    /// Values of y-edge history (one entry per column).
    pub fn y_history_len(&self) -> usize {
        Self::HISTORY_PER_LINE * self.nx
    }

    /// Length of the filter line buffer.
    pub fn line_len(&self) -> usize {
        self.nx.max(self.ny)
    }

    /// Total `f64` values in the region, `None` on overflow.
    pub fn value_count(&self) -> Option<usize> {
        let cells = self.nx.checked_mul(self.ny)?;
        let per_cell = cells.checked_mul(Self::FIELD_ARRAYS + Self::COEFFICIENT_ARRAYS)?;
        per_cell
            .checked_add(self.nx + self.ny)?
            .checked_add(self.x_history_len() + self.y_history_len())?
            .checked_add(self.line_len())
    }

    /// Region size in bytes, `None` on overflow.
    pub fn byte_size(&self) -> Option<usize> {
        self.value_count()?.checked_mul(std::mem::size_of::<f64>())
    }

    /// Arena layout of the region.
    pub fn region_layout(&self) -> Result<RegionLayout, ConfigError> {
        let too_big = ConfigError::ArenaTooSmall {
            required: usize::MAX,
            capacity: 0,
        };
        let count = self.value_count().ok_or(too_big.clone())?;
        RegionLayout::array::<f64>(count).map_err(|_| too_big)
    }
}
