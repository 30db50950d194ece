//! Grid geometry: cell counts, cell size, origin and time step.

use tmz_core::constants::vacuum_velocity;
use tmz_core::ConfigError;

/// Mapping between cell indices and physical coordinates.
///
/// Node `(ix, iy)` sits at `(xmin + ix·Δ, ymin + iy·Δ)`. Cell counts are
/// stored as `usize`; they were validated non-zero by
/// [`SolverConfig`](crate::SolverConfig).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    nx: usize,
    ny: usize,
    xmin: f64,
    ymin: f64,
    delta: f64,
    courant: f64,
    dt: f64,
}

impl GridGeometry {
    /// Build a geometry, rejecting non-finite origins and non-positive cell sizes.
    pub fn new(
        nx: u32,
        ny: u32,
        origin_x: f64,
        origin_y: f64,
        delta: f64,
        courant: f64,
    ) -> Result<Self, ConfigError> {
        if nx == 0 || ny == 0 {
            return Err(ConfigError::EmptyGrid { nx, ny });
        }
        if !(delta.is_finite() && delta > 0.0) {
            return Err(ConfigError::InvalidCellSize { value: delta });
        }
        if !(origin_x.is_finite() && origin_y.is_finite()) {
            return Err(ConfigError::InvalidOrigin {
                x: origin_x,
                y: origin_y,
            });
        }
        Ok(Self {
            nx: nx as usize,
            ny: ny as usize,
            xmin: origin_x,
            ymin: origin_y,
            delta,
            courant,
            dt: courant * delta / vacuum_velocity(),
        })
    }

    /// Cells along x.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Cells along y.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Total cell count.
    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Cell size in meters.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Time step `S·Δ/c0` in seconds.
    pub fn timestep(&self) -> f64 {
        self.dt
    }

    /// Courant factor used to derive the time step.
    pub fn courant_factor(&self) -> f64 {
        self.courant
    }

    /// Physical x of column 0.
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// Physical x of the last column.
    pub fn xmax(&self) -> f64 {
        self.x_at(self.nx - 1)
    }

    /// Physical y of row 0.
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    /// Physical y of the last row.
    pub fn ymax(&self) -> f64 {
        self.y_at(self.ny - 1)
    }

    /// Physical x of column `ix`.
    pub fn x_at(&self, ix: usize) -> f64 {
        self.xmin + ix as f64 * self.delta
    }

    /// Physical y of row `iy`.
    pub fn y_at(&self, iy: usize) -> f64 {
        self.ymin + iy as f64 * self.delta
    }

    /// Midpoint of the node extent.
    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.xmin + self.xmax()),
            0.5 * (self.ymin + self.ymax()),
        )
    }

    /// Clamp a physical point into the node extent. NaN maps to the minimum.
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            clamp_or_min(x, self.xmin, self.xmax()),
            clamp_or_min(y, self.ymin, self.ymax()),
        )
    }

    /// Nearest node to a physical point, after clamping.
    pub fn nearest_cell(&self, x: f64, y: f64) -> (usize, usize) {
        let (x, y) = self.clamp(x, y);
        (
            nearest_index(x, self.xmin, self.delta, self.nx),
            nearest_index(y, self.ymin, self.delta, self.ny),
        )
    }

    /// Row-major flat index `nx·iy + ix`.
    pub fn index(&self, ix: usize, iy: usize) -> usize {
        self.nx * iy + ix
    }
}

fn clamp_or_min(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        lo
    } else {
        v.clamp(lo, hi)
    }
}

fn nearest_index(v: f64, origin: f64, delta: f64, len: usize) -> usize {
    let i = ((v - origin) / delta).round();
    (i.max(0.0) as usize).min(len - 1)
}
