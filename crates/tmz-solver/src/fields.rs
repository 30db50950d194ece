//! Typed views over the solver region and the Yee update kernels.
//!
//! Ez is stored at cell nodes, Hx half a cell above in y and Hy half a
//! cell to the right in x. All arrays are row-major, `idx = nx·iy + ix`.
//! Hx in the last row and Hy in the last column have no interior
//! neighbour; they are either filled by the periodic wrap or held at zero
//! by [`BoundaryConditions`](crate::BoundaryConditions).

use crate::geometry::GridGeometry;
use crate::layout::SolverLayout;
use crate::medium::UpdateCoefficients;
use tmz_core::Injection;

/// Read-only view of the field arrays and grid coordinates.
#[derive(Clone, Copy, Debug)]
pub struct FieldGrid<'a> {
    nx: usize,
    ny: usize,
    ez: &'a [f64],
    hx: &'a [f64],
    hy: &'a [f64],
    chxe: &'a [f64],
    chye: &'a [f64],
    xgrid: &'a [f64],
    ygrid: &'a [f64],
}

impl<'a> FieldGrid<'a> {
    /// Carve a view out of a full solver region. `None` if `data` is shorter
    /// than the layout requires.
    pub fn split(layout: SolverLayout, data: &'a [f64]) -> Option<Self> {
        if data.len() < layout.value_count()? {
            return None;
        }
        let cells = layout.cells();
        let (ez, rest) = data.split_at(cells);
        let (hx, rest) = rest.split_at(cells);
        let (hy, rest) = rest.split_at(cells);
        let (chxe, rest) = rest[2 * cells..].split_at(cells);
        let (chye, rest) = rest.split_at(cells);
        let (xgrid, rest) = rest.split_at(layout.nx());
        let (ygrid, _) = rest.split_at(layout.ny());
        Some(Self {
            nx: layout.nx(),
            ny: layout.ny(),
            ez,
            hx,
            hy,
            chxe,
            chye,
            xgrid,
            ygrid,
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

    /// Ez, row-major.
    pub fn ez(&self) -> &'a [f64] {
        self.ez
    }

    /// Hx, row-major.
    pub fn hx(&self) -> &'a [f64] {
        self.hx
    }

    /// Hy, row-major.
    pub fn hy(&self) -> &'a [f64] {
        self.hy
    }

    /// Physical x of each column.
    pub fn x_coords(&self) -> &'a [f64] {
        self.xgrid
    }

    /// Physical y of each row.
    pub fn y_coords(&self) -> &'a [f64] {
        self.ygrid
    }

    /// Ez at node `(ix, iy)`.
    pub fn ez_at(&self, ix: usize, iy: usize) -> f64 {
        self.ez[self.nx * iy + ix]
    }

    /// Hx at `(ix, iy + 1/2)`.
    pub fn hx_at(&self, ix: usize, iy: usize) -> f64 {
        self.hx[self.nx * iy + ix]
    }

    /// Hy at `(ix + 1/2, iy)`.
    pub fn hy_at(&self, ix: usize, iy: usize) -> f64 {
        self.hy[self.nx * iy + ix]
    }

    /// `Σ (Hx·Hx' + Hy·Hy')`, where `H'` is what the next magnetic update
    /// writes from the current Ez. The last Hx row and Hy column take the
    /// wrapped curl on a periodic axis and are zero otherwise.
    pub fn magnetic_overlap(&self, wrap_x: bool, wrap_y: bool) -> f64 {
        let (nx, ny) = (self.nx, self.ny);
        let ez = self.ez;
        let mut sum = 0.0;
        for iy in 0..ny {
            for ix in 0..nx {
                let i = nx * iy + ix;
                let above = if iy + 1 < ny {
                    Some(i + nx)
                } else {
                    wrap_y.then_some(ix)
                };
                let right = if ix + 1 < nx {
                    Some(i + 1)
                } else {
                    wrap_x.then_some(i + 1 - nx)
                };
                if let Some(a) = above {
                    let next = self.hx[i] - self.chxe[i] * (ez[a] - ez[i]);
                    sum += self.hx[i] * next;
                }
                if let Some(r) = right {
                    let next = self.hy[i] + self.chye[i] * (ez[r] - ez[i]);
                    sum += self.hy[i] * next;
                }
            }
        }
        sum
    }
}

/// Mutable view of the whole solver region, split into its blocks.
///
/// Blocks are disjoint sub-slices of the same arena region, so the update
/// kernels can read one array while writing another without copying.
#[derive(Debug)]
pub struct FieldGridMut<'a> {
    pub(crate) nx: usize,
    pub(crate) ny: usize,
    pub(crate) ez: &'a mut [f64],
    pub(crate) hx: &'a mut [f64],
    pub(crate) hy: &'a mut [f64],
    pub(crate) ceze: &'a mut [f64],
    pub(crate) cezh: &'a mut [f64],
    pub(crate) chxe: &'a mut [f64],
    pub(crate) chye: &'a mut [f64],
    pub(crate) xgrid: &'a mut [f64],
    pub(crate) ygrid: &'a mut [f64],
    pub(crate) x_history: &'a mut [f64],
    pub(crate) y_history: &'a mut [f64],
    pub(crate) line: &'a mut [f64],
}

fn take<'a>(rest: &mut &'a mut [f64], len: usize) -> &'a mut [f64] {
    let (head, tail) = std::mem::take(rest).split_at_mut(len);
    *rest = tail;
    head
}

impl<'a> FieldGridMut<'a> {
    /// Carve the region into blocks. `None` if `data` is too short.
    pub fn split(layout: SolverLayout, data: &'a mut [f64]) -> Option<Self> {
        if data.len() < layout.value_count()? {
            return None;
        }
        let cells = layout.cells();
        let mut rest = data;
        Some(Self {
            nx: layout.nx(),
            ny: layout.ny(),
            ez: take(&mut rest, cells),
            hx: take(&mut rest, cells),
            hy: take(&mut rest, cells),
            ceze: take(&mut rest, cells),
            cezh: take(&mut rest, cells),
            chxe: take(&mut rest, cells),
            chye: take(&mut rest, cells),
            xgrid: take(&mut rest, layout.nx()),
            ygrid: take(&mut rest, layout.ny()),
            x_history: take(&mut rest, layout.x_history_len()),
            y_history: take(&mut rest, layout.y_history_len()),
            line: take(&mut rest, layout.line_len()),
        })
    }

    /// Read-only view of the same memory.
    pub fn as_grid(&self) -> FieldGrid<'_> {
        FieldGrid {
            nx: self.nx,
            ny: self.ny,
            ez: &*self.ez,
            hx: &*self.hx,
            hy: &*self.hy,
            chxe: &*self.chxe,
            chye: &*self.chye,
            xgrid: &*self.xgrid,
            ygrid: &*self.ygrid,
        }
    }

    /// Ez, row-major.
    pub fn ez_mut(&mut self) -> &mut [f64] {
        &mut *self.ez
    }

    /// Hx, row-major.
    pub fn hx_mut(&mut self) -> &mut [f64] {
        &mut *self.hx
    }

    /// Hy, row-major.
    pub fn hy_mut(&mut self) -> &mut [f64] {
        &mut *self.hy
    }

    pub(crate) fn index(&self, ix: usize, iy: usize) -> usize {
        self.nx * iy + ix
    }

    /// Zero Ez, Hx, Hy, the edge history and the line buffer.
    pub(crate) fn zero_state(&mut self) {
        self.ez.fill(0.0);
        self.hx.fill(0.0);
        self.hy.fill(0.0);
        self.x_history.fill(0.0);
        self.y_history.fill(0.0);
        self.line.fill(0.0);
    }

    pub(crate) fn fill_coefficients(&mut self, c: &UpdateCoefficients) {
        self.ceze.fill(c.ceze);
        self.cezh.fill(c.cezh);
        self.chxe.fill(c.chxe);
        self.chye.fill(c.chye);
    }

    pub(crate) fn fill_coordinates(&mut self, geometry: &GridGeometry) {
        for (ix, x) in self.xgrid.iter_mut().enumerate() {
            *x = geometry.x_at(ix);
        }
        for (iy, y) in self.ygrid.iter_mut().enumerate() {
            *y = geometry.y_at(iy);
        }
    }

    /// Magnetic update for every H sample with an interior Ez neighbour.
    pub(crate) fn update_h(&mut self) {
        let nx = self.nx;
        let ny = self.ny;
        for iy in 0..ny.saturating_sub(1) {
            for ix in 0..nx {
                let i = nx * iy + ix;
                self.hx[i] -= self.chxe[i] * (self.ez[i + nx] - self.ez[i]);
            }
        }
        for iy in 0..ny {
            for ix in 0..nx.saturating_sub(1) {
                let i = nx * iy + ix;
                self.hy[i] += self.chye[i] * (self.ez[i + 1] - self.ez[i]);
            }
        }
    }

    /// Electric update for interior nodes `1..nx-1 × 1..ny-1`.
    pub(crate) fn update_ez_interior(&mut self) {
        let nx = self.nx;
        for iy in 1..self.ny.saturating_sub(1) {
            for ix in 1..nx - 1 {
                let i = nx * iy + ix;
                let curl = (self.hy[i] - self.hy[i - 1]) - (self.hx[i] - self.hx[i - nx]);
                self.ez[i] = self.ceze[i] * self.ez[i] + self.cezh[i] * curl;
            }
        }
    }

    /// Electric update for one edge node. Neighbours across the edge come
    /// from the opposite side when that axis wraps and are zero otherwise.
    pub(crate) fn update_ez_edge(&mut self, ix: usize, iy: usize, wrap_x: bool, wrap_y: bool) {
        let nx = self.nx;
        let i = self.index(ix, iy);
        let hy_left = if ix > 0 {
            self.hy[i - 1]
        } else if wrap_x {
            self.hy[i + nx - 1]
        } else {
            0.0
        };
        let hx_below = if iy > 0 {
            self.hx[i - nx]
        } else if wrap_y {
            self.hx[i + nx * (self.ny - 1)]
        } else {
            0.0
        };
        let curl = (self.hy[i] - hy_left) - (self.hx[i] - hx_below);
        self.ez[i] = self.ceze[i] * self.ez[i] + self.cezh[i] * curl;
    }

    /// Write a source sample at one node.
    pub(crate) fn inject(&mut self, ix: usize, iy: usize, value: f64, injection: Injection) {
        let i = self.index(ix, iy);
        match injection {
            Injection::Additive => self.ez[i] += value,
            Injection::Hardwired => self.ez[i] = value,
        }
    }

    /// Add `amplitude·exp(-r²/(2σ²))` centred at `(x, y)` in cell units.
    pub(crate) fn add_gaussian(&mut self, x: f64, y: f64, sigma: f64, amplitude: f64) {
        let scale = 1.0 / (2.0 * sigma * sigma);
        let nx = self.nx;
        for (i, ez) in self.ez.iter_mut().enumerate() {
            let dx = (i % nx) as f64 - x;
            let dy = (i / nx) as f64 - y;
            *ez += amplitude * (-(dx * dx + dy * dy) * scale).exp();
        }
    }
}
