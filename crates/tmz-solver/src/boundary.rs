//! Per-axis boundary policies.
//!
//! Edge nodes are owned by exactly one axis: the first and last column
//! (excluding the first and last row) belong to X, the first and last row
//! (including the corners) belong to Y. X is treated before Y, so at a
//! corner the Y policy decides the final value.
//!
//! - Periodic edges get the full curl update with neighbours taken from
//!   the opposite side.
//! - PEC edges are pinned to zero.
//! - Absorbing edges use the first-order Mur condition
//!   `E0ⁿ⁺¹ = E1ⁿ + k·(E1ⁿ⁺¹ − E0ⁿ)` with `k = (S′ − 1)/(S′ + 1)`, where
//!   `S′ = S/√(εr·μr)` is the distance a wave travels per step in cells.
//!   An axis shorter than three cells has no interior to extrapolate from
//!   and falls back to PEC.

use tmz_core::{Axis, BoundaryKind};

use crate::fields::FieldGridMut;

/// Boundary policy for both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryConditions {
    x: BoundaryKind,
    y: BoundaryKind,
    mur: f64,
}

impl BoundaryConditions {
    /// Shortest axis that supports the absorbing condition.
    pub const MIN_ABSORBING_LEN: usize = 3;

    /// PEC on both axes for waves travelling `courant` cells per step.
    pub fn new(courant: f64) -> Self {
        Self {
            x: BoundaryKind::Pec,
            y: BoundaryKind::Pec,
            mur: mur_for(courant),
        }
    }

    /// Retune the absorbing condition for waves travelling `courant` cells
    /// per step.
    pub fn set_wave_courant(&mut self, courant: f64) {
        self.mur = mur_for(courant);
    }

    /// Policy of one axis.
    pub fn get(&self, axis: Axis) -> BoundaryKind {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Replace the policy of one axis.
    pub fn set(&mut self, axis: Axis, kind: BoundaryKind) {
        match axis {
            Axis::X => self.x = kind,
            Axis::Y => self.y = kind,
        }
    }

    /// Mur coefficient `(S′ − 1)/(S′ + 1)`.
    pub fn mur_coefficient(&self) -> f64 {
        self.mur
    }

    /// Policy actually applied on an axis of `len` cells.
    pub fn effective(&self, axis: Axis, len: usize) -> BoundaryKind {
        match self.get(axis) {
            BoundaryKind::Absorbing if len < Self::MIN_ABSORBING_LEN => BoundaryKind::Pec,
            kind => kind,
        }
    }

    /// Whether `axis` is periodic.
    pub fn wraps(&self, axis: Axis) -> bool {
        self.get(axis) == BoundaryKind::Periodic
    }

    /// Fill the last Hy column and last Hx row: wrapped curl when periodic,
    /// zero otherwise.
    pub(crate) fn apply_h(&self, g: &mut FieldGridMut<'_>) {
        let (nx, ny) = (g.nx, g.ny);
        for iy in 0..ny {
            let i = g.index(nx - 1, iy);
            if self.wraps(Axis::X) {
                g.hy[i] += g.chye[i] * (g.ez[i + 1 - nx] - g.ez[i]);
            } else {
                g.hy[i] = 0.0;
            }
        }
        for ix in 0..nx {
            let i = g.index(ix, ny - 1);
            if self.wraps(Axis::Y) {
                g.hx[i] -= g.chxe[i] * (g.ez[ix] - g.ez[i]);
            } else {
                g.hx[i] = 0.0;
            }
        }
    }

    /// Record Ez on absorbing edges and their inner neighbours before the
    /// electric update.
    pub(crate) fn capture_history(&self, g: &mut FieldGridMut<'_>) {
        let (nx, ny) = (g.nx, g.ny);
        if self.effective(Axis::X, nx) == BoundaryKind::Absorbing {
            for iy in 0..ny {
                let row = nx * iy;
                let h = &mut g.x_history[4 * iy..4 * iy + 4];
                h[0] = g.ez[row];
                h[1] = g.ez[row + 1];
                h[2] = g.ez[row + nx - 1];
                h[3] = g.ez[row + nx - 2];
            }
        }
        if self.effective(Axis::Y, ny) == BoundaryKind::Absorbing {
            let top = nx * (ny - 1);
            for ix in 0..nx {
                let h = &mut g.y_history[4 * ix..4 * ix + 4];
                h[0] = g.ez[ix];
                h[1] = g.ez[ix + nx];
                h[2] = g.ez[top + ix];
                h[3] = g.ez[top - nx + ix];
            }
        }
    }

    /// Curl update of every edge node whose owning axis is periodic.
    pub(crate) fn update_periodic_edges(&self, g: &mut FieldGridMut<'_>) {
        let (nx, ny) = (g.nx, g.ny);
        let wrap_x = self.wraps(Axis::X);
        let wrap_y = self.wraps(Axis::Y);
        if wrap_x {
            for ix in edge_lines(nx) {
                for iy in 1..ny.saturating_sub(1) {
                    g.update_ez_edge(ix, iy, wrap_x, wrap_y);
                }
            }
        }
        if wrap_y {
            for iy in edge_lines(ny) {
                for ix in 0..nx {
                    g.update_ez_edge(ix, iy, wrap_x, wrap_y);
                }
            }
        }
    }

    /// PEC and absorbing treatment of Ez after source injection, X then Y.
    pub(crate) fn apply_ez(&self, g: &mut FieldGridMut<'_>) {
        let (nx, ny) = (g.nx, g.ny);
        let k = self.mur;
        match self.effective(Axis::X, nx) {
            BoundaryKind::Periodic => {}
            BoundaryKind::Pec => {
                for iy in 1..ny.saturating_sub(1) {
                    for ix in edge_lines(nx) {
                        let i = g.index(ix, iy);
                        g.ez[i] = 0.0;
                    }
                }
            }
            BoundaryKind::Absorbing => {
                for iy in 1..ny.saturating_sub(1) {
                    let row = nx * iy;
                    let h = &g.x_history[4 * iy..4 * iy + 4];
                    g.ez[row] = h[1] + k * (g.ez[row + 1] - h[0]);
                    g.ez[row + nx - 1] = h[3] + k * (g.ez[row + nx - 2] - h[2]);
                }
            }
        }
        match self.effective(Axis::Y, ny) {
            BoundaryKind::Periodic => {}
            BoundaryKind::Pec => {
                for iy in edge_lines(ny) {
                    let row = nx * iy;
                    g.ez[row..row + nx].fill(0.0);
                }
            }
            BoundaryKind::Absorbing => {
                let top = nx * (ny - 1);
                for ix in 0..nx {
                    let h = &g.y_history[4 * ix..4 * ix + 4];
                    g.ez[ix] = h[1] + k * (g.ez[ix + nx] - h[0]);
                    g.ez[top + ix] = h[3] + k * (g.ez[top - nx + ix] - h[2]);
                }
            }
        }
    }

    /// Zero PEC edges. Used after operations that touch Ez outside `step`.
    pub(crate) fn pin_pec_edges(&self, g: &mut FieldGridMut<'_>) {
        let (nx, ny) = (g.nx, g.ny);
        if self.effective(Axis::X, nx) == BoundaryKind::Pec {
            for iy in 0..ny {
                for ix in edge_lines(nx) {
                    let i = g.index(ix, iy);
                    g.ez[i] = 0.0;
                }
            }
        }
        if self.effective(Axis::Y, ny) == BoundaryKind::Pec {
            for iy in edge_lines(ny) {
                let row = nx * iy;
                g.ez[row..row + nx].fill(0.0);
            }
        }
    }
}

fn mur_for(courant: f64) -> f64 {
    (courant - 1.0) / (courant + 1.0)
}

/// First and last index of an axis, once if they coincide.
fn edge_lines(len: usize) -> impl Iterator<Item = usize> {
    std::iter::once(0).chain((len > 1).then_some(len - 1))
}
