//! Separable halfband low-pass filter for Ez.
//!
//! The kernel is a Hamming-windowed ideal halfband response,
//! `b[n] = sin(nπ/2)/(nπ)·(0.54 + 0.46·cos(nπ/K))` for `|n| ≤ K` with
//! `b[0] = 1/2`, scaled to unit DC gain. Every even tap except the centre
//! is zero, and the gain at the Nyquist frequency is close to zero, which
//! removes the grid-scale checkerboard while leaving smooth fields intact.

use std::f64::consts::PI;

use smallvec::SmallVec;
use tmz_core::{BoundaryKind, ConfigError};

use crate::config::SolverConfig;

/// How samples beyond the end of a line are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterEdge {
    /// Samples outside the line are zero.
    Zero,
    /// The end sample is repeated.
    Hold,
    /// The line wraps around.
    Wrap,
}

impl From<BoundaryKind> for FilterEdge {
    fn from(kind: BoundaryKind) -> Self {
        match kind {
            BoundaryKind::Periodic => Self::Wrap,
            BoundaryKind::Absorbing => Self::Hold,
            BoundaryKind::Pec => Self::Zero,
        }
    }
}

/// Symmetric FIR kernel `b[-K..=K]`, stored as `b[0..=K]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HalfbandFilter {
    taps: SmallVec<[f64; 16]>,
}

impl HalfbandFilter {
    /// Build a kernel of half-width `half_width`.
    pub fn new(half_width: usize) -> Result<Self, ConfigError> {
        if half_width == 0 || half_width > SolverConfig::MAX_FILTER_HALF_WIDTH {
            return Err(ConfigError::InvalidFilterWidth { value: half_width });
        }
        let k = half_width as f64;
        let mut taps: SmallVec<[f64; 16]> = (0..=half_width)
            .map(|n| {
                if n == 0 {
                    return 0.5;
                }
                let x = n as f64 * PI;
                let window = 0.54 + 0.46 * (x / k).cos();
                if n % 2 == 0 {
                    0.0
                } else {
                    (x / 2.0).sin() / x * window
                }
            })
            .collect();
        let dc: f64 = taps[0] + 2.0 * taps[1..].iter().sum::<f64>();
        for t in &mut taps {
            *t /= dc;
        }
        Ok(Self { taps })
    }

    /// Half-width `K`.
    pub fn half_width(&self) -> usize {
        self.taps.len() - 1
    }

    /// Tap `b[n]`; zero outside `-K..=K`.
    pub fn tap(&self, n: isize) -> f64 {
        self.taps.get(n.unsigned_abs()).copied().unwrap_or(0.0)
    }

    /// Frequency response at `w` radians per sample.
    pub fn gain(&self, w: f64) -> f64 {
        self.taps
            .iter()
            .enumerate()
            .map(|(n, &b)| if n == 0 { b } else { 2.0 * b * (w * n as f64).cos() })
            .sum()
    }

    /// Filter one line. `write(i, y)` receives every output sample in order.
    pub fn apply_line(&self, input: &[f64], edge: FilterEdge, mut write: impl FnMut(usize, f64)) {
        let len = input.len() as isize;
        for i in 0..len {
            let mut acc = self.taps[0] * input[i as usize];
            for (n, &b) in self.taps.iter().enumerate().skip(1) {
                if b == 0.0 {
                    continue;
                }
                let n = n as isize;
                acc += b * (sample(input, i - n, edge) + sample(input, i + n, edge));
            }
            write(i as usize, acc);
        }
    }

    /// Filter a row-major `nx` × `ny` array in place, rows then columns.
    /// `line` must hold at least `max(nx, ny)` values.
    pub fn apply_2d(
        &self,
        data: &mut [f64],
        line: &mut [f64],
        nx: usize,
        ny: usize,
        x_edge: FilterEdge,
        y_edge: FilterEdge,
    ) {
        for iy in 0..ny {
            let row = nx * iy;
            let buf = &mut line[..nx];
            buf.copy_from_slice(&data[row..row + nx]);
            self.apply_line(buf, x_edge, |i, v| data[row + i] = v);
        }
        for ix in 0..nx {
            let buf = &mut line[..ny];
            for (iy, v) in buf.iter_mut().enumerate() {
                *v = data[nx * iy + ix];
            }
            self.apply_line(buf, y_edge, |iy, v| data[nx * iy + ix] = v);
        }
    }
}

fn sample(x: &[f64], m: isize, edge: FilterEdge) -> f64 {
    let len = x.len() as isize;
    if (0..len).contains(&m) {
        return x[m as usize];
    }
    match edge {
        FilterEdge::Zero => 0.0,
        FilterEdge::Hold if m < 0 => x[0],
        FilterEdge::Hold => x[x.len() - 1],
        FilterEdge::Wrap => x[m.rem_euclid(len) as usize],
    }
}
