//! Ez rasterisation into a row-major pixel buffer.
//!
//! The whole grid is stretched over the image. Pixel column `px` samples
//! `x = px·(nx−1)/(w−1)` and pixel row `py` samples
//! `y = (h−1−py)·(ny−1)/(h−1)`, so +y points up on screen. Values between
//! nodes are bilinearly interpolated.

use tmz_solver::FieldGrid;

use crate::colormap::{ColorLut, Colormap};
use crate::error::RenderError;

/// How field values map onto the colormap.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ColorRange {
    /// Per-frame minimum and maximum of Ez.
    #[default]
    Auto,
    /// A fixed host-supplied range.
    Fixed {
        /// Value mapped to the bottom of the colormap.
        min: f64,
        /// Value mapped to the top of the colormap.
        max: f64,
    },
}

/// Colormap and range for one render call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderOptions {
    /// Colormap.
    pub colormap: Colormap,
    /// Normalisation.
    pub range: ColorRange,
}

impl RenderOptions {
    /// Options from the host's flag-style arguments.
    pub fn from_flags(use_color_map: bool, use_auto_range: bool, min: f64, max: f64) -> Self {
        Self {
            colormap: Colormap::from_flag(use_color_map),
            range: if use_auto_range {
                ColorRange::Auto
            } else {
                ColorRange::Fixed { min, max }
            },
        }
    }
}

fn check_buffer(pixels: &[u32], width: usize, height: usize) -> Result<usize, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    let required = width
        .checked_mul(height)
        .ok_or(RenderError::BufferTooSmall {
            required: usize::MAX,
            provided: pixels.len(),
        })?;
    if pixels.len() < required {
        return Err(RenderError::BufferTooSmall {
            required,
            provided: pixels.len(),
        });
    }
    Ok(required)
}

/// Map pixel index `p` of `n` onto `[0, len−1]`.
fn axis_coord(p: usize, n: usize, len: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        p as f64 * (len - 1) as f64 / (n - 1) as f64
    }
}

fn bilinear(ez: &[f64], nx: usize, ny: usize, x: f64, y: f64) -> f64 {
    let x0 = (x.floor() as usize).min(nx - 1);
    let y0 = (y.floor() as usize).min(ny - 1);
    let x1 = (x0 + 1).min(nx - 1);
    let y1 = (y0 + 1).min(ny - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;
    let at = |ix: usize, iy: usize| ez[nx * iy + ix];
    let bottom = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
    let top = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
    bottom * (1.0 - fy) + top * fy
}

/// Resolve the value range. Auto scans Ez.
fn resolve_range(range: ColorRange, ez: &[f64]) -> (f64, f64) {
    match range {
        ColorRange::Fixed { min, max } => (min, max),
        ColorRange::Auto => ez.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        }),
    }
}

/// Rasterise Ez into `pixels` (`width·height`, row-major, top row first).
///
/// Returns the `(min, max)` range that was mapped onto the colormap. A
/// degenerate range (`max ≤ min`) paints every pixel with the middle
/// colour.
pub fn render_ez(
    grid: &FieldGrid<'_>,
    pixels: &mut [u32],
    width: usize,
    height: usize,
    options: RenderOptions,
) -> Result<(f64, f64), RenderError> {
    check_buffer(pixels, width, height)?;
    let (nx, ny) = (grid.nx(), grid.ny());
    let ez = grid.ez();
    let (min, max) = resolve_range(options.range, ez);
    let span = max - min;
    let lut = ColorLut::new(options.colormap);

    for (py, row) in pixels.chunks_exact_mut(width).take(height).enumerate() {
        let y = axis_coord(height - 1 - py, height, ny);
        for (px, out) in row.iter_mut().enumerate() {
            let x = axis_coord(px, width, nx);
            let t = if span > 0.0 {
                (bilinear(ez, nx, ny, x, y) - min) / span
            } else {
                0.5
            };
            *out = lut.lookup(t);
        }
    }
    Ok((min, max))
}

/// Fill `pixels` with a left-to-right ramp through `colormap`.
pub fn render_test_pattern(
    pixels: &mut [u32],
    width: usize,
    height: usize,
    colormap: Colormap,
) -> Result<(), RenderError> {
    check_buffer(pixels, width, height)?;
    let lut = ColorLut::new(colormap);
    for row in pixels.chunks_exact_mut(width).take(height) {
        for (px, out) in row.iter_mut().enumerate() {
            *out = lut.lookup(axis_coord(px, width, 2));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::pack_rgba;
    use proptest::prelude::*;
    use tmz_arena::{ArenaConfig, MemoryArena};
    use tmz_solver::{Solver, SolverConfig};

    fn ramp_solver(nx: u32, ny: u32) -> (MemoryArena, Solver) {
        let mut arena = MemoryArena::new(ArenaConfig::pages(4));
        let mut solver = Solver::new(&mut arena, SolverConfig::new(nx, ny)).unwrap();
        solver.init(&mut arena, 0.0, 0.0, 1.0).unwrap();
        let ez = solver.ez_mut(&mut arena).unwrap();
        for (i, v) in ez.iter_mut().enumerate() {
            // Ez grows with y only.
            *v = (i / nx as usize) as f64;
        }
        (arena, solver)
    }

    #[test]
    fn rejects_small_buffer() {
        let (arena, solver) = ramp_solver(4, 4);
        let grid = solver.fields(&arena).unwrap();
        let mut pixels = vec![0u32; 5];
        let err = render_ez(&grid, &mut pixels, 3, 2, RenderOptions::default()).unwrap_err();
        assert_eq!(
            err,
            RenderError::BufferTooSmall {
                required: 6,
                provided: 5
            }
        );
        assert!(matches!(
            render_ez(&grid, &mut pixels, 0, 2, RenderOptions::default()),
            Err(RenderError::EmptyImage { .. })
        ));
    }

    #[test]
    fn auto_range_spans_field_and_y_points_up() {
        let (arena, solver) = ramp_solver(4, 5);
        let grid = solver.fields(&arena).unwrap();
        let mut pixels = vec![0u32; 8 * 10];
        let opts = RenderOptions::from_flags(false, true, 0.0, 0.0);
        let range = render_ez(&grid, &mut pixels, 8, 10, opts).unwrap();
        assert_eq!(range, (0.0, 4.0));
        // Top row shows the largest y, which is white in grayscale.
        assert_eq!(pixels[0], pack_rgba(255, 255, 255, 255));
        assert_eq!(pixels[9 * 8], pack_rgba(0, 0, 0, 255));
    }

    #[test]
    fn fixed_range_clamps() {
        let (arena, solver) = ramp_solver(4, 5);
        let grid = solver.fields(&arena).unwrap();
        let mut pixels = vec![0u32; 4 * 5];
        let opts = RenderOptions::from_flags(false, false, 10.0, 20.0);
        render_ez(&grid, &mut pixels, 4, 5, opts).unwrap();
        assert!(pixels.iter().all(|&p| p == pack_rgba(0, 0, 0, 255)));
    }

    #[test]
    fn flat_field_uses_middle_colour() {
        let mut arena = MemoryArena::new(ArenaConfig::pages(4));
        let mut solver = Solver::new(&mut arena, SolverConfig::new(3, 3)).unwrap();
        solver.init(&mut arena, 0.0, 0.0, 1.0).unwrap();
        let grid = solver.fields(&arena).unwrap();
        let mut pixels = vec![0u32; 4];
        render_ez(&grid, &mut pixels, 2, 2, RenderOptions::default()).unwrap();
        let mid = ColorLut::new(Colormap::Viridis).lookup(0.5);
        assert!(pixels.iter().all(|&p| p == mid));
    }

    #[test]
    fn bilinear_interpolates_between_nodes() {
        let ez = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(bilinear(&ez, 2, 2, 0.5, 0.0), 0.5);
        assert_eq!(bilinear(&ez, 2, 2, 0.0, 0.5), 1.0);
        assert_eq!(bilinear(&ez, 2, 2, 1.0, 1.0), 3.0);
    }

    #[test]
    fn test_pattern_ramps_left_to_right() {
        let mut pixels = vec![0u32; 16 * 3];
        render_test_pattern(&mut pixels, 16, 3, Colormap::Grayscale).unwrap();
        assert_eq!(pixels[0], pack_rgba(0, 0, 0, 255));
        assert_eq!(pixels[15], pack_rgba(255, 255, 255, 255));
        assert_eq!(pixels[16], pixels[0]);
    }

    proptest! {
        #[test]
        fn auto_range_brackets_every_sample(
            values in proptest::collection::vec(-1e3f64..1e3, 12),
            w in 1usize..9,
            h in 1usize..9,
        ) {
            let mut arena = MemoryArena::new(ArenaConfig::pages(4));
            let mut solver = Solver::new(&mut arena, SolverConfig::new(4, 3)).unwrap();
            solver.init(&mut arena, 0.0, 0.0, 1.0).unwrap();
            solver.ez_mut(&mut arena).unwrap().copy_from_slice(&values);
            let grid = solver.fields(&arena).unwrap();
            let mut pixels = vec![0u32; w * h];
            let (lo, hi) = render_ez(&grid, &mut pixels, w, h, RenderOptions::default()).unwrap();
            prop_assert!(values.iter().all(|&v| lo <= v && v <= hi));
            prop_assert!(pixels.iter().all(|&p| p >> 24 == 0xff));
        }
    }
}
