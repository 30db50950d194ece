//! Simulator lifecycle, parameter and rendering exports.
//!
//! Each simulator sits behind its own `Arc<Mutex<Simulator>>`, so the
//! global `SIMULATORS` table lock is only held for handle lookup and two
//! simulators can be stepped from different threads at once.
//!
//! Fallible queries write through an out-pointer and leave it untouched
//! on error. Optional out-pointers are documented as nullable.

use std::sync::{Arc, Mutex};

use tmz_core::constants::{vacuum_impedance, vacuum_velocity};
use tmz_engine::{Simulator, SimulatorConfig};
use tmz_render::{Colormap, RenderOptions};

use crate::command::{convert_command, TmzCommand};
use crate::config::TmzSimulatorConfig;
use crate::handle::HandleTable;
use crate::metrics::TmzStepMetrics;
use crate::status::TmzStatus;
use crate::types::{
    axis_from_raw, boundary_from_raw, boundary_to_raw, source_kind_from_raw, source_kind_to_raw,
};

type SimulatorArc = Arc<Mutex<Simulator>>;

static SIMULATORS: Mutex<HandleTable<SimulatorArc>> = Mutex::new(HandleTable::new());

/// Clone the Arc for a handle, briefly locking the global table.
fn get_simulator(handle: u64) -> Option<SimulatorArc> {
    SIMULATORS.lock().ok()?.get(handle).cloned()
}

/// Run `f` against the simulator behind `handle`.
fn with_simulator(
    handle: u64,
    f: impl FnOnce(&mut Simulator) -> Result<(), TmzStatus>,
) -> i32 {
    let sim_arc = match get_simulator(handle) {
        Some(arc) => arc,
        None => return TmzStatus::InvalidHandle as i32,
    };
    let mut sim = ffi_lock!(sim_arc);
    match f(&mut sim) {
        Ok(()) => TmzStatus::Ok as i32,
        Err(status) => status as i32,
    }
}

/// Run `f` against the simulator behind `handle` and write its value to
/// `out`. `out` is not written on error.
#[allow(unsafe_code)]
fn query<T>(
    handle: u64,
    out: *mut T,
    f: impl FnOnce(&mut Simulator) -> Result<T, TmzStatus>,
) -> i32 {
    if out.is_null() {
        return TmzStatus::InvalidArgument as i32;
    }
    with_simulator(handle, |sim| {
        let value = f(sim)?;
        // SAFETY: out is non-null and valid for writes per caller contract.
        unsafe { out.write(value) };
        Ok(())
    })
}

/// Write `value` to `out` when `out` is non-null.
#[allow(unsafe_code)]
fn write_optional<T>(out: *mut T, value: T) {
    if !out.is_null() {
        // SAFETY: out is non-null and valid for writes per caller contract.
        unsafe { out.write(value) };
    }
}

// ── lifecycle ──────────────────────────────────────────────────

/// Create a simulator.
///
/// `config` may be null for the default configuration. On success the
/// handle is written to `simulator_out`. The solver still needs
/// [`tmz_init_solver`] before it can step.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_simulator_create(
    config: *const TmzSimulatorConfig,
    simulator_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if simulator_out.is_null() {
            return TmzStatus::InvalidArgument as i32;
        }
        let config = if config.is_null() {
            SimulatorConfig::default()
        } else {
            // SAFETY: config is non-null and points to a valid struct per
            // caller contract.
            let raw = unsafe { *config };
            match raw.to_config() {
                Ok(c) => c,
                Err(status) => return status as i32,
            }
        };
        let sim = match Simulator::new(config) {
            Ok(s) => s,
            Err(e) => return TmzStatus::from(&e) as i32,
        };
        let handle = ffi_lock!(SIMULATORS).insert(Arc::new(Mutex::new(sim)));
        // SAFETY: simulator_out is valid per caller contract.
        unsafe { *simulator_out = handle };
        TmzStatus::Ok as i32
    })
}

/// Destroy a simulator, releasing its arena.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_simulator_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(SIMULATORS).remove(handle) {
            Some(_) => TmzStatus::Ok as i32,
            None => TmzStatus::InvalidHandle as i32,
        }
    })
}

/// Fix the grid origin and cell size, rebuild coefficients and zero all
/// fields. Boundary policies and the medium are kept across calls.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_init_solver(handle: u64, origin_x: f64, origin_y: f64, delta: f64) -> i32 {
    ffi_guard!({
        with_simulator(handle, |sim| Ok(sim.init_solver(origin_x, origin_y, delta)?))
    })
}

/// Zero all fields and restart source timing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_reset_solver(handle: u64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.reset()?)) })
}

/// Advance one timestep.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_step(handle: u64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.step()?)) })
}

/// Advance `n` timesteps.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_run(handle: u64, n: u64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.run(n)?)) })
}

/// Apply `n_cmds` commands in order, stopping at the first failure.
///
/// `cmds` may be null if `n_cmds == 0`. `n_applied_out` (nullable)
/// receives the number of commands that succeeded, also on error.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_apply_commands(
    handle: u64,
    cmds: *const TmzCommand,
    n_cmds: usize,
    n_applied_out: *mut usize,
) -> i32 {
    ffi_guard!({
        let cmd_slice: &[TmzCommand] = if n_cmds == 0 {
            &[]
        } else {
            if cmds.is_null() {
                return TmzStatus::InvalidArgument as i32;
            }
            // SAFETY: cmds points to n_cmds valid TmzCommand structs.
            unsafe { std::slice::from_raw_parts(cmds, n_cmds) }
        };
        with_simulator(handle, |sim| {
            let mut applied = 0;
            let result = cmd_slice.iter().try_for_each(|cmd| -> Result<(), TmzStatus> {
                let command = convert_command(cmd)?;
                sim.apply(command)?;
                applied += 1;
                Ok(())
            });
            write_optional(n_applied_out, applied);
            result
        })
    })
}

/// Metrics of the most recent step.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_step_metrics_get(handle: u64, out: *mut TmzStepMetrics) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(TmzStepMetrics::from_rust(sim.last_metrics()))) })
}

// ── geometry and physics ───────────────────────────────────────

/// Cells along x.
///
/// **Ambiguity warning:** returns 0 for an invalid handle. Prefer
/// [`tmz_nx_get`] for error detection.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_nx(handle: u64) -> u32 {
    ffi_guard_or!(0, {
        get_simulator(handle)
            .and_then(|arc| arc.lock().ok().map(|s| s.nx()))
            .unwrap_or(0)
    })
}

/// Cells along y.
///
/// **Ambiguity warning:** returns 0 for an invalid handle. Prefer
/// [`tmz_ny_get`] for error detection.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_ny(handle: u64) -> u32 {
    ffi_guard_or!(0, {
        get_simulator(handle)
            .and_then(|arc| arc.lock().ok().map(|s| s.ny()))
            .unwrap_or(0)
    })
}

/// Cells along x, with error reporting.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_nx_get(handle: u64, out: *mut u32) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.nx())) })
}

/// Cells along y, with error reporting.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_ny_get(handle: u64, out: *mut u32) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.ny())) })
}

/// Cell size in meters. `NotInitialized` before [`tmz_init_solver`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_delta_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.delta()?)) })
}

/// Timestep in seconds. `NotInitialized` before [`tmz_init_solver`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_timestep_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.timestep()?)) })
}

/// Courant factor.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_courant_factor_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.courant_factor())) })
}

/// Simulated time since the last init or reset, in seconds.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_elapsed_time_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.elapsed_time())) })
}

/// Physical extent of the grid nodes in meters. `NotInitialized` before
/// [`tmz_init_solver`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_grid_bounds_get(
    handle: u64,
    xmin_out: *mut f64,
    xmax_out: *mut f64,
    ymin_out: *mut f64,
    ymax_out: *mut f64,
) -> i32 {
    ffi_guard!({
        if xmin_out.is_null() || xmax_out.is_null() || ymin_out.is_null() || ymax_out.is_null() {
            return TmzStatus::InvalidArgument as i32;
        }
        with_simulator(handle, |sim| {
            let g = sim.geometry().ok_or(TmzStatus::NotInitialized)?;
            write_optional(xmin_out, g.xmin());
            write_optional(xmax_out, g.xmax());
            write_optional(ymin_out, g.ymin());
            write_optional(ymax_out, g.ymax());
            Ok(())
        })
    })
}

/// Impedance of free space in ohms.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_vacuum_impedance() -> f64 {
    vacuum_impedance()
}

/// Speed of light in vacuum in m/s.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_vacuum_velocity() -> f64 {
    vacuum_velocity()
}

// ── boundaries ─────────────────────────────────────────────────

/// Boundary policy of `axis`, written as a `TmzBoundary` value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_boundary_get(handle: u64, axis: i32, out: *mut i32) -> i32 {
    ffi_guard!({
        let axis = match axis_from_raw(axis) {
            Ok(a) => a,
            Err(status) => return status as i32,
        };
        query(handle, out, |sim| Ok(boundary_to_raw(sim.boundary(axis))))
    })
}

/// Set the boundary policy of `axis`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_boundary_set(handle: u64, axis: i32, kind: i32) -> i32 {
    ffi_guard!({
        let (axis, kind) = match (axis_from_raw(axis), boundary_from_raw(kind)) {
            (Ok(a), Ok(k)) => (a, k),
            _ => return TmzStatus::InvalidArgument as i32,
        };
        with_simulator(handle, |sim| {
            sim.set_boundary(axis, kind);
            Ok(())
        })
    })
}

/// Advance `axis` to its next boundary policy. `kind_out` (nullable)
/// receives the new policy.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_boundary_cycle(handle: u64, axis: i32, kind_out: *mut i32) -> i32 {
    ffi_guard!({
        let axis = match axis_from_raw(axis) {
            Ok(a) => a,
            Err(status) => return status as i32,
        };
        with_simulator(handle, |sim| {
            let kind = sim.cycle_boundary(axis);
            write_optional(kind_out, boundary_to_raw(kind));
            Ok(())
        })
    })
}

// ── medium ─────────────────────────────────────────────────────

/// Remove all loss.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_set_vacuum(handle: u64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.set_vacuum()?)) })
}

/// 1 when no loss is configured, else 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_is_vacuum_get(handle: u64, out: *mut u8) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(u8::from(sim.is_vacuum()))) })
}

/// Uniform loss that decays a plane wave at the source frequency by 1/e
/// over `skin_length` cells. `applied_out` (nullable) receives the skin length after
/// clamping.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_set_damping(handle: u64, skin_length: f64, applied_out: *mut f64) -> i32 {
    ffi_guard!({
        with_simulator(handle, |sim| {
            let applied = sim.set_damping(skin_length)?;
            write_optional(applied_out, applied);
            Ok(())
        })
    })
}

/// Uniform lossless medium with relative permeability `mu_r` and
/// permittivity `eps_r`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_set_uniform_medium(handle: u64, mu_r: f64, eps_r: f64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.set_uniform_medium(mu_r, eps_r)?)) })
}

// ── source ─────────────────────────────────────────────────────

/// Shift the source by `(dx, dy)` meters, clamped to the grid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_move(handle: u64, dx: f64, dy: f64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.move_source(dx, dy)?)) })
}

/// Place the source at `(x, y)` meters, clamped to the grid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_place(handle: u64, x: f64, y: f64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.place_source(x, y)?)) })
}

/// Physical source position in meters.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_position_get(handle: u64, x_out: *mut f64, y_out: *mut f64) -> i32 {
    ffi_guard!({
        if x_out.is_null() || y_out.is_null() {
            return TmzStatus::InvalidArgument as i32;
        }
        with_simulator(handle, |sim| {
            let (x, y) = sim.source_position();
            write_optional(x_out, x);
            write_optional(y_out, y);
            Ok(())
        })
    })
}

/// Select the waveform, a `TmzSourceKind` value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_kind_set(handle: u64, kind: i32) -> i32 {
    ffi_guard!({
        let kind = match source_kind_from_raw(kind) {
            Ok(k) => k,
            Err(status) => return status as i32,
        };
        with_simulator(handle, |sim| {
            sim.set_source_kind(kind);
            Ok(())
        })
    })
}

/// Current waveform, written as a `TmzSourceKind` value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_kind_get(handle: u64, out: *mut i32) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(source_kind_to_raw(sim.source_kind()))) })
}

/// Change points per wavelength by `delta_ppw`, keeping phase
/// continuous. `ppw_out` (nullable) receives the new value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_tune(handle: u64, delta_ppw: f64, ppw_out: *mut f64) -> i32 {
    ffi_guard!({
        with_simulator(handle, |sim| {
            write_optional(ppw_out, sim.tune_source(delta_ppw));
            Ok(())
        })
    })
}

/// Points per wavelength.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_ppw_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.source_ppw())) })
}

/// Additive injection when `additive` is non-zero, else hardwired.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_additive_set(handle: u64, additive: u8) -> i32 {
    ffi_guard!({
        with_simulator(handle, |sim| {
            sim.set_source_additive(additive != 0);
            Ok(())
        })
    })
}

/// 1 for additive injection, 0 for hardwired.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_source_additive_get(handle: u64, out: *mut u8) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(u8::from(sim.is_source_additive()))) })
}

// ── field edits ────────────────────────────────────────────────

/// Add a Gaussian bump to Ez centred on fractional cell `(x, y)`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_drop_gaussian(handle: u64, x: f64, y: f64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.drop_gaussian(x, y)?)) })
}

/// Smooth Ez once with the halfband filter.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_apply_halfband_filter(handle: u64) -> i32 {
    ffi_guard!({ with_simulator(handle, |sim| Ok(sim.apply_halfband_filter()?)) })
}

// ── diagnostics ────────────────────────────────────────────────

/// Smallest Ez value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_minimum_ez_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.minimum_ez()?)) })
}

/// Largest Ez value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_maximum_ez_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.maximum_ez()?)) })
}

/// Electric field energy in joules per meter of depth.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_field_energy_e_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.field_energy_e()?)) })
}

/// Magnetic field energy in joules per meter of depth.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_field_energy_b_get(handle: u64, out: *mut f64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.field_energy_b()?)) })
}

// ── memory ─────────────────────────────────────────────────────

/// Byte offset of the solver region from the arena base.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_address_get(handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.address() as u64)) })
}

/// Byte length of the solver region.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_bytesize_get(handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.bytesize() as u64)) })
}

/// Base pointer of the simulator's arena.
///
/// Valid until the simulator is destroyed. Reads through it race with
/// concurrent calls on the same handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_arena_base_get(handle: u64, out: *mut *const u8) -> i32 {
    ffi_guard!({ query(handle, out, |sim| Ok(sim.arena().base_ptr())) })
}

// ── rendering ──────────────────────────────────────────────────

/// Reserve (or reuse) a zeroed `width` × `height` image buffer.
/// `offset_out` (nullable) receives its byte offset from the arena base.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_init_data_buffer(
    handle: u64,
    width: u32,
    height: u32,
    offset_out: *mut u64,
) -> i32 {
    ffi_guard!({
        with_simulator(handle, |sim| {
            let image = sim.init_data_buffer(width as usize, height as usize)?;
            write_optional(offset_out, image.region().offset() as u64);
            Ok(())
        })
    })
}

/// Rasterise Ez into the image buffer.
///
/// With `use_auto_range` non-zero the field extrema span the colormap,
/// otherwise `[min, max]` does. `min_out`/`max_out` (nullable) receive
/// the range used.
#[no_mangle]
#[allow(unsafe_code)]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn tmz_render_ez(
    handle: u64,
    width: u32,
    height: u32,
    use_color_map: u8,
    use_auto_range: u8,
    min: f64,
    max: f64,
    min_out: *mut f64,
    max_out: *mut f64,
) -> i32 {
    ffi_guard!({
        let options = RenderOptions::from_flags(use_color_map != 0, use_auto_range != 0, min, max);
        with_simulator(handle, |sim| {
            let (lo, hi) = sim.render_ez(width as usize, height as usize, options)?;
            write_optional(min_out, lo);
            write_optional(max_out, hi);
            Ok(())
        })
    })
}

/// Draw the colormap calibration ramp into the image buffer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_render_test_pattern(
    handle: u64,
    width: u32,
    height: u32,
    use_color_map: u8,
) -> i32 {
    ffi_guard!({
        let colormap = Colormap::from_flag(use_color_map != 0);
        with_simulator(handle, |sim| {
            Ok(sim.render_test_pattern(width as usize, height as usize, colormap)?)
        })
    })
}

/// Copy the image buffer's pixels into a caller-allocated buffer.
///
/// Returns `BufferTooSmall` if `buf_len` is less than width·height of
/// the last [`tmz_init_data_buffer`] call.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn tmz_image_read(handle: u64, buf: *mut u32, buf_len: usize) -> i32 {
    ffi_guard!({
        if buf.is_null() {
            return TmzStatus::InvalidArgument as i32;
        }
        with_simulator(handle, |sim| {
            let pixels = sim.image_pixels().ok_or(TmzStatus::NoImageBuffer)?;
            if buf_len < pixels.len() {
                return Err(TmzStatus::BufferTooSmall);
            }
            // SAFETY: buf points to buf_len valid u32 values.
            unsafe { std::ptr::copy_nonoverlapping(pixels.as_ptr(), buf, pixels.len()) };
            Ok(())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::TmzCommandType;
    use crate::types::{TmzAxis, TmzBoundary, TmzSourceKind};

    const OK: i32 = TmzStatus::Ok as i32;

    fn create(nx: u32, ny: u32) -> u64 {
        let mut raw = TmzSimulatorConfig {
            nx: 0,
            ny: 0,
            arena_bytes: 0,
            courant_factor: 0.0,
            filter_half_width: 0,
            source_kind: 0,
            source_ppw: 0.0,
            source_amplitude: 0.0,
            source_additive: 0,
        };
        assert_eq!(crate::config::tmz_simulator_config_default(&mut raw), OK);
        raw.nx = nx;
        raw.ny = ny;
        let mut h = 0;
        assert_eq!(tmz_simulator_create(&raw, &mut h), OK);
        h
    }

    fn create_initialised(nx: u32, ny: u32) -> u64 {
        let h = create(nx, ny);
        assert_eq!(tmz_init_solver(h, 0.0, 0.0, 1e-3), OK);
        h
    }

    #[test]
    fn create_step_destroy_lifecycle() {
        let h = create_initialised(32, 24);
        assert_eq!(tmz_run(h, 10), OK);
        let mut metrics = TmzStepMetrics::default();
        assert_eq!(tmz_step_metrics_get(h, &mut metrics), OK);
        assert_eq!(metrics.steps, 10);
        assert_eq!(metrics.cells, 32 * 24);
        assert_eq!(tmz_simulator_destroy(h), OK);
        assert_eq!(tmz_step(h), TmzStatus::InvalidHandle as i32);
        assert_eq!(tmz_simulator_destroy(h), TmzStatus::InvalidHandle as i32);
    }

    #[test]
    fn null_config_uses_defaults() {
        let mut h = 0;
        assert_eq!(tmz_simulator_create(std::ptr::null(), &mut h), OK);
        assert_eq!(tmz_nx(h), 200);
        assert_eq!(tmz_ny(h), 120);
        tmz_simulator_destroy(h);
    }

    #[test]
    fn null_out_pointers_rejected() {
        assert_eq!(
            tmz_simulator_create(std::ptr::null(), std::ptr::null_mut()),
            TmzStatus::InvalidArgument as i32
        );
        let h = create(8, 8);
        assert_eq!(
            tmz_nx_get(h, std::ptr::null_mut()),
            TmzStatus::InvalidArgument as i32
        );
        assert_eq!(
            tmz_image_read(h, std::ptr::null_mut(), 0),
            TmzStatus::InvalidArgument as i32
        );
        tmz_simulator_destroy(h);
    }

    #[test]
    fn invalid_config_reports_config_error() {
        let mut raw = TmzSimulatorConfig::from(&SimulatorConfig::new(0, 4));
        let mut h = 0;
        assert_eq!(
            tmz_simulator_create(&raw, &mut h),
            TmzStatus::ConfigError as i32
        );
        raw.nx = 4;
        raw.courant_factor = 2.0;
        assert_eq!(
            tmz_simulator_create(&raw, &mut h),
            TmzStatus::ConfigError as i32
        );
    }

    #[test]
    fn queries_before_init_report_not_initialized() {
        let h = create(16, 16);
        let mut v = -1.0;
        assert_eq!(
            tmz_delta_get(h, &mut v),
            TmzStatus::NotInitialized as i32
        );
        assert_eq!(v, -1.0, "out must not be written on error");
        assert_eq!(tmz_step(h), TmzStatus::NotInitialized as i32);
        tmz_simulator_destroy(h);
    }

    #[test]
    fn geometry_getters_after_init() {
        let h = create_initialised(16, 12);
        let (mut nx, mut ny) = (0, 0);
        assert_eq!(tmz_nx_get(h, &mut nx), OK);
        assert_eq!(tmz_ny_get(h, &mut ny), OK);
        assert_eq!((nx, ny), (16, 12));
        let (mut delta, mut dt, mut s) = (0.0, 0.0, 0.0);
        assert_eq!(tmz_delta_get(h, &mut delta), OK);
        assert_eq!(tmz_timestep_get(h, &mut dt), OK);
        assert_eq!(tmz_courant_factor_get(h, &mut s), OK);
        assert_eq!(delta, 1e-3);
        let expected = s * delta / tmz_vacuum_velocity();
        assert!((dt - expected).abs() <= 1e-12 * expected);
        assert!((tmz_vacuum_impedance() - 376.73).abs() < 0.01);
        let (mut x0, mut x1, mut y0, mut y1) = (0.0, 0.0, 0.0, 0.0);
        assert_eq!(tmz_grid_bounds_get(h, &mut x0, &mut x1, &mut y0, &mut y1), OK);
        assert_eq!(x0, 0.0);
        assert_eq!(y0, 0.0);
        assert!(x1 > x0 && y1 > y0);
        tmz_simulator_destroy(h);
    }

    #[test]
    fn boundary_set_get_cycle() {
        let h = create_initialised(8, 8);
        assert_eq!(
            tmz_boundary_set(h, TmzAxis::X as i32, TmzBoundary::Pec as i32),
            OK
        );
        let mut kind = -1;
        assert_eq!(tmz_boundary_get(h, TmzAxis::X as i32, &mut kind), OK);
        assert_eq!(kind, TmzBoundary::Pec as i32);
        assert_eq!(tmz_boundary_cycle(h, TmzAxis::X as i32, &mut kind), OK);
        assert_eq!(kind, TmzBoundary::Periodic as i32);
        assert_eq!(
            tmz_boundary_set(h, 7, TmzBoundary::Pec as i32),
            TmzStatus::InvalidArgument as i32
        );
        assert_eq!(
            tmz_boundary_get(h, TmzAxis::Y as i32, std::ptr::null_mut()),
            TmzStatus::InvalidArgument as i32
        );
        tmz_simulator_destroy(h);
    }

    #[test]
    fn damping_and_vacuum_toggle() {
        let h = create_initialised(8, 8);
        let mut vacuum = 9;
        assert_eq!(tmz_is_vacuum_get(h, &mut vacuum), OK);
        assert_eq!(vacuum, 1);
        let mut applied = 0.0;
        assert_eq!(tmz_set_damping(h, 10.0, &mut applied), OK);
        assert_eq!(applied, 10.0);
        assert_eq!(tmz_set_damping(h, -3.0, &mut applied), OK);
        assert_eq!(applied, 1.0);
        assert_eq!(tmz_is_vacuum_get(h, &mut vacuum), OK);
        assert_eq!(vacuum, 0);
        assert_eq!(tmz_set_vacuum(h), OK);
        assert_eq!(tmz_is_vacuum_get(h, &mut vacuum), OK);
        assert_eq!(vacuum, 1);
        tmz_simulator_destroy(h);
    }

    #[test]
    fn source_controls_round_trip() {
        let h = create_initialised(20, 20);
        assert_eq!(tmz_source_kind_set(h, TmzSourceKind::Ricker as i32), OK);
        let mut kind = -1;
        assert_eq!(tmz_source_kind_get(h, &mut kind), OK);
        assert_eq!(kind, TmzSourceKind::Ricker as i32);
        assert_eq!(
            tmz_source_kind_set(h, 42),
            TmzStatus::InvalidArgument as i32
        );

        let mut ppw = 0.0;
        assert_eq!(tmz_source_ppw_get(h, &mut ppw), OK);
        let mut tuned = 0.0;
        assert_eq!(tmz_source_tune(h, 5.0, &mut tuned), OK);
        assert_eq!(tuned, ppw + 5.0);

        assert_eq!(tmz_source_place(h, 5e-3, 7e-3), OK);
        let (mut x, mut y) = (0.0, 0.0);
        assert_eq!(tmz_source_position_get(h, &mut x, &mut y), OK);
        assert!((x - 5e-3).abs() < 1e-12 && (y - 7e-3).abs() < 1e-12);

        assert_eq!(tmz_source_additive_set(h, 0), OK);
        let mut additive = 9;
        assert_eq!(tmz_source_additive_get(h, &mut additive), OK);
        assert_eq!(additive, 0);
        tmz_simulator_destroy(h);
    }

    #[test]
    fn gaussian_and_diagnostics() {
        let h = create_initialised(32, 32);
        assert_eq!(tmz_source_kind_set(h, TmzSourceKind::Off as i32), OK);
        assert_eq!(tmz_drop_gaussian(h, 16.0, 16.0), OK);
        let (mut lo, mut hi, mut e, mut b) = (0.0, 0.0, 0.0, 0.0);
        assert_eq!(tmz_minimum_ez_get(h, &mut lo), OK);
        assert_eq!(tmz_maximum_ez_get(h, &mut hi), OK);
        assert_eq!(tmz_field_energy_e_get(h, &mut e), OK);
        assert_eq!(tmz_field_energy_b_get(h, &mut b), OK);
        assert!(hi > 0.0 && lo >= 0.0);
        assert!(e > 0.0);
        assert_eq!(b, 0.0);
        assert_eq!(tmz_apply_halfband_filter(h), OK);
        let mut filtered = 0.0;
        assert_eq!(tmz_maximum_ez_get(h, &mut filtered), OK);
        assert!(filtered > 0.0 && (filtered - hi).abs() < 0.05 * hi);
        tmz_simulator_destroy(h);
    }

    #[test]
    fn commands_apply_in_order_and_stop_at_first_error() {
        let h = create_initialised(16, 16);
        let cmds = [
            TmzCommand {
                command_type: TmzCommandType::SetBoundary as i32,
                axis: TmzAxis::Y as i32,
                kind: TmzBoundary::Absorbing as i32,
                ..TmzCommand::default()
            },
            TmzCommand {
                command_type: TmzCommandType::Step as i32,
                ..TmzCommand::default()
            },
            TmzCommand {
                command_type: 77,
                ..TmzCommand::default()
            },
            TmzCommand {
                command_type: TmzCommandType::Step as i32,
                ..TmzCommand::default()
            },
        ];
        let mut applied = 99;
        assert_eq!(
            tmz_apply_commands(h, cmds.as_ptr(), cmds.len(), &mut applied),
            TmzStatus::InvalidArgument as i32
        );
        assert_eq!(applied, 2);
        let mut kind = -1;
        assert_eq!(tmz_boundary_get(h, TmzAxis::Y as i32, &mut kind), OK);
        assert_eq!(kind, TmzBoundary::Absorbing as i32);
        let mut metrics = TmzStepMetrics::default();
        assert_eq!(tmz_step_metrics_get(h, &mut metrics), OK);
        assert_eq!(metrics.steps, 1);

        assert_eq!(
            tmz_apply_commands(h, std::ptr::null(), 0, std::ptr::null_mut()),
            OK
        );
        assert_eq!(
            tmz_apply_commands(h, std::ptr::null(), 3, std::ptr::null_mut()),
            TmzStatus::InvalidArgument as i32
        );
        tmz_simulator_destroy(h);
    }

    #[test]
    fn render_pipeline() {
        let h = create_initialised(24, 16);
        assert_eq!(
            tmz_render_ez(h, 8, 4, 1, 1, 0.0, 0.0, std::ptr::null_mut(), std::ptr::null_mut()),
            TmzStatus::NoImageBuffer as i32
        );

        let mut offset = 0;
        assert_eq!(tmz_init_data_buffer(h, 8, 4, &mut offset), OK);
        let (mut address, mut bytesize) = (0, 0);
        assert_eq!(tmz_address_get(h, &mut address), OK);
        assert_eq!(tmz_bytesize_get(h, &mut bytesize), OK);
        assert!(offset >= address + bytesize);

        assert_eq!(tmz_drop_gaussian(h, 12.0, 8.0), OK);
        let (mut lo, mut hi) = (0.0, 0.0);
        assert_eq!(tmz_render_ez(h, 8, 4, 1, 1, 0.0, 0.0, &mut lo, &mut hi), OK);
        assert!(hi > lo);
        assert_eq!(
            tmz_render_ez(h, 16, 16, 1, 1, 0.0, 0.0, std::ptr::null_mut(), std::ptr::null_mut()),
            TmzStatus::BufferTooSmall as i32
        );

        let mut small = [0u32; 4];
        assert_eq!(
            tmz_image_read(h, small.as_mut_ptr(), small.len()),
            TmzStatus::BufferTooSmall as i32
        );
        let mut pixels = [0u32; 32];
        assert_eq!(tmz_image_read(h, pixels.as_mut_ptr(), pixels.len()), OK);
        assert!(pixels.iter().all(|&p| p >> 24 == 0xff));

        assert_eq!(tmz_render_test_pattern(h, 8, 4, 0), OK);
        assert_eq!(tmz_image_read(h, pixels.as_mut_ptr(), pixels.len()), OK);
        assert_ne!(pixels[0], pixels[7]);

        let mut base: *const u8 = std::ptr::null();
        assert_eq!(tmz_arena_base_get(h, &mut base), OK);
        assert!(!base.is_null());
        tmz_simulator_destroy(h);
    }

    #[test]
    fn simulators_are_independent() {
        let a = create_initialised(8, 8);
        let b = create_initialised(12, 10);
        assert_eq!(tmz_run(a, 3), OK);
        let mut ma = TmzStepMetrics::default();
        let mut mb = TmzStepMetrics::default();
        assert_eq!(tmz_step_metrics_get(a, &mut ma), OK);
        assert_eq!(tmz_step_metrics_get(b, &mut mb), OK);
        assert_eq!(ma.steps, 3);
        assert_eq!(mb.steps, 0);
        tmz_simulator_destroy(a);
        assert_eq!(tmz_step(b), OK);
        tmz_simulator_destroy(b);
    }
}
