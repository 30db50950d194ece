//! End-to-end physical scenarios driven through the simulator API.

use proptest::prelude::*;
use tmz_core::constants::vacuum_velocity;
use tmz_core::{Axis, BoundaryKind, SolverCommand, SourceKind};
use tmz_engine::{Simulator, SimulatorConfig};
use tmz_test_utils::{
    gaussian_pulse, load_column_profile, quiet_simulator, relative_change, total_energy,
    TEST_CELL_SIZE,
};

// ── energy ───────────────────────────────────────────────────────

#[test]
fn pec_vacuum_conserves_energy() {
    let mut sim = gaussian_pulse(64, BoundaryKind::Pec);
    let e0 = total_energy(&sim);
    assert!(e0 > 0.0);
    for step in 0..200 {
        let e = total_energy(&sim);
        assert!(
            relative_change(e0, e) < 1e-9,
            "step {step}: energy {e} vs initial {e0}"
        );
        sim.step().unwrap();
    }
}

#[test]
fn periodic_dielectric_conserves_energy() {
    let mut sim = gaussian_pulse(40, BoundaryKind::Periodic);
    sim.set_uniform_medium(2.0, 3.0).unwrap();
    let e0 = total_energy(&sim);
    for step in 0..150 {
        sim.step().unwrap();
        let e = total_energy(&sim);
        assert!(relative_change(e0, e) < 1e-9, "step {step}: {e} vs {e0}");
    }
}

#[test]
fn damping_never_adds_energy() {
    let mut sim = gaussian_pulse(48, BoundaryKind::Pec);
    let used = sim.set_damping(10.0).unwrap();
    assert_eq!(used, 10.0);
    let e_start = total_energy(&sim);
    let slack = 1e-12 * e_start;
    let mut prev = e_start;
    for step in 0..200 {
        sim.step().unwrap();
        let e = total_energy(&sim);
        assert!(e <= prev + slack, "step {step}: {e} > {prev}");
        prev = e;
    }
    assert!(prev < 0.1 * e_start, "final {prev}, start {e_start}");
}

#[test]
fn damping_decays_plane_wave_over_skin_length() {
    // A one-row strip with a periodic y axis carries a plane wave along x.
    let mut sim = quiet_simulator(400, 1, BoundaryKind::Periodic);
    sim.set_boundary(Axis::X, BoundaryKind::Absorbing);
    sim.set_source_kind(SourceKind::Mono);
    sim.place_source(200.0 * TEST_CELL_SIZE, 0.0).unwrap();
    assert_eq!(sim.source_cell(), (200, 0));
    assert_eq!(sim.set_damping(10.0).unwrap(), 10.0);
    sim.run(650).unwrap();
    let (mut near, mut far) = (0.0f64, 0.0f64);
    for _ in 0..150 {
        sim.step().unwrap();
        let g = sim.fields().unwrap();
        near = near.max(g.ez_at(230, 0).abs());
        far = far.max(g.ez_at(240, 0).abs());
    }
    let ratio = far / near;
    assert!(
        (ratio - (-1.0f64).exp()).abs() < 0.02,
        "amplitude ratio over 10 cells: {ratio}"
    );
}

#[test]
fn vacuum_restores_lossless_update() {
    let mut sim = gaussian_pulse(32, BoundaryKind::Pec);
    sim.set_damping(3.0).unwrap();
    sim.set_vacuum().unwrap();
    assert!(sim.is_vacuum());
    let e0 = total_energy(&sim);
    sim.run(60).unwrap();
    assert!(relative_change(e0, total_energy(&sim)) < 0.02);
}

// ── propagation ──────────────────────────────────────────────────

fn column_peak(sim: &Simulator, columns: std::ops::Range<u32>) -> f64 {
    let g = sim.fields().unwrap();
    let row = g.ny() / 2;
    columns
        .map(|ix| g.ez_at(ix as usize, row))
        .fold(0.0, f64::max)
}

#[test]
fn periodic_plane_wave_wraps_to_opposite_edge() {
    let mut sim = quiet_simulator(64, 16, BoundaryKind::Periodic);
    load_column_profile(&mut sim, 8.0, 3.0);
    sim.run(30).unwrap();
    // The left-going half leaves through x = 0 and comes back near x = 51.
    let peak = column_peak(&sim, 40..60);
    assert!(peak > 0.3, "wrapped peak {peak}");
}

#[test]
fn pec_x_wall_reflects_instead_of_wrapping() {
    let mut sim = quiet_simulator(64, 16, BoundaryKind::Periodic);
    sim.set_boundary(Axis::X, BoundaryKind::Pec);
    load_column_profile(&mut sim, 8.0, 3.0);
    sim.run(30).unwrap();
    let peak = column_peak(&sim, 40..60);
    assert!(peak < 0.05, "unexpected pulse {peak}");
}

#[test]
fn gaussian_drop_scenario() {
    let mut sim = gaussian_pulse(64, BoundaryKind::Pec);
    assert!(sim.is_vacuum());
    let e0 = total_energy(&sim);
    sim.step().unwrap();
    {
        let g = sim.fields().unwrap();
        assert_ne!(g.ez_at(32, 32), 0.0);
        assert_ne!(g.hx_at(32, 31), 0.0);
        assert_ne!(g.hx_at(32, 32), 0.0);
        assert_ne!(g.hy_at(31, 32), 0.0);
        assert_ne!(g.hy_at(32, 32), 0.0);
    }
    // Mean squared distance from the drop point, weighted by Ez².
    let spread = |sim: &Simulator| {
        let g = sim.fields().unwrap();
        let (mut weighted, mut total) = (0.0, 0.0);
        for iy in 0..64 {
            for ix in 0..64 {
                let w = g.ez_at(ix, iy).powi(2);
                let (dx, dy) = (ix as f64 - 32.0, iy as f64 - 32.0);
                weighted += w * (dx * dx + dy * dy);
                total += w;
            }
        }
        weighted / total
    };
    let before = spread(&sim);
    sim.run(29).unwrap();
    let after = spread(&sim);
    assert!(after > 4.0 * before, "spread {before} -> {after}");
    sim.run(70).unwrap();
    assert!(relative_change(e0, total_energy(&sim)) < 0.01);
}

#[test]
fn mono_source_radiates_from_its_cell() {
    let mut sim = quiet_simulator(48, 48, BoundaryKind::Absorbing);
    sim.set_source_kind(SourceKind::Mono);
    sim.place_source(10.0 * TEST_CELL_SIZE, 20.0 * TEST_CELL_SIZE)
        .unwrap();
    assert_eq!(sim.source_cell(), (10, 20));
    sim.run(20).unwrap();
    let g = sim.fields().unwrap();
    let near = g.ez_at(12, 20).abs();
    let far = g.ez_at(40, 40).abs();
    assert!(near > 0.0);
    assert_eq!(far, 0.0);
}

// ── lifecycle ────────────────────────────────────────────────────

#[test]
fn reset_zeroes_fields_and_is_idempotent() {
    let mut sim = quiet_simulator(32, 32, BoundaryKind::Absorbing);
    sim.set_source_kind(SourceKind::Square);
    sim.run(25).unwrap();
    assert!(sim.maximum_ez().unwrap() != 0.0 || sim.minimum_ez().unwrap() != 0.0);

    sim.reset().unwrap();
    assert_eq!(sim.minimum_ez().unwrap(), 0.0);
    assert_eq!(sim.maximum_ez().unwrap(), 0.0);
    let once = sim.fields().unwrap().ez().to_vec();
    let phase_once = sim.solver().source().phase();

    sim.apply(SolverCommand::Reset).unwrap();
    assert_eq!(sim.fields().unwrap().ez(), once.as_slice());
    assert_eq!(sim.solver().source().phase(), phase_once);
    assert_eq!(sim.last_metrics().steps, 0);
    assert_eq!(sim.elapsed_time(), 0.0);
    assert_eq!(sim.source_kind(), SourceKind::Square);
    assert_eq!(sim.boundary(Axis::X), BoundaryKind::Absorbing);
}

#[test]
fn reset_then_rerun_is_reproducible() {
    let run = |sim: &mut Simulator| {
        sim.run(40).unwrap();
        sim.fields().unwrap().ez().to_vec()
    };
    let mut sim = quiet_simulator(24, 24, BoundaryKind::Pec);
    sim.set_source_kind(SourceKind::Square);
    let first = run(&mut sim);
    sim.reset().unwrap();
    let second = run(&mut sim);
    assert_eq!(first, second);
}

#[test]
fn geometry_is_invariant_under_stepping() {
    let mut sim = Simulator::new(SimulatorConfig::new(40, 30)).unwrap();
    sim.init_solver(-0.5, 0.25, 2.5e-3).unwrap();
    let dt = sim.timestep().unwrap();
    let expected = sim.courant_factor() * 2.5e-3 / vacuum_velocity();
    assert!((dt - expected).abs() <= 1e-15 * expected);
    sim.run(50).unwrap();
    assert_eq!((sim.nx(), sim.ny()), (40, 30));
    assert_eq!(sim.delta().unwrap(), 2.5e-3);
    assert_eq!(sim.timestep().unwrap(), dt);
    assert!((sim.elapsed_time() - 50.0 * dt).abs() < 1e-9 * dt);
}

// ── source clamping ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placed_source_stays_in_bounds(x in -1.0e3f64..1.0e3, y in -1.0e3f64..1.0e3) {
        let mut sim = quiet_simulator(20, 12, BoundaryKind::Pec);
        sim.place_source(x, y).unwrap();
        let g = *sim.geometry().unwrap();
        let (px, py) = sim.source_position();
        prop_assert!(px >= g.xmin() && px <= g.xmax());
        prop_assert!(py >= g.ymin() && py <= g.ymax());
        let (ix, iy) = sim.source_cell();
        prop_assert!(ix < 20 && iy < 12);
    }

    #[test]
    fn moved_source_stays_in_bounds(moves in prop::collection::vec((-0.05f64..0.05, -0.05f64..0.05), 1..20)) {
        let mut sim = quiet_simulator(20, 12, BoundaryKind::Pec);
        for (dx, dy) in moves {
            sim.move_source(dx, dy).unwrap();
            let (ix, iy) = sim.source_cell();
            prop_assert!(ix < 20 && iy < 12);
        }
    }

    #[test]
    fn tuning_keeps_minimum_ppw(deltas in prop::collection::vec(-50.0f64..50.0, 1..30)) {
        let mut sim = quiet_simulator(8, 8, BoundaryKind::Pec);
        for d in deltas {
            let ppw = sim.tune_source(d);
            prop_assert!(ppw >= 2.0);
            prop_assert_eq!(ppw, sim.source_ppw());
        }
    }
}
