//! The solver orchestrator.

use std::time::Instant;

use tmz_arena::{MemoryArena, Region};
use tmz_core::{Axis, BoundaryKind, ConfigError, SolverError, SourceKind, StepCount, StepError};
use tracing::{debug, info};

use crate::boundary::BoundaryConditions;
use crate::config::SolverConfig;
use crate::diagnostics::{self, FieldSummary};
use crate::fields::{FieldGrid, FieldGridMut};
use crate::filter::{FilterEdge, HalfbandFilter};
use crate::geometry::GridGeometry;
use crate::layout::SolverLayout;
use crate::medium::DampingMedium;
use crate::metrics::StepMetrics;
use crate::source::SourceModel;

/// Default Gaussian drop width, in cells.
pub const GAUSSIAN_SIGMA: f64 = 3.0;

/// Default Gaussian drop peak.
pub const GAUSSIAN_AMPLITUDE: f64 = 1.0;

/// One TMz grid and everything that acts on it.
///
/// Array state lives in a region of the arena passed to [`Solver::new`];
/// every method that touches fields takes that arena again. Passing a
/// different arena, or one that was cleared, yields
/// [`StepError::StaleRegion`].
///
/// The region is reserved at construction and never moves, so
/// [`address`](Self::address) and [`bytesize`](Self::bytesize) are valid
/// before [`init`](Self::init). Field operations need a successful init.
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    layout: SolverLayout,
    region: Region,
    geometry: Option<GridGeometry>,
    boundaries: BoundaryConditions,
    source: SourceModel,
    medium: DampingMedium,
    filter: HalfbandFilter,
    steps: StepCount,
    elapsed: f64,
    metrics: StepMetrics,
}

impl Solver {
    /// Validate `config` and reserve the solver region in `arena`.
    pub fn new(arena: &mut MemoryArena, config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        let layout = SolverLayout::new(config.nx, config.ny);
        let region_layout = layout.region_layout()?;
        let region = arena
            .reserve(region_layout)
            .map_err(|_| ConfigError::ArenaTooSmall {
                required: arena.required_for(region_layout),
                capacity: arena.available(),
            })?;
        let filter = HalfbandFilter::new(config.filter_half_width)?;
        let courant = config.courant_factor;
        let solver = Self {
            layout,
            region,
            geometry: None,
            boundaries: BoundaryConditions::new(courant),
            source: SourceModel::new(&config.source, courant),
            medium: DampingMedium::vacuum(),
            filter,
            steps: StepCount::default(),
            elapsed: 0.0,
            metrics: StepMetrics::default(),
            config,
        };
        solver.write_coefficients(arena)?;
        debug!(
            nx = layout.nx(),
            ny = layout.ny(),
            offset = region.offset(),
            bytes = region.len(),
            "solver region reserved"
        );
        Ok(solver)
    }

    /// Set geometry, zero all state and restore source defaults.
    ///
    /// May be called again to change origin or cell size. A re-init keeps
    /// the boundary policies and the medium, including any damping; only
    /// the source returns to its configured defaults. On error the previous
    /// state, if any, is left untouched.
    pub fn init(
        &mut self,
        arena: &mut MemoryArena,
        origin_x: f64,
        origin_y: f64,
        delta: f64,
    ) -> Result<(), SolverError> {
        let geometry = GridGeometry::new(
            self.config.nx,
            self.config.ny,
            origin_x,
            origin_y,
            delta,
            self.config.courant_factor,
        )?;
        let mut g = self.fields_mut(arena)?;
        g.zero_state();
        g.fill_coordinates(&geometry);
        g.fill_coefficients(&self.medium.coefficients(self.config.courant_factor));

        self.source = SourceModel::new(&self.config.source, self.config.courant_factor);
        self.source.center(&geometry);
        self.geometry = Some(geometry);
        self.restart_clock();
        info!(
            nx = geometry.nx(),
            ny = geometry.ny(),
            delta,
            dt = geometry.timestep(),
            "solver initialized"
        );
        Ok(())
    }

    /// Zero fields, edge history and source timing. Geometry, boundaries,
    /// medium and source settings are kept.
    pub fn reset(&mut self, arena: &mut MemoryArena) -> Result<(), StepError> {
        self.require_init()?;
        self.fields_mut(arena)?.zero_state();
        self.source.reset_timing();
        self.restart_clock();
        debug!("solver reset");
        Ok(())
    }

    /// Advance one leapfrog cycle.
    pub fn step(&mut self, arena: &mut MemoryArena) -> Result<(), StepError> {
        let geometry = self.require_init()?;
        let started = Instant::now();
        let mut g = self.fields_mut(arena)?;

        g.update_h();
        self.boundaries.apply_h(&mut g);
        self.boundaries.capture_history(&mut g);
        g.update_ez_interior();
        self.boundaries.update_periodic_edges(&mut g);
        if let Some(value) = self.source.sample() {
            let (ix, iy) = self.source.cell();
            g.inject(ix, iy, value, self.source.injection());
        }
        self.boundaries.apply_ez(&mut g);

        self.source.advance();
        self.steps.0 += 1;
        self.elapsed += geometry.timestep();
        self.metrics = StepMetrics {
            steps: self.steps.0,
            simulated_time_s: self.elapsed,
            step_us: started.elapsed().as_micros() as u64,
            cells: geometry.cells(),
        };
        Ok(())
    }

    /// Run `n` steps.
    pub fn run(&mut self, arena: &mut MemoryArena, n: u64) -> Result<(), StepError> {
        for _ in 0..n {
            self.step(arena)?;
        }
        Ok(())
    }

    // ── geometry ───────────────────────────────────────────────

    /// Cells along x.
    pub fn nx(&self) -> u32 {
        self.config.nx
    }

    /// Cells along y.
    pub fn ny(&self) -> u32 {
        self.config.ny
    }

    /// Geometry, once initialized.
    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref()
    }

    /// Whether `init` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.geometry.is_some()
    }

    /// Courant factor.
    pub fn courant_factor(&self) -> f64 {
        self.config.courant_factor
    }

    /// Configuration the solver was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Steps since init or reset.
    pub fn steps(&self) -> StepCount {
        self.steps
    }

    /// Simulated time since init or reset, in seconds.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    /// Metrics of the last step.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    // ── memory ─────────────────────────────────────────────────

    /// The solver's arena region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Block layout inside the region.
    pub fn layout(&self) -> SolverLayout {
        self.layout
    }

    /// Byte offset of the solver region in its arena.
    pub fn address(&self) -> usize {
        self.region.offset()
    }

    /// Size of the solver region in bytes.
    pub fn bytesize(&self) -> usize {
        self.region.len()
    }

    /// Read-only view of fields and coordinates. Available before init,
    /// when everything is zero.
    pub fn fields<'a>(&self, arena: &'a MemoryArena) -> Result<FieldGrid<'a>, StepError> {
        arena
            .view::<f64>(&self.region)
            .and_then(|data| FieldGrid::split(self.layout, data))
            .ok_or(StepError::StaleRegion)
    }

    /// Mutable Ez, for loading initial conditions.
    pub fn ez_mut<'a>(&self, arena: &'a mut MemoryArena) -> Result<&'a mut [f64], StepError> {
        self.require_init()?;
        let g = self.fields_mut(arena)?;
        Ok(g.ez)
    }

    fn fields_mut<'a>(&self, arena: &'a mut MemoryArena) -> Result<FieldGridMut<'a>, StepError> {
        arena
            .view_mut::<f64>(&self.region)
            .and_then(|data| FieldGridMut::split(self.layout, data))
            .ok_or(StepError::StaleRegion)
    }

    // ── boundaries ─────────────────────────────────────────────

    /// Boundary policy of `axis`.
    pub fn boundary(&self, axis: Axis) -> BoundaryKind {
        self.boundaries.get(axis)
    }

    /// Change the boundary policy of `axis`, effective from the next step.
    pub fn set_boundary(&mut self, axis: Axis, kind: BoundaryKind) {
        self.boundaries.set(axis, kind);
        debug!(%axis, %kind, "boundary changed");
    }

    /// Both boundary policies.
    pub fn boundaries(&self) -> &BoundaryConditions {
        &self.boundaries
    }

    // ── medium ─────────────────────────────────────────────────

    /// Whether the medium is lossless.
    pub fn is_vacuum(&self) -> bool {
        self.medium.is_vacuum()
    }

    /// Current medium.
    pub fn medium(&self) -> &DampingMedium {
        &self.medium
    }

    /// Remove all loss.
    pub fn set_vacuum(&mut self, arena: &mut MemoryArena) -> Result<(), StepError> {
        self.medium.set_vacuum();
        self.write_coefficients(arena)?;
        debug!("medium set to vacuum");
        Ok(())
    }

    /// Uniform loss with a 1/e decay over `skin_length` points at the
    /// current source wavelength. Returns the clamped skin length.
    pub fn set_damping(
        &mut self,
        arena: &mut MemoryArena,
        skin_length: f64,
    ) -> Result<f64, StepError> {
        let used = self.medium.set_damping(skin_length, self.source.ppw());
        self.write_coefficients(arena)?;
        debug!(
            skin_length = used,
            sigma_delta = self.medium.conductivity_delta(),
            "medium set to damping"
        );
        Ok(used)
    }

    /// Uniform relative permeability and permittivity.
    pub fn set_uniform_medium(
        &mut self,
        arena: &mut MemoryArena,
        mu_r: f64,
        eps_r: f64,
    ) -> Result<(), SolverError> {
        self.medium.set_relative(mu_r, eps_r)?;
        self.write_coefficients(arena)?;
        let wave_courant = self.medium.wave_courant(self.config.courant_factor);
        self.boundaries.set_wave_courant(wave_courant);
        debug!(
            mu_r,
            eps_r,
            mur = self.boundaries.mur_coefficient(),
            "medium parameters changed"
        );
        Ok(())
    }

    fn write_coefficients(&self, arena: &mut MemoryArena) -> Result<(), StepError> {
        let coefficients = self.medium.coefficients(self.config.courant_factor);
        self.fields_mut(arena)?.fill_coefficients(&coefficients);
        Ok(())
    }

    // ── source ─────────────────────────────────────────────────

    /// The point source.
    pub fn source(&self) -> &SourceModel {
        &self.source
    }

    /// Shift the source by a physical offset, clamped into the grid.
    pub fn move_source(&mut self, dx: f64, dy: f64) -> Result<(), StepError> {
        let geometry = self.require_init()?;
        self.source.shift(dx, dy, &geometry);
        Ok(())
    }

    /// Place the source at a physical point, clamped into the grid.
    pub fn place_source(&mut self, x: f64, y: f64) -> Result<(), StepError> {
        let geometry = self.require_init()?;
        self.source.place(x, y, &geometry);
        Ok(())
    }

    /// Select the source waveform.
    pub fn set_source_kind(&mut self, kind: SourceKind) {
        self.source.set_kind(kind);
        debug!(%kind, "source waveform changed");
    }

    /// Adjust points per wavelength. Returns the new value.
    pub fn tune_source(&mut self, delta_ppw: f64) -> f64 {
        self.source.tune(delta_ppw)
    }

    /// Select additive or hardwired injection.
    pub fn set_source_additive(&mut self, additive: bool) {
        self.source.set_additive(additive);
    }

    /// Whether injection is additive.
    pub fn is_source_additive(&self) -> bool {
        self.source.injection().is_additive()
    }

    // ── field edits ────────────────────────────────────────────

    /// Add a Gaussian of the default width and peak at `(x, y)` in cell units.
    pub fn drop_gaussian(&mut self, arena: &mut MemoryArena, x: f64, y: f64) -> Result<(), StepError> {
        self.drop_gaussian_with(arena, x, y, GAUSSIAN_SIGMA, GAUSSIAN_AMPLITUDE)
    }

    /// Add `amplitude·exp(-r²/(2σ²))` at `(x, y)` in cell units.
    pub fn drop_gaussian_with(
        &mut self,
        arena: &mut MemoryArena,
        x: f64,
        y: f64,
        sigma: f64,
        amplitude: f64,
    ) -> Result<(), StepError> {
        self.require_init()?;
        let mut g = self.fields_mut(arena)?;
        g.add_gaussian(x, y, sigma, amplitude);
        self.boundaries.pin_pec_edges(&mut g);
        Ok(())
    }

    /// Halfband-filter Ez once. Edge handling follows each axis' boundary;
    /// PEC edges are re-pinned afterwards.
    pub fn apply_halfband_filter(&mut self, arena: &mut MemoryArena) -> Result<(), StepError> {
        self.require_init()?;
        let x_edge = FilterEdge::from(self.boundaries.get(Axis::X));
        let y_edge = FilterEdge::from(self.boundaries.get(Axis::Y));
        let mut g = self.fields_mut(arena)?;
        let (nx, ny) = (g.nx, g.ny);
        self.filter.apply_2d(g.ez, g.line, nx, ny, x_edge, y_edge);
        self.boundaries.pin_pec_edges(&mut g);
        debug!(half_width = self.filter.half_width(), "halfband filter applied");
        Ok(())
    }

    /// The halfband kernel.
    pub fn filter(&self) -> &HalfbandFilter {
        &self.filter
    }

    // ── diagnostics ────────────────────────────────────────────

    /// Smallest Ez.
    pub fn minimum_ez(&self, arena: &MemoryArena) -> Result<f64, StepError> {
        self.require_init()?;
        Ok(diagnostics::minimum_ez(&self.fields(arena)?))
    }

    /// Largest Ez.
    pub fn maximum_ez(&self, arena: &MemoryArena) -> Result<f64, StepError> {
        self.require_init()?;
        Ok(diagnostics::maximum_ez(&self.fields(arena)?))
    }

    /// Electric field energy per unit length.
    pub fn field_energy_e(&self, arena: &MemoryArena) -> Result<f64, StepError> {
        let geometry = self.require_init()?;
        let g = self.fields(arena)?;
        Ok(diagnostics::electric_energy(&g, &self.medium, geometry.delta()))
    }

    /// Magnetic field energy per unit length, time-centred on the current
    /// Ez.
    pub fn field_energy_b(&self, arena: &MemoryArena) -> Result<f64, StepError> {
        let geometry = self.require_init()?;
        let g = self.fields(arena)?;
        Ok(diagnostics::magnetic_energy(
            &g,
            &self.medium,
            &self.boundaries,
            geometry.delta(),
        ))
    }

    /// Extrema and energies in one call.
    pub fn summary(&self, arena: &MemoryArena) -> Result<FieldSummary, StepError> {
        let geometry = self.require_init()?;
        let g = self.fields(arena)?;
        Ok(FieldSummary::scan(
            &g,
            &self.medium,
            &self.boundaries,
            geometry.delta(),
        ))
    }

    fn require_init(&self) -> Result<GridGeometry, StepError> {
        self.geometry.ok_or(StepError::NotInitialized)
    }

    fn restart_clock(&mut self) {
        self.steps = StepCount::default();
        self.elapsed = 0.0;
        self.metrics = StepMetrics::default();
    }
}
