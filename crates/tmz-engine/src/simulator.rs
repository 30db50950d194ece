//! The host-facing simulator.
//!
//! [`Simulator`] is the one object a host talks to. It owns the arena, so
//! the solver region and the host image buffer can never come from
//! different arenas, and every solver call that needs the arena is
//! forwarded with it.
//!
//! # Ownership model
//!
//! All mutating methods take `&mut self`; diagnostics take `&self`. The
//! arena is never cleared while a simulator lives, so the solver region
//! reported by [`address`](Simulator::address) and
//! [`bytesize`](Simulator::bytesize) is stable from creation to drop.

use tmz_arena::{MemoryArena, Region, RegionLayout};
use tmz_core::constants::{vacuum_impedance, vacuum_velocity};
use tmz_core::{Axis, BoundaryKind, SolverCommand, SourceKind, StepError};
use tmz_render::{Colormap, RenderError, RenderOptions};
use tmz_solver::{FieldGrid, FieldSummary, GridGeometry, Solver, StepMetrics};
use tracing::{debug, info};

use crate::config::SimulatorConfig;
use crate::error::SimError;

/// A host pixel buffer reserved in the simulator's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    region: Region,
    width: usize,
    height: usize,
}

impl ImageBuffer {
    /// Arena region holding the pixels.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels the region can hold.
    pub fn capacity(&self) -> usize {
        self.region.len() / std::mem::size_of::<u32>()
    }
}

/// One solver, its arena, and an optional image buffer.
///
/// # Examples
///
/// ```
/// use tmz_core::{Axis, BoundaryKind, SolverCommand, SourceKind};
/// use tmz_engine::{Simulator, SimulatorConfig};
///
/// let mut sim = Simulator::new(SimulatorConfig::new(32, 32)).unwrap();
/// sim.init_solver(0.0, 0.0, 1.0e-3).unwrap();
/// sim.apply(SolverCommand::SetSourceKind(SourceKind::Off)).unwrap();
/// sim.apply(SolverCommand::DropGaussian { x: 16.0, y: 16.0 }).unwrap();
/// sim.apply(SolverCommand::SetBoundary { axis: Axis::X, kind: BoundaryKind::Periodic }).unwrap();
/// for _ in 0..10 {
///     sim.apply(SolverCommand::Step).unwrap();
/// }
/// assert_eq!(sim.last_metrics().steps, 10);
/// ```
#[derive(Debug)]
pub struct Simulator {
    arena: MemoryArena,
    solver: Solver,
    image: Option<ImageBuffer>,
}

impl Simulator {
    /// Validate `config`, allocate the arena and reserve the solver region.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut arena = MemoryArena::new(config.arena_config());
        let solver = Solver::new(&mut arena, config.solver_config())?;
        info!(
            nx = config.nx,
            ny = config.ny,
            arena_bytes = arena.capacity(),
            solver_bytes = solver.bytesize(),
            "simulator created"
        );
        Ok(Self {
            arena,
            solver,
            image: None,
        })
    }

    // ── lifecycle ──────────────────────────────────────────────

    /// Set origin and cell size, zero all state and restore source
    /// defaults. Boundary policies and the medium survive a re-init. Until
    /// this succeeds, field operations return
    /// [`StepError::NotInitialized`].
    pub fn init_solver(&mut self, origin_x: f64, origin_y: f64, delta: f64) -> Result<(), SimError> {
        self.solver.init(&mut self.arena, origin_x, origin_y, delta)?;
        Ok(())
    }

    /// Zero fields and restart source timing.
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.solver.reset(&mut self.arena)?;
        Ok(())
    }

    /// Advance one timestep.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.solver.step(&mut self.arena)?;
        Ok(())
    }

    /// Advance `n` timesteps.
    pub fn run(&mut self, n: u64) -> Result<(), SimError> {
        self.solver.run(&mut self.arena, n)?;
        Ok(())
    }

    /// Dispatch one host command to the matching mutator.
    pub fn apply(&mut self, command: SolverCommand) -> Result<(), SimError> {
        match command {
            SolverCommand::Step => self.step(),
            SolverCommand::Reset => self.reset(),
            SolverCommand::SetBoundary { axis, kind } => {
                self.set_boundary(axis, kind);
                Ok(())
            }
            SolverCommand::CycleBoundary { axis } => {
                self.cycle_boundary(axis);
                Ok(())
            }
            SolverCommand::SetVacuum => self.set_vacuum(),
            SolverCommand::SetDamping { skin_length } => self.set_damping(skin_length).map(|_| ()),
            SolverCommand::MoveSource { dx, dy } => self.move_source(dx, dy),
            SolverCommand::PlaceSource { x, y } => self.place_source(x, y),
            SolverCommand::SetSourceKind(kind) => {
                self.set_source_kind(kind);
                Ok(())
            }
            SolverCommand::TuneSource { delta_ppw } => {
                self.tune_source(delta_ppw);
                Ok(())
            }
            SolverCommand::SetSourceAdditive(additive) => {
                self.set_source_additive(additive);
                Ok(())
            }
            SolverCommand::DropGaussian { x, y } => self.drop_gaussian(x, y),
            SolverCommand::ApplyHalfbandFilter => self.apply_halfband_filter(),
        }
    }

    /// Dispatch commands in order, stopping at the first error.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = SolverCommand>,
    ) -> Result<(), SimError> {
        commands.into_iter().try_for_each(|c| self.apply(c))
    }

    // ── geometry and physics ───────────────────────────────────

    /// Cells along x.
    pub fn nx(&self) -> u32 {
        self.solver.nx()
    }

    /// Cells along y.
    pub fn ny(&self) -> u32 {
        self.solver.ny()
    }

    /// Geometry of the last successful init.
    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.solver.geometry()
    }

    /// Cell size, in meters.
    pub fn delta(&self) -> Result<f64, SimError> {
        Ok(self.require_geometry()?.delta())
    }

    /// Timestep, in seconds.
    pub fn timestep(&self) -> Result<f64, SimError> {
        Ok(self.require_geometry()?.timestep())
    }

    /// Courant factor `S`.
    pub fn courant_factor(&self) -> f64 {
        self.solver.courant_factor()
    }

    /// Impedance of free space, in ohms.
    pub fn vacuum_impedance(&self) -> f64 {
        vacuum_impedance()
    }

    /// Speed of light in free space, in m/s.
    pub fn vacuum_velocity(&self) -> f64 {
        vacuum_velocity()
    }

    /// Simulated time since the last init or reset, in seconds.
    pub fn elapsed_time(&self) -> f64 {
        self.solver.elapsed_time()
    }

    /// Metrics of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        self.solver.metrics()
    }

    // ── boundaries ─────────────────────────────────────────────

    /// Boundary policy of `axis`.
    pub fn boundary(&self, axis: Axis) -> BoundaryKind {
        self.solver.boundary(axis)
    }

    /// Set the boundary policy of `axis`.
    pub fn set_boundary(&mut self, axis: Axis, kind: BoundaryKind) {
        self.solver.set_boundary(axis, kind);
    }

    /// Advance `axis` to the next policy. Returns the new policy.
    pub fn cycle_boundary(&mut self, axis: Axis) -> BoundaryKind {
        let kind = self.solver.boundary(axis).next();
        self.solver.set_boundary(axis, kind);
        kind
    }

    // ── medium ─────────────────────────────────────────────────

    /// Whether the medium is lossless.
    pub fn is_vacuum(&self) -> bool {
        self.solver.is_vacuum()
    }

    /// Remove all loss.
    pub fn set_vacuum(&mut self) -> Result<(), SimError> {
        self.solver.set_vacuum(&mut self.arena)?;
        Ok(())
    }

    /// Uniform loss with the given skin length. Returns the clamped value.
    pub fn set_damping(&mut self, skin_length: f64) -> Result<f64, SimError> {
        Ok(self.solver.set_damping(&mut self.arena, skin_length)?)
    }

    /// Uniform relative permeability and permittivity.
    pub fn set_uniform_medium(&mut self, mu_r: f64, eps_r: f64) -> Result<(), SimError> {
        self.solver.set_uniform_medium(&mut self.arena, mu_r, eps_r)?;
        Ok(())
    }

    // ── source ─────────────────────────────────────────────────

    /// Shift the source by `(dx, dy)` meters.
    pub fn move_source(&mut self, dx: f64, dy: f64) -> Result<(), SimError> {
        self.solver.move_source(dx, dy)?;
        Ok(())
    }

    /// Place the source at `(x, y)` meters.
    pub fn place_source(&mut self, x: f64, y: f64) -> Result<(), SimError> {
        self.solver.place_source(x, y)?;
        Ok(())
    }

    /// Source position, in meters.
    pub fn source_position(&self) -> (f64, f64) {
        self.solver.source().position()
    }

    /// Source injection cell.
    pub fn source_cell(&self) -> (usize, usize) {
        self.solver.source().cell()
    }

    /// Current waveform.
    pub fn source_kind(&self) -> SourceKind {
        self.solver.source().kind()
    }

    /// Select the waveform.
    pub fn set_source_kind(&mut self, kind: SourceKind) {
        self.solver.set_source_kind(kind);
    }

    /// Adjust points per wavelength. Returns the new value.
    pub fn tune_source(&mut self, delta_ppw: f64) -> f64 {
        self.solver.tune_source(delta_ppw)
    }

    /// Points per wavelength.
    pub fn source_ppw(&self) -> f64 {
        self.solver.source().ppw()
    }

    /// Select additive or hardwired injection.
    pub fn set_source_additive(&mut self, additive: bool) {
        self.solver.set_source_additive(additive);
    }

    /// Whether injection is additive.
    pub fn is_source_additive(&self) -> bool {
        self.solver.is_source_additive()
    }

    // ── field edits ────────────────────────────────────────────

    /// Add the default Gaussian bump at fractional cell `(x, y)`.
    pub fn drop_gaussian(&mut self, x: f64, y: f64) -> Result<(), SimError> {
        self.solver.drop_gaussian(&mut self.arena, x, y)?;
        Ok(())
    }

    /// Add a Gaussian bump of width `sigma` cells and peak `amplitude`.
    pub fn drop_gaussian_with(
        &mut self,
        x: f64,
        y: f64,
        sigma: f64,
        amplitude: f64,
    ) -> Result<(), SimError> {
        self.solver
            .drop_gaussian_with(&mut self.arena, x, y, sigma, amplitude)?;
        Ok(())
    }

    /// Mutable Ez, for loading initial conditions.
    pub fn ez_mut(&mut self) -> Result<&mut [f64], SimError> {
        Ok(self.solver.ez_mut(&mut self.arena)?)
    }

    /// Halfband-filter Ez once.
    pub fn apply_halfband_filter(&mut self) -> Result<(), SimError> {
        self.solver.apply_halfband_filter(&mut self.arena)?;
        Ok(())
    }

    // ── diagnostics ────────────────────────────────────────────

    /// Read-only fields. Available before init.
    pub fn fields(&self) -> Result<FieldGrid<'_>, SimError> {
        Ok(self.solver.fields(&self.arena)?)
    }

    /// Smallest Ez.
    pub fn minimum_ez(&self) -> Result<f64, SimError> {
        Ok(self.solver.minimum_ez(&self.arena)?)
    }

    /// Largest Ez.
    pub fn maximum_ez(&self) -> Result<f64, SimError> {
        Ok(self.solver.maximum_ez(&self.arena)?)
    }

    /// Electric field energy.
    pub fn field_energy_e(&self) -> Result<f64, SimError> {
        Ok(self.solver.field_energy_e(&self.arena)?)
    }

    /// Magnetic field energy.
    pub fn field_energy_b(&self) -> Result<f64, SimError> {
        Ok(self.solver.field_energy_b(&self.arena)?)
    }

    /// Electric plus magnetic energy.
    pub fn total_energy(&self) -> Result<f64, SimError> {
        Ok(self.summary()?.total_energy())
    }

    /// Extrema and energies in one pass.
    pub fn summary(&self) -> Result<FieldSummary, SimError> {
        Ok(self.solver.summary(&self.arena)?)
    }

    // ── memory ─────────────────────────────────────────────────

    /// Byte offset of the solver region in the arena.
    pub fn address(&self) -> usize {
        self.solver.address()
    }

    /// Byte length of the solver region.
    pub fn bytesize(&self) -> usize {
        self.solver.bytesize()
    }

    /// The arena, for hosts that read buffers in place.
    pub fn arena(&self) -> &MemoryArena {
        &self.arena
    }

    /// The solver.
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    // ── rendering ──────────────────────────────────────────────

    /// Reserve (or reuse) a zeroed `width` × `height` pixel buffer after
    /// the solver region.
    ///
    /// An existing buffer is reused when it is large enough; otherwise a
    /// new region is reserved and the old one is abandoned.
    pub fn init_data_buffer(&mut self, width: usize, height: usize) -> Result<ImageBuffer, SimError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height }.into());
        }
        let pixels = width
            .checked_mul(height)
            .ok_or(RenderError::EmptyImage { width, height })?;
        let region = match self.image {
            Some(image) if image.capacity() >= pixels => image.region,
            _ => {
                let region = self.arena.reserve(RegionLayout::array::<u32>(pixels)?)?;
                debug!(
                    offset = region.offset(),
                    bytes = region.len(),
                    "image buffer reserved"
                );
                region
            }
        };
        self.arena
            .view_mut::<u32>(&region)
            .ok_or(StepError::StaleRegion)?
            .fill(0);
        let image = ImageBuffer {
            region,
            width,
            height,
        };
        self.image = Some(image);
        Ok(image)
    }

    /// The image buffer, if one was reserved.
    pub fn image(&self) -> Option<ImageBuffer> {
        self.image
    }

    /// The first `width·height` pixels of the image buffer.
    pub fn image_pixels(&self) -> Option<&[u32]> {
        let image = self.image?;
        let pixels = self.arena.view::<u32>(&image.region)?;
        pixels.get(..image.width * image.height)
    }

    /// Rasterise Ez into the image buffer at `width` × `height`.
    ///
    /// Returns the value range mapped onto the colormap.
    pub fn render_ez(
        &mut self,
        width: usize,
        height: usize,
        options: RenderOptions,
    ) -> Result<(f64, f64), SimError> {
        let image = self.image_for(width, height)?;
        let solver_region = self.solver.region();
        let (data, pixels) = self
            .arena
            .split_views::<f64, u32>(&solver_region, &image.region)
            .ok_or(StepError::StaleRegion)?;
        let grid = FieldGrid::split(self.solver.layout(), data).ok_or(StepError::StaleRegion)?;
        Ok(tmz_render::render_ez(&grid, pixels, width, height, options)?)
    }

    /// Rasterise Ez into a caller-owned buffer.
    pub fn render_ez_into(
        &self,
        pixels: &mut [u32],
        width: usize,
        height: usize,
        options: RenderOptions,
    ) -> Result<(f64, f64), SimError> {
        let grid = self.solver.fields(&self.arena)?;
        Ok(tmz_render::render_ez(&grid, pixels, width, height, options)?)
    }

    /// Draw the colormap calibration ramp into the image buffer.
    pub fn render_test_pattern(
        &mut self,
        width: usize,
        height: usize,
        colormap: Colormap,
    ) -> Result<(), SimError> {
        let image = self.image_for(width, height)?;
        let pixels = self
            .arena
            .view_mut::<u32>(&image.region)
            .ok_or(StepError::StaleRegion)?;
        tmz_render::render_test_pattern(pixels, width, height, colormap)?;
        Ok(())
    }

    fn image_for(&self, width: usize, height: usize) -> Result<ImageBuffer, SimError> {
        let image = self.image.ok_or(SimError::NoImageBuffer)?;
        let required = width.saturating_mul(height);
        if required > image.capacity() {
            return Err(SimError::BufferTooSmall {
                required,
                provided: image.capacity(),
            });
        }
        Ok(image)
    }

    fn require_geometry(&self) -> Result<&GridGeometry, SimError> {
        self.solver
            .geometry()
            .ok_or(SimError::Step(StepError::NotInitialized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmz_render::pack_rgba;

    fn sim(n: u32) -> Simulator {
        let mut s = Simulator::new(SimulatorConfig::new(n, n)).unwrap();
        s.init_solver(0.0, 0.0, 1e-3).unwrap();
        s
    }

    #[test]
    fn address_is_stable_and_valid_before_init() {
        let s = Simulator::new(SimulatorConfig::new(16, 8)).unwrap();
        let (addr, size) = (s.address(), s.bytesize());
        assert!(size > 0);
        let mut s = s;
        s.init_solver(1.0, 2.0, 0.5).unwrap();
        s.run(3).unwrap();
        assert_eq!((s.address(), s.bytesize()), (addr, size));
    }

    #[test]
    fn queries_before_init_fail() {
        let mut s = Simulator::new(SimulatorConfig::new(8, 8)).unwrap();
        assert_eq!(s.step(), Err(SimError::Step(StepError::NotInitialized)));
        assert!(s.delta().is_err());
        assert!(s.maximum_ez().is_err());
        assert_eq!(s.nx(), 8);
    }

    #[test]
    fn invalid_config_rejected() {
        let err = Simulator::new(SimulatorConfig {
            arena_bytes: 64,
            ..SimulatorConfig::new(32, 32)
        })
        .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn cycle_boundary_walks_all_kinds() {
        let mut s = sim(8);
        assert_eq!(s.boundary(Axis::X), BoundaryKind::Pec);
        s.apply(SolverCommand::CycleBoundary { axis: Axis::X }).unwrap();
        assert_eq!(s.boundary(Axis::X), BoundaryKind::Periodic);
        assert_eq!(s.cycle_boundary(Axis::X), BoundaryKind::Absorbing);
        assert_eq!(s.cycle_boundary(Axis::X), BoundaryKind::Pec);
        assert_eq!(s.boundary(Axis::Y), BoundaryKind::Pec);
    }

    #[test]
    fn commands_reach_setters() {
        let mut s = sim(16);
        let ppw = s.source_ppw();
        s.apply_all([
            SolverCommand::SetSourceKind(SourceKind::Ricker),
            SolverCommand::TuneSource { delta_ppw: 2.0 },
            SolverCommand::SetSourceAdditive(false),
            SolverCommand::SetDamping { skin_length: 10.0 },
        ])
        .unwrap();
        assert_eq!(s.source_kind(), SourceKind::Ricker);
        assert_eq!(s.source_ppw(), ppw + 2.0);
        assert!(!s.is_source_additive());
        assert!(!s.is_vacuum());
        s.apply(SolverCommand::SetVacuum).unwrap();
        assert!(s.is_vacuum());
    }

    #[test]
    fn move_source_uses_meters() {
        let mut s = sim(16);
        let (x0, y0) = s.source_position();
        s.apply(SolverCommand::MoveSource { dx: 2e-3, dy: -1e-3 }).unwrap();
        let (x1, y1) = s.source_position();
        assert!((x1 - x0 - 2e-3).abs() < 1e-12);
        assert!((y1 - y0 + 1e-3).abs() < 1e-12);
    }

    #[test]
    fn image_buffer_sits_after_solver() {
        let mut s = sim(8);
        let image = s.init_data_buffer(10, 6).unwrap();
        assert!(image.region().offset() >= s.address() + s.bytesize());
        assert_eq!(s.image_pixels().map(<[u32]>::len), Some(60));
        assert!(s.image_pixels().unwrap().iter().all(|&p| p == 0));
        // A smaller buffer reuses the region.
        let again = s.init_data_buffer(5, 5).unwrap();
        assert_eq!(again.region(), image.region());
        let bigger = s.init_data_buffer(20, 20).unwrap();
        assert_ne!(bigger.region(), image.region());
    }

    #[test]
    fn render_requires_buffer_of_sufficient_size() {
        let mut s = sim(8);
        assert_eq!(
            s.render_ez(4, 4, RenderOptions::default()),
            Err(SimError::NoImageBuffer)
        );
        s.init_data_buffer(4, 4).unwrap();
        assert_eq!(
            s.render_ez(8, 4, RenderOptions::default()),
            Err(SimError::BufferTooSmall {
                required: 32,
                provided: 16
            })
        );
    }

    #[test]
    fn render_writes_into_arena() {
        let mut s = sim(16);
        s.set_source_kind(SourceKind::Off);
        s.drop_gaussian(8.0, 8.0).unwrap();
        s.init_data_buffer(16, 16).unwrap();
        let (min, max) = s
            .render_ez(16, 16, RenderOptions::from_flags(false, true, 0.0, 0.0))
            .unwrap();
        assert_eq!(min, 0.0);
        assert!(max > 0.9);
        let pixels = s.image_pixels().unwrap();
        assert!(pixels.iter().all(|p| p >> 24 == 0xff));
        assert!(pixels.contains(&pack_rgba(255, 255, 255, 255)));

        let mut host = vec![0u32; 256];
        s.render_ez_into(&mut host, 16, 16, RenderOptions::from_flags(false, true, 0.0, 0.0))
            .unwrap();
        assert_eq!(host.as_slice(), s.image_pixels().unwrap());
    }

    #[test]
    fn test_pattern_fills_buffer() {
        let mut s = sim(4);
        s.init_data_buffer(8, 2).unwrap();
        s.render_test_pattern(8, 2, Colormap::Viridis).unwrap();
        let pixels = s.image_pixels().unwrap();
        assert!(pixels.iter().all(|&p| p != 0));
        assert_ne!(pixels[0], pixels[7]);
    }

    #[test]
    fn vacuum_constants() {
        let s = sim(4);
        assert!((s.vacuum_impedance() - 376.73).abs() < 0.01);
        assert!((s.vacuum_velocity() - 2.998e8).abs() < 1e5);
    }
}
