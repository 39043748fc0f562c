use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{MAX_GRID_CELLS, RESET_PRESSURE, SolverParams};
use crate::error::SolverError;
use crate::math::{Real, inv_exact};
use crate::render::FluidRenderer;
use crate::solver::{
    PressureReport, advect_particles, apply_body_force, enforce_boundaries, project,
    stage_advected_velocity,
};

use super::cell::CellType;
use super::grid::Grid;
use super::particle_set::ParticleSet;

/// Requests a synchronous `FluidSolver::reset` on the next update.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct ResetSimulation;

/// Lifecycle of the frame currently held by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameState {
    /// Nothing to draw yet
    #[default]
    NotReady,
    /// Sub-steps in progress
    Simulating,
    /// A full frame of simulated time is waiting for `draw`
    Ready,
}

/// Bookkeeping for one `advance_frame` call
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub substeps: u32,
    pub simulated_time: Real,
    /// Projection outcome of the last sub-step
    pub pressure: PressureReport,
}

/// Owns the grid and tracers and drives them one display frame at a time.
#[derive(Resource, Clone, Debug)]
pub struct FluidSolver {
    width: Real,
    height: Real,
    grid: Grid,
    particles: ParticleSet,
    params: SolverParams,
    state: FrameState,
    last_frame: FrameStats,
}

impl FluidSolver {
    pub fn new(width: Real, height: Real) -> Result<Self, SolverError> {
        Self::with_params(width, height, SolverParams::default())
    }

    pub fn with_params(
        width: Real,
        height: Real,
        params: SolverParams,
    ) -> Result<Self, SolverError> {
        let valid = |extent: Real| extent.is_finite() && extent > 0.0;
        if !valid(width) || !valid(height) {
            return Err(SolverError::InvalidDimensions { width, height });
        }
        let cells = (width.ceil() as f64) * (height.ceil() as f64);
        if cells > MAX_GRID_CELLS as f64 {
            return Err(SolverError::TooManyCells { width, height });
        }
        params.validate()?;

        let mut solver = Self {
            width,
            height,
            grid: Grid::from_extent(width, height),
            particles: ParticleSet::new(),
            params,
            state: FrameState::NotReady,
            last_frame: FrameStats::default(),
        };
        solver.reset();
        Ok(solver)
    }

    /// Simulation width, as given at construction
    pub fn width(&self) -> Real {
        self.width
    }

    /// Simulation height, as given at construction
    pub fn height(&self) -> Real {
        self.height
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Swap in new parameters; invalid ones are rejected and the old kept.
    pub fn set_params(&mut self, params: SolverParams) -> Result<(), SolverError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn frame_state(&self) -> FrameState {
        self.state
    }

    pub fn is_frame_ready(&self) -> bool {
        self.state == FrameState::Ready
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Reinitialize to the seeded start state: every cell fluid at unit
    /// pressure with a fixed synthetic velocity field, and a regular lattice
    /// of tracers in each cell. Leaves no frame ready.
    pub fn reset(&mut self) {
        let mut grid = Grid::from_extent(self.width, self.height);
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                let cell = &mut grid[(x, y)];
                cell.cell_type = CellType::Fluid;
                cell.pressure = RESET_PRESSURE;
                cell.vel = seed_velocity(x, y);
            }
        }

        self.particles.clear();
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.particles.seed_cells(
            grid.cols(),
            grid.rows(),
            self.params.tracers_per_axis,
            self.params.tracer_jitter,
            &mut rng,
        );

        self.grid = grid;
        self.state = FrameState::NotReady;
        self.last_frame = FrameStats::default();

        info!(
            "fluid solver reset: {}x{} cells, {} tracers",
            self.grid.cols(),
            self.grid.rows(),
            self.particles.len()
        );
    }

    /// Largest sub-step the CFL bound allows, capped at `remaining`.
    /// A still or non-finite field takes the whole remaining time.
    pub fn stable_time_step(&self, remaining: Real) -> Real {
        let max_speed = self.grid.max_velocity_magnitude();
        if max_speed == 0.0 {
            return remaining;
        }
        let bound = self.params.cfl_coefficient * inv_exact(max_speed);
        if !bound.is_finite() || bound <= 0.0 {
            warn!("non-finite CFL bound (max speed {max_speed}), stepping the rest of the frame");
            return remaining;
        }
        remaining.min(bound)
    }

    /// Simulate one display frame. Does nothing while a previous frame is
    /// still waiting to be drawn.
    pub fn advance_frame(&mut self) -> FrameStats {
        if self.state == FrameState::Ready {
            return FrameStats::default();
        }
        self.state = FrameState::Simulating;

        let mut stats = FrameStats::default();
        let mut remaining = self.params.frame_time;
        while remaining > 0.0 {
            let mut dt = self.stable_time_step(remaining);
            if stats.substeps + 1 >= self.params.max_substeps && dt < remaining {
                warn!(
                    "sub-step cap {} reached, folding {:.3e}s into one step",
                    self.params.max_substeps, remaining
                );
                dt = remaining;
            }

            stats.pressure = self.advance_time_step(dt);
            stats.substeps += 1;
            stats.simulated_time += dt;
            remaining -= dt;
        }

        self.state = FrameState::Ready;
        self.last_frame = stats;
        debug!(
            "frame ready: {} sub-steps, pressure residual {:.3e} after {} sweeps",
            stats.substeps, stats.pressure.residual, stats.pressure.iterations
        );
        stats
    }

    /// One physics sub-step. Stage order matters: each consumes the
    /// previous stage's output.
    ///
    /// The walls are closed before the projection as well as after it, so
    /// the solve never sees flux through a domain edge and the final wall
    /// pass leaves the projected interior faces alone.
    pub fn advance_time_step(&mut self, dt: Real) -> PressureReport {
        stage_advected_velocity(&mut self.grid, dt);
        self.grid.commit_staged_velocities();
        apply_body_force(&mut self.grid, self.params.gravity, dt);
        enforce_boundaries(&mut self.grid);
        let report = project(
            &mut self.grid,
            dt,
            self.params.pressure_iterations,
            self.params.pressure_tolerance,
        );
        enforce_boundaries(&mut self.grid);
        advect_particles(
            &mut self.particles,
            &self.grid,
            dt,
            self.params.clamp_particles,
        );
        report
    }

    /// Hand a ready frame to `renderer` and mark it consumed. Returns whether
    /// anything was drawn.
    pub fn draw<R: FluidRenderer + ?Sized>(&mut self, renderer: &mut R) -> bool {
        if self.state != FrameState::Ready {
            // TODO: redraw the previous frame once frames are retained
            return false;
        }
        renderer.draw_grid(&self.grid, &self.particles);
        self.state = FrameState::NotReady;
        true
    }
}

/// Reproducible start field with components in [-0.5, 0.5]. Arbitrary and
/// divergent on purpose; the projection cleans it up on the first step.
fn seed_velocity(x: usize, y: usize) -> [Real; 2] {
    let (x, y) = (x as f64, y as f64);
    [
        ((x * 45.215 + y * 88.15468).sin() / 2.0) as Real,
        ((x * 2.548 + y * 121.1215).sin() / 2.0) as Real,
    ]
}

pub fn handle_reset_requests(
    mut requests: MessageReader<ResetSimulation>,
    mut solver: ResMut<FluidSolver>,
) {
    let pending = requests.read().count();
    if pending > 0 {
        debug!("reset requested ({pending} pending)");
        solver.reset();
    }
}

pub fn sync_solver_params(params: Res<SolverParams>, mut solver: ResMut<FluidSolver>) {
    if !params.is_changed() || *params == *solver.params() {
        return;
    }
    if let Err(err) = solver.set_params(params.clone()) {
        warn!("ignoring solver parameter update: {err}");
    }
}

pub fn advance_fluid_frame(mut solver: ResMut<FluidSolver>) {
    solver.advance_frame();
}

pub fn draw_fluid_frame<R: FluidRenderer + Resource>(
    mut solver: ResMut<FluidSolver>,
    mut renderer: ResMut<R>,
) {
    solver.draw(&mut *renderer);
}
