/// Simple custom benchmarking without criterion
use std::time::Instant;

use macfluid::solver::{advect_velocity, enforce_boundaries, project};
use macfluid::{CellType, FluidSolver, Grid, SolverParams};

fn time_it<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    // Warmup
    for _ in 0..5 {
        f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    println!("{}: {:.3}ms avg ({} iterations)", name, avg_ms, iterations);
}

fn swirl_grid(size: usize) -> Grid {
    let mut grid = Grid::new(size, size);
    let center = size as f32 * 0.5;
    for y in 0..size {
        for x in 0..size {
            let cell = &mut grid[(x, y)];
            cell.cell_type = CellType::Fluid;
            cell.vel = [-(y as f32 + 0.5 - center), x as f32 + 0.5 - center];
        }
    }
    enforce_boundaries(&mut grid);
    grid
}

fn main() {
    println!("\n=== Grid Solver Benchmarks ===\n");

    println!("--- Advection ---");
    for &size in &[32, 64, 128] {
        let mut grid = swirl_grid(size);
        time_it(&format!("advect_velocity ({size}x{size})"), 20, || {
            advect_velocity(&mut grid, 1.0 / 30.0);
        });
    }

    println!("\n--- Projection ---");
    for &size in &[32, 64, 128] {
        let template = swirl_grid(size);
        time_it(&format!("project ({size}x{size}, 200 sweeps)"), 10, || {
            let mut grid = template.clone();
            project(&mut grid, 1.0 / 30.0, 200, 1e-4);
        });
    }

    println!("\n--- Full Frames ---");
    for &size in &[16, 32, 64] {
        let extent = size as f32;
        let Ok(mut solver) = FluidSolver::with_params(extent, extent, SolverParams::default())
        else {
            continue;
        };
        time_it(&format!("advance_frame ({size}x{size})"), 10, || {
            solver.advance_frame();
            solver.draw(&mut |_: &Grid, _: &macfluid::ParticleSet| {});
        });
    }

    println!("\n=== Benchmark Complete ===\n");
}
