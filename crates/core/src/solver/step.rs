//! Synchronous, row-parallel cellular automaton step
//!
//! The next grid is computed entirely from the immutable current grid and
//! written into a separate buffer. Each row of the output is produced by one
//! rayon task with its own RNG stream, so a cell never observes a neighbour
//! that has already transitioned in the same step.

use rand::Rng;
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::core_types::weather::WeatherCondition;
use crate::grid::{neighbors, CellState, TerrainCell, TerrainGrid};

use super::rng;
use super::spread::{burn_intensity, consumption_rate, ignition_probability, spread_rate};

/// Inputs shared by every row of one step
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub weather: &'a WeatherCondition,
    pub dt: f64,
    pub config: &'a SimulationConfig,
    /// Simulation seed
    pub seed: u64,
    /// Index of the step being computed
    pub step: u64,
}

/// Compute `next` from `current`
///
/// Both grids must have the same dimensions. Every cell of `next` is
/// overwritten. Inputs are assumed validated by the caller.
pub fn advance(current: &TerrainGrid, next: &mut TerrainGrid, ctx: &StepContext<'_>) {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());
    if current.is_empty() {
        return;
    }

    let width = current.width();
    next.cells_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = rng::row_rng(ctx.seed, ctx.step, y);
            for (x, out) in row.iter_mut().enumerate() {
                *out = next_cell(current, x, y, ctx, &mut rng);
            }
        });
}

/// Next state of the cell at `(x, y)`
fn next_cell<R: Rng>(
    current: &TerrainGrid,
    x: usize,
    y: usize,
    ctx: &StepContext<'_>,
    rng: &mut R,
) -> TerrainCell {
    let cell = current.cells()[current.index(x, y)];
    match cell.state {
        CellState::Burning => consume_fuel(cell, ctx),
        CellState::Vegetation if cell.fuel_remaining > ctx.config.burnout_threshold => {
            try_ignite(current, cell, x, y, ctx, rng)
        }
        CellState::Vegetation | CellState::Empty | CellState::Burnt => cell,
    }
}

/// Burn down a burning cell; it burns out below the threshold
fn consume_fuel(mut cell: TerrainCell, ctx: &StepContext<'_>) -> TerrainCell {
    let config = ctx.config;
    let consumed = consumption_rate(cell.fuel_load, config) * ctx.dt;
    cell.fuel_remaining = (cell.fuel_remaining - consumed).max(0.0);

    if cell.fuel_remaining < config.burnout_threshold {
        cell.state = CellState::Burnt;
        cell.burn_intensity = 0.0;
    } else {
        cell.burn_intensity = burn_intensity(cell.fuel_load, cell.fuel_remaining, config);
    }
    cell
}

/// One Bernoulli trial per burning neighbour; the first success ignites
fn try_ignite<R: Rng>(
    current: &TerrainGrid,
    mut cell: TerrainCell,
    x: usize,
    y: usize,
    ctx: &StepContext<'_>,
    rng: &mut R,
) -> TerrainCell {
    let cells = current.cells();
    for (nx, ny) in neighbors(x, y, current.width(), current.height()) {
        let source = &cells[current.index(nx, ny)];
        if !source.is_ignited() {
            continue;
        }

        // Offset is target - source
        let dx = x as f64 - nx as f64;
        let dy = y as f64 - ny as f64;
        let rate = spread_rate(source, &cell, dx, dy, ctx.weather, ctx.config);
        let p = ignition_probability(rate, ctx.dt, ctx.config);

        if rng.random::<f64>() < p {
            cell.state = CellState::Burning;
            break;
        }
    }
    cell
}
