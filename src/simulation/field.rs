//! Dense pheromone field with deposition, diffusion, and evaporation.
//!
//! The field holds one grid of non-negative concentrations per channel.
//! Ants deposit into the cell nearest a world position and sample
//! concentrations bilinearly at arbitrary continuous coordinates. Each tick
//! the field diffuses with an explicit 4-neighbor stencil into a scratch
//! buffer (read-old/write-new, then swap) and evaporates multiplicatively,
//! so concentrations can never go negative or turn into NaN.

use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

/// Upper bound on the per-tick diffusion rate of the explicit scheme.
///
/// At rates above 1/4 the 4-neighbor stencil oscillates and can produce
/// negative concentrations.
pub const DIFFUSION_STABILITY_BOUND: f32 = 0.25;

/// One named pheromone channel diffusing independently over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    /// Trail toward food, laid by ants carrying food back to the nest.
    Food,
    /// Trail toward the nest area, laid by empty-handed ants.
    Home,
}

impl Channel {
    /// All channels, in grid storage order.
    pub const ALL: [Channel; 2] = [Channel::Food, Channel::Home];

    /// Grid storage index of this channel.
    pub fn index(self) -> usize {
        match self {
            Channel::Food => 0,
            Channel::Home => 1,
        }
    }
}

/// A dense 2D grid of scalar pheromone concentrations per channel.
#[derive(Debug, Clone)]
pub struct PheromoneField {
    cell_size: f32,
    cells_x: usize,
    cells_y: usize,
    world_width: f32,
    world_height: f32,
    grids: Vec<Array2<f32>>,
    scratch: Array2<f32>,
    evaporation_rate: f32,
    diffusion_rate: f32,
    cell_cap: f32,
}

impl PheromoneField {
    /// Creates a field covering a `world_width` x `world_height` area.
    ///
    /// Rates outside their stability ranges are configuration errors; they
    /// are rejected here once rather than checked every tick.
    pub fn new(
        world_width: f32,
        world_height: f32,
        cell_size: f32,
        evaporation_rate: f32,
        diffusion_rate: f32,
        cell_cap: f32,
    ) -> Result<Self> {
        if !(world_width > 0.0 && world_height > 0.0) {
            return Err(SimError::config(
                "world_width/world_height",
                format!("{world_width}x{world_height}"),
                "field dimensions must be positive",
            ));
        }
        if cell_size <= 0.0 {
            return Err(SimError::config(
                "cell_size",
                cell_size,
                "cell size must be positive",
            ));
        }
        if !(evaporation_rate > 0.0 && evaporation_rate < 1.0) {
            return Err(SimError::config(
                "evaporation_rate",
                evaporation_rate,
                "evaporation rate must lie in (0, 1)",
            ));
        }
        if !(0.0..=DIFFUSION_STABILITY_BOUND).contains(&diffusion_rate) {
            return Err(SimError::config(
                "diffusion_rate",
                diffusion_rate,
                "diffusion rate must lie in [0, 0.25]",
            ));
        }
        if cell_cap <= 0.0 {
            return Err(SimError::config(
                "cell_cap",
                cell_cap,
                "cell cap must be positive",
            ));
        }

        let cells_x = ((world_width / cell_size).ceil() as usize).max(1);
        let cells_y = ((world_height / cell_size).ceil() as usize).max(1);

        Ok(Self {
            cell_size,
            cells_x,
            cells_y,
            world_width,
            world_height,
            grids: Channel::ALL
                .iter()
                .map(|_| Array2::zeros((cells_x, cells_y)))
                .collect(),
            scratch: Array2::zeros((cells_x, cells_y)),
            evaporation_rate,
            diffusion_rate,
            cell_cap,
        })
    }

    /// Grid dimensions in cells, as (width, height).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cells_x, self.cells_y)
    }

    /// Side length of one grid cell in world units.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Saturation ceiling for a single cell.
    pub fn cell_cap(&self) -> f32 {
        self.cell_cap
    }

    /// Adds `amount` to the grid cell nearest `position` for the channel.
    ///
    /// Non-positive amounts and out-of-bounds positions are no-ops. The
    /// cell saturates at the configured cap instead of growing without
    /// bound.
    pub fn deposit(&mut self, channel: Channel, position: &ndarray::Array1<f32>, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        let Some((x, y)) = self.cell_at(position[0], position[1]) else {
            return;
        };
        let grid = &mut self.grids[channel.index()];
        grid[[x, y]] = (grid[[x, y]] + amount).min(self.cell_cap);
    }

    /// Bilinearly interpolated concentration at a continuous coordinate.
    ///
    /// The interpolation runs between the four nearest cell centers and is
    /// clamped at the grid border, so sampling exactly on a cell that holds
    /// value `v` returns `v`. Positions outside the world return 0.
    pub fn sample(&self, channel: Channel, position: &ndarray::Array1<f32>) -> f32 {
        let (x, y) = (position[0], position[1]);
        if x < 0.0 || y < 0.0 || x > self.world_width || y > self.world_height {
            return 0.0;
        }

        let gx = (x / self.cell_size - 0.5).clamp(0.0, (self.cells_x - 1) as f32);
        let gy = (y / self.cell_size - 0.5).clamp(0.0, (self.cells_y - 1) as f32);
        let x0 = gx.floor() as usize;
        let y0 = gy.floor() as usize;
        let x1 = (x0 + 1).min(self.cells_x - 1);
        let y1 = (y0 + 1).min(self.cells_y - 1);
        let tx = gx - x0 as f32;
        let ty = gy - y0 as f32;

        let grid = &self.grids[channel.index()];
        let low = grid[[x0, y0]] * (1.0 - tx) + grid[[x1, y0]] * tx;
        let high = grid[[x0, y1]] * (1.0 - tx) + grid[[x1, y1]] * tx;
        low * (1.0 - ty) + high * ty
    }

    /// Advances the field by `dt`: diffusion first, then evaporation.
    ///
    /// Diffusion reads the old buffer and writes the scratch buffer so the
    /// result is independent of cell visit order. Neighbors outside the
    /// grid are excluded from the stencil, which keeps total mass exactly
    /// conserved by diffusion; only evaporation removes mass.
    pub fn step(&mut self, dt: f32) {
        let rate = (self.diffusion_rate * dt).min(DIFFUSION_STABILITY_BOUND);
        let keep = (1.0 - self.evaporation_rate).powf(dt);
        let (cells_x, cells_y) = (self.cells_x, self.cells_y);

        for grid in &mut self.grids {
            if rate > 0.0 {
                let src: &Array2<f32> = grid;
                Zip::indexed(&mut self.scratch).par_for_each(|(x, y), out| {
                    let center = src[[x, y]];
                    let mut acc = 0.0;
                    let mut neighbors = 0.0f32;
                    if x > 0 {
                        acc += src[[x - 1, y]];
                        neighbors += 1.0;
                    }
                    if x + 1 < cells_x {
                        acc += src[[x + 1, y]];
                        neighbors += 1.0;
                    }
                    if y > 0 {
                        acc += src[[x, y - 1]];
                        neighbors += 1.0;
                    }
                    if y + 1 < cells_y {
                        acc += src[[x, y + 1]];
                        neighbors += 1.0;
                    }
                    *out = center + rate * (acc - neighbors * center);
                });
                std::mem::swap(grid, &mut self.scratch);
            }

            grid.mapv_inplace(|v| v * keep);
        }
    }

    /// Total concentration summed over every cell of a channel.
    pub fn total_mass(&self, channel: Channel) -> f32 {
        self.grids[channel.index()].sum()
    }

    /// Read-only view of a channel's grid, for visualization consumers.
    pub fn grid(&self, channel: Channel) -> ArrayView2<'_, f32> {
        self.grids[channel.index()].view()
    }

    fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 || x > self.world_width || y > self.world_height {
            return None;
        }
        let cx = ((x / self.cell_size).floor() as usize).min(self.cells_x - 1);
        let cy = ((y / self.cell_size).floor() as usize).min(self.cells_y - 1);
        Some((cx, cy))
    }
}
