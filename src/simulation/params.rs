use serde::{Deserialize, Serialize};

use super::brain::{ACTION_COUNT, SENSOR_COUNT};
use super::error::{Result, SimError};
use super::field::DIFFUSION_STABILITY_BOUND;

/// Simulation parameters that control world, agent, and evolution behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Simulation area width in world units.
    pub world_width: f32,
    /// Simulation area height in world units.
    pub world_height: f32,
    /// Radius of the nest area where food is delivered.
    pub nest_radius: f32,

    /// Side length of one pheromone grid cell in world units.
    pub cell_size: f32,
    /// Fraction of pheromone lost per second, in (0, 1).
    pub evaporation_rate: f32,
    /// Diffusion rate per second, in [0, 0.25] (explicit-scheme stability bound).
    pub diffusion_rate: f32,
    /// Saturation ceiling for a single pheromone cell.
    pub cell_cap: f32,
    /// Pheromone amount deposited at full emission strength.
    pub deposit_amount: f32,

    /// Maximum ant movement speed in world units per second.
    pub max_speed: f32,
    /// Maximum turn rate in radians per second.
    pub max_turn_rate: f32,
    /// Maximum distance an ant can see food.
    pub sensor_radius: f32,
    /// Distance from the ant to its pheromone probe points.
    pub probe_distance: f32,
    /// Angular offset of the left/right probe points, in radians.
    pub probe_angle: f32,
    /// Distance within which an ant can pick up food.
    pub pickup_radius: f32,
    /// Energy an ant starts with.
    pub initial_energy: f32,
    /// Energy drained per second while alive.
    pub base_drain: f32,
    /// Additional energy drained per second while carrying food.
    pub carry_drain: f32,
    /// Maximum lifetime of an ant in simulation seconds.
    pub max_age: f32,

    /// Hidden layer sizes of the brain network. Input and output sizes are
    /// fixed by the sensor and action contracts.
    pub hidden_layers: Vec<usize>,
    /// Scale of the uniform distribution used for initial weights.
    pub init_weight_scale: f32,

    /// Target ant population, restored exactly at every generation boundary.
    pub population_size: usize,
    /// Ticks per generation before the evolutionary step runs.
    pub generation_length: u32,
    /// Fraction of the population carried over unchanged, in [0, 1).
    pub elite_fraction: f32,
    /// Number of contestants per tournament selection round, at least 2.
    pub tournament_size: usize,
    /// Probability that any single weight is perturbed during mutation.
    pub mutation_rate: f32,
    /// Standard deviation of the Gaussian mutation noise.
    pub mutation_magnitude: f32,
    /// Fitness awarded per unit of food delivered to the nest.
    pub delivery_reward: f32,
    /// Fitness awarded per second survived.
    pub survival_weight: f32,
    /// Weight of the distance-efficiency fitness term.
    pub efficiency_weight: f32,

    /// Number of food sources placed at world creation.
    pub initial_food_sources: usize,
    /// Units of food in a freshly spawned source.
    pub food_source_quantity: u32,
    /// Food sources spawned per second during the simulation.
    pub food_spawn_rate: f32,
    /// Spread of new sources clustered around an existing one.
    pub food_cluster_spread: f32,
    /// Minimum distance between a fresh source and the nest.
    pub food_min_nest_distance: f32,

    /// Fixed timestep used by the headless driver, in seconds.
    pub tick_dt: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            world_width: 1200.0,
            world_height: 800.0,
            nest_radius: 50.0,

            cell_size: 10.0,
            evaporation_rate: 0.05,
            diffusion_rate: 0.05,
            cell_cap: 100.0,
            deposit_amount: 10.0,

            max_speed: 60.0,
            max_turn_rate: std::f32::consts::PI,
            sensor_radius: 50.0,
            probe_distance: 12.0,
            probe_angle: std::f32::consts::FRAC_PI_4,
            pickup_radius: 10.0,
            initial_energy: 1.0,
            base_drain: 0.008,
            carry_drain: 0.004,
            max_age: 150.0,

            hidden_layers: vec![16, 32, 16],
            init_weight_scale: 0.1,

            population_size: 50,
            generation_length: 2000,
            elite_fraction: 0.1,
            tournament_size: 5,
            mutation_rate: 0.1,
            mutation_magnitude: 0.1,
            delivery_reward: 10.0,
            survival_weight: 0.1,
            efficiency_weight: 5.0,

            initial_food_sources: 12,
            food_source_quantity: 20,
            food_spawn_rate: 0.2,
            food_cluster_spread: 50.0,
            food_min_nest_distance: 150.0,

            tick_dt: 0.05,
        }
    }
}

impl Params {
    /// Full layer size list of the brain network, input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(SENSOR_COUNT);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(ACTION_COUNT);
        sizes
    }

    /// Validates every parameter range. Construction-time only; the per-tick
    /// code assumes a validated configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(SimError::config(
                "world_width/world_height",
                format!("{}x{}", self.world_width, self.world_height),
                "world dimensions must be positive",
            ));
        }
        if self.cell_size <= 0.0 {
            return Err(SimError::config(
                "cell_size",
                self.cell_size,
                "cell size must be positive",
            ));
        }
        if !(self.evaporation_rate > 0.0 && self.evaporation_rate < 1.0) {
            return Err(SimError::config(
                "evaporation_rate",
                self.evaporation_rate,
                "evaporation rate must lie in (0, 1)",
            ));
        }
        if !(0.0..=DIFFUSION_STABILITY_BOUND).contains(&self.diffusion_rate) {
            return Err(SimError::config(
                "diffusion_rate",
                self.diffusion_rate,
                "diffusion rate must lie in [0, 0.25]",
            ));
        }
        if self.cell_cap <= 0.0 {
            return Err(SimError::config(
                "cell_cap",
                self.cell_cap,
                "cell cap must be positive",
            ));
        }
        if self.max_speed <= 0.0 {
            return Err(SimError::config(
                "max_speed",
                self.max_speed,
                "maximum speed must be positive",
            ));
        }
        if self.initial_energy <= 0.0 {
            return Err(SimError::config(
                "initial_energy",
                self.initial_energy,
                "initial energy must be positive",
            ));
        }
        if self.init_weight_scale <= 0.0 {
            return Err(SimError::config(
                "init_weight_scale",
                self.init_weight_scale,
                "initial weight scale must be positive",
            ));
        }
        if self.hidden_layers.iter().any(|&n| n == 0) {
            return Err(SimError::config(
                "hidden_layers",
                format!("{:?}", self.hidden_layers),
                "hidden layers must be non-empty",
            ));
        }
        if self.population_size == 0 {
            return Err(SimError::config(
                "population_size",
                self.population_size,
                "population size must be positive",
            ));
        }
        if self.generation_length == 0 {
            return Err(SimError::config(
                "generation_length",
                self.generation_length,
                "generation length must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.elite_fraction) {
            return Err(SimError::config(
                "elite_fraction",
                self.elite_fraction,
                "elite fraction must lie in [0, 1)",
            ));
        }
        if self.tournament_size < 2 {
            return Err(SimError::config(
                "tournament_size",
                self.tournament_size,
                "tournament needs at least 2 contestants",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SimError::config(
                "mutation_rate",
                self.mutation_rate,
                "mutation rate must lie in [0, 1]",
            ));
        }
        if self.mutation_magnitude < 0.0 {
            return Err(SimError::config(
                "mutation_magnitude",
                self.mutation_magnitude,
                "mutation magnitude must be non-negative",
            ));
        }
        if self.tick_dt <= 0.0 {
            return Err(SimError::config(
                "tick_dt",
                self.tick_dt,
                "tick timestep must be positive",
            ));
        }
        Ok(())
    }
}
