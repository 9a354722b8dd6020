//! Ant behavior, sensing, and lifecycle.
//!
//! Each tick an ant senses the environment, runs its brain, and applies the
//! decoded action to its own state. Everything that touches shared state
//! (pheromone deposits, food pickup, delivery) is returned as events and
//! applied later in stable ant order, so the sensing/decision phase can run
//! in parallel against a read-only world.

use ndarray::Array1;

use super::brain::{ACTION_COUNT, Brain, SENSOR_COUNT};
use super::environment::{FoodIndex, WorldEnvironment};
use super::events::TickEvent;
use super::field::Channel;
use super::geometry;
use super::params::Params;

/// Fitness accumulators tracked over an ant's lifetime.
#[derive(Debug, Clone, Default)]
pub struct FitnessStats {
    /// Units of food delivered to the nest.
    pub delivered: u32,
    /// Total distance traveled, in world units.
    pub distance_traveled: f32,
    /// Time survived, in simulation seconds.
    pub survived_secs: f32,
}

/// Decoded action produced by one brain inference.
#[derive(Debug, Clone, Copy)]
pub struct Action {
    /// Signed turn rate in radians per second.
    pub turn_rate: f32,
    /// Forward speed in world units per second.
    pub speed: f32,
    /// Pheromone amount to deposit this tick; zero or less means none.
    pub emission: f32,
    /// Whether the ant wants to pick up (or drop) food.
    pub interact: bool,
}

impl Action {
    /// Decodes a raw tanh output vector into physical units.
    pub fn decode(raw: &Array1<f32>, params: &Params) -> Self {
        debug_assert_eq!(raw.len(), ACTION_COUNT);
        Self {
            turn_rate: raw[0] * params.max_turn_rate,
            speed: ((raw[1] + 1.0) * 0.5 * params.max_speed).clamp(0.0, params.max_speed),
            emission: raw[2].max(0.0) * params.deposit_amount,
            interact: raw[3] > 0.0,
        }
    }
}

/// An individual ant with a neural network brain.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Stable identifier; the roster is kept in id order.
    pub id: usize,
    /// Position in 2D space, always inside world bounds.
    pub pos: Array1<f32>,
    /// Heading angle in radians, wrapped to [-pi, pi].
    pub heading: f32,
    /// Current speed in world units per second.
    pub speed: f32,
    /// Whether the ant is carrying a unit of food.
    pub carrying: bool,
    /// Remaining energy; the ant dies when it reaches 0.
    pub energy: f32,
    /// Time alive in simulation seconds.
    pub age: f32,
    /// Fitness accumulators for the evolutionary step.
    pub stats: FitnessStats,
    /// Neural network that controls behavior. Exclusively owned; crossover
    /// always produces a fresh copy.
    pub brain: Brain,
}

impl Agent {
    /// Creates an ant at a position with a given brain and heading.
    pub fn new(id: usize, pos: Array1<f32>, heading: f32, initial_energy: f32, brain: Brain) -> Self {
        Self {
            id,
            pos,
            heading,
            speed: 0.0,
            carrying: false,
            energy: initial_energy,
            age: 0.0,
            stats: FitnessStats::default(),
            brain,
        }
    }

    /// Whether the ant is alive.
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Builds the sensor vector from the environment.
    ///
    /// See [`SENSOR_COUNT`](super::brain::SENSOR_COUNT) for the layout.
    pub fn sense(&self, params: &Params, env: &WorldEnvironment, food: &FoodIndex) -> Array1<f32> {
        let mut inputs = Array1::zeros(SENSOR_COUNT);

        let diagonal = (env.width().powi(2) + env.height().powi(2)).sqrt();
        let nest = env.nest_pos();
        inputs[0] = geometry::distance(&self.pos, nest) / diagonal;
        let nest_dir = geometry::unit_to(&self.pos, nest);
        inputs[1] = nest_dir[0];
        inputs[2] = nest_dir[1];

        if let Some((dist, idx)) = food.nearest_within(&self.pos, params.sensor_radius) {
            let source = &env.food_sources[idx];
            inputs[3] = 1.0;
            inputs[4] = (dist / params.sensor_radius).min(1.0);
            let food_dir = geometry::unit_to(&self.pos, &source.pos);
            inputs[5] = food_dir[0];
            inputs[6] = food_dir[1];
        } else {
            inputs[4] = 1.0; // nothing in range reads as maximally distant
        }

        // pheromone concentrations at the ahead/left/right probe points
        let mut slot = 7;
        for channel in [Channel::Food, Channel::Home] {
            for offset in [0.0, params.probe_angle, -params.probe_angle] {
                let probe = &self.pos
                    + &(geometry::heading_vector(self.heading + offset) * params.probe_distance);
                inputs[slot] = env.field.sample(channel, &probe) / params.cell_cap;
                slot += 1;
            }
        }

        inputs[13] = if self.carrying { 1.0 } else { 0.0 };
        inputs[14] = (self.energy / params.initial_energy).clamp(0.0, 1.0);

        inputs
    }

    /// Advances the ant by one tick.
    ///
    /// Mutates only the ant's own state; cross-entity effects come back as
    /// events for the serial application phase. The emission channel is
    /// fixed by carrying state: home pheromone while searching, food
    /// pheromone while hauling.
    pub fn update(
        &mut self,
        dt: f32,
        params: &Params,
        env: &WorldEnvironment,
        food: &FoodIndex,
    ) -> Vec<TickEvent> {
        let sensors = self.sense(params, env, food);
        let raw = self.brain.think(&sensors);
        let action = Action::decode(&raw, params);

        self.heading = geometry::wrap_angle(self.heading + action.turn_rate * dt);
        self.speed = action.speed;

        let previous = self.pos.clone();
        self.pos += &(geometry::heading_vector(self.heading) * (self.speed * dt));
        // stop at the walls rather than wrapping
        geometry::clamp_to_bounds(&mut self.pos, env.width(), env.height());
        self.stats.distance_traveled += geometry::distance(&previous, &self.pos);

        let mut events = Vec::new();

        if action.emission > 0.0 {
            let channel = if self.carrying {
                Channel::Food
            } else {
                Channel::Home
            };
            events.push(TickEvent::Deposit {
                channel,
                pos: self.pos.clone(),
                amount: action.emission,
            });
        }

        if action.interact && !self.carrying {
            if let Some((_, source)) = food.nearest_within(&self.pos, params.pickup_radius) {
                events.push(TickEvent::Pickup { source });
            }
        }

        if self.carrying && env.in_nest(&self.pos) {
            events.push(TickEvent::Deliver);
        }

        self.age += dt;
        self.stats.survived_secs += dt;

        let drain = params.base_drain + if self.carrying { params.carry_drain } else { 0.0 };
        self.energy = (self.energy - drain * dt).max(0.0);
        if self.age > params.max_age {
            self.energy = 0.0;
        }

        events
    }
}
