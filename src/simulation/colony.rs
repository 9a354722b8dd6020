//! Colony roster and the per-tick update loop.
//!
//! The colony is the sole mutator of the agent roster, the food-storage
//! counter, and the generation bookkeeping. Each tick it advances the
//! pheromone field, updates every live ant in parallel against a read-only
//! world, applies the resulting events in stable roster order, and retires
//! the dead into a fitness ledger consumed by the evolutionary step.

use ndarray::Array1;
use rand::Rng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::debug;

use super::agent::{Agent, FitnessStats};
use super::brain::Brain;
use super::environment::WorldEnvironment;
use super::events::{self, TickEvent};
use super::params::Params;

/// A colony of ants sharing one nest and one world.
#[derive(Debug, Clone)]
pub struct Colony {
    /// All living ants, in stable id order.
    pub agents: Vec<Agent>,
    /// Units of food delivered to the nest this generation.
    pub food_stored: u32,
    /// Ants that have died since the colony was created.
    pub total_deaths: u64,
    generation: u32,
    ticks_since_evolution: u32,
    retired: Vec<(Brain, FitnessStats)>,
    next_agent_id: usize,
}

impl Colony {
    /// Creates the generation-zero colony with random brains at the nest.
    pub fn genesis(params: &Params, nest_pos: &Array1<f32>, rng: &mut StdRng) -> Self {
        let mut colony = Self {
            agents: Vec::with_capacity(params.population_size),
            food_stored: 0,
            total_deaths: 0,
            generation: 0,
            ticks_since_evolution: 0,
            retired: Vec::new(),
            next_agent_id: 0,
        };
        let layer_sizes = params.layer_sizes();
        for _ in 0..params.population_size {
            let brain = Brain::new_random(&layer_sizes, params.init_weight_scale, rng.random());
            colony.spawn(nest_pos.clone(), brain, params, rng);
        }
        colony
    }

    /// Current generation index.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Ticks elapsed since the last evolutionary step.
    pub fn ticks_since_evolution(&self) -> u32 {
        self.ticks_since_evolution
    }

    /// Number of living ants.
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// Whether the generation has run its configured length.
    pub fn due_for_evolution(&self, params: &Params) -> bool {
        self.ticks_since_evolution >= params.generation_length
    }

    /// Adds one ant with a fresh random brain at a position.
    ///
    /// External-command entry point; the roster may exceed the target
    /// population until the next evolutionary step restores it.
    pub fn add_agent(&mut self, pos: Array1<f32>, params: &Params, rng: &mut StdRng) {
        let brain = Brain::new_random(&params.layer_sizes(), params.init_weight_scale, rng.random());
        self.spawn(pos, brain, params, rng);
    }

    /// Advances the colony by one tick.
    ///
    /// Order within the tick: field step, parallel ant updates, serial
    /// event application in roster order, retirement of the dead, food
    /// spawning. The order is fixed so a seeded run replays identically.
    pub fn tick(&mut self, env: &mut WorldEnvironment, params: &Params, rng: &mut StdRng, dt: f32) {
        env.field.step(dt);
        env.collect_depleted();
        let food_index = env.food_index();

        let shared: &WorldEnvironment = env;
        let batches: Vec<Vec<TickEvent>> = self
            .agents
            .par_iter_mut()
            .map(|agent| agent.update(dt, params, shared, &food_index))
            .collect();

        events::apply_events(self, env, batches);

        // retire the dead so their scores still count at evolution time
        for agent in &self.agents {
            if !agent.is_alive() {
                debug!(ant = agent.id, age = agent.age, "ant died");
                self.retired.push((agent.brain.clone(), agent.stats.clone()));
                self.total_deaths += 1;
            }
        }
        self.agents.retain(Agent::is_alive);

        env.tick_spawn(params, rng, dt);
        self.ticks_since_evolution += 1;
    }

    /// Hands back every genome scored this generation: the retired ledger
    /// plus the current survivors.
    pub fn drain_generation(&mut self) -> Vec<(Brain, FitnessStats)> {
        let mut scored = std::mem::take(&mut self.retired);
        for agent in &self.agents {
            scored.push((agent.brain.clone(), agent.stats.clone()));
        }
        scored
    }

    /// Replaces the roster with a new population at the nest and resets the
    /// per-generation counters.
    pub fn rebuild(
        &mut self,
        brains: Vec<Brain>,
        nest_pos: &Array1<f32>,
        params: &Params,
        rng: &mut StdRng,
    ) {
        self.agents.clear();
        self.retired.clear();
        for brain in brains {
            self.spawn(nest_pos.clone(), brain, params, rng);
        }
        self.food_stored = 0;
        self.ticks_since_evolution = 0;
    }

    /// Increments the generation counter after an evolutionary step.
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }

    /// Overwrites the generation counter when restoring a saved model.
    pub fn set_generation(&mut self, generation: u32) {
        self.generation = generation;
    }

    fn spawn(&mut self, pos: Array1<f32>, brain: Brain, params: &Params, rng: &mut StdRng) {
        let heading = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
        let agent = Agent::new(self.next_agent_id, pos, heading, params.initial_energy, brain);
        self.next_agent_id += 1;
        self.agents.push(agent);
    }
}
