//! The owned simulation context and its external interface.
//!
//! `Simulation` is the single object that owns the world, the colony, the
//! evolution engine, and the seeded random generator; the top-level driver
//! owns it and calls [`Simulation::advance`]. External collaborators (UI,
//! CLI) interact only through queued commands, applied at the next tick
//! boundary, and read-only snapshot queries taken between ticks, so no
//! consumer ever observes a half-updated tick.

use chrono::Utc;
use ndarray::{Array1, ArrayView2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::colony::Colony;
use super::environment::WorldEnvironment;
use super::error::Result;
use super::evolution::{EvolutionEngine, GenerationRecord, fitness_score};
use super::field::Channel;
use super::geometry;
use super::model::{EvolutionHyper, ModelFile};
use super::params::Params;

/// A control command, queued and applied at the next tick boundary.
#[derive(Debug, Clone)]
pub enum Command {
    /// Stop advancing the simulation until resumed.
    Pause,
    /// Resume a paused simulation.
    Resume,
    /// Set the speed multiplier applied to real time deltas.
    SetSpeed(f32),
    /// Run the evolutionary step now, regardless of elapsed ticks.
    ForceEvolve,
    /// Add a food source; out-of-bounds coordinates are clamped.
    AddFood {
        /// World x coordinate.
        x: f32,
        /// World y coordinate.
        y: f32,
        /// Units of food in the new source.
        quantity: u32,
    },
    /// Add one ant with a fresh random brain; coordinates are clamped.
    AddAgent {
        /// World x coordinate.
        x: f32,
        /// World y coordinate.
        y: f32,
    },
}

/// Read-only per-ant snapshot for rendering consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Stable ant identifier.
    pub id: usize,
    /// World x coordinate.
    pub x: f32,
    /// World y coordinate.
    pub y: f32,
    /// Heading angle in radians.
    pub heading: f32,
    /// Whether the ant is carrying food.
    pub carrying: bool,
}

/// Aggregate statistics for display consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    /// Number of living ants.
    pub population: usize,
    /// Food delivered to the nest this generation.
    pub food_stored: u32,
    /// Current generation index.
    pub generation: u32,
    /// Best fitness ever observed across generations.
    pub best_fitness: f32,
    /// Mean running fitness of the living ants.
    pub avg_fitness: f32,
}

/// The complete simulation state and clock.
pub struct Simulation {
    params: Params,
    env: WorldEnvironment,
    colony: Colony,
    engine: EvolutionEngine,
    rng: StdRng,
    commands: Vec<Command>,
    paused: bool,
    speed_multiplier: f32,
}

impl Simulation {
    /// Creates a simulation from a validated configuration and a seed.
    ///
    /// The same parameters and seed always produce the same run, tick for
    /// tick.
    pub fn new(params: Params, seed: u64) -> Result<Self> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let env = WorldEnvironment::new(&params, &mut rng)?;
        let colony = Colony::genesis(&params, env.nest_pos(), &mut rng);
        info!(
            population = colony.population(),
            food_sources = env.food_sources.len(),
            "simulation created"
        );
        Ok(Self {
            params,
            env,
            colony,
            engine: EvolutionEngine::new(),
            rng,
            commands: Vec::new(),
            paused: false,
            speed_multiplier: 1.0,
        })
    }

    /// Queues a command for the next tick boundary.
    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Advances the simulation by a real-time delta.
    ///
    /// Queued commands apply first; a paused simulation still processes
    /// commands (so it can be resumed) but does not tick.
    pub fn advance(&mut self, real_dt: f32) {
        self.drain_commands();
        if self.paused {
            return;
        }
        self.step_inner(real_dt * self.speed_multiplier);
    }

    /// Runs whole generations back to back without rendering pauses.
    pub fn run_headless(&mut self, generations: u32) {
        info!(generations, "starting headless evolution");
        let dt = self.params.tick_dt;
        for _ in 0..generations {
            let target = self.colony.generation() + 1;
            while self.colony.generation() < target {
                self.drain_commands();
                self.step_inner(dt);
            }
        }
    }

    /// The active configuration.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The current speed multiplier.
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Current generation index.
    pub fn generation(&self) -> u32 {
        self.colony.generation()
    }

    /// Read-only access to the colony.
    pub fn colony(&self) -> &Colony {
        &self.colony
    }

    /// Read-only access to the environment.
    pub fn env(&self) -> &WorldEnvironment {
        &self.env
    }

    /// Per-generation fitness records, oldest first.
    pub fn fitness_history(&self) -> &[GenerationRecord] {
        self.engine.history()
    }

    /// Snapshot of every living ant.
    pub fn agents(&self) -> Vec<AgentSnapshot> {
        self.colony
            .agents
            .iter()
            .map(|agent| AgentSnapshot {
                id: agent.id,
                x: agent.pos[0],
                y: agent.pos[1],
                heading: agent.heading,
                carrying: agent.carrying,
            })
            .collect()
    }

    /// Pheromone concentration at a world position.
    pub fn field_sample(&self, channel: Channel, x: f32, y: f32) -> f32 {
        self.env
            .field
            .sample(channel, &Array1::from_vec(vec![x, y]))
    }

    /// Read-only view of a whole pheromone channel, for visualization.
    pub fn field_grid(&self, channel: Channel) -> ArrayView2<'_, f32> {
        self.env.field.grid(channel)
    }

    /// Aggregate statistics for display.
    pub fn stats(&self) -> Stats {
        let avg_fitness = if self.colony.agents.is_empty() {
            0.0
        } else {
            self.colony
                .agents
                .iter()
                .map(|agent| fitness_score(&agent.stats, &self.params))
                .sum::<f32>()
                / self.colony.agents.len() as f32
        };
        Stats {
            population: self.colony.population(),
            food_stored: self.colony.food_stored,
            generation: self.colony.generation(),
            best_fitness: self.engine.best_fitness(),
            avg_fitness,
        }
    }

    /// Captures the evolving population as a saveable model.
    pub fn save_model(&self) -> ModelFile {
        ModelFile {
            version: ModelFile::FORMAT_VERSION,
            saved_at: Utc::now(),
            generation: self.colony.generation(),
            population_size: self.params.population_size,
            genomes: self
                .colony
                .agents
                .iter()
                .map(|agent| agent.brain.clone())
                .collect(),
            best_ever: self.engine.best_brain().cloned(),
            best_fitness: self.engine.best_fitness(),
            hyper: EvolutionHyper::from_params(&self.params),
        }
    }

    /// Saves the current model to a JSON file.
    pub fn save_model_to(&self, path: &str) -> Result<()> {
        self.save_model().save_to_file(path)
    }

    /// Replaces the population's genomes with a loaded model.
    ///
    /// The model is validated against the current network shape before any
    /// state changes; on error the running simulation is untouched.
    pub fn load_model(&mut self, model: ModelFile) -> Result<()> {
        model.validate_shapes(&self.params.layer_sizes())?;
        let nest = self.env.nest_pos().clone();
        self.colony
            .rebuild(model.genomes, &nest, &self.params, &mut self.rng);
        self.colony.set_generation(model.generation);
        if let Some(best) = model.best_ever {
            self.engine.restore_best(best, model.best_fitness);
        }
        info!(generation = model.generation, "model loaded");
        Ok(())
    }

    /// Loads a model file from disk and applies it.
    pub fn load_model_from(&mut self, path: &str) -> Result<()> {
        let model = ModelFile::load_from_file(path)?;
        self.load_model(model)
    }

    fn step_inner(&mut self, dt: f32) {
        self.colony
            .tick(&mut self.env, &self.params, &mut self.rng, dt);
        if self.colony.due_for_evolution(&self.params) {
            self.evolve_now();
        }
    }

    fn evolve_now(&mut self) {
        let scored = self.colony.drain_generation();
        let generation = self.colony.generation();
        let brains = self
            .engine
            .evolve(scored, generation, &self.params, &mut self.rng);
        let nest = self.env.nest_pos().clone();
        self.colony
            .rebuild(brains, &nest, &self.params, &mut self.rng);
        self.colony.bump_generation();
    }

    fn drain_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        let commands: Vec<Command> = self.commands.drain(..).collect();
        for command in commands {
            match command {
                Command::Pause => self.paused = true,
                Command::Resume => self.paused = false,
                Command::SetSpeed(multiplier) => {
                    if multiplier.is_finite() && multiplier > 0.0 {
                        self.speed_multiplier = multiplier;
                    } else {
                        warn!(multiplier, "ignoring non-positive speed multiplier");
                    }
                }
                Command::ForceEvolve => self.evolve_now(),
                Command::AddFood { x, y, quantity } => {
                    self.env.add_food(Array1::from_vec(vec![x, y]), quantity);
                }
                Command::AddAgent { x, y } => {
                    let mut pos = Array1::from_vec(vec![x, y]);
                    if !geometry::in_bounds(&pos, self.env.width(), self.env.height()) {
                        warn!(x, y, "add_agent position outside world bounds, clamping");
                        geometry::clamp_to_bounds(&mut pos, self.env.width(), self.env.height());
                    }
                    self.colony.add_agent(pos, &self.params, &mut self.rng);
                }
            }
        }
    }
}
