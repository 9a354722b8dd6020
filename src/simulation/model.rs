//! Saved-model record for resuming training.
//!
//! A model file carries everything the evolutionary process needs to
//! continue deterministically under the same seed policy: the generation
//! index, every genome of the population (ordered layers with their shapes),
//! the retained best genome, and the evolution hyperparameters. World state
//! (positions, pheromones, food) is deliberately not persisted; a loaded
//! population restarts at the nest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::error::{Result, SimError};
use super::params::Params;

/// Evolution hyperparameters captured alongside the genomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionHyper {
    /// Probability that any single weight is perturbed during mutation.
    pub mutation_rate: f32,
    /// Standard deviation of the Gaussian mutation noise.
    pub mutation_magnitude: f32,
    /// Fraction of the population carried over unchanged.
    pub elite_fraction: f32,
    /// Contestants per tournament selection round.
    pub tournament_size: usize,
    /// Ticks per generation.
    pub generation_length: u32,
}

impl EvolutionHyper {
    /// Captures the evolution hyperparameters of a configuration.
    pub fn from_params(params: &Params) -> Self {
        Self {
            mutation_rate: params.mutation_rate,
            mutation_magnitude: params.mutation_magnitude,
            elite_fraction: params.elite_fraction,
            tournament_size: params.tournament_size,
            generation_length: params.generation_length,
        }
    }
}

/// A serializable snapshot of the evolving population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// Format version, for forward-compatible loading.
    pub version: u32,
    /// When the model was saved.
    pub saved_at: DateTime<Utc>,
    /// Generation index at save time.
    pub generation: u32,
    /// Configured target population size.
    pub population_size: usize,
    /// Genome of every ant in the population, in roster order.
    pub genomes: Vec<Brain>,
    /// The best genome ever observed, if any generation finished.
    pub best_ever: Option<Brain>,
    /// Fitness of the best genome ever observed.
    pub best_fitness: f32,
    /// Evolution hyperparameters in effect at save time.
    pub hyper: EvolutionHyper,
}

impl ModelFile {
    /// Current format version written by [`ModelFile::save_to_file`].
    pub const FORMAT_VERSION: u32 = 1;

    /// Saves the model as pretty-printed JSON.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a model from a JSON file.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let model: ModelFile = serde_json::from_str(&json)?;
        if model.version != Self::FORMAT_VERSION {
            return Err(SimError::Persistence(format!(
                "unsupported model format version {} (expected {})",
                model.version,
                Self::FORMAT_VERSION
            )));
        }
        Ok(model)
    }

    /// Checks that every genome matches the expected layer sizes.
    ///
    /// Called before any state is replaced, so an incompatible model leaves
    /// the running simulation untouched.
    pub fn validate_shapes(&self, expected: &[usize]) -> Result<()> {
        if self.genomes.is_empty() {
            return Err(SimError::Persistence(
                "model contains no genomes".to_string(),
            ));
        }
        for (i, genome) in self.genomes.iter().enumerate() {
            let sizes = genome.layer_sizes();
            if sizes != expected {
                return Err(SimError::Persistence(format!(
                    "genome {i} has layer sizes {sizes:?}, expected {expected:?}"
                )));
            }
        }
        if let Some(best) = &self.best_ever {
            if best.layer_sizes() != expected {
                return Err(SimError::Persistence(format!(
                    "best-ever genome has layer sizes {:?}, expected {expected:?}",
                    best.layer_sizes()
                )));
            }
        }
        Ok(())
    }
}
