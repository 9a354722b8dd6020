//! Generation scoring, selection, crossover, and mutation.
//!
//! At every generation boundary the engine scores the finished
//! generation's genomes, carries an elite fraction over unchanged, and
//! breeds the remaining slots through tournament selection, uniform
//! crossover, and Gaussian mutation. The output population always has
//! exactly the configured size, whatever the fitness distribution looked
//! like, and the best genome ever seen is retained so the population-best
//! fitness never decreases while elitism is enabled.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::agent::FitnessStats;
use super::brain::Brain;
use super::params::Params;

/// Baseline fitness for ants that achieved nothing.
///
/// Never zero, so selection keeps a gradient even when no ant delivered
/// food all generation.
pub const MIN_FITNESS: f32 = 1e-3;

/// Scalar fitness of one ant's lifetime record.
///
/// Weighted combination of food delivered, survival time, and foraging
/// efficiency (food per unit distance, so shorter routes score higher).
pub fn fitness_score(stats: &FitnessStats, params: &Params) -> f32 {
    let delivered = stats.delivered as f32;
    let efficiency = delivered / (1.0 + stats.distance_traveled);
    let score = params.delivery_reward * delivered
        + params.survival_weight * stats.survived_secs
        + params.efficiency_weight * efficiency;
    score.max(MIN_FITNESS)
}

/// A genome together with its scored fitness.
#[derive(Debug, Clone)]
pub struct ScoredBrain {
    /// The genome.
    pub brain: Brain,
    /// Its scalar fitness.
    pub fitness: f32,
}

/// Summary of one finished generation, kept for stats consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation index at scoring time.
    pub generation: u32,
    /// Highest fitness in the generation.
    pub best: f32,
    /// Mean fitness of the generation.
    pub mean: f32,
    /// Number of scored genomes (survivors plus mid-generation deaths).
    pub population: usize,
}

/// Produces each next generation from the previous one's scores.
#[derive(Debug, Clone, Default)]
pub struct EvolutionEngine {
    best_ever: Option<ScoredBrain>,
    history: Vec<GenerationRecord>,
}

impl EvolutionEngine {
    /// Creates an engine with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Best fitness ever observed, 0 before the first evolutionary step.
    pub fn best_fitness(&self) -> f32 {
        self.best_ever.as_ref().map_or(0.0, |best| best.fitness)
    }

    /// The best genome ever observed, if any generation has been scored.
    pub fn best_brain(&self) -> Option<&Brain> {
        self.best_ever.as_ref().map(|best| &best.brain)
    }

    /// Per-generation fitness records, oldest first.
    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Restores the retained best genome from a saved model.
    pub fn restore_best(&mut self, brain: Brain, fitness: f32) {
        self.best_ever = Some(ScoredBrain { brain, fitness });
    }

    /// Scores a finished generation and breeds the next population.
    ///
    /// Always returns exactly `params.population_size` genomes. With fewer
    /// than two scored genomes, breeding falls back to cloning-with-mutation
    /// from the best survivor, the retained best-ever genome, or fresh
    /// random genomes, in that order of preference.
    pub fn evolve(
        &mut self,
        scored: Vec<(Brain, FitnessStats)>,
        generation: u32,
        params: &Params,
        rng: &mut StdRng,
    ) -> Vec<Brain> {
        let mut pool: Vec<ScoredBrain> = scored
            .into_iter()
            .map(|(brain, stats)| ScoredBrain {
                fitness: fitness_score(&stats, params),
                brain,
            })
            .collect();
        pool.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let best = pool.first().map_or(0.0, |s| s.fitness);
        let mean = if pool.is_empty() {
            0.0
        } else {
            pool.iter().map(|s| s.fitness).sum::<f32>() / pool.len() as f32
        };
        self.history.push(GenerationRecord {
            generation,
            best,
            mean,
            population: pool.len(),
        });
        info!(
            generation,
            best, mean,
            scored = pool.len(),
            "generation finished"
        );

        if let Some(top) = pool.first() {
            let improved = self
                .best_ever
                .as_ref()
                .is_none_or(|current| top.fitness > current.fitness);
            if improved {
                self.best_ever = Some(top.clone());
            }
        }

        let target = params.population_size;
        let mut next = Vec::with_capacity(target);

        if pool.len() >= 2 {
            let elite_count = if params.elite_fraction > 0.0 {
                ((target as f32 * params.elite_fraction).floor() as usize)
                    .max(1)
                    .min(pool.len())
                    .min(target)
            } else {
                0
            };
            for elite in &pool[..elite_count] {
                next.push(elite.brain.clone());
            }

            while next.len() < target {
                let parent1 = tournament(&pool, params.tournament_size, rng);
                let parent2 = tournament(&pool, params.tournament_size, rng);
                let child = Brain::crossover(&parent1.brain, &parent2.brain, rng.random());
                next.push(child.mutated(
                    params.mutation_rate,
                    params.mutation_magnitude,
                    rng.random(),
                ));
            }
        } else if let Some(seed_brain) = pool
            .first()
            .map(|s| s.brain.clone())
            .or_else(|| self.best_brain().cloned())
        {
            // too few survivors to breed: clone the best genome available
            next.push(seed_brain.clone());
            while next.len() < target {
                next.push(seed_brain.mutated(
                    params.mutation_rate,
                    params.mutation_magnitude,
                    rng.random(),
                ));
            }
        } else {
            let layer_sizes = params.layer_sizes();
            while next.len() < target {
                next.push(Brain::new_random(
                    &layer_sizes,
                    params.init_weight_scale,
                    rng.random(),
                ));
            }
        }

        next
    }
}

/// Picks the fittest of `size` uniformly drawn contestants.
fn tournament<'a>(pool: &'a [ScoredBrain], size: usize, rng: &mut StdRng) -> &'a ScoredBrain {
    let mut best = &pool[rng.random_range(0..pool.len())];
    for _ in 1..size {
        let contestant = &pool[rng.random_range(0..pool.len())];
        if contestant.fitness > best.fitness {
            best = contestant;
        }
    }
    best
}
