//! Neural network genome for ant brains.
//!
//! A brain is a feed-forward network with tanh activation at every layer.
//! The ordered weight matrices and bias vectors are the genome: the unit of
//! selection, crossover, and mutation. Inference is a pure function of the
//! genome and the sensor vector; a living ant's weights never change, only
//! mutation across generations changes them, and always on a copy.
//!
//! All stochastic operations take an explicit seed so they replay
//! identically, which the determinism tests rely on.

use ndarray::{Array1, Array2, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::{Rng, SeedableRng};
use ndarray_rand::rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};

/// Length of the sensor vector fed into every brain.
///
/// Layout: normalized nest distance, nest direction (x, y), food-detected
/// flag, normalized food distance, food direction (x, y), food-pheromone
/// probes (ahead, left, right), home-pheromone probes (ahead, left, right),
/// carrying flag, energy fraction.
pub const SENSOR_COUNT: usize = 15;

/// Length of the raw action vector produced by every brain.
///
/// Layout: turn delta, speed, pheromone emission strength, pickup/drop
/// decision.
pub const ACTION_COUNT: usize = 4;

/// A single network layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Weight matrix (`output_size` x `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Layer {
    /// Creates a layer with uniform random weights and biases in
    /// [-scale, scale].
    pub fn new_random(input_size: usize, output_size: usize, scale: f32, rng: &mut StdRng) -> Self {
        Self {
            weights: Array2::random_using(
                (output_size, input_size),
                Uniform::new(-scale, scale),
                rng,
            ),
            biases: Array1::random_using(output_size, Uniform::new(-scale, scale), rng),
        }
    }

    /// Performs a forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;

        // In-place tanh for better cache locality
        output.mapv_inplace(f32::tanh);
        output
    }
}

/// Feed-forward neural network brain; its layers are the genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Layer>,
}

impl Brain {
    /// Creates a brain with random weights for the given layer sizes.
    ///
    /// `layer_sizes` runs from input to output, so it must have at least
    /// two entries.
    pub fn new_random(layer_sizes: &[usize], scale: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let layers = (0..layer_sizes.len().saturating_sub(1))
            .map(|i| Layer::new_random(layer_sizes[i], layer_sizes[i + 1], scale, &mut rng))
            .collect();

        Self { layers }
    }

    /// Runs a forward pass through the brain.
    ///
    /// Pure and deterministic: no internal state survives between calls.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Returns a mutated copy; the original genome is unmodified.
    ///
    /// Each weight and bias is independently perturbed with probability
    /// `rate` by Gaussian noise with standard deviation `magnitude`.
    pub fn mutated(&self, rate: f32, magnitude: f32, seed: u64) -> Self {
        if rate <= 0.0 || magnitude <= 0.0 {
            return self.clone();
        }
        let Ok(noise) = Normal::new(0.0f32, magnitude) else {
            return self.clone();
        };
        let mut rng = StdRng::seed_from_u64(seed);

        let layers = self
            .layers
            .iter()
            .map(|layer| Layer {
                weights: layer.weights.mapv(|w| {
                    if rng.gen_range(0.0..1.0f32) < rate {
                        w + rng.sample(noise)
                    } else {
                        w
                    }
                }),
                biases: layer.biases.mapv(|b| {
                    if rng.gen_range(0.0..1.0f32) < rate {
                        b + rng.sample(noise)
                    } else {
                        b
                    }
                }),
            })
            .collect();

        Self { layers }
    }

    /// Creates a child by uniform per-weight crossover of two parents.
    ///
    /// For every weight position the child takes the value of one parent,
    /// chosen by a fair coin from the seeded generator. Structurally
    /// incompatible parents fall back to a clone of the first parent.
    pub fn crossover(parent1: &Brain, parent2: &Brain, seed: u64) -> Self {
        if !Brain::same_shape(parent1, parent2) {
            return parent1.clone();
        }
        let mut rng = StdRng::seed_from_u64(seed);

        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(l1, l2)| Layer {
                weights: Zip::from(&l1.weights)
                    .and(&l2.weights)
                    .map_collect(|&w1, &w2| if rng.gen_bool(0.5) { w1 } else { w2 }),
                biases: Zip::from(&l1.biases)
                    .and(&l2.biases)
                    .map_collect(|&b1, &b2| if rng.gen_bool(0.5) { b1 } else { b2 }),
            })
            .collect();

        Self { layers }
    }

    /// Layer size list from input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let Some(first) = self.layers.first() else {
            return Vec::new();
        };
        let mut sizes = Vec::with_capacity(self.layers.len() + 1);
        sizes.push(first.weights.ncols());
        for layer in &self.layers {
            sizes.push(layer.weights.nrows());
        }
        sizes
    }

    /// Whether two genomes have identical layer shapes.
    pub fn same_shape(a: &Brain, b: &Brain) -> bool {
        a.layer_sizes() == b.layer_sizes()
    }
}
