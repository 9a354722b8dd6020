//! World environment: bounds, nest, food registry, and the pheromone field.
//!
//! The environment owns everything ants sense: the world rectangle, the
//! nest, the registry of food sources, and the pheromone field. Spatial
//! lookup of food goes through a k-d tree rebuilt once per tick from the
//! live (non-depleted) sources.

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use ndarray::Array1;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::warn;

use super::error::Result;
use super::field::PheromoneField;
use super::food::FoodSource;
use super::geometry;
use super::params::Params;

/// Type alias for the 2D k-d tree used for food lookup.
pub type Tree2D = KdTree<f32, usize, Vec<f32>>;

/// Spatial index over the live food sources of one tick.
///
/// Indices refer into the environment's food registry and stay valid for
/// the tick the index was built for; depleted sources are only collected
/// between ticks.
pub struct FoodIndex {
    tree: Tree2D,
}

impl FoodIndex {
    /// Builds an index over every non-depleted source.
    pub fn build(sources: &[FoodSource]) -> Self {
        let mut tree = KdTree::with_capacity(2, sources.len().max(1));
        for (i, source) in sources.iter().enumerate() {
            if !source.is_depleted() {
                let _ = tree.add(source.pos.to_vec(), i);
            }
        }
        Self { tree }
    }

    /// All live sources within `radius`, as (distance, index) pairs.
    pub fn within(&self, pos: &Array1<f32>, radius: f32) -> Vec<(f32, usize)> {
        self.tree
            .within(&pos.to_vec(), radius.powi(2), &squared_euclidean)
            .unwrap_or_default()
            .into_iter()
            .map(|(dist_sq, &idx)| (dist_sq.sqrt(), idx))
            .collect()
    }

    /// The closest live source within `radius`, if any.
    pub fn nearest_within(&self, pos: &Array1<f32>, radius: f32) -> Option<(f32, usize)> {
        self.within(pos, radius)
            .into_iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }
}

/// The world the colony lives in.
#[derive(Debug, Clone)]
pub struct WorldEnvironment {
    width: f32,
    height: f32,
    nest_pos: Array1<f32>,
    nest_radius: f32,
    /// Registry of food sources, including depleted ones awaiting collection.
    pub food_sources: Vec<FoodSource>,
    /// The shared pheromone field.
    pub field: PheromoneField,
}

impl WorldEnvironment {
    /// Creates the environment with the nest at the world center and the
    /// initial food placed by `generate_food`.
    pub fn new(params: &Params, rng: &mut StdRng) -> Result<Self> {
        let field = PheromoneField::new(
            params.world_width,
            params.world_height,
            params.cell_size,
            params.evaporation_rate,
            params.diffusion_rate,
            params.cell_cap,
        )?;

        let mut env = Self {
            width: params.world_width,
            height: params.world_height,
            nest_pos: Array1::from_vec(vec![params.world_width / 2.0, params.world_height / 2.0]),
            nest_radius: params.nest_radius,
            food_sources: Vec::new(),
            field,
        };
        env.generate_food(params.initial_food_sources, params, rng);
        Ok(env)
    }

    /// World width in world units.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// World height in world units.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Nest center position.
    pub fn nest_pos(&self) -> &Array1<f32> {
        &self.nest_pos
    }

    /// Nest radius.
    pub fn nest_radius(&self) -> f32 {
        self.nest_radius
    }

    /// Whether a position lies inside the nest area.
    pub fn in_nest(&self, pos: &Array1<f32>) -> bool {
        geometry::distance(pos, &self.nest_pos) <= self.nest_radius
    }

    /// Adds a food source, clamping out-of-bounds coordinates to the world
    /// rectangle. A zero quantity is ignored.
    pub fn add_food(&mut self, mut pos: Array1<f32>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if !geometry::in_bounds(&pos, self.width, self.height) {
            warn!(
                x = pos[0],
                y = pos[1],
                "add_food position outside world bounds, clamping"
            );
            geometry::clamp_to_bounds(&mut pos, self.width, self.height);
        }
        self.food_sources.push(FoodSource::new(pos, quantity));
    }

    /// Builds the per-tick spatial index over live food sources.
    pub fn food_index(&self) -> FoodIndex {
        FoodIndex::build(&self.food_sources)
    }

    /// Removes depleted food sources from the registry.
    pub fn collect_depleted(&mut self) {
        self.food_sources.retain(|source| !source.is_depleted());
    }

    /// Spawns new food sources according to the per-second spawn rate.
    ///
    /// The fractional remainder spawns probabilistically, so the average
    /// rate is exact while each tick stays cheap.
    pub fn tick_spawn(&mut self, params: &Params, rng: &mut StdRng, dt: f32) {
        let to_spawn_f = params.food_spawn_rate * dt;
        let mut count = to_spawn_f.floor() as usize;
        if rng.random::<f32>() < to_spawn_f.fract() {
            count += 1;
        }
        self.generate_food(count, params, rng);
    }

    /// Generates `count` food sources.
    ///
    /// New sources cluster near an existing one most of the time; otherwise
    /// they appear at a random position kept away from the nest so foraging
    /// stays non-trivial.
    pub fn generate_food(&mut self, count: usize, params: &Params, rng: &mut StdRng) {
        for _ in 0..count {
            let spread = params.food_cluster_spread;
            let mut pos = if spread > 0.0
                && !self.food_sources.is_empty()
                && rng.random::<f32>() < 0.7
            {
                let parent = &self.food_sources[rng.random_range(0..self.food_sources.len())];
                Array1::from_vec(vec![
                    parent.pos[0] + rng.random_range(-spread..spread),
                    parent.pos[1] + rng.random_range(-spread..spread),
                ])
            } else {
                self.random_far_from_nest(params, rng)
            };

            geometry::clamp_to_bounds(&mut pos, self.width, self.height);
            self.food_sources
                .push(FoodSource::new(pos, params.food_source_quantity));
        }
    }

    fn random_far_from_nest(&self, params: &Params, rng: &mut StdRng) -> Array1<f32> {
        // bounded retry; fall back to whatever came up last
        let mut pos = Array1::zeros(2);
        for _ in 0..16 {
            pos = Array1::from_vec(vec![
                rng.random_range(0.0..self.width),
                rng.random_range(0.0..self.height),
            ]);
            if geometry::distance(&pos, &self.nest_pos) >= params.food_min_nest_distance {
                break;
            }
        }
        pos
    }
}
