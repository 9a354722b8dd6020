//! Food sources that ants can harvest one unit at a time.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A food source in the environment with a depletable quantity.
///
/// Each pickup removes one unit. A source with quantity 0 is depleted: it is
/// ignored by sensing and garbage-collected by the environment each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSource {
    /// Position in 2D space.
    pub pos: Array1<f32>,
    /// Units of food remaining.
    pub quantity: u32,
}

impl FoodSource {
    /// Creates a food source at a position with an initial quantity.
    pub fn new(pos: Array1<f32>, quantity: u32) -> Self {
        Self { pos, quantity }
    }

    /// Whether this source has been fully harvested.
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }

    /// Removes one unit of food. Returns `false` when nothing is left.
    pub fn take(&mut self) -> bool {
        if self.quantity > 0 {
            self.quantity -= 1;
            true
        } else {
            false
        }
    }
}
