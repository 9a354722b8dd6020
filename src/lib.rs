//! # Formicary - Neuroevolved Ant Colony Simulation
//!
//! A simulation of an ant colony whose foragers are driven by small neural
//! network brains. Ants sense their surroundings, lay and follow diffusing
//! pheromone trails, carry food back to the nest, and evolve across
//! generations through selection, crossover, and mutation.
//!
//! ## Features
//!
//! - Dense two-channel pheromone field with deposition, diffusion, and evaporation
//! - Feed-forward neural network brains (MLP with tanh activation)
//! - Genetic algorithm with elitism, tournament selection, and Gaussian mutation
//! - Deterministic replays from a single seed
//! - Parallel per-agent updates with ordered event application
//! - Model save/load for resuming training
//!
//! ## Core Modules
//!
//! - [`simulation::field`] - Pheromone grid with diffusion and evaporation
//! - [`simulation::brain`] - Neural network genome and inference
//! - [`simulation::agent`] - Ant behavior and per-tick state machine
//! - [`simulation::colony`] - Roster management and the tick driver
//! - [`simulation::evolution`] - Generation scoring and reproduction
//! - [`simulation::sim`] - The owned simulation context and external interface

/// Core simulation logic and data structures.
pub mod simulation {
    /// Ant behavior, sensing, and lifecycle.
    pub mod agent;
    /// Neural network genome for ant brains.
    pub mod brain;
    /// Colony roster and the per-tick update loop.
    pub mod colony;
    /// World bounds, nest, food registry, and spatial lookup.
    pub mod environment;
    /// Error types for configuration and persistence failures.
    pub mod error;
    /// Per-tick events collected from parallel agent updates.
    pub mod events;
    /// Generation scoring, selection, crossover, and mutation.
    pub mod evolution;
    /// Dense pheromone field with deposit, diffusion, and evaporation.
    pub mod field;
    /// Food sources with depletable quantities.
    pub mod food;
    /// Geometric utility functions for headings and distances.
    pub mod geometry;
    /// Saved-model record for resuming training.
    pub mod model;
    /// Simulation parameters.
    pub mod params;
    /// The owned simulation context and its command/query surface.
    pub mod sim;
}
