//! Per-tick events for deterministic state updates.
//!
//! The parallel agent phase only mutates agent-local state; every effect on
//! shared state comes back as a `TickEvent`. Events are collected per agent
//! in roster order and applied serially here, so contested pickups resolve
//! first-come in a fixed agent order and replays are bit-identical.

use ndarray::Array1;
use tracing::debug;

use super::colony::Colony;
use super::environment::WorldEnvironment;
use super::field::Channel;

/// An effect on shared state requested by one ant during a tick.
#[derive(Debug, Clone)]
pub enum TickEvent {
    /// Deposit pheromone into the field at the ant's position.
    Deposit {
        /// Channel selected by the ant's carrying state.
        channel: Channel,
        /// World position of the deposit.
        pos: Array1<f32>,
        /// Amount to add, always positive.
        amount: f32,
    },
    /// Attempt to take one unit from a food source.
    Pickup {
        /// Index of the source in the environment's registry.
        source: usize,
    },
    /// Deliver the carried food unit to the nest.
    Deliver,
}

/// Applies every agent's events in roster order.
///
/// `batches[i]` holds the events of `colony.agents[i]`, in the order the
/// ant produced them. A pickup only succeeds while the source still has
/// quantity left and the ant is empty-handed, so a source depleted earlier
/// in the same tick is never double-counted.
pub fn apply_events(
    colony: &mut Colony,
    env: &mut WorldEnvironment,
    batches: Vec<Vec<TickEvent>>,
) {
    for (agent_idx, batch) in batches.into_iter().enumerate() {
        for event in batch {
            match event {
                TickEvent::Deposit {
                    channel,
                    pos,
                    amount,
                } => {
                    env.field.deposit(channel, &pos, amount);
                }
                TickEvent::Pickup { source } => {
                    let agent = &mut colony.agents[agent_idx];
                    if !agent.carrying && env.food_sources[source].take() {
                        agent.carrying = true;
                    }
                }
                TickEvent::Deliver => {
                    let agent = &mut colony.agents[agent_idx];
                    if agent.carrying {
                        agent.carrying = false;
                        agent.stats.delivered += 1;
                        colony.food_stored += 1;
                        debug!(ant = agent.id, "food delivered to nest");
                    }
                }
            }
        }
    }
}
