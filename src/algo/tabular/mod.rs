use rand::{rngs::StdRng, SeedableRng};

use crate::env::Environment;

pub mod monte_carlo;
pub mod q_learning;
pub mod sarsa;
pub mod value_table;

pub use monte_carlo::{MonteCarlo, MonteCarloConfig, Visit};
pub use q_learning::{QLearning, QLearningConfig};
pub use sarsa::{Sarsa, SarsaConfig};
pub use value_table::ValueTable;

/// A trait for state and action types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Hashable: Copy + Eq + std::hash::Hash {}

impl<T> Hashable for T where T: Copy + Eq + std::hash::Hash {}

/// A learner that improves its policy one full episode at a time
///
/// All tabular agents share this contract so harnesses can train and compare them
/// interchangeably.
pub trait EpisodicAgent<E: Environment> {
    /// Short name for logs and plots
    fn name(&self) -> &'static str;

    /// Run one episode from [`reset`](Environment::reset) until termination or the agent's
    /// step budget, learning along the way
    ///
    /// **Returns** the undiscounted sum of rewards collected
    fn learn_episode(&mut self, env: &mut E) -> f64;
}

/// Random source for an agent, seeded when reproducibility is wanted
pub(crate) fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
