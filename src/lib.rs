//! Tabular reinforcement learning on the Guardian's Sanctum grid world
//!
//! The [`gym::sanctum`] environment is learned by three interchangeable
//! [`EpisodicAgent`](algo::EpisodicAgent)s: Q-learning, SARSA and first-visit Monte Carlo control.

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

/// Learning-curve helpers
pub mod util;

/// Terminal dashboard for training runs
#[cfg(feature = "viz")]
pub mod viz;

pub use error::{Error, Result};
