/// Tabular value-based control
pub mod tabular;

pub use tabular::{EpisodicAgent, MonteCarlo, QLearning, Sarsa};
