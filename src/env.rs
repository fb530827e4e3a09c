use std::{
    collections::BTreeMap,
    ops::{Deref, DerefMut},
};

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time, episodic MDP with one agent.
/// An episode starts at [`reset`](Environment::reset) and ends at the first [`Step`] whose
/// `done` flag is set. Stepping a finished episode is a programming error and implementations
/// are expected to panic.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Auxiliary diagnostics attached to each transition
    type Info;

    /// Determine if the episode is still running
    fn is_active(&self) -> bool;

    /// Update the environment in response to an action taken by an agent
    fn step(&mut self, action: Self::Action) -> Step<Self::State, Self::Info>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// The outcome of a single [`Environment::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<S, I = ()> {
    pub state: S,
    pub reward: f64,
    pub done: bool,
    pub info: I,
}

/// An action drawn from a finite set that can be enumerated as `0..N`
///
/// Tabular agents store one value per action index, so the mapping must be a bijection onto
/// a contiguous range starting at zero.
pub trait IndexedAction: Copy {
    fn index(self) -> usize;

    /// **Panics** if `index` is outside the action space
    fn from_index(index: usize) -> Self;
}

/// Named per-episode metrics accumulated by an environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    values: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            values: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    /// Metric names, in the same order as the values of [`take`](Report::take)
    pub fn keys(&self) -> Vec<&'static str> {
        self.values.keys().copied().collect()
    }

    /// Retrieve the accumulated values and zero them for the next episode
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let zeroed = self.values.keys().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.values, zeroed)
    }
}

impl Deref for Report {
    type Target = BTreeMap<&'static str, f64>;

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl DerefMut for Report {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.values
    }
}
