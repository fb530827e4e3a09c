use std::collections::HashMap;

use log::debug;
use rand::rngs::StdRng;

use crate::{
    assert_interval,
    decay::{self, Decay},
    env::{Environment, IndexedAction, Step},
    exploration::EpsilonGreedy,
};

use super::{rng_from, EpisodicAgent, Hashable, ValueTable};

/// Configuration for the [`MonteCarlo`] agent
pub struct MonteCarloConfig<D: Decay = decay::Constant> {
    pub exploration: EpsilonGreedy<D>,
    pub gamma: f64,
    pub max_steps: usize,
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.1),
            gamma: 0.99,
            max_steps: 1000,
            seed: None,
        }
    }
}

/// One step of a recorded trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit<S> {
    pub state: S,
    pub action: usize,
    pub reward: f64,
}

/// Sum of returns and number of first visits for one state-action pair
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Returns {
    sum: f64,
    count: u32,
}

/// First-visit Monte Carlo control with an epsilon greedy behavior policy
///
/// Learns offline: a whole episode is played out before any estimate changes. Each
/// state-action pair is credited only with the return following its earliest occurrence in
/// the episode, and its estimate is the plain average of all such returns seen so far.
pub struct MonteCarlo<E, const N: usize, D = decay::Constant>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    q_table: ValueTable<E::State, N>,
    returns: HashMap<(E::State, usize), Returns>,
    exploration: EpsilonGreedy<D>,
    gamma: f64,
    max_steps: usize,
    episode: u32,
    rng: StdRng,
}

impl<E, const N: usize, D> MonteCarlo<E, N, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    /// **Panics** if `gamma` is not in the interval `[0,1]`
    pub fn new(config: MonteCarloConfig<D>) -> Self {
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            q_table: ValueTable::new(),
            returns: HashMap::new(),
            exploration: config.exploration,
            gamma: config.gamma,
            max_steps: config.max_steps,
            episode: 0,
            rng: rng_from(config.seed),
        }
    }

    pub fn q_table(&self) -> &ValueTable<E::State, N> {
        &self.q_table
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Number of first visits credited to `(state, action)` so far
    pub fn visits(&self, state: &E::State, action: usize) -> u32 {
        self.returns
            .get(&(*state, action))
            .map_or(0, |r| r.count)
    }

    fn act(&mut self, state: &E::State) -> usize {
        self.exploration
            .select(&self.q_table, state, self.episode, &mut self.rng)
    }

    /// Play one episode with the current policy without learning from it
    pub fn generate_episode(&mut self, env: &mut E) -> Vec<Visit<E::State>> {
        let mut trajectory = Vec::new();
        let mut state = env.reset();

        for _ in 0..self.max_steps {
            let action = self.act(&state);
            let Step {
                state: next_state,
                reward,
                done,
                ..
            } = env.step(E::Action::from_index(action));
            trajectory.push(Visit {
                state,
                action,
                reward,
            });
            state = next_state;

            if done {
                break;
            }
        }

        trajectory
    }

    /// Fold the first-visit returns of a finished trajectory into the estimates
    pub fn learn(&mut self, trajectory: &[Visit<E::State>]) {
        let mut first_visit = HashMap::new();
        for (t, visit) in trajectory.iter().enumerate() {
            first_visit.entry((visit.state, visit.action)).or_insert(t);
        }

        let mut g = 0.0;
        for (t, &Visit { state, action, reward }) in trajectory.iter().enumerate().rev() {
            g = self.gamma * g + reward;
            if first_visit[&(state, action)] != t {
                continue;
            }

            let returns = self.returns.entry((state, action)).or_default();
            returns.sum += g;
            returns.count += 1;
            self.q_table.row_mut(state)[action] = returns.sum / returns.count as f64;
        }
    }
}

impl<E, const N: usize, D> EpisodicAgent<E> for MonteCarlo<E, N, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    fn name(&self) -> &'static str {
        "monte-carlo"
    }

    fn learn_episode(&mut self, env: &mut E) -> f64 {
        let trajectory = self.generate_episode(env);
        self.learn(&trajectory);

        let total_reward: f64 = trajectory.iter().map(|v| v.reward).sum();
        debug!(
            "monte-carlo episode {} finished after {} steps with return {total_reward}",
            self.episode,
            trajectory.len()
        );
        self.episode += 1;
        total_reward
    }
}
