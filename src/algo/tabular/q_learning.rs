use log::debug;
use rand::rngs::StdRng;

use crate::{
    assert_interval,
    decay::{self, Decay},
    env::{Environment, IndexedAction, Step},
    exploration::EpsilonGreedy,
};

use super::{rng_from, EpisodicAgent, Hashable, ValueTable};

/// Configuration for the [`QLearning`] agent
pub struct QLearningConfig<D: Decay = decay::Constant> {
    pub exploration: EpsilonGreedy<D>,
    pub alpha: f64,
    pub gamma: f64,
    /// Step budget per episode, on top of the environment's own termination
    pub max_steps: usize,
    /// Seed for exploration, drawn from entropy if `None`
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::constant(0.1),
            alpha: 0.5,
            gamma: 0.99,
            max_steps: 1000,
            seed: None,
        }
    }
}

/// Off-policy one-step temporal difference control
///
/// Each transition moves `Q(s,a)` towards `r + γ max_a' Q(s',a')`, regardless of which action the
/// behavior policy will actually take from `s'`.
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - States are used as [`ValueTable`] keys and must be [`Hashable`]
///     - Actions must map onto the indices `0..N`
/// - `N` - The number of actions
/// - `D` - The decay schedule of the exploration rate
pub struct QLearning<E, const N: usize, D = decay::Constant>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    q_table: ValueTable<E::State, N>,
    exploration: EpsilonGreedy<D>,
    alpha: f64,   // learning rate
    gamma: f64,   // discount factor
    max_steps: usize,
    episode: u32, // current episode
    rng: StdRng,
}

impl<E, const N: usize, D> QLearning<E, N, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: QLearningConfig<D>) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            q_table: ValueTable::new(),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            max_steps: config.max_steps,
            episode: 0,
            rng: rng_from(config.seed),
        }
    }

    pub fn q_table(&self) -> &ValueTable<E::State, N> {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut ValueTable<E::State, N> {
        &mut self.q_table
    }

    /// Number of completed episodes
    pub fn episode(&self) -> u32 {
        self.episode
    }

    fn act(&mut self, state: &E::State) -> usize {
        self.exploration
            .select(&self.q_table, state, self.episode, &mut self.rng)
    }

    /// Apply the Q-learning update for a single transition
    pub fn learn(&mut self, state: E::State, action: usize, reward: f64, next_state: &E::State) {
        let max_next_q = self.q_table.max_value(next_state);
        let q_value = &mut self.q_table.row_mut(state)[action];
        *q_value += self.alpha * (reward + self.gamma * max_next_q - *q_value);
    }
}

impl<E, const N: usize, D> EpisodicAgent<E> for QLearning<E, N, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    fn name(&self) -> &'static str {
        "q-learning"
    }

    fn learn_episode(&mut self, env: &mut E) -> f64 {
        let mut state = env.reset();
        let mut total_reward = 0.0;
        let mut steps = 0;

        while steps < self.max_steps {
            let action = self.act(&state);
            let Step {
                state: next_state,
                reward,
                done,
                ..
            } = env.step(E::Action::from_index(action));
            steps += 1;
            total_reward += reward;

            self.learn(state, action, reward, &next_state);
            state = next_state;

            if done {
                break;
            }
        }

        debug!(
            "q-learning episode {} finished after {steps} steps with return {total_reward}",
            self.episode
        );
        self.episode += 1;
        total_reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::tabular::corridor::{Corridor, Move, GOAL};

    fn greedy_config() -> QLearningConfig {
        QLearningConfig {
            exploration: EpsilonGreedy::constant(0.0),
            gamma: 0.9,
            seed: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn update_targets_best_next_action() {
        let mut agent = QLearning::<Corridor, 2>::new(greedy_config());
        *agent.q_table_mut().row_mut(1) = [2.0, 10.0];

        agent.learn(0, Move::Right.index(), -1.0, &1);
        // 0 + 0.5 * (-1 + 0.9 * 10 - 0)
        assert_eq!(agent.q_table().get(&0, 1), 4.0);
        assert_eq!(agent.q_table().get(&0, 0), 0.0);
    }

    #[test]
    fn learns_to_walk_the_corridor() {
        let mut env = Corridor::default();
        let mut agent = QLearning::<Corridor, 2>::new(greedy_config());

        let mut last = 0.0;
        for _ in 0..200 {
            last = agent.learn_episode(&mut env);
        }

        assert_eq!(agent.episode(), 200);
        assert_eq!(last, -(GOAL as f64), "Greedy policy takes the shortest path");
        for s in 0..GOAL {
            assert_eq!(agent.q_table().greedy_action(&s), Move::Right.index());
        }
    }

    #[test]
    fn step_budget_cuts_episodes_short() {
        let mut env = Corridor::default();
        let mut agent = QLearning::<Corridor, 2>::new(QLearningConfig {
            max_steps: 1,
            ..greedy_config()
        });

        assert_eq!(agent.learn_episode(&mut env), -1.0);
        assert_eq!(env.steps, 1);
    }

    #[test]
    #[should_panic(expected = "Invalid value for `config.alpha`")]
    fn rejects_invalid_alpha() {
        QLearning::<Corridor, 2>::new(QLearningConfig {
            alpha: 1.5,
            ..Default::default()
        });
    }
}
