use log::debug;
use rand::rngs::StdRng;

use crate::{
    assert_interval,
    decay::{self, Decay},
    env::{Environment, IndexedAction, Step},
    exploration::EpsilonGreedy,
};

use super::{rng_from, EpisodicAgent, Hashable, ValueTable};

/// Configuration for the [`Sarsa`] agent
pub struct SarsaConfig<D: Decay = decay::Constant> {
    pub exploration: EpsilonGreedy<D>,
    pub alpha: f64,
    pub gamma: f64,
    pub max_steps: usize,
    pub seed: Option<u64>,
}

impl Default for SarsaConfig {
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

/// On-policy one-step temporal difference control
///
/// The target bootstraps from the action the behavior policy actually picks next, so
/// exploratory moves feed back into the estimates.
pub struct Sarsa<E, const N: usize, D = decay::Constant>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    q_table: ValueTable<E::State, N>,
    exploration: EpsilonGreedy<D>,
    alpha: f64,
    gamma: f64,
    max_steps: usize,
    episode: u32,
    rng: StdRng,
}

impl<E, const N: usize, D> Sarsa<E, N, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: SarsaConfig<D>) -> Self {
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

    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Choose an action based on the current state and exploration policy
    fn act(&mut self, state: &E::State) -> usize {
        self.exploration
            .select(&self.q_table, state, self.episode, &mut self.rng)
    }

    /// Apply the SARSA update for a single `(s, a, r, s', a')` tuple
    pub fn learn(
        &mut self,
        state: E::State,
        action: usize,
        reward: f64,
        next_state: &E::State,
        next_action: usize,
    ) {
        let next_q_value = self.q_table.get(next_state, next_action);
        let q_value = &mut self.q_table.row_mut(state)[action];
        *q_value += self.alpha * (reward + self.gamma * next_q_value - *q_value);
    }
}

impl<E, const N: usize, D> EpisodicAgent<E> for Sarsa<E, N, D>
where
    E: Environment,
    E::State: Hashable,
    E::Action: IndexedAction,
    D: Decay,
{
    fn name(&self) -> &'static str {
        "sarsa"
    }

    fn learn_episode(&mut self, env: &mut E) -> f64 {
        let mut state = env.reset();
        let mut action = self.act(&state);
        let mut total_reward = 0.0;
        let mut steps = 0;

        while steps < self.max_steps {
            let Step {
                state: next_state,
                reward,
                done,
                ..
            } = env.step(E::Action::from_index(action));
            steps += 1;
            total_reward += reward;

            let next_action = self.act(&next_state);
            self.learn(state, action, reward, &next_state, next_action);
            (state, action) = (next_state, next_action);

            if done {
                break;
            }
        }

        debug!(
            "sarsa episode {} finished after {steps} steps with return {total_reward}",
            self.episode
        );
        self.episode += 1;
        total_reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::tabular::{
        corridor::{Corridor, Move, GOAL},
        QLearning, QLearningConfig,
    };

    fn greedy_config() -> SarsaConfig {
        SarsaConfig {
            exploration: EpsilonGreedy::constant(0.0),
            gamma: 0.9,
            seed: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn update_targets_chosen_next_action() {
        let mut agent = Sarsa::<Corridor, 2>::new(greedy_config());
        *agent.q_table_mut().row_mut(1) = [2.0, 10.0];

        agent.learn(0, Move::Right.index(), -1.0, &1, Move::Left.index());
        // 0 + 0.5 * (-1 + 0.9 * 2 - 0)
        assert!((agent.q_table().get(&0, 1) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn diverges_from_q_learning_on_exploratory_next_action() {
        let mut sarsa = Sarsa::<Corridor, 2>::new(greedy_config());
        let mut q_learning = QLearning::<Corridor, 2>::new(QLearningConfig {
            exploration: EpsilonGreedy::constant(0.0),
            gamma: 0.9,
            ..Default::default()
        });
        for table in [sarsa.q_table_mut(), q_learning.q_table_mut()] {
            *table.row_mut(1) = [-4.0, -2.0];
        }

        // Greedy from state 1 is Right, but the behavior policy explored Left
        q_learning.learn(0, Move::Right.index(), -1.0, &1);
        sarsa.learn(0, Move::Right.index(), -1.0, &1, Move::Left.index());

        let q = q_learning.q_table().get(&0, 1);
        let s = sarsa.q_table().get(&0, 1);
        assert!((q - 0.5 * (-1.0 + 0.9 * -2.0)).abs() < 1e-12);
        assert!((s - 0.5 * (-1.0 + 0.9 * -4.0)).abs() < 1e-12);
        assert!(s < q, "On-policy target pays for the exploratory move");
    }

    #[test]
    fn learns_to_walk_the_corridor() {
        let mut env = Corridor::default();
        let mut agent = Sarsa::<Corridor, 2>::new(greedy_config());

        let mut last = 0.0;
        for _ in 0..200 {
            last = agent.learn_episode(&mut env);
        }

        assert_eq!(last, -(GOAL as f64));
        for s in 0..GOAL {
            assert_eq!(agent.q_table().greedy_action(&s), Move::Right.index());
        }
    }

    #[test]
    fn same_seed_same_learning_curve() {
        let config = || SarsaConfig {
            exploration: EpsilonGreedy::constant(0.3),
            seed: Some(99),
            ..Default::default()
        };
        let mut a = Sarsa::<Corridor, 2>::new(config());
        let mut b = Sarsa::<Corridor, 2>::new(config());
        let (mut env_a, mut env_b) = (Corridor::default(), Corridor::default());

        for _ in 0..20 {
            assert_eq!(a.learn_episode(&mut env_a), b.learn_episode(&mut env_b));
        }
    }
}
