use rand::Rng;

use crate::{
    algo::tabular::{Hashable, ValueTable},
    assert_interval,
    decay::{self, Decay},
};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl EpsilonGreedy<decay::Constant> {
    /// Epsilon greedy policy with a fixed exploration rate
    ///
    /// **Panics** if `epsilon` is not in the interval `[0,1]`
    pub fn constant(epsilon: f64) -> Self {
        assert_interval!(epsilon, 0.0, 1.0);
        Self::new(decay::Constant::new(epsilon))
    }
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Exploration rate at `episode`
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode as f64)
    }

    /// Invoke epsilon greedy policy for current episode
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f64>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Select an action index for `state`
    ///
    /// Explores uniformly over all `N` actions, otherwise exploits the
    /// [first-max](ValueTable::greedy_action) action of `table`.
    pub fn select<S, R, const N: usize>(
        &self,
        table: &ValueTable<S, N>,
        state: &S,
        episode: u32,
        rng: &mut R,
    ) -> usize
    where
        S: Hashable,
        R: Rng + ?Sized,
    {
        match self.choose(episode, rng) {
            Choice::Explore => rng.gen_range(0..N),
            Choice::Exploit => table.greedy_action(state),
        }
    }
}

impl Default for EpsilonGreedy<decay::Constant> {
    fn default() -> Self {
        Self::constant(0.1)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn zero_epsilon_always_exploits() {
        let mut table = ValueTable::<u8, 8>::new();
        table.row_mut(0)[5] = 1.0;
        let policy = EpsilonGreedy::constant(0.0);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            assert_eq!(policy.select(&table, &0, 0, &mut rng), 5);
        }
    }

    #[test]
    fn full_epsilon_covers_every_action() {
        let table = ValueTable::<u8, 8>::new();
        let policy = EpsilonGreedy::constant(1.0);
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = [false; 8];
        for _ in 0..1000 {
            seen[policy.select(&table, &0, 0, &mut rng)] = true;
        }
        assert!(seen.iter().all(|&s| s), "Uniform exploration reaches all actions");
    }

    #[test]
    fn same_seed_same_choices() {
        let table = ValueTable::<u8, 8>::new();
        let policy = EpsilonGreedy::constant(0.5);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        let run_a = (0..50)
            .map(|_| policy.select(&table, &0, 0, &mut a))
            .collect::<Vec<_>>();
        let run_b = (0..50)
            .map(|_| policy.select(&table, &0, 0, &mut b))
            .collect::<Vec<_>>();
        assert_eq!(run_a, run_b);
    }

    #[test]
    fn decaying_epsilon_is_evaluated_per_episode() {
        let policy = EpsilonGreedy::new(decay::Linear::new(0.1, 1.0, 0.0).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert_eq!(policy.epsilon(20), 0.0);
    }

    #[test]
    #[should_panic(expected = "Invalid value for `epsilon`")]
    fn rejects_out_of_range_epsilon() {
        EpsilonGreedy::constant(1.5);
    }
}
