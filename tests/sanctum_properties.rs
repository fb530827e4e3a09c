use proptest::prelude::*;
use sanctum_rl::{
    algo::{
        tabular::{MonteCarloConfig, QLearningConfig, SarsaConfig},
        EpisodicAgent,
    },
    env::{Environment, IndexedAction},
    exploration::EpsilonGreedy,
    gym::sanctum::{
        manhattan, Action, GuardianSanctum, SanctumMonteCarlo, SanctumQLearning, SanctumSarsa,
        N_ACTIONS,
    },
};

fn actions(max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec((0..N_ACTIONS).prop_map(Action::from_index), 1..max_len)
}

proptest! {
    // The agent only ever stands on walkable cells and never on the closed door
    #[test]
    fn agent_stays_on_legal_cells(actions in actions(200)) {
        let mut env = GuardianSanctum::classic();
        env.reset();
        for action in actions {
            if !env.is_active() {
                env.reset();
            }
            env.step(action);
            let pos = env.agent();
            prop_assert!(env.map().in_bounds(pos));
            prop_assert!(!env.map().is_wall(pos));
            prop_assert!(pos != env.map().door() || env.has_key());
        }
    }

    // Moves go straight in the chosen direction and never overshoot
    #[test]
    fn moves_follow_the_base_direction(actions in actions(200)) {
        let mut env = GuardianSanctum::classic();
        env.reset();
        for action in actions {
            if !env.is_active() {
                env.reset();
            }
            let before = env.agent();
            env.step(action);
            let after = env.agent();

            let reach = if action.is_fast() { 2 } else { 1 };
            let mut expected = vec![before];
            let mut pos = before;
            for _ in 0..reach {
                pos = action.direction().offset(pos);
                expected.push(pos);
            }
            prop_assert!(expected.contains(&after), "{action:?} moved {before:?} to {after:?}");
            prop_assert!(manhattan(before, after) <= reach);
        }
    }

    // The key pays out at most once per episode, and only when it is first picked up
    #[test]
    fn key_bonus_is_granted_once(actions in actions(300)) {
        let mut env = GuardianSanctum::classic();
        env.reset();
        let mut bonuses = 0;
        for action in actions {
            if !env.is_active() {
                env.reset();
                bonuses = 0;
            }
            let had_key = env.has_key();
            let step = env.step(action);
            let bonus = step.reward == 49.0 || step.reward == -51.0;
            prop_assert_eq!(bonus, !had_key && step.state.has_key);
            if bonus {
                bonuses += 1;
            }
            prop_assert!(bonuses <= 1);
        }
    }

    // Capture ends the episode and costs exactly the penalty on top of the step
    #[test]
    fn capture_ends_the_episode(actions in actions(300)) {
        let mut env = GuardianSanctum::classic();
        env.reset();
        for action in actions {
            if !env.is_active() {
                env.reset();
            }
            let step = env.step(action);
            if step.info.caught {
                prop_assert!(step.done);
                prop_assert!(step.reward == -101.0 || step.reward == -51.0);
                prop_assert!(!step.info.win && !step.info.timeout);
                prop_assert!(env.sentinel_positions().contains(&env.agent()));
            }
            prop_assert_eq!(step.done, !env.is_active());
        }
    }

    // The observed phase always stays inside the patrol cycle
    #[test]
    fn phase_is_bounded_by_cycle(actions in actions(200)) {
        let mut env = GuardianSanctum::classic();
        env.reset();
        for action in actions {
            if !env.is_active() {
                env.reset();
            }
            let step = env.step(action);
            prop_assert!(step.state.phase < env.cycle());
        }
    }
}

fn bounded(returns: &[f64]) -> bool {
    // Worst case is a full timeout, best case key plus treasure in a handful of steps
    returns.iter().all(|&r| (-600.0..=249.0).contains(&r))
}

#[test]
fn seeded_agents_learn_reproducibly() {
    let runs = (0..2)
        .map(|_| {
            let mut agents: Vec<Box<dyn EpisodicAgent<GuardianSanctum>>> = vec![
                Box::new(SanctumQLearning::new(QLearningConfig {
                    seed: Some(7),
                    ..Default::default()
                })),
                Box::new(SanctumSarsa::new(SarsaConfig {
                    seed: Some(7),
                    ..Default::default()
                })),
                Box::new(SanctumMonteCarlo::new(MonteCarloConfig {
                    seed: Some(7),
                    ..Default::default()
                })),
            ];
            agents
                .iter_mut()
                .map(|agent| {
                    let mut env = GuardianSanctum::classic();
                    (0..50)
                        .map(|_| agent.learn_episode(&mut env))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    assert_eq!(runs[0], runs[1], "Same seed, same learning curves");
    for returns in &runs[0] {
        assert_eq!(returns.len(), 50);
        assert!(bounded(returns), "{returns:?}");
    }
}

#[test]
fn q_learning_finds_the_treasure() {
    let mut env = GuardianSanctum::classic();
    let mut agent = SanctumQLearning::new(QLearningConfig {
        exploration: EpsilonGreedy::constant(0.1),
        seed: Some(2024),
        ..Default::default()
    });

    let mut wins = 0;
    for _ in 0..2000 {
        agent.learn_episode(&mut env);
        wins += env.report.take()["win"] as u32;
    }

    assert!(wins > 0, "A few thousand episodes are plenty to stumble upon the treasure");
}
