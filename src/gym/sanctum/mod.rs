//! Guardian's Sanctum: fetch the key, pass the door and take the treasure without being caught
//!
//! The agent moves one cell per step, or two cells with a noisy "fast" move. Sentinels walk
//! fixed patrol routes, but a fast move within their alert radius makes them break patrol and
//! step towards the noise.

use log::{debug, trace};
use strum::EnumCount;

use crate::{
    algo::tabular::{MonteCarlo, QLearning, Sarsa},
    env::{Environment, Report, Step},
    error::{Error, Result},
};

mod action;
mod map;
mod sentinel;

pub use action::{Action, Dir};
pub use map::{manhattan, GridMap, Pos, CLASSIC_LAYOUT};
pub use sentinel::Sentinel;

/// Size of the sanctum action space
pub const N_ACTIONS: usize = Action::COUNT;

pub type SanctumQLearning = QLearning<GuardianSanctum, N_ACTIONS>;
pub type SanctumSarsa = Sarsa<GuardianSanctum, N_ACTIONS>;
pub type SanctumMonteCarlo = MonteCarlo<GuardianSanctum, N_ACTIONS>;

/// Patrol routes of the classic sanctum
pub fn classic_routes() -> Vec<Vec<Pos>> {
    vec![
        vec![(1, 4), (2, 4), (3, 4), (2, 4)],
        vec![(5, 2), (5, 3), (5, 4), (5, 3)],
    ]
}

/// What an agent observes
///
/// `phase` is the step counter modulo the joint patrol cycle, so together with the agent's
/// cell it pins down where every sentinel is on its route (as long as none is pursuing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SanctumState {
    pub x: i32,
    pub y: i32,
    pub has_key: bool,
    pub phase: u32,
}

/// Why an episode ended, if it did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInfo {
    pub caught: bool,
    pub timeout: bool,
    pub win: bool,
}

/// How the joint patrol cycle length is derived from the route lengths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatrolPhase {
    /// Product of all route lengths
    #[default]
    Product,
    /// Least common multiple of all route lengths
    Lcm,
}

/// Configuration for the [`GuardianSanctum`]
#[derive(Debug, Clone, PartialEq)]
pub struct SanctumConfig {
    /// Steps before the episode times out
    pub max_steps: u32,
    /// Manhattan distance within which a fast move alerts a sentinel
    pub alert_radius: u32,
    pub step_cost: f64,
    pub key_reward: f64,
    pub caught_penalty: f64,
    pub win_reward: f64,
    pub phase: PatrolPhase,
}

impl Default for SanctumConfig {
    fn default() -> Self {
        Self {
            max_steps: 500,
            alert_radius: 3,
            step_cost: -1.0,
            key_reward: 50.0,
            caught_penalty: 100.0,
            win_reward: 200.0,
            phase: PatrolPhase::Product,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Active,
    Terminated,
}

/// The Guardian's Sanctum environment
pub struct GuardianSanctum {
    map: GridMap,
    sentinels: Vec<Sentinel>,
    /// Where each sentinel ended up on the last step, pursuit included
    sentinel_positions: Vec<Pos>,
    config: SanctumConfig,
    cycle: u32,
    agent: Pos,
    has_key: bool,
    steps: u32,
    status: Status,
    pub report: Report,
}

impl GuardianSanctum {
    /// Build a sanctum from a map and one patrol route per sentinel
    ///
    /// Routes may cross walls but must stay inside the map.
    ///
    /// **Panics** if `config.max_steps` is zero
    pub fn new(map: GridMap, routes: Vec<Vec<Pos>>, config: SanctumConfig) -> Result<Self> {
        assert!(config.max_steps > 0, "Step budget must be positive.");
        for (sentinel, route) in routes.iter().enumerate() {
            if route.is_empty() {
                return Err(Error::EmptyRoute { sentinel });
            }
            if let Some(&(x, y)) = route.iter().find(|&&p| !map.in_bounds(p)) {
                return Err(Error::RouteOutOfBounds { sentinel, x, y });
            }
        }

        let sentinels = routes.into_iter().map(Sentinel::new).collect::<Vec<_>>();
        let mut lengths = sentinels
            .iter()
            .map(|s| u32::try_from(s.route().len()).ok());
        let cycle = match config.phase {
            PatrolPhase::Product => lengths.try_fold(1u32, |acc, len| acc.checked_mul(len?)),
            PatrolPhase::Lcm => lengths.try_fold(1u32, |acc, len| lcm(acc, len?)),
        }
        .ok_or(Error::PatrolCycleOverflow)?;

        let mut env = Self {
            sentinel_positions: sentinels.iter().map(Sentinel::position).collect(),
            agent: map.start(),
            map,
            sentinels,
            config,
            cycle,
            has_key: false,
            steps: 0,
            status: Status::Active,
            report: Report::new(vec!["reward", "steps", "win"]),
        };
        env.reset();
        Ok(env)
    }

    /// The reference sanctum with default configuration
    pub fn classic() -> Self {
        Self::with_config(SanctumConfig::default())
    }

    /// The reference sanctum with a custom configuration
    pub fn with_config(config: SanctumConfig) -> Self {
        Self::new(GridMap::classic(), classic_routes(), config)
            .expect("The classic routes fit the classic layout")
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn config(&self) -> &SanctumConfig {
        &self.config
    }

    pub fn sentinels(&self) -> &[Sentinel] {
        &self.sentinels
    }

    pub fn sentinel_positions(&self) -> &[Pos] {
        &self.sentinel_positions
    }

    pub fn agent(&self) -> Pos {
        self.agent
    }

    pub fn has_key(&self) -> bool {
        self.has_key
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Length of the joint patrol cycle used for the observed phase
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Encode the current episode as an observation
    pub fn state(&self) -> SanctumState {
        SanctumState {
            x: self.agent.0,
            y: self.agent.1,
            has_key: self.has_key,
            phase: self.steps % self.cycle,
        }
    }

    /// Draw the map with the agent (`A`) and sentinels (`G`) overlaid
    pub fn render(&self) -> String {
        let mut grid = self.map.layout().to_vec();
        let mut mark = |(x, y): Pos, c: char| {
            if self.map.in_bounds((x, y)) {
                grid[y as usize][x as usize] = c;
            }
        };

        mark(self.agent, 'A');
        for &pos in &self.sentinel_positions {
            mark(pos, 'G');
        }

        grid.iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn is_free(&self, pos: Pos) -> bool {
        self.map.in_bounds(pos)
            && !self.map.is_wall(pos)
            && (pos != self.map.door() || self.has_key)
    }

    /// Attempt a single step, staying put if the target cell is blocked
    fn try_move(&mut self, dir: Dir) {
        let target = dir.offset(self.agent);
        if self.is_free(target) {
            self.agent = target;
        }
    }

    fn move_sentinels(&mut self, noise: Option<Pos>) {
        let radius = self.config.alert_radius;
        for (i, (sentinel, pos)) in self
            .sentinels
            .iter_mut()
            .zip(self.sentinel_positions.iter_mut())
            .enumerate()
        {
            *pos = match noise.and_then(|n| sentinel.pursue(n, radius, &self.map)) {
                Some(pursuit) => {
                    trace!("sentinel {i} pursues noise at {noise:?}, moving to {pursuit:?}");
                    pursuit
                }
                None => sentinel.advance(),
            };
        }
    }

    fn finish(&mut self, reward: f64, info: StepInfo) -> Step<SanctumState, StepInfo> {
        let done = info.caught || info.timeout || info.win;

        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report.entry("reward").and_modify(|x| *x += reward);
        if info.win {
            self.report.entry("win").and_modify(|x| *x = 1.0);
        }

        if done {
            self.status = Status::Terminated;
            debug!(
                "episode over after {} steps at {:?}: {:?}",
                self.steps, self.agent, info
            );
        }

        Step {
            state: self.state(),
            reward,
            done,
            info,
        }
    }
}

impl Environment for GuardianSanctum {
    type State = SanctumState;
    type Action = Action;
    type Info = StepInfo;

    fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    fn reset(&mut self) -> Self::State {
        self.agent = self.map.start();
        self.has_key = false;
        self.steps = 0;
        for sentinel in self.sentinels.iter_mut() {
            sentinel.reset();
        }
        self.sentinel_positions = self.sentinels.iter().map(Sentinel::position).collect();
        self.status = Status::Active;
        self.state()
    }

    /// **Panics** if the episode has already terminated
    fn step(&mut self, action: Self::Action) -> Step<Self::State, Self::Info> {
        assert!(
            self.is_active(),
            "Cannot step a terminated episode. Call `reset` first."
        );

        let dir = action.direction();
        let noise = if action.is_fast() {
            self.try_move(dir);
            self.try_move(dir);
            Some(self.agent)
        } else {
            self.try_move(dir);
            None
        };

        let mut reward = self.config.step_cost;
        let mut info = StepInfo::default();

        if self.agent == self.map.key() && !self.has_key {
            self.has_key = true;
            reward += self.config.key_reward;
        }

        self.move_sentinels(noise);

        if self.sentinel_positions.contains(&self.agent) {
            reward -= self.config.caught_penalty;
            info.caught = true;
            return self.finish(reward, info);
        }

        self.steps += 1;
        if self.steps >= self.config.max_steps {
            info.timeout = true;
        }

        if self.agent == self.map.treasure() && self.has_key {
            reward += self.config.win_reward;
            info.win = true;
        }

        self.finish(reward, info)
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u32, b: u32) -> Option<u32> {
    (a / gcd(a, b)).checked_mul(b)
}
