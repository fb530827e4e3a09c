use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::{info, warn};
use sanctum_rl::{
    algo::EpisodicAgent,
    algo::tabular::{MonteCarloConfig, QLearningConfig, SarsaConfig},
    gym::sanctum::{GuardianSanctum, SanctumMonteCarlo, SanctumQLearning, SanctumSarsa},
    util, viz,
};
use statrs::statistics::Statistics;

#[derive(Parser, Debug)]
#[command(about = "Train Q-learning, SARSA and Monte Carlo side by side on the Guardian's Sanctum")]
struct Args {
    /// Number of training episodes per algorithm
    #[arg(long, default_value_t = 500)]
    episodes: u32,

    /// Random seed shared by all agents
    #[arg(long)]
    seed: Option<u64>,

    /// Window of the smoothed returns and of the final summary
    #[arg(long, default_value_t = 25)]
    window: usize,

    /// Optional CSV file for per-episode returns
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut agents: Vec<Box<dyn EpisodicAgent<GuardianSanctum>>> = vec![
        Box::new(SanctumQLearning::new(QLearningConfig {
            seed: args.seed,
            ..Default::default()
        })),
        Box::new(SanctumSarsa::new(SarsaConfig {
            seed: args.seed,
            ..Default::default()
        })),
        Box::new(SanctumMonteCarlo::new(MonteCarloConfig {
            seed: args.seed,
            ..Default::default()
        })),
    ];
    let mut envs = agents
        .iter()
        .map(|_| GuardianSanctum::classic())
        .collect::<Vec<_>>();
    let names = agents.iter().map(|a| a.name()).collect::<Vec<_>>();

    // One plot per agent showing the trailing mean of its returns
    let (handle, tx) = viz::init(&names, args.episodes)?;
    info!("comparing {names:?} over {} episodes", args.episodes);

    let mut returns = vec![Vec::with_capacity(args.episodes as usize); agents.len()];
    'train: for i in 0..args.episodes {
        let mut data = Vec::with_capacity(agents.len());
        for ((agent, env), returns) in agents
            .iter_mut()
            .zip(envs.iter_mut())
            .zip(returns.iter_mut())
        {
            returns.push(agent.learn_episode(env));
            env.report.take();
            data.push(util::trailing_mean(returns, args.window));
        }

        if tx.send(viz::Update { episode: i, data }).is_err() {
            warn!(
                "dashboard closed after {} of {} episodes, stopping early",
                i + 1,
                args.episodes
            );
            break 'train;
        }
    }
    drop(tx);

    for (name, returns) in names.iter().zip(&returns) {
        let tail = &returns[returns.len().saturating_sub(args.window)..];
        info!(
            "{name}: final {} episodes mean {:.2}, std dev {:.2}",
            tail.len(),
            tail.mean(),
            tail.std_dev()
        );
    }

    if let Some(path) = &args.csv {
        let mut wtr = csv::Writer::from_path(path)?;
        let mut header = vec!["episode".to_string()];
        for name in &names {
            header.push(name.to_string());
            header.push(format!("{name} smoothed"));
        }
        wtr.write_record(&header)?;

        let window = args.window.max(1);
        let smoothed = returns
            .iter()
            .map(|r| util::moving_average(r, window))
            .collect::<Vec<_>>();
        let episodes = returns.iter().map(Vec::len).min().unwrap_or(0);
        for t in 0..episodes {
            let mut record = vec![t.to_string()];
            for (r, s) in returns.iter().zip(&smoothed) {
                record.push(r[t].to_string());
                record.push(
                    t.checked_sub(window - 1)
                        .and_then(|j| s.get(j))
                        .map_or(String::new(), f64::to_string),
                );
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        info!("wrote {}", path.display());
    }

    viz::join(handle)?;
    Ok(())
}
