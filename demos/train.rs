use std::{error::Error, path::PathBuf};

use clap::{Parser, ValueEnum};
use log::{info, warn};
use sanctum_rl::{
    algo::EpisodicAgent,
    algo::tabular::{MonteCarloConfig, QLearningConfig, SarsaConfig},
    gym::sanctum::{GuardianSanctum, SanctumMonteCarlo, SanctumQLearning, SanctumSarsa},
    util, viz,
};

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Algo {
    QLearning,
    Sarsa,
    MonteCarlo,
}

#[derive(Parser, Debug)]
#[command(about = "Train one tabular agent on the Guardian's Sanctum")]
struct Args {
    /// Learning algorithm
    #[arg(long, value_enum, default_value_t = Algo::QLearning)]
    algo: Algo,

    /// Number of training episodes
    #[arg(long, default_value_t = 500)]
    episodes: u32,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Window of the smoothed return
    #[arg(long, default_value_t = 25)]
    window: usize,

    /// Optional CSV file for per-episode metrics
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn agent(algo: Algo, seed: Option<u64>) -> Box<dyn EpisodicAgent<GuardianSanctum>> {
    match algo {
        Algo::QLearning => Box::new(SanctumQLearning::new(QLearningConfig {
            seed,
            ..Default::default()
        })),
        Algo::Sarsa => Box::new(SanctumSarsa::new(SarsaConfig {
            seed,
            ..Default::default()
        })),
        Algo::MonteCarlo => Box::new(SanctumMonteCarlo::new(MonteCarloConfig {
            seed,
            ..Default::default()
        })),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut env = GuardianSanctum::classic();
    let mut agent = agent(args.algo, args.seed);

    // Live smoothing uses a trailing mean, so the first `window - 1` points average fewer
    // episodes. The CSV holds the full-window moving average.
    let mut plots = env.report.keys();
    plots.push("trailing mean return");
    let (handle, tx) = viz::init(&plots, args.episodes)?;
    info!("training {} for {} episodes", agent.name(), args.episodes);

    let log_every = (args.episodes / 10).max(1);
    let mut returns = Vec::with_capacity(args.episodes as usize);
    let mut rows = Vec::with_capacity(args.episodes as usize);

    for i in 0..args.episodes {
        let total = agent.learn_episode(&mut env);
        let report = env.report.take();
        returns.push(total);
        rows.push((i, total, report["steps"], report["win"]));

        let trailing = util::trailing_mean(&returns, args.window);
        if (i + 1) % log_every == 0 {
            info!("episode {}: return {total}, trailing mean {trailing:.2}", i + 1);
        }

        let data = report.values().copied().chain([trailing]).collect();
        if tx.send(viz::Update { episode: i, data }).is_err() {
            warn!(
                "dashboard closed after {} of {} episodes, stopping early",
                i + 1,
                args.episodes
            );
            break;
        }
    }
    drop(tx);

    if let Some(path) = &args.csv {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["episode", "return", "smoothed", "steps", "win"])?;

        let smoothed = util::moving_average(&returns, args.window.max(1));
        let offset = args.window.max(1) - 1;
        for (t, (episode, total, steps, win)) in rows.into_iter().enumerate() {
            let smoothed = t
                .checked_sub(offset)
                .and_then(|j| smoothed.get(j))
                .map_or(String::new(), f64::to_string);
            wtr.write_record(&[
                episode.to_string(),
                total.to_string(),
                smoothed,
                steps.to_string(),
                win.to_string(),
            ])?;
        }
        wtr.flush()?;
        info!("wrote {}", path.display());
    }

    viz::join(handle)?;
    Ok(())
}
