//! Blackjack Coach CLI
//! Prints the strategy chart and auto-plays sessions through the engine.

use anyhow::Result;
use blackjack_coach::autoplay::{run_session, Policy, SessionSummary};
use blackjack_coach::events::{StatsEvent, StatsObserver};
use blackjack_coach::stats::SampleStats;
use blackjack_coach::strategy::StrategyChart;
use blackjack_coach::Config;
use clap::{Parser, Subcommand};
use log::{error, info};
use rayon::prelude::*;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "blackjack-coach", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the basic strategy chart used to grade decisions.
    Chart,
    /// Auto-play one session and report its statistics.
    Play {
        /// Number of rounds.
        #[arg(long, short, default_value_t = 20)]
        rounds: usize,
        /// How the automatic player decides.
        #[arg(long, value_enum, default_value_t = Policy::Basic)]
        policy: Policy,
        /// Print every statistics notification as a JSON line.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Auto-play many independent sessions in parallel and summarise them.
    Sessions {
        /// Number of sessions.
        #[arg(long, short, default_value_t = 100)]
        count: usize,
        /// Rounds per session.
        #[arg(long, short, default_value_t = 50)]
        rounds: usize,
        /// How the automatic player decides.
        #[arg(long, value_enum, default_value_t = Policy::Basic)]
        policy: Policy,
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(Debug, clap::Args)]
struct SessionArgs {
    /// Monte Carlo trials per win estimate.
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..=100_000))]
    simulations: u32,
    /// Starting coins.
    #[arg(long, default_value_t = 50)]
    coins: i64,
    /// Coins won or lost per round.
    #[arg(long, default_value_t = 10)]
    bet: i64,
    /// RNG seed for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,
}

impl SessionArgs {
    fn config(&self) -> Config {
        Config {
            simulations: self.simulations as usize,
            starting_coins: self.coins,
            bet: self.bet,
            seed: self.seed,
        }
    }
}

/// Prints notifications as JSON lines.
struct JsonPrinter;

impl StatsObserver for JsonPrinter {
    fn notify(&mut self, event: &StatsEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("Cannot encode {} event: {e}", event.channel()),
        }
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Chart => {
            println!("# Basic Strategy (hit / stand only)\n");
            print!("{}", StrategyChart::render());
            Ok(())
        }
        Command::Play {
            rounds,
            policy,
            json,
            session,
        } => play(rounds, policy, json, session.config()),
        Command::Sessions {
            count,
            rounds,
            policy,
            session,
        } => sessions(count, rounds, policy, session.config()),
    }
}

fn play(rounds: usize, policy: Policy, json: bool, config: Config) -> Result<()> {
    let mut observers: Vec<Box<dyn StatsObserver>> = Vec::new();
    if json {
        observers.push(Box::new(JsonPrinter));
    }

    let summary = run_session(config, rounds, policy, observers)?;
    print_report(&summary);
    Ok(())
}

fn print_report(summary: &SessionSummary) {
    let stats = &summary.stats;
    println!("============================================================");
    println!("SESSION REPORT ({} rounds)", summary.rounds);
    println!("============================================================");
    println!("{:<24} {:>12}", "Coins", summary.coins);
    println!("{:<24} {:>11.1}%", "Win rate", stats.win_rate() * 100.0);
    println!("{:<24} {:>12}", "Plays", stats.total_plays());
    println!("{:<24} {:>12}", "Risky plays", stats.risky_plays());
    println!("{:<24} {:>12.3}", "Average risk", stats.risk_average());
    println!(
        "{:<24} {:>11.1}%",
        "Perfect play",
        stats.perfect_play_percent() * 100.0
    );
    println!("{:<24} {:>+12.3}", "Luck factor", stats.luck_factor());
}

/// Summary figures for one session, merged across the parallel batch.
#[derive(Default)]
struct BatchStats {
    win_rate: SampleStats,
    perfect_play: SampleStats,
    luck: SampleStats,
    coins: SampleStats,
}

impl BatchStats {
    fn from_summary(summary: &SessionSummary) -> Self {
        let mut batch = BatchStats::default();
        batch.win_rate.update(summary.stats.win_rate());
        batch.perfect_play.update(summary.stats.perfect_play_percent());
        batch.luck.update(summary.stats.luck_factor());
        batch.coins.update(summary.coins as f64);
        batch
    }

    fn merge(mut self, other: BatchStats) -> Self {
        self.win_rate.merge(&other.win_rate);
        self.perfect_play.merge(&other.perfect_play);
        self.luck.merge(&other.luck);
        self.coins.merge(&other.coins);
        self
    }
}

fn sessions(count: usize, rounds: usize, policy: Policy, config: Config) -> Result<()> {
    let num_threads = rayon::current_num_threads();
    info!(
        "Playing {} sessions of {} rounds with {} threads",
        count, rounds, num_threads
    );

    let start_time = Instant::now();
    let base_seed = config.seed.unwrap_or_else(|| fastrand::u64(..));

    let batch = (0..count)
        .into_par_iter()
        .map(|i| {
            let config = Config {
                seed: Some(base_seed.wrapping_add(i as u64)),
                ..config.clone()
            };
            run_session(config, rounds, policy, Vec::new()).map(|s| BatchStats::from_summary(&s))
        })
        .try_reduce(BatchStats::default, |a, b| Ok(a.merge(b)))?;

    info!(
        "Simulation complete in {:.1} seconds",
        start_time.elapsed().as_secs_f64()
    );

    println!(
        "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Metric", "Mean", "Std dev", "SEM", "Min", "Max"
    );
    println!("{}", "-".repeat(71));
    for (name, stats) in [
        ("Win rate", &batch.win_rate),
        ("Perfect play", &batch.perfect_play),
        ("Luck factor", &batch.luck),
        ("Coins", &batch.coins),
    ] {
        println!(
            "{:<16} {:>+10.4} {:>10} {:>10} {:>10} {:>10}",
            name,
            stats.mean(),
            fmt_opt(stats.std_dev()),
            fmt_opt(stats.sem()),
            fmt_opt(stats.min()),
            fmt_opt(stats.max())
        );
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}
