use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use u_mclp::{OptimizationRequest, Solver, SolverConfig, Strategy};

#[derive(Parser)]
#[command(
    name = "mclp-solve",
    version,
    about = "Solve a Maximal Covering Location request and print the result as JSON"
)]
struct Cli {
    /// Request JSON file; reads stdin when omitted or `-`.
    input: Option<PathBuf>,
    /// Solver configuration JSON file; command-line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the genetic algorithm.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of GA generations.
    #[arg(long)]
    generations: Option<usize>,
    /// GA population size.
    #[arg(long)]
    population: Option<usize>,
    /// Search engine to use.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Wall-clock limit for the search, in milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,
    /// Pretty-print the result JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Auto,
    Genetic,
    Exact,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => Strategy::Auto,
            StrategyArg::Genetic => Strategy::Genetic,
            StrategyArg::Exact => Strategy::Exact,
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn read_request(input: Option<&PathBuf>) -> anyhow::Result<OptimizationRequest> {
    let raw = match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("reading request from {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("parsing request JSON")
}

fn build_config(cli: &Cli) -> anyhow::Result<SolverConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            serde_json::from_str(&raw).context("parsing config JSON")?
        }
        None => SolverConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.ga.seed = Some(seed);
    }
    if let Some(generations) = cli.generations {
        config.ga.max_generations = generations;
    }
    if let Some(population) = cli.population {
        config.ga.population_size = population;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy.into();
    }
    if let Some(ms) = cli.time_limit_ms {
        config.ga.time_limit_ms = Some(ms);
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    enable_tracing();
    let cli = Cli::parse();

    let request = read_request(cli.input.as_ref())?;
    let config = build_config(&cli)?;

    let report = Solver::new(config).solve(&request)?;
    if let Some(notice) = &report.notice {
        tracing::warn!(%notice, "returning empty solution");
    }
    tracing::info!(
        strategy = ?report.strategy,
        stop = ?report.stop,
        generations = report.generations,
        evaluations = report.evaluations,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "solved"
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report.result)?
    } else {
        serde_json::to_string(&report.result)?
    };
    println!("{json}");
    Ok(())
}
