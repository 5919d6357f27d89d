//! League CLI - Command-line interface
//!
//! Commands:
//! - evolve: Search for a well-balanced double round-robin schedule
//! - generate: Produce one random valid schedule
//! - score: Evaluate a saved schedule against a league

mod evolve;
mod generate;
mod league;
mod report;
mod score;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Evolutionary double round-robin league scheduler")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a schedule for a league
    Evolve(evolve::EvolveArgs),
    /// Generate one random valid schedule
    Generate(generate::GenerateArgs),
    /// Score a saved schedule
    Score(score::ScoreArgs),
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evolve(args) => evolve::run(args, cli.seed),
        Commands::Generate(args) => generate::run(args, cli.seed),
        Commands::Score(args) => score::run(args),
    }
}

/// Create RNG from seed or entropy
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
