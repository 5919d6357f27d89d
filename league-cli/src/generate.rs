//! Generate command - produce one random valid schedule

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use league_core::Schedule;
use league_evolve::{PopulationBuilder, DEFAULT_MAX_ATTEMPTS};

use crate::create_rng;
use crate::league::numbered_team_names;
use crate::report::format_matchdays;

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of teams (odd counts get a bye team)
    #[arg(long, default_value = "12")]
    pub teams: usize,

    /// Generator attempt budget
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Write the schedule matrix to this JSON file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the schedule as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let mut rng = create_rng(seed);
    let schedule = generate_one(&args, &mut rng)?;

    if let Some(path) = &args.output {
        schedule.save(path).context("Failed to save schedule")?;
        tracing::info!("Saved schedule to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
        return Ok(());
    }

    let names = numbered_team_names(args.teams);
    println!("{}", schedule);
    println!(
        "Coverage: {}",
        match schedule.check_coverage() {
            Ok(()) => "ok".to_string(),
            Err(e) => e.to_string(),
        }
    );
    println!();
    print!(
        "{}",
        format_matchdays(&schedule, |id| names.get(id).map_or("bye", String::as_str))
    );

    Ok(())
}

/// Run the generator until one schedule comes out or the budget is spent
fn generate_one<R: rand::Rng>(args: &GenerateArgs, rng: &mut R) -> Result<Schedule> {
    if args.teams == 0 {
        anyhow::bail!("Need at least one team");
    }

    let builder = PopulationBuilder::new(args.teams).with_max_attempts(args.max_attempts);
    let (schedules, report) = builder.build(1, rng);
    tracing::info!(
        "Generated {}-team schedule after {} attempts ({} failures)",
        builder.team_count(),
        report.attempts,
        report.failures
    );

    schedules.into_iter().next().with_context(|| {
        format!(
            "No valid schedule for {} teams in {} attempts",
            builder.team_count(),
            report.attempts
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn args(teams: usize, max_attempts: usize) -> GenerateArgs {
        GenerateArgs {
            teams,
            max_attempts,
            output: None,
            json: false,
        }
    }

    #[test]
    fn test_generate_one_is_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let schedule = generate_one(&args(6, 10_000), &mut rng).unwrap();

        assert_eq!(schedule.teams(), 6);
        assert!(schedule.is_valid());
        assert_eq!(schedule.check_leg_offset(), Ok(()));
    }

    #[test]
    fn test_generate_one_pads_odd_league() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let schedule = generate_one(&args(3, 10_000), &mut rng).unwrap();
        assert_eq!(schedule.teams(), 4);
    }

    #[test]
    fn test_generate_one_rejects_zero_teams() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(generate_one(&args(0, 10), &mut rng).is_err());
    }
}
