//! Score command - evaluate a saved schedule against a league

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use league_core::{evaluate, Schedule, ScoreBreakdown};

use crate::league::League;
use crate::report::{format_breakdown, format_matchdays};

#[derive(Args)]
pub struct ScoreArgs {
    /// Schedule matrix JSON file
    #[arg(long, value_name = "FILE")]
    pub schedule: PathBuf,

    /// League definition; demo league if omitted
    #[arg(long, value_name = "FILE")]
    pub league: Option<PathBuf>,

    /// Normalize against bounds derived from the league
    #[arg(long)]
    pub analytic_bounds: bool,

    /// Show the fixture list as well
    #[arg(long)]
    pub fixtures: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ScoreArgs) -> Result<()> {
    let league = League::load_or_demo(args.league.as_deref())?;
    let schedule = load_schedule(&args.schedule)?;
    let breakdown = score_schedule(&schedule, &league, args.analytic_bounds)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    print!("{}", format_breakdown(&breakdown));
    if let Err(violation) = schedule.check_leg_offset() {
        println!("Legs are not a fixed distance apart: {}", violation);
    }
    if args.fixtures {
        println!();
        print!("{}", format_matchdays(&schedule, |id| league.team_name(id)));
    }

    Ok(())
}

fn load_schedule(path: &Path) -> Result<Schedule> {
    Schedule::load(path).with_context(|| format!("Failed to load schedule {}", path.display()))
}

/// Check the schedule fits the league and score it
fn score_schedule(schedule: &Schedule, league: &League, analytic: bool) -> Result<ScoreBreakdown> {
    let distances = league.padded_distances()?;
    if schedule.teams() != distances.size() {
        anyhow::bail!(
            "Schedule has {} teams but the league needs {}",
            schedule.teams(),
            distances.size()
        );
    }
    schedule.check_coverage().context("Schedule is not a valid double round-robin")?;

    let config = league.fitness_config(analytic)?;
    Ok(evaluate(schedule, &distances, &config))
}
