//! Command-line driver for the rogue DPS calculator.
//!
//! ```text
//! rogue-calc [SCENARIO] [--json]
//! ```
//!
//! Without a scenario file the built-in assassination character is used.
//! Log verbosity follows `RUST_LOG` (for example `RUST_LOG=rogue_calc=debug`).

mod report;
mod scenario;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rogue_calc::{
    compute_ep, glyphs_ranking, other_ep, talents_ranking, trinkets_ranking, DamageCalculator,
    DpsReport,
};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scenario::ScenarioFile;

/// Closed-form rogue DPS calculator
#[derive(Parser)]
#[command(name = "rogue-calc")]
#[command(about = "Damage breakdown, EP and rankings for a rogue", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario file; the built-in assassination character when omitted
    scenario: Option<PathBuf>,

    /// Print one JSON document instead of text tables
    #[arg(long)]
    json: bool,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    setup_logging();
    let args = Cli::parse();
    let start = Instant::now();

    let scenario = match &args.scenario {
        Some(path) => ScenarioFile::load(path)?,
        None => scenario::builtin()?,
    };
    let settings = scenario.settings()?;
    let ctx = &scenario.character;
    let wanted = &scenario.report;
    info!(spec = %settings.spec(), "running scenario");

    let dps = DamageCalculator::new(&settings, ctx).dps_breakdown()?;
    let ep = wanted.ep.then(|| compute_ep(&settings, ctx)).transpose()?;
    let talents = wanted
        .talents
        .then(|| talents_ranking(&settings, ctx))
        .transpose()?;
    let glyphs = (!wanted.glyphs.is_empty())
        .then(|| glyphs_ranking(&settings, ctx, &wanted.glyphs))
        .transpose()?;
    let trinket_names: Vec<&str> = wanted.trinkets.iter().map(String::as_str).collect();
    let trinkets = (!trinket_names.is_empty())
        .then(|| trinkets_ranking(&settings, ctx, &trinket_names))
        .transpose()?;
    let gear_buffs = scenario.report_gear_buffs()?;
    let gear = (!gear_buffs.is_empty())
        .then(|| other_ep(&settings, ctx, &gear_buffs))
        .transpose()?;

    if args.json {
        let document = json!({
            "dps": dps,
            "ep": ep,
            "talents": talents,
            "glyphs": glyphs,
            "trinkets": trinkets,
            "gear_buffs": gear,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    if let Some(table) = &ep {
        print!("{}", report::ep(table));
    }
    for ranking in [&gear, &glyphs, &trinkets].into_iter().flatten() {
        print!("{}", report::ranking(ranking));
    }
    if let Some(tiers) = &talents {
        print!("{}", report::talents(tiers));
    }
    match &dps {
        DpsReport::Merged(merged) => print!("{}", report::breakdown("dps breakdown", merged)),
        DpsReport::Split {
            non_execute,
            execute,
        } => {
            print!("{}", report::breakdown("non-execute breakdown", non_execute));
            print!("{}", report::breakdown("execute breakdown", execute));
        }
    }
    println!();
    println!("Request time: {:.3} sec", start.elapsed().as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_is_optional() {
        let cli = Cli::try_parse_from(["rogue-calc"]).unwrap();
        assert!(cli.scenario.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn takes_a_scenario_and_json_flag() {
        let cli = Cli::try_parse_from(["rogue-calc", "fight.json", "--json"]).unwrap();
        assert_eq!(cli.scenario, Some(PathBuf::from("fight.json")));
        assert!(cli.json);
    }

    #[test]
    fn rejects_unknown_flags_and_extra_files() {
        assert!(Cli::try_parse_from(["rogue-calc", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["rogue-calc", "a.json", "b.json"]).is_err());
    }
}
