//! ATC roster demo CLI.
//!
//! Run with: cargo run -p atc-roster [small|large]
//! Or load a configuration from disk:
//!   cargo run -p atc-roster -- --config path/to/config.json [--pre-assignments path/to/pre.json]

use std::env;
use std::process::ExitCode;

use atc_roster::config::Config;
use atc_roster::demo_data::{self, DemoData};
use atc_roster::preassign::{self, PreAssignments};
use atc_roster::solver;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();

    let (config, pre_assignments) = match load_from_args(&args) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            let demo: DemoData = args.first().and_then(|arg| arg.parse().ok()).unwrap_or(DemoData::Small);
            println!("Solving {} demo roster...", demo.as_str());
            match demo {
                DemoData::Small => demo_data::generate_small(),
                DemoData::Large => demo_data::generate_large(),
            }
        }
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start_day = 1;
    let end_day = 21;

    match solver::run_solver(&config, &pre_assignments, start_day, end_day) {
        Ok(table) => {
            print_table(&config, &table);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("solve failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Loads a configuration (and optional pre-assignments) from `--config`/
/// `--pre-assignments` JSON file paths, if present. Returns `Ok(None)` when
/// neither flag was passed, so the caller falls back to demo data.
fn load_from_args(args: &[String]) -> Result<Option<(Config, PreAssignments)>, atc_roster::error::RosterError> {
    let Some(config_path) = flag_value(args, "--config") else {
        return Ok(None);
    };
    let config_json = std::fs::read_to_string(&config_path)
        .map_err(|e| atc_roster::error::RosterError::ConfigError(format!("cannot read {config_path}: {e}")))?;
    let config = Config::from_json(&config_json)?;

    let pre_assignments = match flag_value(args, "--pre-assignments") {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| atc_roster::error::RosterError::ConfigError(format!("cannot read {path}: {e}")))?;
            preassign::from_json(&json)?
        }
        None => PreAssignments::new(),
    };

    Ok(Some((config, pre_assignments)))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

fn print_table(config: &atc_roster::config::Config, table: &solver::PlanningTable) {
    println!("status: {}\n", table.status.as_str());

    let col_width = 5usize;
    print!("{:<6}", "");
    for d in table.start_day..=table.end_day {
        print!("{:>width$}", d, width = col_width);
    }
    println!();

    for controller in &config.controllers {
        print!("{:<6}", controller);
        for d in table.start_day..=table.end_day {
            let cell = table.cell(controller, d).unwrap_or("?");
            print!("{:>width$}", cell, width = col_width);
        }
        println!();
    }
}
