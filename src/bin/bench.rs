//! Benchmark a full solve of the larger demo roster.
//!
//! Run with: cargo run --release -p atc-roster --bin bench

use std::time::Instant;

use atc_roster::demo_data;
use atc_roster::solver;

fn main() {
    tracing_subscriber::fmt::init();

    let (config, pre_assignments) = demo_data::generate_large();
    let start_day = 1;
    let end_day = 30;

    println!("Benchmark: full CP solve");
    println!("  Controllers: {}", config.controllers.len());
    println!("  Horizon: {start_day}-{end_day} (+{} buffer)", config.contract.buffer_days);
    println!();

    let start = Instant::now();
    let result = solver::run_solver(&config, &pre_assignments, start_day, end_day);
    let elapsed = start.elapsed();

    match result {
        Ok(table) => {
            println!("Status: {}", table.status.as_str());
            println!("Elapsed: {:.2?}", elapsed);
        }
        Err(err) => {
            println!("Solve failed after {:.2?}: {err}", elapsed);
        }
    }
}
