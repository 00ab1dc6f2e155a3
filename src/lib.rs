//! Constraint-programming core for an air-traffic-control shift roster.
//!
//! Given a configuration, a pre-assignment map and a horizon, `solver::run_solver`
//! builds a CP model, solves it under a wall-clock deadline, and returns a
//! per-controller, per-day planning table.

pub mod calendar;
pub mod config;
pub mod constraints;
pub mod demo_data;
pub mod error;
pub mod objective;
pub mod preassign;
pub mod shifts;
pub mod solver;
pub mod variables;
