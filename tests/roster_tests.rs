//! Integration tests covering the concrete scenarios from the rostering
//! specification's testable-properties section.

use std::collections::{HashMap, HashSet};

use atc_roster::config::{CalendarBan, Config, Contract, DayKindPreferences, PerControllerRules, ShiftTimes, Weights};
use atc_roster::preassign::{PreAssignmentValue, PreAssignments};
use atc_roster::solver::{self, SolveStatus};

fn shift(start: f64, end: f64) -> ShiftTimes {
    ShiftTimes { start, end }
}

fn base_config(shifts: HashMap<String, ShiftTimes>, controllers: Vec<&str>, soft_covered: &str) -> Config {
    Config {
        year: 2025,
        controllers: controllers.into_iter().map(str::to_string).collect(),
        office_bound: HashSet::new(),
        shifts,
        pseudo_shifts: HashMap::new(),
        contract: Contract::default(),
        per_controller: HashMap::new(),
        weights: Weights::default(),
        soft_covered_shift: soft_covered.to_string(),
        calendar_bans: Vec::new(),
    }
}

/// Scenario 1: single controller, 7 days, one 8h shift, minRest 11h.
/// At most 4 working days, weekly hours <= 32, at least one rest pair.
#[test]
fn single_controller_one_week_one_shift() {
    let mut shifts = HashMap::new();
    shifts.insert("M".to_string(), shift(6.0, 14.0));
    let config = base_config(shifts, vec!["A"], "M");

    let table = solver::run_solver(&config, &PreAssignments::new(), 1, 7).expect("expected a feasible solve");

    let working_days: Vec<i64> = (1..=7).filter(|&d| table.cell("A", d) == Some("M")).collect();
    assert!(working_days.len() <= 4, "too many working days: {working_days:?}");

    let total_hours = working_days.len() as f64 * 8.0;
    assert!(total_hours <= 32.0);

    let has_rest_pair = (1..7).any(|d| table.cell("A", d) != Some("M") && table.cell("A", d + 1) != Some("M"));
    assert!(has_rest_pair, "expected at least one consecutive rest pair");
}

/// Scenario 2: two controllers, three shifts covering the day, 14 days.
/// Every day has M/A/S assigned; nobody does A then M the next day.
#[test]
fn two_controllers_three_shifts_covers_every_day() {
    let mut shifts = HashMap::new();
    shifts.insert("M".to_string(), shift(6.0, 14.0));
    shifts.insert("A".to_string(), shift(14.0, 22.0));
    shifts.insert("S".to_string(), shift(22.0, 6.0));
    let config = base_config(shifts, vec!["A", "B"], "S");

    let table = solver::run_solver(&config, &PreAssignments::new(), 1, 14).expect("expected a feasible solve");
    assert!(matches!(table.status, SolveStatus::Optimal | SolveStatus::Feasible));

    for d in 1..=14 {
        let m_covered = ["A", "B"].iter().any(|c| table.cell(c, d) == Some("M"));
        let a_covered = ["A", "B"].iter().any(|c| table.cell(c, d) == Some("A"));
        assert!(m_covered, "day {d} missing M coverage");
        assert!(a_covered, "day {d} missing A coverage");
    }

    for controller in ["A", "B"] {
        for d in 1..14 {
            let today = table.cell(controller, d);
            let tomorrow = table.cell(controller, d + 1);
            assert!(
                !(today == Some("A") && tomorrow == Some("M")),
                "{controller} worked A on day {d} then M on day {}: rest violation",
                d + 1
            );
        }
    }
}

/// Scenario 3: leave pre-assigned for a controller on a given day.
#[test]
fn leave_pre_assignment_forces_no_shift() {
    let mut shifts = HashMap::new();
    shifts.insert("M".to_string(), shift(6.0, 14.0));
    let config = base_config(shifts, vec!["A", "B"], "M");

    let mut pre_assignments: PreAssignments = HashMap::new();
    let mut a_days = HashMap::new();
    a_days.insert(10, PreAssignmentValue::Leave);
    pre_assignments.insert("A".to_string(), a_days);

    let table = solver::run_solver(&config, &pre_assignments, 1, 14).expect("expected a feasible solve");
    assert_eq!(table.cell("A", 10), Some("C"));

    // Coverage must still hold even with A unavailable that day.
    let covered = ["A", "B"].iter().any(|c| table.cell(c, 10) == Some("M"));
    assert!(covered, "day 10 coverage must still be met by another controller");
}

/// Scenario 4: require2ConsecutiveRestDays, 21-day horizon, 4 controllers.
/// Every rolling 7-day window contains a consecutive OFF-OFF pair.
#[test]
fn rest_pair_required_every_rolling_week() {
    let mut shifts = HashMap::new();
    shifts.insert("M".to_string(), shift(6.0, 14.0));
    let mut config = base_config(shifts, vec!["A", "B", "C", "D"], "M");
    config.contract.require_2_consecutive_rest_days = true;

    let table = solver::run_solver(&config, &PreAssignments::new(), 1, 21).expect("expected a feasible solve");

    for controller in ["A", "B", "C", "D"] {
        for window_start in 1..=15i64 {
            let has_pair = (window_start..window_start + 6).any(|d| {
                table.cell(controller, d) != Some("M") && table.cell(controller, d + 1) != Some("M")
            });
            assert!(
                has_pair,
                "{controller} window starting {window_start} has no consecutive rest pair"
            );
        }
    }
}

/// Scenario 5: a single controller cannot cover three simultaneously
/// critical shifts every day — infeasible.
#[test]
fn three_critical_shifts_single_controller_infeasible() {
    let mut shifts = HashMap::new();
    shifts.insert("M".to_string(), shift(6.0, 14.0));
    shifts.insert("A".to_string(), shift(14.0, 22.0));
    shifts.insert("S".to_string(), shift(22.0, 6.0));
    // soft_covered_shift must reference a real shift; pick S so M and A
    // both remain hard-critical, which a lone controller cannot satisfy.
    let config = base_config(shifts, vec!["A"], "S");

    let result = solver::run_solver(&config, &PreAssignments::new(), 1, 7);
    assert!(result.is_err(), "expected infeasibility with one controller and two hard-critical shifts");
}

/// Scenario 6: preference reward nudges the solver toward a controller's
/// declared weekday shift when a genuinely equal-cost, non-critical
/// alternative exists. J2 is hard-critical but already covered on this
/// day by U's forced pre-assignment, so T's own day-6 choice between
/// {J1, OFF} has no coverage or balance consequence -- soft-cover
/// penalty is zeroed out so it can't confound the comparison either.
/// Only the preference reward breaks the tie.
#[test]
fn preference_reward_prefers_declared_weekday_shift() {
    let mut shifts = HashMap::new();
    shifts.insert("J1".to_string(), shift(7.0, 16.0));
    shifts.insert("J2".to_string(), shift(8.5, 18.0));

    let mut per_controller = HashMap::new();
    per_controller.insert(
        "T".to_string(),
        PerControllerRules {
            preferences: Some(DayKindPreferences {
                weekday: ["J1"].iter().map(|s| s.to_string()).collect(),
                weekend: HashSet::new(),
            }),
            ..Default::default()
        },
    );

    // soft_covered_shift = J1, so only J2 is hard-critical (C3); J1's
    // coverage is purely an objective shortfall, not a constraint.
    let mut config = base_config(shifts, vec!["T", "U"], "J1");
    config.per_controller = per_controller;
    config.weights = Weights {
        soft_cover_penalty: 0,
        ..Weights::default()
    };

    let mut pre_assignments: PreAssignments = HashMap::new();
    let mut u_days = HashMap::new();
    u_days.insert(6, PreAssignmentValue::Forced("J2".to_string()));
    pre_assignments.insert("U".to_string(), u_days);

    // 2025-01-06 is a Monday; day-of-year 6. T can only ever work J1 (C10
    // forbids J2 for T), so T's sole decision each day is J1 vs OFF.
    let table = solver::run_solver(&config, &pre_assignments, 6, 6).expect("expected a feasible solve");
    assert_eq!(table.cell("U", 6), Some("J2"));
    assert_eq!(
        table.cell("T", 6),
        Some("J1"),
        "preference reward should have pulled T onto the declared weekday shift over OFF"
    );
}

/// Calendar bans are enforced as a hard constraint: the named controller
/// never works on the banned ISO weekday.
#[test]
fn calendar_ban_forbids_named_weekday() {
    let mut shifts = HashMap::new();
    shifts.insert("M".to_string(), shift(6.0, 14.0));
    let mut config = base_config(shifts, vec!["A", "B"], "M");
    // ISO weekday 7 = Sunday. 2025-01-05 is a Sunday (day-of-year 5).
    config.calendar_bans = vec![CalendarBan {
        controller: "A".to_string(),
        iso_weekday: 7,
    }];

    let table = solver::run_solver(&config, &PreAssignments::new(), 1, 14).expect("expected a feasible solve");
    assert_ne!(table.cell("A", 5), Some("M"));
}
