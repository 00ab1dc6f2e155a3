//! Hard constraint builder (spec.md §4.2, C1-C13). C1 and the `worked`
//! link are built alongside the variables themselves (see `variables.rs`);
//! everything else lives here.

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use selen::prelude::*;

use crate::calendar;
use crate::config::{Config, PairPolicy};
use crate::preassign::{PreAssignmentValue, PreAssignments};
use crate::shifts::ShiftCatalog;
use crate::variables::Variables;

/// Applies every hard constraint to `m`. `ext_days` is the extended
/// horizon (including the right-hand buffer); `real_days` is the horizon
/// the caller actually asked for.
pub fn apply_all(
    m: &mut Model,
    vars: &Variables,
    config: &Config,
    catalog: &ShiftCatalog,
    ext_days: &[i64],
    real_days: &[i64],
    pre_assignments: &PreAssignments,
) {
    c2_pre_assignments(m, vars, pre_assignments);
    c3_hard_coverage(m, vars, catalog, ext_days, &config.soft_covered_shift);
    c4_daily_rest(m, vars, catalog, config, ext_days);
    c5_max_consecutive(m, vars, config, ext_days);
    c6_weekly_hours_cap(m, vars, catalog, config, ext_days);
    c7_rolling_hours_cap(m, vars, catalog, config, ext_days);
    c8_rest_day_pairs(m, vars, config, ext_days);
    c9_strict_pair_templates(m, vars, config, ext_days);
    c10_day_kind_preferences(m, vars, catalog, config, ext_days);
    c11_no_overlap_with_peer(m, vars, config, ext_days);
    c12_calendar_bans(m, vars, config, ext_days);
    c13_monthly_pseudo_caps(m, vars, catalog, config, real_days);
}

/// C2 — forced shifts and leave from the pre-assignment map.
fn c2_pre_assignments(m: &mut Model, vars: &Variables, pre_assignments: &PreAssignments) {
    for (controller, by_day) in pre_assignments {
        for (&day, value) in by_day {
            match value {
                PreAssignmentValue::Forced(code) => {
                    if let Some(&v) = vars.x.get(&(controller.clone(), code.clone(), day)) {
                        m.c(v).eq(int(1));
                    }
                }
                PreAssignmentValue::Leave => {
                    for ((c, _v, d), &var) in vars.x.iter() {
                        if c == controller && *d == day {
                            m.c(var).eq(int(0));
                        }
                    }
                }
            }
        }
    }
}

/// C3 — hard coverage: every critical shift needs >= 1 controller each day.
/// The designated `soft_covered_shift` is exempted here; its shortfall
/// becomes an objective penalty instead (see `objective.rs`).
fn c3_hard_coverage(
    m: &mut Model,
    vars: &Variables,
    catalog: &ShiftCatalog,
    days: &[i64],
    soft_covered_shift: &str,
) {
    let codes = catalog.operational_codes();
    for &d in days {
        for v in &codes {
            if v == soft_covered_shift {
                continue;
            }
            let controllers_on_shift: Vec<VarId> = vars
                .x
                .iter()
                .filter(|((_, code, day), _)| code == v && *day == d)
                .map(|(_, &var)| var)
                .collect();
            let total = m.sum(&controllers_on_shift);
            m.c(total).ge(int(1));
        }
    }
}

/// C4 — daily rest: forbid back-to-back shift pairs whose gap is shorter
/// than `minRestHours`, for controllers not marked office-bound.
fn c4_daily_rest(m: &mut Model, vars: &Variables, catalog: &ShiftCatalog, config: &Config, days: &[i64]) {
    let min_rest_centi = (config.contract.min_rest_hours * 100.0).round() as i64;
    let codes = catalog.operational_codes();

    for controller in &config.controllers {
        if config.office_bound.contains(controller) {
            continue;
        }
        for window in days.windows(2) {
            let (d, d_next) = (window[0], window[1]);
            for v1 in &codes {
                let end_v1 = catalog.operational[v1].end as i64;
                for v2 in &codes {
                    let start_v2 = catalog.operational[v2].start as i64 + 2400;
                    if start_v2 - end_v1 < min_rest_centi {
                        let x1 = vars.x_var(controller, v1, d);
                        let x2 = vars.x_var(controller, v2, d_next);
                        let pair_sum = m.sum(&[x1, x2]);
                        m.c(pair_sum).le(int(1));
                    }
                }
            }
        }
    }
}

/// C5 — at most `maxConsecutiveShifts` working days in any window of
/// `maxConsecutiveShifts + 1` consecutive days.
fn c5_max_consecutive(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) {
    let max_consecutive = config.contract.max_consecutive_shifts as usize;
    let window_len = max_consecutive + 1;
    if days.len() < window_len {
        return;
    }
    for controller in &config.controllers {
        for window in days.windows(window_len) {
            let worked_vars: Vec<VarId> = window.iter().map(|&d| vars.worked_var(controller, d)).collect();
            let total = m.sum(&worked_vars);
            m.c(total).le(int(max_consecutive as i64));
        }
    }
}

/// C6 — at most `maxHoursCalendarWeek` worked hours within any ISO
/// calendar week (Mon-Sun) overlapping the horizon.
fn c6_weekly_hours_cap(m: &mut Model, vars: &Variables, catalog: &ShiftCatalog, config: &Config, days: &[i64]) {
    let cap_centi = (config.contract.max_hours_calendar_week * 100.0).round() as i64;
    let codes = catalog.operational_codes();

    let mut weeks: HashMap<(i32, u32), Vec<i64>> = HashMap::new();
    for &d in days {
        if let Ok(date) = calendar::date_of(config.year, d) {
            weeks.entry(calendar::iso_week_key(date)).or_default().push(d);
        }
    }

    for controller in &config.controllers {
        for days_in_week in weeks.values() {
            let mut terms: Vec<(VarId, i64)> = Vec::new();
            for &d in days_in_week {
                for v in &codes {
                    let duration = catalog.operational[v].duration as i64;
                    terms.push((vars.x_var(controller, v, d), duration));
                }
            }
            add_weighted_le(m, &terms, cap_centi);
        }
    }
}

/// C7 — at most `maxHoursRolling7` worked hours within any 7-consecutive-day
/// window of the extended horizon.
fn c7_rolling_hours_cap(m: &mut Model, vars: &Variables, catalog: &ShiftCatalog, config: &Config, days: &[i64]) {
    if days.len() < 7 {
        return;
    }
    let cap_centi = (config.contract.max_hours_rolling7 * 100.0).round() as i64;
    let codes = catalog.operational_codes();

    for controller in &config.controllers {
        for window in days.windows(7) {
            let mut terms: Vec<(VarId, i64)> = Vec::new();
            for &d in window {
                for v in &codes {
                    let duration = catalog.operational[v].duration as i64;
                    terms.push((vars.x_var(controller, v, d), duration));
                }
            }
            add_weighted_le(m, &terms, cap_centi);
        }
    }
}

/// C8 — every rolling 7-day window must contain >= 1 pair of consecutive
/// rest days starting within the window's first 6 days, when required.
fn c8_rest_day_pairs(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) {
    if !config.contract.require_2_consecutive_rest_days || days.len() < 7 {
        return;
    }

    for controller in &config.controllers {
        let mut rest_pair: HashMap<i64, VarId> = HashMap::new();
        for window in days.windows(2) {
            let (d, d_next) = (window[0], window[1]);
            let worked_d = vars.worked_var(controller, d);
            let worked_d_next = vars.worked_var(controller, d_next);
            let pair = m.int(0, 1);

            // pair <= 1 - worked_d and pair <= 1 - worked_d_next: pair can
            // only be 1 if both days are off.
            let lhs1 = m.sum(&[pair, worked_d]);
            m.c(lhs1).le(int(1));
            let lhs2 = m.sum(&[pair, worked_d_next]);
            m.c(lhs2).le(int(1));
            // pair >= 1 - worked_d - worked_d_next: pair must be 1 when
            // both days are off.
            let lhs3 = m.sum(&[pair, worked_d, worked_d_next]);
            m.c(lhs3).ge(int(1));

            rest_pair.insert(d, pair);
        }

        for window in days.windows(7) {
            let pairs_in_first_six: Vec<VarId> = window[..6]
                .iter()
                .filter_map(|d| rest_pair.get(d).copied())
                .collect();
            if !pairs_in_first_six.is_empty() {
                let total = m.sum(&pairs_in_first_six);
                m.c(total).ge(int(1));
            }
        }
    }
}

/// C9 (hard half) — strict shift-pair templates: on every working pair of
/// consecutive days, the (previous, next) codes must be in the allowed
/// list. The soft-preferred variant is scored, not enforced (objective.rs).
fn c9_strict_pair_templates(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) {
    for (controller, rules) in &config.per_controller {
        let PairPolicy::Strict { pairs } = &rules.pair_policy else {
            continue;
        };
        let allowed: HashSet<(&str, &str)> = pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();

        let codes: Vec<String> = {
            let set: HashSet<String> = vars
                .x
                .keys()
                .filter(|(c, _, _)| c == controller)
                .map(|(_, v, _)| v.clone())
                .collect();
            let mut codes: Vec<String> = set.into_iter().collect();
            codes.sort();
            codes
        };

        for window in days.windows(2) {
            let (d, d_next) = (window[0], window[1]);
            for v1 in &codes {
                for v2 in &codes {
                    if allowed.contains(&(v1.as_str(), v2.as_str())) {
                        continue;
                    }
                    let x1 = vars.x_var(controller, v1, d);
                    let x2 = vars.x_var(controller, v2, d_next);
                    let pair_sum = m.sum(&[x1, x2]);
                    m.c(pair_sum).le(int(1));
                }
            }
        }
    }
}

/// C10 (hard half) — weekday/weekend allowed-shift sets: forbid any
/// (shift, day) combination the controller hasn't declared allowed for
/// that day kind.
fn c10_day_kind_preferences(m: &mut Model, vars: &Variables, catalog: &ShiftCatalog, config: &Config, days: &[i64]) {
    let codes = catalog.operational_codes();
    for (controller, rules) in &config.per_controller {
        let Some(prefs) = &rules.preferences else {
            continue;
        };
        for &d in days {
            let Ok(date) = calendar::date_of(config.year, d) else {
                continue;
            };
            let allowed = if calendar::is_weekend(date) {
                &prefs.weekend
            } else {
                &prefs.weekday
            };
            if allowed.is_empty() {
                continue;
            }
            for v in &codes {
                if !allowed.contains(v) {
                    let var = vars.x_var(controller, v, d);
                    m.c(var).eq(int(0));
                }
            }
        }
    }
}

/// C11 — no-overlap-with-peer: a controller and their declared peer never
/// both work on the same day.
fn c11_no_overlap_with_peer(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) {
    for (controller, rules) in &config.per_controller {
        let Some(peer) = &rules.no_overlap_with else {
            continue;
        };
        for &d in days {
            let w1 = vars.worked_var(controller, d);
            let w2 = vars.worked_var(peer, d);
            let total = m.sum(&[w1, w2]);
            m.c(total).le(int(1));
        }
    }
}

/// C12 — calendar-dependent bans: a controller never works on a named ISO
/// weekday (1 = Monday .. 7 = Sunday).
fn c12_calendar_bans(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) {
    for ban in &config.calendar_bans {
        for &d in days {
            let Ok(date) = calendar::date_of(config.year, d) else {
                continue;
            };
            if date.weekday().number_from_monday() as u8 == ban.iso_weekday {
                let var = vars.worked_var(&ban.controller, d);
                m.c(var).eq(int(0));
            }
        }
    }
}

/// C13 — monthly/period caps on pseudo-shifts counted toward the limit,
/// evaluated over the real (non-buffer) horizon the caller requested.
fn c13_monthly_pseudo_caps(m: &mut Model, vars: &Variables, catalog: &ShiftCatalog, config: &Config, real_days: &[i64]) {
    let counted_codes: Vec<String> = catalog
        .pseudo
        .values()
        .filter(|p| p.counted_monthly)
        .map(|p| p.code.clone())
        .collect();
    if counted_codes.is_empty() {
        return;
    }

    for (controller, rules) in &config.per_controller {
        let Some(max) = rules.max_monthly_pseudo_shifts else {
            continue;
        };
        let mut vars_in_period = Vec::new();
        for &d in real_days {
            for v in &counted_codes {
                if let Some(&var) = vars.x.get(&(controller.clone(), v.clone(), d)) {
                    vars_in_period.push(var);
                }
            }
        }
        if !vars_in_period.is_empty() {
            let total = m.sum(&vars_in_period);
            m.c(total).le(int(max as i64));
        }
    }
}

/// Adds `sum(coeff * var) <= cap` without relying on a named linear
/// expression type, since only `VarId` arithmetic operators and `m.sum`
/// over plain `VarId` slices are attested in the retrieved `selen` sample.
pub(crate) fn add_weighted_le(m: &mut Model, terms: &[(VarId, i64)], cap: i64) {
    if terms.is_empty() {
        return;
    }
    let mut iter = terms.iter();
    let (first_var, first_coeff) = iter.next().unwrap();
    let mut expr = *first_var * *first_coeff;
    for &(var, coeff) in iter {
        expr = expr + var * coeff;
    }
    m.c(expr).le(int(cap));
}
