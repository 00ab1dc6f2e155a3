//! Composite objective (spec.md §4.3): minimise a single cost variable
//! folding in the balance term, soft-cover penalty, preference reward and
//! preferred-pair reward.

use selen::prelude::*;

use crate::config::{Config, PairPolicy};
use crate::variables::Variables;

/// Builds the cost variable and wires `m.minimize(cost)` on return, handing
/// back the variable so the driver can also report its value.
pub fn build(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) -> VarId {
    let max_shifts = (config.controllers.len() as i64) * (days.len() as i64);

    let balance_term = balance_term(m, vars, config, days, max_shifts);
    let soft_cover_penalty = soft_cover_penalty(m, vars, config, days);
    let preference_reward = preference_reward(m, vars, config, days);
    let pair_reward = preferred_pair_reward(m, vars, config, days);

    // cost = balanceWeight * balanceTerm + softCoverPenalty * uncovered
    //        - preferenceWeight * preferenceReward - pairReward
    //
    // pairReward is already weighted per-controller by `preferredPairReward[c]`
    // inside `preferred_pair_reward`, so it is not scaled again here.
    let weights = &config.weights;
    let mut cost_expr = balance_term * weights.balance as i64;
    cost_expr = cost_expr + soft_cover_penalty * weights.soft_cover_penalty as i64;
    cost_expr = cost_expr - preference_reward * weights.preference_reward as i64;
    cost_expr = cost_expr - pair_reward * 1_i64;

    let cost = m.int(-1_000_000_000, 1_000_000_000);
    m.c(cost_expr).eq(cost);
    m.minimize(cost);
    cost
}

/// `balanceTerm` = max over controllers of total shifts worked, expressed
/// as an upper-bound variable tied to every controller's load so the
/// minimizer is forced to pull it down to the true maximum.
fn balance_term(m: &mut Model, vars: &Variables, config: &Config, days: &[i64], max_shifts: i64) -> VarId {
    let max_load = m.int(0, max_shifts);
    for controller in &config.controllers {
        let worked_vars: Vec<VarId> = days.iter().map(|&d| vars.worked_var(controller, d)).collect();
        let total = m.sum(&worked_vars);
        m.c(total).le(max_load);
    }
    max_load
}

/// Sum of per-day shortfall below 1 controller on the soft-covered shift.
fn soft_cover_penalty(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) -> VarId {
    let mut slacks = Vec::with_capacity(days.len());
    for &d in days {
        let controllers_on_shift: Vec<VarId> = vars
            .x
            .iter()
            .filter(|((_, code, day), _)| code == &config.soft_covered_shift && *day == d)
            .map(|(_, &var)| var)
            .collect();
        let covered = m.sum(&controllers_on_shift);
        let slack = m.int(0, 1);
        // slack + covered >= 1: slack must be 1 whenever nobody is covering.
        let lhs = m.sum(&[slack, covered]);
        m.c(lhs).ge(int(1));
        slacks.push(slack);
    }
    m.sum(&slacks)
}

/// Reward for each (controller, day) where the assigned shift (if any) is
/// in that controller's declared preference set for the day kind.
fn preference_reward(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) -> VarId {
    let mut reward_terms = Vec::new();
    for (controller, rules) in &config.per_controller {
        let Some(prefs) = &rules.preferences else {
            continue;
        };
        for &d in days {
            let Ok(date) = crate::calendar::date_of(config.year, d) else {
                continue;
            };
            let allowed = if crate::calendar::is_weekend(date) {
                &prefs.weekend
            } else {
                &prefs.weekday
            };
            for code in allowed {
                if let Some(&var) = vars.x.get(&(controller.clone(), code.clone(), d)) {
                    reward_terms.push(var);
                }
            }
        }
    }
    if reward_terms.is_empty() {
        return m.int(0, 0);
    }
    m.sum(&reward_terms)
}

/// Reward for each consecutive-day pair matching a controller's declared
/// soft-preferred pair list, via the reward-only half of the AND-gate
/// linearization (upper bound only: `z <= u`, `z <= w`). Since the
/// objective maximizes this term, the solver is never incentivized to
/// leave `z` below `min(u, w)`, so the missing lower bound is harmless.
fn preferred_pair_reward(m: &mut Model, vars: &Variables, config: &Config, days: &[i64]) -> VarId {
    let mut terms: Vec<(VarId, i64)> = Vec::new();
    for (controller, rules) in &config.per_controller {
        let PairPolicy::SoftPreferred { pairs, reward } = &rules.pair_policy else {
            continue;
        };
        for window in days.windows(2) {
            let (d, d_next) = (window[0], window[1]);
            for (v1, v2) in pairs {
                let (Some(&x1), Some(&x2)) = (
                    vars.x.get(&(controller.clone(), v1.clone(), d)),
                    vars.x.get(&(controller.clone(), v2.clone(), d_next)),
                ) else {
                    continue;
                };
                let z = m.int(0, 1);
                m.c(z).le(x1);
                m.c(z).le(x2);
                terms.push((z, *reward as i64));
            }
        }
    }
    if terms.is_empty() {
        return m.int(0, 0);
    }

    let mut iter = terms.iter();
    let (first_var, first_coeff) = iter.next().unwrap();
    let mut expr = *first_var * *first_coeff;
    for &(var, coeff) in iter {
        expr = expr + var * coeff;
    }
    let total = m.int(0, i32::MAX as i64);
    m.c(expr).eq(total);
    total
}
