//! Decision-variable schema: one boolean per (controller, shift, day) plus
//! a derived "is working" boolean per (controller, day).

use std::collections::HashMap;

use selen::prelude::*;

use crate::shifts::ShiftCatalog;

/// The full set of decision variables for one solve, keyed by the natural
/// (controller, shift, day) / (controller, day) tuples. At this problem's
/// scale (<= 20 controllers x <= 10 shifts x <= 60 days, comfortably under
/// 10^5 booleans per spec.md §5) a hash map keeps the constraint builder
/// readable without needing the index-based layout larger solves require.
pub struct Variables {
    /// x[c, v, d]: controller `c` works shift `v` on day `d`.
    pub x: HashMap<(String, String, i64), VarId>,
    /// worked[c, d]: controller `c` works any operational shift on day `d`.
    pub worked: HashMap<(String, i64), VarId>,
}

impl Variables {
    /// Builds `x` for every controller/shift/day (operational and pseudo
    /// codes share the same at-most-one-activity-per-day slot) and `worked`
    /// for every controller/day, linking them via C1 (at most one activity
    /// per day) and the `worked` definition (operational shifts only).
    pub fn build(m: &mut Model, controllers: &[String], catalog: &ShiftCatalog, days: &[i64]) -> Self {
        let operational_codes = catalog.operational_codes();
        let mut pseudo_codes: Vec<String> = catalog.pseudo.keys().cloned().collect();
        pseudo_codes.sort();

        let total_codes = operational_codes.len() + pseudo_codes.len();
        let mut x = HashMap::with_capacity(controllers.len() * total_codes * days.len());
        let mut worked = HashMap::with_capacity(controllers.len() * days.len());

        for c in controllers {
            for &d in days {
                let mut operational_vars = Vec::with_capacity(operational_codes.len());
                for v in &operational_codes {
                    let var = m.int(0, 1);
                    x.insert((c.clone(), v.clone(), d), var);
                    operational_vars.push(var);
                }
                let mut pseudo_vars = Vec::with_capacity(pseudo_codes.len());
                for v in &pseudo_codes {
                    let var = m.int(0, 1);
                    x.insert((c.clone(), v.clone(), d), var);
                    pseudo_vars.push(var);
                }

                let worked_var = m.int(0, 1);
                let operational_sum = m.sum(&operational_vars);
                // worked[c,d] == sum of operational x[c,v,d]
                m.c(operational_sum).eq(worked_var);

                // at most one activity (operational or pseudo) per day (C1)
                let mut all_vars = operational_vars;
                all_vars.extend(pseudo_vars);
                let day_sum = m.sum(&all_vars);
                m.c(day_sum).le(int(1));

                worked.insert((c.clone(), d), worked_var);
            }
        }

        Self { x, worked }
    }

    pub fn x_var(&self, controller: &str, shift: &str, day: i64) -> VarId {
        self.x[&(controller.to_string(), shift.to_string(), day)]
    }

    pub fn worked_var(&self, controller: &str, day: i64) -> VarId {
        self.worked[&(controller.to_string(), day)]
    }
}
