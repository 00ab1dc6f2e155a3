//! Shift catalog: normalises fractional-hour shift definitions into integer
//! centi-hour arithmetic and derives durations, including midnight wrap.

use std::collections::HashMap;

use crate::error::RosterError;

/// An operational shift: has a fixed clock start/end and a derived duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalShift {
    pub code: String,
    /// Centi-hours since local midnight, in [0, 2400].
    pub start: u16,
    /// Centi-hours since local midnight, in [0, 2400].
    pub end: u16,
    /// Derived duration in centi-hours. If `end < start` the shift wraps
    /// past midnight and `duration = (2400 - start) + end`.
    pub duration: u16,
}

/// A pseudo-shift: administrative/training block with a duration but no
/// fixed clock times, optionally counted toward monthly caps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoShift {
    pub code: String,
    pub duration: u16,
    pub counted_monthly: bool,
}

/// The normalised catalog of every shift code known to a solve.
#[derive(Debug, Clone, Default)]
pub struct ShiftCatalog {
    pub operational: HashMap<String, OperationalShift>,
    pub pseudo: HashMap<String, PseudoShift>,
}

impl ShiftCatalog {
    /// Builds a catalog from fractional-hour start/end pairs, validating
    /// that every bound lies in [0, 24] hours.
    pub fn from_hours(
        shifts: &HashMap<String, (f64, f64)>,
        pseudo_shifts: &HashMap<String, (f64, bool)>,
    ) -> Result<Self, RosterError> {
        let mut operational = HashMap::with_capacity(shifts.len());
        for (code, &(start_hours, end_hours)) in shifts {
            let start = to_centihours(code, start_hours)?;
            let end = to_centihours(code, end_hours)?;
            let duration = if end < start {
                (2400 - start) + end
            } else {
                end - start
            };
            operational.insert(
                code.clone(),
                OperationalShift {
                    code: code.clone(),
                    start,
                    end,
                    duration,
                },
            );
        }

        let mut pseudo = HashMap::with_capacity(pseudo_shifts.len());
        for (code, &(duration_hours, counted_monthly)) in pseudo_shifts {
            if !(0.0..=24.0).contains(&duration_hours) {
                return Err(RosterError::ConfigError(format!(
                    "pseudo-shift {code} duration {duration_hours} out of [0,24] hours"
                )));
            }
            pseudo.insert(
                code.clone(),
                PseudoShift {
                    code: code.clone(),
                    duration: (duration_hours * 100.0).round() as u16,
                    counted_monthly,
                },
            );
        }

        Ok(Self { operational, pseudo })
    }

    /// All operational shift codes, in a stable sorted order.
    pub fn operational_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.operational.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.operational.contains_key(code) || self.pseudo.contains_key(code)
    }
}

fn to_centihours(code: &str, hours: f64) -> Result<u16, RosterError> {
    if !(0.0..=24.0).contains(&hours) {
        return Err(RosterError::ConfigError(format!(
            "shift {code} time {hours} out of [0,24] hours"
        )));
    }
    Ok((hours * 100.0).round() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_duration_within_day() {
        let mut shifts = HashMap::new();
        shifts.insert("M".to_string(), (5.5, 14.5));
        let catalog = ShiftCatalog::from_hours(&shifts, &HashMap::new()).unwrap();
        let m = &catalog.operational["M"];
        assert_eq!(m.start, 550);
        assert_eq!(m.end, 1450);
        assert_eq!(m.duration, 900);
    }

    #[test]
    fn derives_duration_across_midnight() {
        let mut shifts = HashMap::new();
        shifts.insert("S".to_string(), (22.0, 6.0));
        let catalog = ShiftCatalog::from_hours(&shifts, &HashMap::new()).unwrap();
        let s = &catalog.operational["S"];
        assert_eq!(s.duration, (2400 - 2200) + 600);
    }

    #[test]
    fn rejects_out_of_range_time() {
        let mut shifts = HashMap::new();
        shifts.insert("X".to_string(), (-1.0, 5.0));
        assert!(ShiftCatalog::from_hours(&shifts, &HashMap::new()).is_err());
    }
}
