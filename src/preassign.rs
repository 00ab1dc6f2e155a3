//! Pre-assignment map: (controller, day) -> forced shift or leave.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// A single pre-assignment value: either a forced shift code or a leave
/// marker. Encoded as a tagged variant rather than the `"C"` sentinel
/// string the source spreadsheets use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "shift")]
pub enum PreAssignmentValue {
    Forced(String),
    Leave,
}

impl PreAssignmentValue {
    /// Parses the wire sentinel used by the original spreadsheet ingestion:
    /// `"C"` means leave, anything else is a forced shift code.
    pub fn from_cell(cell: &str) -> Self {
        if cell == "C" {
            PreAssignmentValue::Leave
        } else {
            PreAssignmentValue::Forced(cell.to_string())
        }
    }
}

/// Per-controller, per-day-of-year pre-assignments for one solve.
pub type PreAssignments = HashMap<String, HashMap<i64, PreAssignmentValue>>;

/// Parses a pre-assignment map from its JSON wire format (spec.md §6).
pub fn from_json(json: &str) -> Result<PreAssignments, RosterError> {
    serde_json::from_str(json).map_err(RosterError::from)
}

/// Serializes a pre-assignment map back to its JSON wire format.
pub fn to_json(pre_assignments: &PreAssignments) -> Result<String, RosterError> {
    serde_json::to_string_pretty(pre_assignments).map_err(RosterError::from)
}

/// Validates that every pre-assigned day lies within `[start_day, end_day]`
/// and every forced shift code exists in `known_codes`.
pub fn validate(
    pre_assignments: &PreAssignments,
    start_day: i64,
    end_day: i64,
    known_codes: &[String],
) -> Result<(), RosterError> {
    for (controller, by_day) in pre_assignments {
        for (&day, value) in by_day {
            if day < start_day || day > end_day {
                return Err(RosterError::ConfigError(format!(
                    "pre-assignment for {controller} on day {day} falls outside horizon [{start_day}, {end_day}]"
                )));
            }
            if let PreAssignmentValue::Forced(code) = value {
                if !known_codes.iter().any(|c| c == code) {
                    return Err(RosterError::ConfigError(format!(
                        "pre-assignment for {controller} on day {day} references unknown shift {code}"
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_sentinel_parses_leave() {
        assert_eq!(PreAssignmentValue::from_cell("C"), PreAssignmentValue::Leave);
        assert_eq!(
            PreAssignmentValue::from_cell("M"),
            PreAssignmentValue::Forced("M".to_string())
        );
    }

    #[test]
    fn validate_rejects_day_outside_horizon() {
        let mut pa: PreAssignments = HashMap::new();
        let mut days = HashMap::new();
        days.insert(100, PreAssignmentValue::Leave);
        pa.insert("GAO".to_string(), days);

        let result = validate(&pa, 1, 10, &["M".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_unknown_shift_code() {
        let mut pa: PreAssignments = HashMap::new();
        let mut days = HashMap::new();
        days.insert(5, PreAssignmentValue::Forced("ZZ".to_string()));
        pa.insert("GAO".to_string(), days);

        let result = validate(&pa, 1, 10, &["M".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn pre_assignments_round_trip_through_json() {
        let mut pa: PreAssignments = HashMap::new();
        let mut gao_days = HashMap::new();
        gao_days.insert(5, PreAssignmentValue::Leave);
        gao_days.insert(6, PreAssignmentValue::Forced("M".to_string()));
        pa.insert("GAO".to_string(), gao_days);

        let json = to_json(&pa).expect("serializable pre-assignments");
        let parsed = from_json(&json).expect("valid JSON round-trips back");
        assert_eq!(parsed, pa);
    }

    #[test]
    fn from_json_rejects_malformed_payload() {
        let err = from_json("not json at all").unwrap_err();
        assert!(matches!(err, RosterError::Json(_)));
    }
}
