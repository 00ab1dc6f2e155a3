//! Demo data generators for the ATC roster solver.

use std::collections::{HashMap, HashSet};

use crate::config::{
    CalendarBan, Config, Contract, DayKindPreferences, PairPolicy, PerControllerRules,
    PseudoShiftDef, ShiftTimes, Weights,
};
use crate::preassign::{PreAssignmentValue, PreAssignments};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Builds the shift catalog shared by both demo sizes: the seven
/// operational vacations and two pseudo-shifts used in the facility this
/// configuration was modeled on.
fn shift_catalog() -> (HashMap<String, ShiftTimes>, HashMap<String, PseudoShiftDef>) {
    let mut shifts = HashMap::new();
    let bounds: &[(&str, f64, f64)] = &[
        ("M", 5.5, 14.5),
        ("J1", 7.0, 16.0),
        ("J2", 8.5, 18.0),
        ("J3", 8.5, 18.0),
        ("A1", 12.5, 22.5),
        ("A2", 15.0, 23.5),
        ("S", 16.0, 23.75),
    ];
    for &(code, start, end) in bounds {
        shifts.insert(code.to_string(), ShiftTimes { start, end });
    }

    let mut pseudo = HashMap::new();
    pseudo.insert(
        "B".to_string(),
        PseudoShiftDef {
            duration: 6.0,
            counted_monthly: true,
        },
    );
    pseudo.insert(
        "B/".to_string(),
        PseudoShiftDef {
            duration: 3.0,
            counted_monthly: false,
        },
    );

    (shifts, pseudo)
}

/// A small, hand-checkable configuration: four controllers over a
/// 21-day horizon, enough to exercise every hard constraint at least
/// once without the solve taking long.
pub fn generate_small() -> (Config, PreAssignments) {
    let (shifts, pseudo_shifts) = shift_catalog();
    let controllers: Vec<String> = ["GAO", "WBR", "PLC", "CML"].iter().map(|s| s.to_string()).collect();

    let mut per_controller = HashMap::new();
    per_controller.insert(
        "PLC".to_string(),
        PerControllerRules {
            pair_policy: PairPolicy::Strict {
                pairs: vec![
                    ("J1".to_string(), "M".to_string()),
                    ("J2".to_string(), "M".to_string()),
                    ("J3".to_string(), "M".to_string()),
                ],
            },
            ..Default::default()
        },
    );
    per_controller.insert(
        "WBR".to_string(),
        PerControllerRules {
            pair_policy: PairPolicy::Strict {
                pairs: vec![
                    ("A2".to_string(), "A1".to_string()),
                    ("S".to_string(), "A1".to_string()),
                    ("S".to_string(), "A2".to_string()),
                ],
            },
            ..Default::default()
        },
    );

    let config = Config {
        year: 2025,
        controllers,
        office_bound: HashSet::new(),
        shifts,
        pseudo_shifts,
        contract: Contract::default(),
        per_controller,
        weights: Weights::default(),
        soft_covered_shift: "J3".to_string(),
        calendar_bans: Vec::new(),
    };

    let mut pre_assignments: PreAssignments = HashMap::new();
    let mut gao_days = HashMap::new();
    gao_days.insert(5, PreAssignmentValue::Leave);
    pre_assignments.insert("GAO".to_string(), gao_days);

    (config, pre_assignments)
}

/// The full facility configuration this crate's demo recreates: sixteen
/// controllers, a 30-day horizon and the complete set of per-controller
/// rules (pair templates, day-kind preferences, peer exclusions).
pub fn generate_large() -> (Config, PreAssignments) {
    let (shifts, pseudo_shifts) = shift_catalog();
    let controllers: Vec<String> = [
        "GAO", "WBR", "PLC", "CML", "BBD", "LAK", "MZN", "TRT", "CLO", "FRD", "DAZ", "GNC", "DTY",
        "JCT", "LNN", "KGR",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let office_bound: HashSet<String> = ["GNC"].iter().map(|s| s.to_string()).collect();

    let mut per_controller = HashMap::new();
    per_controller.insert(
        "PLC".to_string(),
        PerControllerRules {
            pair_policy: PairPolicy::Strict {
                pairs: vec![
                    ("J1".to_string(), "M".to_string()),
                    ("J2".to_string(), "M".to_string()),
                    ("J3".to_string(), "M".to_string()),
                ],
            },
            ..Default::default()
        },
    );
    per_controller.insert(
        "CLO".to_string(),
        PerControllerRules {
            no_overlap_with: Some("BBD".to_string()),
            pair_policy: PairPolicy::SoftPreferred {
                pairs: vec![
                    ("M".to_string(), "J1".to_string()),
                    ("J1".to_string(), "J2".to_string()),
                    ("A2".to_string(), "S".to_string()),
                ],
                reward: 15,
            },
            ..Default::default()
        },
    );
    // WBR's original draft carried both a strict pair template and a
    // preferred-pair reward; the per-controller policy is a tagged
    // variant with no "both" case, so the strict template wins here.
    per_controller.insert(
        "WBR".to_string(),
        PerControllerRules {
            pair_policy: PairPolicy::Strict {
                pairs: vec![
                    ("A2".to_string(), "A1".to_string()),
                    ("S".to_string(), "A1".to_string()),
                    ("S".to_string(), "A2".to_string()),
                ],
            },
            ..Default::default()
        },
    );
    per_controller.insert(
        "TRT".to_string(),
        PerControllerRules {
            preferences: Some(DayKindPreferences {
                weekday: ["J1", "J2", "J3"].iter().map(|s| s.to_string()).collect(),
                weekend: ["A1", "A2"].iter().map(|s| s.to_string()).collect(),
            }),
            ..Default::default()
        },
    );
    per_controller.insert(
        "FRD".to_string(),
        PerControllerRules {
            pair_policy: PairPolicy::Strict {
                pairs: vec![
                    ("J2".to_string(), "M".to_string()),
                    ("J1".to_string(), "M".to_string()),
                    ("S".to_string(), "A1".to_string()),
                    ("J3".to_string(), "M".to_string()),
                    ("A2".to_string(), "A1".to_string()),
                ],
            },
            ..Default::default()
        },
    );
    per_controller.insert(
        "JCT".to_string(),
        PerControllerRules {
            preferences: Some(DayKindPreferences {
                weekday: ["M", "J1", "J2"].iter().map(|s| s.to_string()).collect(),
                weekend: ["M", "J1", "J2"].iter().map(|s| s.to_string()).collect(),
            }),
            ..Default::default()
        },
    );
    per_controller.insert(
        "KGR".to_string(),
        PerControllerRules {
            pair_policy: PairPolicy::Strict {
                pairs: vec![("S".to_string(), "A1".to_string())],
            },
            preferences: Some(DayKindPreferences {
                weekday: ["S", "A1"].iter().map(|s| s.to_string()).collect(),
                weekend: ["J1", "J2", "J3"].iter().map(|s| s.to_string()).collect(),
            }),
            ..Default::default()
        },
    );

    let config = Config {
        year: 2025,
        controllers,
        office_bound,
        shifts,
        pseudo_shifts,
        contract: Contract::default(),
        per_controller,
        weights: Weights::default(),
        soft_covered_shift: "J3".to_string(),
        calendar_bans: vec![CalendarBan {
            controller: "GNC".to_string(),
            iso_weekday: 7,
        }],
    };

    (config, PreAssignments::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_data_from_str() {
        assert_eq!("SMALL".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("small".parse::<DemoData>(), Ok(DemoData::Small));
        assert_eq!("LARGE".parse::<DemoData>(), Ok(DemoData::Large));
        assert!("invalid".parse::<DemoData>().is_err());
    }

    #[test]
    fn small_config_validates() {
        let (config, pre_assignments) = generate_small();
        let catalog = config.validate().expect("small demo config should validate");
        assert!(catalog.contains("M"));
        assert!(!pre_assignments.is_empty());
    }

    #[test]
    fn large_config_validates() {
        let (config, _) = generate_large();
        config.validate().expect("large demo config should validate");
        assert_eq!(config.controllers.len(), 16);
    }
}
