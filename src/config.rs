//! The external configuration object (§6) and its validation (§7).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::shifts::ShiftCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftTimes {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PseudoShiftDef {
    pub duration: f64,
    #[serde(default)]
    pub counted_monthly: bool,
}

/// Labour/operational parameters (spec.md §6 `contract`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default = "Contract::default_min_rest_hours")]
    pub min_rest_hours: f64,
    #[serde(default = "Contract::default_max_consecutive_shifts")]
    pub max_consecutive_shifts: u32,
    #[serde(default = "Contract::default_max_hours_calendar_week")]
    pub max_hours_calendar_week: f64,
    #[serde(default = "Contract::default_max_hours_rolling7")]
    pub max_hours_rolling7: f64,
    #[serde(default = "Contract::default_require_2_consecutive_rest_days")]
    pub require_2_consecutive_rest_days: bool,
    #[serde(default = "Contract::default_buffer_days")]
    pub buffer_days: i64,
    #[serde(default = "Contract::default_solver_time_limit_secs")]
    pub solver_time_limit_secs: f64,
}

impl Contract {
    fn default_min_rest_hours() -> f64 {
        11.0
    }
    fn default_max_consecutive_shifts() -> u32 {
        4
    }
    fn default_max_hours_calendar_week() -> f64 {
        36.0
    }
    fn default_max_hours_rolling7() -> f64 {
        44.0
    }
    fn default_require_2_consecutive_rest_days() -> bool {
        true
    }
    fn default_buffer_days() -> i64 {
        4
    }
    fn default_solver_time_limit_secs() -> f64 {
        10.0
    }
}

impl Default for Contract {
    fn default() -> Self {
        Self {
            min_rest_hours: Self::default_min_rest_hours(),
            max_consecutive_shifts: Self::default_max_consecutive_shifts(),
            max_hours_calendar_week: Self::default_max_hours_calendar_week(),
            max_hours_rolling7: Self::default_max_hours_rolling7(),
            require_2_consecutive_rest_days: Self::default_require_2_consecutive_rest_days(),
            buffer_days: Self::default_buffer_days(),
            solver_time_limit_secs: Self::default_solver_time_limit_secs(),
        }
    }
}

/// Objective weights (spec.md §4.3 / §6 `weights`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    #[serde(default = "Weights::default_balance")]
    pub balance: u32,
    #[serde(default = "Weights::default_soft_cover_penalty")]
    pub soft_cover_penalty: u32,
    #[serde(default = "Weights::default_preference_reward")]
    pub preference_reward: u32,
}

impl Weights {
    fn default_balance() -> u32 {
        100
    }
    fn default_soft_cover_penalty() -> u32 {
        30_000
    }
    fn default_preference_reward() -> u32 {
        10
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            balance: Self::default_balance(),
            soft_cover_penalty: Self::default_soft_cover_penalty(),
            preference_reward: Self::default_preference_reward(),
        }
    }
}

/// C9 per-controller shift-pair template: a tagged variant rather than
/// attribute polymorphism (spec.md §9 Design Notes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", tag = "policy")]
pub enum PairPolicy {
    #[default]
    None,
    Strict {
        pairs: Vec<(String, String)>,
    },
    SoftPreferred {
        pairs: Vec<(String, String)>,
        reward: u32,
    },
}

/// C10 weekday/weekend allowed-shift preference sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayKindPreferences {
    #[serde(default)]
    pub weekday: HashSet<String>,
    #[serde(default)]
    pub weekend: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerControllerRules {
    #[serde(default)]
    pub pair_policy: PairPolicy,
    #[serde(default)]
    pub preferences: Option<DayKindPreferences>,
    #[serde(default)]
    pub no_overlap_with: Option<String>,
    #[serde(default)]
    pub max_monthly_pseudo_shifts: Option<u32>,
}

/// C12 calendar-dependent ban: a controller never works on a given ISO
/// weekday (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarBan {
    pub controller: String,
    pub iso_weekday: u8,
}

/// The full solver configuration (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub year: i32,
    pub controllers: Vec<String>,
    #[serde(default)]
    pub office_bound: HashSet<String>,
    pub shifts: HashMap<String, ShiftTimes>,
    #[serde(default)]
    pub pseudo_shifts: HashMap<String, PseudoShiftDef>,
    #[serde(default)]
    pub contract: Contract,
    #[serde(default)]
    pub per_controller: HashMap<String, PerControllerRules>,
    #[serde(default)]
    pub weights: Weights,
    pub soft_covered_shift: String,
    #[serde(default)]
    pub calendar_bans: Vec<CalendarBan>,
}

impl Config {
    /// Parses a configuration from its JSON wire format (spec.md §6). Does
    /// not validate; call `validate()` on the result before building a
    /// model.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        serde_json::from_str(json).map_err(RosterError::from)
    }

    /// Serializes the configuration back to its JSON wire format.
    pub fn to_json(&self) -> Result<String, RosterError> {
        serde_json::to_string_pretty(self).map_err(RosterError::from)
    }

    /// Validates the configuration and builds the normalised shift catalog.
    /// Runs before any decision variable is created (spec.md §7 policy).
    pub fn validate(&self) -> Result<ShiftCatalog, RosterError> {
        if self.controllers.is_empty() {
            return Err(RosterError::ConfigError(
                "controller list must not be empty".to_string(),
            ));
        }
        let controller_set: HashSet<&str> = self.controllers.iter().map(String::as_str).collect();
        if controller_set.len() != self.controllers.len() {
            return Err(RosterError::ConfigError(
                "controller list contains duplicates".to_string(),
            ));
        }
        for oc in &self.office_bound {
            if !controller_set.contains(oc.as_str()) {
                return Err(RosterError::ConfigError(format!(
                    "officeBound references unknown controller {oc}"
                )));
            }
        }
        if self.shifts.is_empty() {
            return Err(RosterError::ConfigError(
                "shift catalog must not be empty".to_string(),
            ));
        }

        let shift_hours: HashMap<String, (f64, f64)> = self
            .shifts
            .iter()
            .map(|(code, t)| (code.clone(), (t.start, t.end)))
            .collect();
        let pseudo_hours: HashMap<String, (f64, bool)> = self
            .pseudo_shifts
            .iter()
            .map(|(code, p)| (code.clone(), (p.duration, p.counted_monthly)))
            .collect();
        let catalog = ShiftCatalog::from_hours(&shift_hours, &pseudo_hours)?;

        if !catalog.operational.contains_key(&self.soft_covered_shift) {
            return Err(RosterError::ConfigError(format!(
                "softCoveredShift {} is not a known operational shift",
                self.soft_covered_shift
            )));
        }

        if self.contract.buffer_days < 0 {
            return Err(RosterError::ConfigError(
                "bufferDays must not be negative".to_string(),
            ));
        }
        if self.contract.max_consecutive_shifts == 0 {
            return Err(RosterError::ConfigError(
                "maxConsecutiveShifts must be at least 1".to_string(),
            ));
        }
        if self.contract.min_rest_hours < 0.0 {
            return Err(RosterError::ConfigError(
                "minRestHours must not be negative".to_string(),
            ));
        }
        if self.contract.max_hours_calendar_week <= 0.0 || self.contract.max_hours_rolling7 <= 0.0
        {
            return Err(RosterError::ConfigError(
                "hour caps must be positive".to_string(),
            ));
        }
        if self.contract.solver_time_limit_secs <= 0.0 {
            return Err(RosterError::ConfigError(
                "solverTimeLimit must be positive".to_string(),
            ));
        }

        for ban in &self.calendar_bans {
            if !controller_set.contains(ban.controller.as_str()) {
                return Err(RosterError::ConfigError(format!(
                    "calendarBans references unknown controller {}",
                    ban.controller
                )));
            }
            if !(1..=7).contains(&ban.iso_weekday) {
                return Err(RosterError::ConfigError(format!(
                    "calendarBans iso_weekday {} out of range [1,7]",
                    ban.iso_weekday
                )));
            }
        }

        for (controller, rules) in &self.per_controller {
            if !controller_set.contains(controller.as_str()) {
                return Err(RosterError::ConfigError(format!(
                    "perController references unknown controller {controller}"
                )));
            }
            self.validate_pair_policy(controller, &rules.pair_policy, &catalog)?;
            if let Some(prefs) = &rules.preferences {
                self.validate_preference_set(controller, "weekday", &prefs.weekday, &catalog)?;
                self.validate_preference_set(controller, "weekend", &prefs.weekend, &catalog)?;
            }
            if let Some(peer) = &rules.no_overlap_with {
                if peer == controller {
                    return Err(RosterError::ConfigError(format!(
                        "{controller} cannot be its own noOverlapWith peer"
                    )));
                }
                if !controller_set.contains(peer.as_str()) {
                    return Err(RosterError::ConfigError(format!(
                        "{controller} noOverlapWith references unknown controller {peer}"
                    )));
                }
            }
        }

        Ok(catalog)
    }

    fn validate_pair_policy(
        &self,
        controller: &str,
        policy: &PairPolicy,
        catalog: &ShiftCatalog,
    ) -> Result<(), RosterError> {
        let pairs = match policy {
            PairPolicy::None => return Ok(()),
            PairPolicy::Strict { pairs } => pairs,
            PairPolicy::SoftPreferred { pairs, .. } => pairs,
        };
        for (v1, v2) in pairs {
            if !catalog.contains(v1) || !catalog.contains(v2) {
                return Err(RosterError::ConfigError(format!(
                    "{controller} pair policy references unknown shift ({v1}, {v2})"
                )));
            }
        }
        Ok(())
    }

    fn validate_preference_set(
        &self,
        controller: &str,
        day_kind: &str,
        set: &HashSet<String>,
        catalog: &ShiftCatalog,
    ) -> Result<(), RosterError> {
        if set.is_empty() {
            return Ok(());
        }
        if !set.iter().any(|code| catalog.operational.contains_key(code)) {
            return Err(RosterError::ConfigError(format!(
                "{controller} {day_kind} preference set does not intersect any known shift"
            )));
        }
        Ok(())
    }
}
