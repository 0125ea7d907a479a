//! Closed configuration enumerations for the Expressor and Performer (§6).
//!
//! Plain serde-derived structs with a literal `Default`, same shape as the
//! teacher's `Opts` in `src/main.rs`, each with a `validate` entry check run
//! once at conversion entry rather than during search (§7).

use crate::error::{ExpressError, PerformError};
use crate::graph::StepKind;
use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Bracket-parsing policy for the Expressor's cost tier 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketParsingMethod {
    Aggressive,
    Balanced,
    NoBrackets,
}

/// Whether to use `default_bracket_parsing_method` outright or measure and
/// pick dynamically (§4.3 tier 2, `ChooseMethodDynamically`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketParsingDetermination {
    UseDefault,
    ChooseDynamically,
}

/// Configuration for [`crate::express::express`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    pub default_bracket_parsing_method: BracketParsingMethod,
    pub bracket_parsing_determination: BracketParsingDetermination,
    pub min_level_for_brackets: i32,
    pub use_aggressive_when_simultaneous_exceeds_two_feet: bool,
    pub balanced_brackets_per_minute_for_aggressive: f64,
    pub balanced_brackets_per_minute_for_no_brackets: f64,
    /// The chart's authored difficulty level, compared against
    /// `min_level_for_brackets`. Not part of the source's config bullet list
    /// but required to apply it; supplied by the caller alongside the chart.
    pub chart_difficulty_level: i32,
}
impl Default for ExpressionConfig {
    fn default() -> ExpressionConfig {
        ExpressionConfig {
            default_bracket_parsing_method: BracketParsingMethod::Balanced,
            bracket_parsing_determination: BracketParsingDetermination::UseDefault,
            min_level_for_brackets: 0,
            use_aggressive_when_simultaneous_exceeds_two_feet: true,
            balanced_brackets_per_minute_for_aggressive: 20.0,
            balanced_brackets_per_minute_for_no_brackets: 2.0,
            chart_difficulty_level: 0,
        }
    }
}
impl ExpressionConfig {
    pub fn validate(&self) -> Result<(), ExpressError> {
        if self.balanced_brackets_per_minute_for_no_brackets
            > self.balanced_brackets_per_minute_for_aggressive
        {
            return Err(ExpressError::CannotExpress {
                group_index: 0,
                time: "<config>".to_string(),
                reason: "balanced_brackets_per_minute_for_no_brackets exceeds _for_aggressive"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// The effective bracket-parsing method for this chart, before any
    /// dynamic measurement pass (§4.3 tier 2).
    pub fn effective_method(&self) -> BracketParsingMethod {
        if self.chart_difficulty_level < self.min_level_for_brackets {
            return BracketParsingMethod::NoBrackets;
        }
        match self.bracket_parsing_determination {
            BracketParsingDetermination::UseDefault => self.default_bracket_parsing_method,
            BracketParsingDetermination::ChooseDynamically => BracketParsingMethod::Balanced,
        }
    }

    /// Re-resolves the method after measuring brackets-per-minute from a
    /// first `Balanced` pass (§4.3 tier 2, `ChooseMethodDynamically`).
    pub fn resolve_dynamic(&self, measured_brackets_per_minute: f64) -> BracketParsingMethod {
        if self.bracket_parsing_determination != BracketParsingDetermination::ChooseDynamically {
            return self.effective_method();
        }
        if measured_brackets_per_minute >= self.balanced_brackets_per_minute_for_aggressive {
            BracketParsingMethod::Aggressive
        } else if measured_brackets_per_minute <= self.balanced_brackets_per_minute_for_no_brackets
        {
            BracketParsingMethod::NoBrackets
        } else {
            BracketParsingMethod::Balanced
        }
    }
}

/// §4.4 tier 2 thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTighteningConfig {
    pub travel_speed_min_seconds: f64,
    pub travel_speed_max_seconds: f64,
    pub travel_distance_min: f64,
    pub travel_distance_max: f64,
    pub stretch_distance_min: f64,
    pub stretch_distance_max: f64,
}
impl Default for StepTighteningConfig {
    fn default() -> StepTighteningConfig {
        StepTighteningConfig {
            travel_speed_min_seconds: 0.12,
            travel_speed_max_seconds: 0.3,
            travel_distance_min: 1.0,
            travel_distance_max: 3.0,
            stretch_distance_min: 2.5,
            stretch_distance_max: 4.0,
        }
    }
}

/// §4.4 tier 3 thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LateralTighteningConfig {
    pub pattern_length: usize,
    pub relative_nps: f64,
    pub absolute_nps: f64,
    pub speed: f64,
}
impl Default for LateralTighteningConfig {
    fn default() -> LateralTighteningConfig {
        LateralTighteningConfig {
            pattern_length: 3,
            relative_nps: 1.65,
            absolute_nps: 12.0,
            speed: 3.0,
        }
    }
}

/// §4.4 tier 4 caps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FacingConfig {
    pub max_inward_percentage: f64,
    pub max_outward_percentage: f64,
}
impl Default for FacingConfig {
    fn default() -> FacingConfig {
        FacingConfig {
            max_inward_percentage: 0.25,
            max_outward_percentage: 0.1,
        }
    }
}

/// Configuration for [`crate::perform::perform`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub desired_weights: FxHashMap<String, Vec<f64>>,
    pub step_tightening: StepTighteningConfig,
    pub lateral_tightening: LateralTighteningConfig,
    pub facing: FacingConfig,
    pub step_type_replacements: FxHashMap<StepKind, FxHashSet<StepKind>>,
}
impl Default for PerformanceConfig {
    fn default() -> PerformanceConfig {
        PerformanceConfig {
            desired_weights: FxHashMap::default(),
            step_tightening: StepTighteningConfig::default(),
            lateral_tightening: LateralTighteningConfig::default(),
            facing: FacingConfig::default(),
            step_type_replacements: FxHashMap::default(),
        }
    }
}
impl PerformanceConfig {
    pub fn validate(&self) -> Result<(), PerformError> {
        let st = &self.step_tightening;
        if st.travel_speed_min_seconds > st.travel_speed_max_seconds {
            return Err(PerformError::ConfigInvalid(
                "step_tightening.travel_speed_min_seconds > travel_speed_max_seconds".to_string(),
            ));
        }
        if st.travel_distance_min > st.travel_distance_max {
            return Err(PerformError::ConfigInvalid(
                "step_tightening.travel_distance_min > travel_distance_max".to_string(),
            ));
        }
        if st.stretch_distance_min > st.stretch_distance_max {
            return Err(PerformError::ConfigInvalid(
                "step_tightening.stretch_distance_min > stretch_distance_max".to_string(),
            ));
        }
        if self.lateral_tightening.pattern_length == 0 {
            return Err(PerformError::ConfigInvalid(
                "lateral_tightening.pattern_length must be at least 1".to_string(),
            ));
        }
        let f = &self.facing;
        if !(0.0..=1.0).contains(&f.max_inward_percentage) || !(0.0..=1.0).contains(&f.max_outward_percentage) {
            return Err(PerformError::ConfigInvalid(
                "facing percentages must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    /// Desired per-lane weight distribution for `pad_name`, normalized to sum
    /// to 1; falls back to a uniform distribution if unconfigured (§4.4 tier
    /// 5).
    pub fn normalized_weights(&self, pad_name: &str, lane_count: usize) -> Vec<f64> {
        let raw = self
            .desired_weights
            .get(pad_name)
            .cloned()
            .unwrap_or_else(|| vec![1.0; lane_count]);
        let sum: f64 = raw.iter().sum();
        if sum <= 0.0 {
            vec![1.0 / lane_count as f64; lane_count]
        } else {
            raw.iter().map(|w| w / sum).collect()
        }
    }
}

/// The default step-kind substitution table (§4.4, §9): identity extended
/// with the obvious heel/toe mirror for two-portion bracket kinds.
pub fn default_step_type_replacements() -> FxHashMap<StepKind, FxHashSet<StepKind>> {
    use StepKind::*;
    let mirror = |k: StepKind| -> StepKind {
        match k {
            BracketHeelNewToeSame => BracketHeelSameToeNew,
            BracketHeelSameToeNew => BracketHeelNewToeSame,
            BracketHeelNewToeSwap => BracketHeelSwapToeNew,
            BracketHeelSwapToeNew => BracketHeelNewToeSwap,
            BracketHeelSameToeSwap => BracketHeelSwapToeSame,
            BracketHeelSwapToeSame => BracketHeelSameToeSwap,
            BracketOneArrowHeelNew => BracketOneArrowToeNew,
            BracketOneArrowToeNew => BracketOneArrowHeelNew,
            BracketOneArrowHeelSame => BracketOneArrowToeSame,
            BracketOneArrowToeSame => BracketOneArrowHeelSame,
            other => other,
        }
    };
    let all = [
        SameArrow,
        NewArrow,
        CrossoverFront,
        CrossoverBehind,
        InvertFront,
        InvertBehind,
        FootSwap,
        BracketHeelNewToeNew,
        BracketHeelNewToeSame,
        BracketHeelNewToeSwap,
        BracketHeelSameToeNew,
        BracketHeelSameToeSame,
        BracketHeelSameToeSwap,
        BracketHeelSwapToeNew,
        BracketHeelSwapToeSame,
        BracketHeelSwapToeSwap,
        BracketOneArrowHeelNew,
        BracketOneArrowHeelSame,
        BracketOneArrowToeNew,
        BracketOneArrowToeSame,
    ];
    let mut map = FxHashMap::default();
    for k in all {
        let mut set = FxHashSet::default();
        set.insert(k);
        set.insert(mirror(k));
        map.insert(k, set);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_expression_config_validates() {
        ExpressionConfig::default().validate().unwrap();
    }

    #[test]
    fn default_performance_config_validates() {
        PerformanceConfig::default().validate().unwrap();
    }

    #[test]
    fn inverted_travel_speed_thresholds_are_rejected() {
        let mut cfg = PerformanceConfig::default();
        cfg.step_tightening.travel_speed_min_seconds = 1.0;
        cfg.step_tightening.travel_speed_max_seconds = 0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_replacement_table_contains_identity_and_mirror() {
        let table = default_step_type_replacements();
        let set = &table[&StepKind::BracketHeelNewToeSame];
        assert!(set.contains(&StepKind::BracketHeelNewToeSame));
        assert!(set.contains(&StepKind::BracketHeelSameToeNew));
    }
}
