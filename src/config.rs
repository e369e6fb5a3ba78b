//! Scoring configuration: tagged algorithm selection, per-algorithm knobs,
//! and the JSON-serializable shapes the spec's round-trip contract requires.
//! Grounded in the reference crate's plain `Config`/`Scoring` structs, with
//! serde derives gated behind the `serde` feature exactly as there.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gap penalty model used by the edit-distance bonus scorer when closing a
/// gap between two matched positions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum GapPenalty {
    None,
    Linear {
        #[cfg_attr(feature = "serde", serde(rename = "perCharacter"))]
        per_character: f64,
    },
    Affine {
        open: f64,
        extend: f64,
    },
}

impl GapPenalty {
    /// Cost of a gap of `g` unmatched characters between two matched
    /// positions (spec.md §4.6).
    pub fn cost(&self, g: usize) -> f64 {
        if g == 0 {
            return 0.0;
        }
        match self {
            GapPenalty::None => 0.0,
            GapPenalty::Linear { per_character } => g as f64 * per_character,
            GapPenalty::Affine { open, extend } => open + (g as f64 - 1.0) * extend,
        }
    }
}

/// Config for the Damerau-Levenshtein edit-distance pipeline (C6-C8, C12).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EditDistanceConfig {
    pub max_edit_distance: u32,
    pub long_query_max_edit_distance: u32,
    pub long_query_threshold: usize,
    pub prefix_weight: f64,
    pub substring_weight: f64,
    pub word_boundary_bonus: f64,
    pub consecutive_bonus: f64,
    pub gap_penalty: GapPenalty,
    pub first_match_bonus: f64,
    pub first_match_bonus_range: f64,
    pub length_penalty: f64,
    pub acronym_weight: f64,
}

impl Default for EditDistanceConfig {
    fn default() -> Self {
        EditDistanceConfig {
            max_edit_distance: 2,
            long_query_max_edit_distance: 3,
            long_query_threshold: 13,
            prefix_weight: 1.5,
            substring_weight: 1.0,
            word_boundary_bonus: 0.1,
            consecutive_bonus: 0.05,
            gap_penalty: GapPenalty::Affine {
                open: 0.03,
                extend: 0.005,
            },
            first_match_bonus: 0.15,
            first_match_bonus_range: 10.0,
            length_penalty: 0.003,
            acronym_weight: 1.0,
        }
    }
}

/// Config for the Smith-Waterman local-alignment pipeline (C9-C10). All
/// scoring knobs are integers: the DP runs entirely in `i32` arithmetic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SmithWatermanConfig {
    pub score_match: i32,
    pub penalty_gap_start: i32,
    pub penalty_gap_extend: i32,
    pub bonus_consecutive: i32,
    pub bonus_boundary: i32,
    pub bonus_boundary_whitespace: i32,
    pub bonus_boundary_delimiter: i32,
    pub bonus_camel_case: i32,
    pub bonus_first_char_multiplier: i32,
    pub split_spaces: bool,
}

impl Default for SmithWatermanConfig {
    fn default() -> Self {
        SmithWatermanConfig {
            score_match: 16,
            penalty_gap_start: 3,
            penalty_gap_extend: 1,
            bonus_consecutive: 4,
            bonus_boundary: 8,
            bonus_boundary_whitespace: 10,
            bonus_boundary_delimiter: 9,
            bonus_camel_case: 5,
            bonus_first_char_multiplier: 2,
            split_spaces: true,
        }
    }
}

/// Tagged algorithm selector. Unknown `"type"` tags fail to deserialize
/// (serde's default behavior for internally-tagged enums).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "config", rename_all = "camelCase")
)]
pub enum MatchingAlgorithm {
    EditDistance(EditDistanceConfig),
    SmithWaterman(SmithWatermanConfig),
}

/// Top-level match configuration: an algorithm selection plus the shared
/// minimum-score threshold (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MatchConfig {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub algorithm: MatchingAlgorithm,
    pub min_score: f64,
}

impl MatchConfig {
    /// Panics if `min_score` is not a finite value in `[0.0, 1.0]`, mirroring
    /// the reference crate's construction-time `assert!` guards rather than
    /// a recoverable error (spec.md §7 ambient addition).
    pub fn validate(&self) {
        assert!(
            self.min_score.is_finite() && (0.0..=1.0).contains(&self.min_score),
            "min_score must be a finite value in [0.0, 1.0], got {}",
            self.min_score
        );
    }
}

/// The default edit-distance configuration (spec.md §3 defaults), with
/// `min_score` at `0.0`.
pub fn default_edit_distance() -> MatchConfig {
    MatchConfig {
        algorithm: MatchingAlgorithm::EditDistance(EditDistanceConfig::default()),
        min_score: 0.0,
    }
}

/// The default Smith-Waterman configuration (spec.md §3 defaults), with
/// `min_score` at `0.0`.
pub fn default_smith_waterman() -> MatchConfig {
    MatchConfig {
        algorithm: MatchingAlgorithm::SmithWaterman(SmithWatermanConfig::default()),
        min_score: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_penalty_affine_formula() {
        let p = GapPenalty::Affine {
            open: 0.03,
            extend: 0.005,
        };
        assert_eq!(p.cost(0), 0.0);
        assert_eq!(p.cost(1), 0.03);
        assert!((p.cost(3) - (0.03 + 2.0 * 0.005)).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn validate_rejects_out_of_range_min_score() {
        let mut cfg = default_edit_distance();
        cfg.min_score = 1.5;
        cfg.validate();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn round_trips_through_json() {
        let cfg = default_edit_distance();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);

        let cfg = default_smith_waterman();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn unknown_algorithm_tag_fails_to_decode() {
        let json = r#"{"type":"bogus","config":{},"minScore":0.0}"#;
        let result: Result<MatchConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
