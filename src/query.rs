//! One-time per-query precomputation: case folding, the character-class
//! bitmask, the trigram set, atom splitting, and the adaptive edit budget
//! (spec.md §3-4.4). Prepared queries are immutable and freely shareable
//! across threads.

use crate::bytes::compress;
use crate::config::{MatchConfig, MatchingAlgorithm};
use crate::prefilter::{char_bitmask, trigrams};

/// A query prepared once and reused across every candidate it is scored
/// against.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub original: String,
    pub lowercased: Vec<u8>,
    pub char_bitmask: u64,
    pub trigrams: Vec<u32>,
    pub config: MatchConfig,
    pub effective_max_edit_distance: usize,
    pub bitmask_tolerance: usize,
    pub min_candidate_length: usize,
    pub atoms: Vec<Vec<u8>>,
    pub max_sw_score: i64,
}

impl PreparedQuery {
    pub fn q_len(&self) -> usize {
        self.lowercased.len()
    }

    /// Builds a `PreparedQuery` from raw caller text, per spec.md §4.4.
    pub fn prepare(text: &str, config: &MatchConfig) -> Self {
        config.validate();
        let lowercased = compress(text.as_bytes());
        let q_len = lowercased.len();
        let mask = char_bitmask(&lowercased);
        let tris = trigrams(&lowercased);

        let (effective_max_edit_distance, bitmask_tolerance) = match &config.algorithm {
            MatchingAlgorithm::EditDistance(cfg) => {
                let configured = if q_len >= cfg.long_query_threshold {
                    cfg.long_query_max_edit_distance
                } else {
                    cfg.max_edit_distance
                } as usize;
                let adaptive = if q_len == 0 {
                    0
                } else {
                    configured.min(1.max((q_len.saturating_sub(1)) / 2))
                };
                let tolerance = if q_len <= 3 { 0 } else { adaptive };
                (adaptive, tolerance)
            }
            MatchingAlgorithm::SmithWaterman(_) => (0, 0),
        };

        let min_candidate_length = q_len.saturating_sub(effective_max_edit_distance);

        let atoms = match &config.algorithm {
            MatchingAlgorithm::SmithWaterman(sw) if sw.split_spaces => lowercased
                .split(|&b| crate::bytes::is_whitespace(b))
                .filter(|w| !w.is_empty())
                .map(|w| w.to_vec())
                .collect(),
            _ => Vec::new(),
        };

        let max_sw_score = match &config.algorithm {
            MatchingAlgorithm::SmithWaterman(sw) => {
                if atoms.len() > 1 {
                    atoms
                        .iter()
                        .map(|a| max_sw_score_for(a.len(), sw))
                        .sum()
                } else {
                    max_sw_score_for(q_len, sw)
                }
            }
            MatchingAlgorithm::EditDistance(_) => 0,
        };

        PreparedQuery {
            original: text.to_string(),
            lowercased,
            char_bitmask: mask,
            trigrams: tris,
            config: config.clone(),
            effective_max_edit_distance,
            bitmask_tolerance,
            min_candidate_length,
            atoms,
            max_sw_score,
        }
    }
}

/// `maxSWScore` normalization denominator for one atom of length `len`
/// (spec.md §4.9): `len * scoreMatch + bonusBoundaryWhitespace * (firstCharMultiplier + len - 1)`.
fn max_sw_score_for(len: usize, sw: &crate::config::SmithWatermanConfig) -> i64 {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    len * sw.score_match as i64
        + sw.bonus_boundary_whitespace as i64 * (sw.bonus_first_char_multiplier as i64 + len - 1)
}
