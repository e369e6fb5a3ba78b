//! fuzzcore is a byte-level fuzzy string matching engine for search-as-you-type
//! over large in-memory corpora. It offers two interchangeable scoring
//! pipelines behind one API: a Damerau-Levenshtein (edit-distance) engine
//! tuned for typo tolerance, and a Smith-Waterman local-alignment engine
//! tuned for substring/subsequence relevance ranking, similar to the
//! algorithm behind fzf and nucleo. Matching works directly on UTF-8 bytes
//! with a small, explicit case-folding table (ASCII, Latin-1 Supplement,
//! Greek, Cyrillic) rather than decoding codepoints.
//!
//! Every scoring call takes a caller-owned [`ScoringBuffer`] so the hot path
//! never allocates: prepare a query once with [`FuzzyMatcher::prepare`],
//! reuse one buffer across every candidate, and score away.
//!
//! # Example: scoring a single candidate
//!
//! ```rust
//! use fuzzcore::{FuzzyMatcher, config::default_edit_distance};
//!
//! let matcher = FuzzyMatcher::new(default_edit_distance());
//! let prepared = matcher.prepare("gubi");
//! let mut buf = matcher.make_buffer();
//!
//! let result = matcher.score(b"getUserById", &prepared, &mut buf);
//! assert!(result.is_some());
//! ```
//!
//! # Example: ranking a list of candidates
//!
//! ```rust
//! use fuzzcore::{FuzzyMatcher, config::default_edit_distance};
//!
//! let matcher = FuzzyMatcher::new(default_edit_distance());
//! let candidates = ["fooBar", "foo_bar", "prelude", "println!"];
//!
//! let matches = matcher.top_matches("fBr", &candidates, 10);
//! assert!(!matches.is_empty());
//! ```
//!
//! # Example: Smith-Waterman for relevance ranking
//!
//! ```rust
//! use fuzzcore::{FuzzyMatcher, config::default_smith_waterman};
//!
//! let matcher = FuzzyMatcher::new(default_smith_waterman());
//! let candidates = ["SortedArrayMap", "LightSourceTeamApiKeys", "SortedMap"];
//! let matches = matcher.top_matches("sortedmap", &candidates, 10);
//!
//! // the contiguous, closely-related candidates rank above the scattered one
//! assert_eq!(matches[0].index, 2);
//! ```
//!
//! # Example: custom config round-tripped through JSON
//!
//! ```rust
//! # #[cfg(feature = "serde")]
//! # {
//! use fuzzcore::config::{MatchConfig, MatchingAlgorithm, EditDistanceConfig};
//!
//! let config = MatchConfig {
//!     algorithm: MatchingAlgorithm::EditDistance(EditDistanceConfig {
//!         max_edit_distance: 1,
//!         ..EditDistanceConfig::default()
//!     }),
//!     min_score: 0.5,
//! };
//! let json = serde_json::to_string(&config).unwrap();
//! let restored: MatchConfig = serde_json::from_str(&json).unwrap();
//! assert_eq!(config, restored);
//! # }
//! ```

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod acronym;
mod boundary;
mod buffer;
mod bytes;
pub mod config;
mod edit_distance;
#[cfg(feature = "parallel")]
pub mod parallel;
mod prefilter;
mod query;
pub mod smith_waterman;

pub use buffer::ScoringBuffer;
pub use config::{MatchConfig, MatchingAlgorithm};
pub use query::PreparedQuery;

/// Which of the pipeline's fallback tiers produced a [`ScoredMatch`],
/// mirroring the reference crate's plain `exact: bool` flag but spelled out
/// per tier, since this engine has more than two outcomes worth
/// distinguishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MatchKind {
    /// Case-insensitive byte-for-byte equality, or an empty query.
    Exact,
    /// The query matched a prefix of the candidate (within edit distance).
    Prefix,
    /// The query matched some contiguous window of the candidate.
    Substring,
    /// The query's characters appear in order but not contiguously.
    Subsequence,
    /// The query matched the initials of the candidate's words.
    Acronym,
    /// A Smith-Waterman local alignment produced the best score.
    Alignment,
}

/// The outcome of scoring one candidate against one [`PreparedQuery`]:
/// a score in `[0.0, 1.0]` and which tier produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ScoredMatch {
    pub score: f64,
    pub kind: MatchKind,
}

/// A [`ScoredMatch`] paired with the candidate's position in the caller's
/// slice, the shape returned by [`FuzzyMatcher::top_matches`] and
/// [`FuzzyMatcher::all_matches`] — mirrors the reference crate's
/// `Match { index, score, exact }`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MatchResult {
    pub index: u32,
    pub score: f64,
    pub kind: MatchKind,
}

/// Orders by score descending, then by index ascending to break ties, so
/// `sort_unstable` produces a deterministic top-k ranking.
impl PartialOrd for MatchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for MatchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .reverse()
            .then_with(|| self.index.cmp(&other.index))
    }
}
impl Eq for MatchResult {}

/// Entry point: prepares queries and scores candidates under one
/// [`MatchConfig`]. Cheap to construct; holds only the config, so it's
/// fine to build one per query or keep one around for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    config: MatchConfig,
}

impl FuzzyMatcher {
    /// Builds a matcher from a validated [`MatchConfig`]. Panics if
    /// `config.min_score` is outside `[0.0, 1.0]`.
    pub fn new(config: MatchConfig) -> Self {
        config.validate();
        FuzzyMatcher { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Prepares `text` for repeated scoring against many candidates.
    pub fn prepare(&self, text: &str) -> PreparedQuery {
        PreparedQuery::prepare(text, &self.config)
    }

    /// Allocates a fresh scratch buffer. Reuse it across every candidate
    /// scored against a given [`PreparedQuery`] (or several) on one thread;
    /// it is not `Clone`, so it cannot accidentally be shared across
    /// threads.
    pub fn make_buffer(&self) -> ScoringBuffer {
        ScoringBuffer::new()
    }

    /// Scores one candidate (raw bytes, original case) against `prepared`.
    /// `None` if the candidate's best score falls below
    /// `prepared.config.min_score`.
    pub fn score(&self, candidate: &[u8], prepared: &PreparedQuery, buf: &mut ScoringBuffer) -> Option<ScoredMatch> {
        match &prepared.config.algorithm {
            MatchingAlgorithm::EditDistance(cfg) => edit_distance::pipeline::score(candidate, prepared, cfg, buf),
            MatchingAlgorithm::SmithWaterman(cfg) => smith_waterman::pipeline::score(candidate, prepared, cfg, buf),
        }
    }

    /// Scores `candidates` against `query`, sorts descending by score (ties
    /// broken by ascending index), and truncates to `limit`. Allocates one
    /// [`ScoringBuffer`] internally; for repeated calls on one thread, reuse
    /// [`FuzzyMatcher::top_matches_with`] with a buffer you own.
    pub fn top_matches<S: AsRef<str>>(&self, query: &str, candidates: &[S], limit: usize) -> Vec<MatchResult> {
        let mut buf = self.make_buffer();
        self.top_matches_with(query, candidates, limit, &mut buf)
    }

    /// Same as [`FuzzyMatcher::top_matches`], but reuses a caller-supplied
    /// buffer instead of allocating one.
    pub fn top_matches_with<S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &[S],
        limit: usize,
        buf: &mut ScoringBuffer,
    ) -> Vec<MatchResult> {
        let prepared = self.prepare(query);
        let mut out: Vec<MatchResult> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                self.score(candidate.as_ref().as_bytes(), &prepared, buf)
                    .map(|m| MatchResult {
                        index: index as u32,
                        score: m.score,
                        kind: m.kind,
                    })
            })
            .collect();
        out.sort_unstable();
        out.truncate(limit);
        out
    }

    /// Scores every candidate against `query` with no limit and no
    /// sorting, in original order — useful when the caller will merge or
    /// sort results itself (e.g. across shards).
    pub fn all_matches<S: AsRef<str>>(&self, query: &str, candidates: &[S]) -> Vec<MatchResult> {
        let prepared = self.prepare(query);
        let mut buf = self.make_buffer();
        candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                self.score(candidate.as_ref().as_bytes(), &prepared, &mut buf)
                    .map(|m| MatchResult {
                        index: index as u32,
                        score: m.score,
                        kind: m.kind,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{default_edit_distance, default_smith_waterman};

    #[test]
    fn top_matches_ranks_best_first() {
        let matcher = FuzzyMatcher::new(default_edit_distance());
        let candidates = ["hello world", "help", "unrelated"];
        let matches = matcher.top_matches("hello", &candidates, 10);
        assert_eq!(matches[0].index, 0);
    }

    #[test]
    fn all_matches_preserves_original_order() {
        let matcher = FuzzyMatcher::new(default_edit_distance());
        let candidates = ["hello world", "unrelated", "hello there"];
        let matches = matcher.all_matches("hello", &candidates);
        let indices: Vec<u32> = matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn match_result_orders_by_score_then_index() {
        let a = MatchResult {
            index: 5,
            score: 0.5,
            kind: MatchKind::Exact,
        };
        let b = MatchResult {
            index: 1,
            score: 0.5,
            kind: MatchKind::Exact,
        };
        let c = MatchResult {
            index: 0,
            score: 0.9,
            kind: MatchKind::Exact,
        };
        let mut v = vec![a, b, c];
        v.sort_unstable();
        assert_eq!(v[0].index, 0);
        assert_eq!(v[1].index, 1);
        assert_eq!(v[2].index, 5);
    }

    #[test]
    fn smith_waterman_config_scores_through_matcher() {
        let matcher = FuzzyMatcher::new(default_smith_waterman());
        let candidates = ["SortedArrayMap", "LightSourceTeamApiKeys"];
        let matches = matcher.top_matches("sortedmap", &candidates, 10);
        assert_eq!(matches[0].index, 0);
    }

    #[test]
    #[should_panic]
    fn new_panics_on_invalid_min_score() {
        let mut cfg = default_edit_distance();
        cfg.min_score = 2.0;
        FuzzyMatcher::new(cfg);
    }
}
