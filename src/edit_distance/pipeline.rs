//! The edit-distance scoring state machine (spec.md §4.8) and the
//! single-character tiny-query fast path (§4.11). Tries, in order, exact
//! equality, the tiny-query shortcut, prefix distance (with recoveries),
//! substring distance, a subsequence fallback, and finally the acronym
//! matcher, keeping whichever scores highest.

use crate::acronym;
use crate::boundary::{boundary_mask, is_boundary_masked, word_count};
use crate::buffer::ScoringBuffer;
use crate::bytes::{compress_into, compress_keep_case_into};
use crate::config::EditDistanceConfig;
use crate::prefilter::{bitmask_ok, char_bitmask, length_ok, trigram_ok};
use crate::query::PreparedQuery;
use crate::{MatchKind, ScoredMatch};

use super::bonus::{apply_bonuses, base_score, compute_bonus, find_positions, length_penalty, weighted_score};
use super::{prefix_distance, substring_distance};

/// Scores `candidate` (raw bytes, original case) against `prepared` under
/// `cfg`, using `buf` for all scratch state. Returns `None` if the best
/// score found is below `prepared.config.min_score`.
pub fn score(
    candidate: &[u8],
    prepared: &PreparedQuery,
    cfg: &EditDistanceConfig,
    buf: &mut ScoringBuffer,
) -> Option<ScoredMatch> {
    let q_len = prepared.q_len();
    let min_score = prepared.config.min_score;

    if q_len == 0 {
        buf.maybe_shrink();
        return Some(ScoredMatch {
            score: 1.0,
            kind: MatchKind::Exact,
        });
    }

    buf.ensure_capacity(q_len, candidate.len());
    compress_into(candidate, &mut buf.candidate_bytes);
    let c_len = buf.candidate_bytes.len();

    if c_len == 0 {
        buf.maybe_shrink();
        return None;
    }

    if buf.candidate_bytes == prepared.lowercased {
        buf.maybe_shrink();
        return Some(ScoredMatch {
            score: 1.0,
            kind: MatchKind::Exact,
        });
    }

    if q_len == 1 {
        let result = tiny_query(prepared.lowercased[0], &buf.candidate_bytes, cfg);
        buf.maybe_shrink();
        return result.filter(|m| m.score >= min_score);
    }

    let candidate_mask_bits = char_bitmask(&buf.candidate_bytes);
    if !length_ok(q_len, c_len, prepared.effective_max_edit_distance)
        || !bitmask_ok(prepared.char_bitmask, candidate_mask_bits, prepared.bitmask_tolerance)
        || !trigram_ok(q_len, &prepared.trigrams, prepared.effective_max_edit_distance, &buf.candidate_bytes)
    {
        buf.maybe_shrink();
        return None;
    }

    compress_keep_case_into(candidate, &mut buf.candidate_original);
    let mask = boundary_mask(&buf.candidate_original[..c_len]);

    // Pulled out as an owned local so it can be passed by reference alongside
    // `buf` (needed mutably by `find_positions`'s DP path) without aliasing.
    let candidate_bytes = std::mem::take(&mut buf.candidate_bytes);

    let mut best: Option<(f64, MatchKind)> = None;
    let mut consider = |s: f64, k: MatchKind, best: &mut Option<(f64, MatchKind)>| {
        if best.map_or(true, |(b, _)| s > b) {
            *best = Some((s, k));
        }
    };

    // Short-query same-length restriction (spec.md §4.6): for qLen <= 3, any
    // non-zero-distance prefix/substring match must also match candidate
    // length exactly, or it's rejected outright (subsequence/acronym may
    // still fire below).
    let short_query_length_locked = q_len <= 3;

    // `find_positions` takes identical arguments at every call site below
    // (prefix bonus, substring bonus, subsequence fallback), so it's run once
    // up front and the result is shared rather than recomputed per branch.
    let positions = find_positions(&prepared.lowercased, &candidate_bytes, mask, cfg, buf);

    if let Some(d) = prefix_distance(&prepared.lowercased, &candidate_bytes, prepared.effective_max_edit_distance, buf)
        .filter(|&d| d == 0 || !short_query_length_locked || c_len == q_len)
    {
        let base = base_score(d, q_len);
        let weighted = weighted_score(base, cfg.prefix_weight);
        // Exact-prefix recovery: an exact prefix match is never penalized for
        // trailing candidate length (spec.md §4.6).
        let lp = if d == 0 { 0.0 } else { length_penalty(c_len, q_len, cfg.length_penalty) };
        let mut composed = (weighted - lp).max(0.0);
        // Same-length near-exact boost: recover 70% of the distance to a
        // perfect weighted score when the candidate is the same length as
        // the query, so single-transposition near-exact matches (e.g. "teh"
        // vs "the") outrank longer candidates that merely prefix-match.
        if d > 0 && c_len == q_len {
            composed += 0.7 * (1.0 - weighted);
        }
        let bonus = positions
            .as_ref()
            .map(|p| compute_bonus(p, &candidate_bytes, mask, cfg))
            .unwrap_or(0.0);
        let scored = apply_bonuses(composed, bonus, d == 0).min(1.0);
        consider(scored, MatchKind::Prefix, &mut best);
    }

    if let Some(idx) = find_exact_substring(&candidate_bytes, &prepared.lowercased) {
        let end = idx + q_len;
        let is_whole_word = is_boundary_masked(&candidate_bytes, mask, idx) && (end == c_len || is_boundary_masked(&candidate_bytes, mask, end));
        let weighted = weighted_score(1.0, cfg.substring_weight);
        let recovery_bonus = if is_whole_word {
            cfg.word_boundary_bonus * 2.0
        } else {
            cfg.word_boundary_bonus
        };
        let scored = apply_bonuses(weighted, recovery_bonus, true).min(1.0);
        consider(scored, MatchKind::Substring, &mut best);
    }

    let best_so_far = best.map_or(0.0, |(s, _)| s);
    if best_so_far < 0.7 {
        if let Some(d) = substring_distance(&prepared.lowercased, &candidate_bytes, prepared.effective_max_edit_distance, buf)
            .filter(|&d| d == 0 || !short_query_length_locked || c_len == q_len)
        {
            let base = base_score(d, q_len);
            let weighted = weighted_score(base, cfg.substring_weight);
            let lp = length_penalty(c_len, q_len, cfg.length_penalty);
            let composed = (weighted - lp).max(0.0);
            let bonus = positions
                .as_ref()
                .map(|p| compute_bonus(p, &candidate_bytes, mask, cfg))
                .unwrap_or(0.0);
            let scored = apply_bonuses(composed, bonus, d == 0).min(1.0);
            consider(scored, MatchKind::Substring, &mut best);
        }
    }

    let needs_subsequence_fallback = best.map_or(true, |(s, _)| s < min_score);
    if needs_subsequence_fallback {
        if let Some(positions) = &positions {
            let total_gaps: usize = positions[0]
                + positions
                    .windows(2)
                    .map(|w| w[1].saturating_sub(w[0] + 1))
                    .sum::<usize>();
            let gap_ratio = total_gaps as f64 / c_len as f64;
            let base_sub = (1.0 - gap_ratio).max(0.3);
            let composed = base_sub * cfg.substring_weight;
            let bonus = compute_bonus(positions, &candidate_bytes, mask, cfg);
            let scored = apply_bonuses(composed, bonus, false).min(1.0);
            consider(scored, MatchKind::Subsequence, &mut best);
        }
    }

    let wc = word_count(&buf.candidate_original[..c_len]);
    if acronym::eligible(q_len, wc) {
        let initials = acronym::word_initials(&candidate_bytes, &buf.candidate_original[..c_len]);
        if let Some(s) = acronym::score(&prepared.lowercased, &initials, wc, cfg.acronym_weight) {
            consider(s.min(1.0), MatchKind::Acronym, &mut best);
        }
    }

    buf.candidate_bytes = candidate_bytes;
    buf.maybe_shrink();
    match best {
        Some((s, k)) if s >= min_score => Some(ScoredMatch { score: s, kind: k }),
        _ => None,
    }
}

fn find_exact_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Tiny-query fast path for a single-character query (spec.md §4.11): find
/// the first occurrence of `qc` in `candidate`, scoring higher when it lands
/// on a word boundary.
fn tiny_query(qc: u8, candidate: &[u8], cfg: &EditDistanceConfig) -> Option<ScoredMatch> {
    let c_len = candidate.len();
    let pos = candidate.iter().position(|&b| b == qc)?;
    let mask = boundary_mask(candidate);
    let at_boundary = is_boundary_masked(candidate, mask, pos);
    let kind = if pos == 0 { MatchKind::Prefix } else { MatchKind::Substring };
    let lp = length_penalty(c_len, 1, cfg.length_penalty);
    let composed = (1.0 - lp).max(0.0);
    let bonus = if at_boundary { cfg.word_boundary_bonus } else { 0.0 };
    let scored = apply_bonuses(composed, bonus, pos == 0 && c_len == 1).min(1.0);
    Some(ScoredMatch { score: scored, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_edit_distance;

    fn score_pair(query: &str, candidate: &str) -> Option<ScoredMatch> {
        let config = default_edit_distance();
        let prepared = PreparedQuery::prepare(query, &config);
        let mut buf = ScoringBuffer::new();
        let edit_cfg = match &config.algorithm {
            crate::config::MatchingAlgorithm::EditDistance(c) => c.clone(),
            _ => unreachable!(),
        };
        score(candidate.as_bytes(), &prepared, &edit_cfg, &mut buf)
    }

    #[test]
    fn exact_match_scores_one() {
        let m = score_pair("hello", "hello").unwrap();
        assert_eq!(m.score, 1.0);
        assert_eq!(m.kind, MatchKind::Exact);
    }

    #[test]
    fn case_insensitive_exact_match() {
        let m = score_pair("Hello", "HELLO").unwrap();
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn empty_query_matches_anything() {
        let m = score_pair("", "whatever").unwrap();
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn non_empty_query_vs_empty_candidate_is_none() {
        assert!(score_pair("x", "").is_none());
    }

    #[test]
    fn prefix_match_scores_high() {
        let m = score_pair("hello", "hello world").unwrap();
        assert_eq!(m.kind, MatchKind::Prefix);
        assert!(m.score > 0.8);
    }

    #[test]
    fn substring_match_found() {
        let m = score_pair("world", "hello world").unwrap();
        assert_eq!(m.kind, MatchKind::Substring);
    }

    #[test]
    fn subsequence_fallback_matches_scattered_letters() {
        let m = score_pair("gubi", "getUserById");
        assert!(m.is_some());
    }

    #[test]
    fn tiny_query_matches_single_char() {
        let m = score_pair("w", "hello world").unwrap();
        assert_eq!(m.kind, MatchKind::Substring);
    }

    #[test]
    fn tiny_query_prefix_scores_higher_than_mid_word() {
        let prefix = score_pair("h", "hello world").unwrap();
        let mid = score_pair("o", "hello world").unwrap();
        assert!(prefix.score >= mid.score);
    }

    #[test]
    fn unrelated_strings_return_none() {
        assert!(score_pair("xyz123", "completely different text").is_none());
    }

    #[test]
    fn acronym_fallback_matches_initials() {
        let m = score_pair("gsi", "get storage item");
        assert!(m.is_some());
    }
}
