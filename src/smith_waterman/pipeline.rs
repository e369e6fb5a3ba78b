//! Smith-Waterman scoring pipeline (spec.md §4.10): bitmask prefilter, exact
//! match, per-position bonus precompute, multi-atom AND-semantics, score
//! normalization against `maxSWScore`, and an acronym fallback that competes
//! against the alignment score exactly as in the edit-distance pipeline.

use crate::acronym;
use crate::boundary::word_count;
use crate::buffer::ScoringBuffer;
use crate::bytes::{compress_into, compress_keep_case_into};
use crate::config::SmithWatermanConfig;
use crate::prefilter::{bitmask_ok, char_bitmask};
use crate::query::PreparedQuery;
use crate::{MatchKind, ScoredMatch};

/// Scores `candidate` (raw bytes, original case) against `prepared` under
/// `cfg`, using `buf` for all scratch state.
pub fn score(
    candidate: &[u8],
    prepared: &PreparedQuery,
    cfg: &SmithWatermanConfig,
    buf: &mut ScoringBuffer,
) -> Option<ScoredMatch> {
    let q_len = prepared.q_len();

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

    let cand_mask = char_bitmask(&buf.candidate_bytes);
    if !bitmask_ok(prepared.char_bitmask, cand_mask, prepared.bitmask_tolerance) {
        buf.maybe_shrink();
        return None;
    }

    compress_keep_case_into(candidate, &mut buf.candidate_original);

    let candidate_bytes = std::mem::take(&mut buf.candidate_bytes);
    let mut position_bonus = std::mem::take(&mut buf.candidate_bonus);
    crate::smith_waterman::precompute_bonus(&buf.candidate_original[..c_len], cfg, &mut position_bonus);

    let raw_score: Option<i64> = if prepared.atoms.len() > 1 {
        // AND semantics: every atom must independently find a positive
        // alignment, or the candidate fails entirely (spec.md §4.9).
        let mut total = 0i64;
        let mut ok = true;
        for atom in &prepared.atoms {
            let s = crate::smith_waterman::align(atom, &candidate_bytes, &position_bonus, cfg, buf);
            if s <= 0 {
                ok = false;
                break;
            }
            total += s as i64;
        }
        if ok { Some(total) } else { None }
    } else {
        let s = crate::smith_waterman::align(&prepared.lowercased, &candidate_bytes, &position_bonus, cfg, buf);
        if s > 0 { Some(s as i64) } else { None }
    };

    let wc = word_count(&buf.candidate_original[..c_len]);
    let mut best: Option<(f64, MatchKind)> = raw_score.map(|s| {
        let normalized = (s as f64 / prepared.max_sw_score.max(1) as f64).min(1.0);
        (normalized, MatchKind::Alignment)
    });

    if acronym::eligible(q_len, wc) {
        let initials = acronym::word_initials(&candidate_bytes, &buf.candidate_original[..c_len]);
        if let Some(s) = acronym::score(&prepared.lowercased, &initials, wc, 1.0) {
            if best.map_or(true, |(b, _)| s > b) {
                best = Some((s, MatchKind::Acronym));
            }
        }
    }

    buf.candidate_bytes = candidate_bytes;
    buf.candidate_bonus = position_bonus;
    buf.maybe_shrink();

    match best {
        Some((s, k)) if s >= prepared.config.min_score => Some(ScoredMatch {
            score: s.min(1.0),
            kind: k,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_smith_waterman;

    fn score_pair(query: &str, candidate: &str) -> Option<ScoredMatch> {
        let config = default_smith_waterman();
        let prepared = PreparedQuery::prepare(query, &config);
        let mut buf = ScoringBuffer::new();
        let cfg = match &config.algorithm {
            crate::config::MatchingAlgorithm::SmithWaterman(c) => c.clone(),
            _ => unreachable!(),
        };
        score(candidate.as_bytes(), &prepared, &cfg, &mut buf)
    }

    #[test]
    fn exact_match_scores_one() {
        let m = score_pair("hello", "hello").unwrap();
        assert_eq!(m.score, 1.0);
        assert_eq!(m.kind, MatchKind::Exact);
    }

    #[test]
    fn prefix_alignment_scores_highly() {
        let m = score_pair("hello", "hello world").unwrap();
        assert!(m.score > 0.5);
    }

    #[test]
    fn unrelated_strings_return_none() {
        assert!(score_pair("xyz", "completely different").is_none());
    }

    #[test]
    fn multi_word_query_requires_every_atom_to_match() {
        let m = score_pair("johnson johnson", "johnson and johnson pharma");
        assert!(m.is_some());
        assert!(score_pair("johnson smithers", "johnson and johnson pharma").is_none());
    }

    #[test]
    fn scattered_candidate_scores_lower_than_contiguous() {
        let good = score_pair("sortedmap", "SortedArrayMap").unwrap();
        let bad = score_pair("sortedmap", "LightSourceTeamApiKeys");
        assert!(bad.is_none() || bad.unwrap().score < good.score);
    }

    #[test]
    fn stray_characters_do_not_satisfy_an_unmatched_atom() {
        // The bitmask prefilter passes ("abc zzz" contains every character
        // class "abc ba" needs), and a stray 'b' and 'a' both appear in the
        // candidate, but never in that order — the "ba" atom must fail to
        // align in full, not just find a lone matching byte.
        assert!(score_pair("abc ba", "abc zzz").is_none());
    }
}
