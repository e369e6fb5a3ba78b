//! Position finder (greedy + DP-optimal) and bonus/score-composition math
//! shared by the edit-distance pipeline (spec.md §4.6).

use crate::boundary::is_boundary_masked;
use crate::buffer::{ALIGNMENT_MAX_CLEN, ScoringBuffer};
use crate::config::EditDistanceConfig;

/// Fixed-point scale used for the i32 alignment-DP matrices in
/// `ScoringBuffer` (spec.md §3 declares these as i32, so bonus weights —
/// themselves small f64 fractions — are scaled into that domain for the
/// internal search; the exact f64 bonus is always recomputed afterward from
/// the recovered positions via [`compute_bonus`]).
const DP_SCALE: f64 = 1_000_000.0;
const NEG_INF: i32 = i32::MIN / 4;

/// Greedy left-to-right subsequence position finder (spec.md §4.6), used for
/// `q_len <= 4` and as the subsequence fallback.
pub fn greedy_positions(query: &[u8], candidate: &[u8], mask: u64) -> Option<Vec<usize>> {
    let q_len = query.len();
    let c_len = candidate.len();
    let mut positions = Vec::with_capacity(q_len);
    let mut search_from = 0usize;
    let mut prev_pos: Option<usize> = None;

    for &qc in query {
        if let Some(p) = prev_pos {
            if p + 1 < c_len && candidate[p + 1] == qc {
                positions.push(p + 1);
                prev_pos = Some(p + 1);
                search_from = p + 2;
                continue;
            }
        }

        let window_end = (search_from + q_len + 5).min(c_len);
        let mut boundary_choice = None;
        let mut nearest_choice = None;
        for i in search_from..window_end {
            if candidate[i] == qc {
                if nearest_choice.is_none() {
                    nearest_choice = Some(i);
                }
                if is_boundary_masked(candidate, mask, i) {
                    boundary_choice = Some(i);
                    break;
                }
            }
        }

        let chosen = match boundary_choice.or(nearest_choice) {
            Some(c) => c,
            None => {
                let mut found = None;
                for i in window_end..c_len {
                    if candidate[i] == qc {
                        found = Some(i);
                        break;
                    }
                }
                found?
            }
        };

        positions.push(chosen);
        prev_pos = Some(chosen);
        search_from = chosen + 1;
    }

    Some(positions)
}

/// DP-optimal alignment, used for `q_len > 4` when `c_len <= 512`; otherwise
/// the caller should fall back to [`greedy_positions`]. Jointly maximizes
/// word-boundary + consecutive bonus while decaying through gaps, via a
/// two-state (`M` ends-in-match, `G` carries-through-gap) DP with traceback.
pub fn dp_optimal_positions(
    query: &[u8],
    candidate: &[u8],
    mask: u64,
    cfg: &EditDistanceConfig,
    buf: &mut ScoringBuffer,
) -> Option<Vec<usize>> {
    let q_len = query.len();
    let c_len = candidate.len();
    if c_len > ALIGNMENT_MAX_CLEN {
        return greedy_positions(query, candidate, mask);
    }
    if q_len == 0 || c_len == 0 {
        return None;
    }

    buf.ensure_capacity(q_len, c_len);
    let dim_c = buf.align_dim_c;
    let boundary_bonus = (cfg.word_boundary_bonus * DP_SCALE) as i32;
    let consecutive_bonus = (cfg.consecutive_bonus * DP_SCALE) as i32;
    let gap_step = (cfg.gap_penalty.cost(1) * DP_SCALE) as i32;

    for v in buf.align_m.iter_mut() {
        *v = NEG_INF;
    }
    for v in buf.align_g.iter_mut() {
        *v = NEG_INF;
    }

    let idx = |i: usize, j: usize| i * dim_c + j;

    for i in 0..q_len {
        let qc = query[i];
        let mut g_prev_col = NEG_INF;
        for j in 0..c_len {
            let base = if is_boundary_masked(candidate, mask, j) {
                boundary_bonus
            } else {
                0
            };
            let m_val = if candidate[j] == qc {
                if i == 0 {
                    Some(base)
                } else if j == 0 {
                    None
                } else {
                    let diag_m = buf.align_m[idx(i - 1, j - 1)];
                    let diag_g = buf.align_g[idx(i - 1, j - 1)];
                    let from_m = if diag_m > NEG_INF {
                        diag_m + consecutive_bonus + base
                    } else {
                        NEG_INF
                    };
                    let from_g = if diag_g > NEG_INF { diag_g + base } else { NEG_INF };
                    Some(from_m.max(from_g))
                }
            } else {
                None
            };

            if let Some(v) = m_val {
                buf.align_m[idx(i, j)] = v;
            }

            let carried = if g_prev_col > NEG_INF {
                g_prev_col - gap_step
            } else {
                NEG_INF
            };
            let g_val = carried.max(buf.align_m[idx(i, j)]);
            buf.align_g[idx(i, j)] = g_val;
            g_prev_col = g_val;
        }
    }

    let final_score = buf.align_g[idx(q_len - 1, c_len - 1)];
    if final_score <= NEG_INF {
        return None;
    }

    // Traceback, mirroring the fzy-style backtrace: walk columns right to
    // left per row, requiring a contiguous match once one is forced by a
    // consecutive-bonus transition.
    let mut positions = vec![0usize; q_len];
    let mut match_required = false;
    let mut j = c_len - 1;
    for i in (0..q_len).rev() {
        loop {
            let m_here = buf.align_m[idx(i, j)];
            if m_here > NEG_INF && (match_required || m_here == buf.align_g[idx(i, j)]) {
                match_required = i > 0
                    && j > 0
                    && buf.align_g[idx(i, j)] == buf.align_m[idx(i - 1, j - 1)] + consecutive_bonus;
                positions[i] = j;
                j = j.saturating_sub(1);
                break;
            }
            if j == 0 {
                break;
            }
            j -= 1;
        }
    }

    Some(positions)
}

/// Dispatches to the greedy or DP-optimal position finder per spec.md §4.6.
pub fn find_positions(
    query: &[u8],
    candidate: &[u8],
    mask: u64,
    cfg: &EditDistanceConfig,
    buf: &mut ScoringBuffer,
) -> Option<Vec<usize>> {
    if query.len() <= 4 || candidate.len() > ALIGNMENT_MAX_CLEN {
        greedy_positions(query, candidate, mask)
    } else {
        dp_optimal_positions(query, candidate, mask, cfg, buf)
    }
}

/// Net bonus (word-boundary + consecutive − gap penalty + first-match) over
/// a set of recovered positions, at full f64 precision (spec.md §4.6).
pub fn compute_bonus(positions: &[usize], candidate: &[u8], mask: u64, cfg: &EditDistanceConfig) -> f64 {
    let mut bonus = 0.0;
    for &p in positions {
        if is_boundary_masked(candidate, mask, p) {
            bonus += cfg.word_boundary_bonus;
        }
    }
    for w in positions.windows(2) {
        let gap = w[1].saturating_sub(w[0] + 1);
        if gap == 0 {
            bonus += cfg.consecutive_bonus;
        } else {
            bonus -= cfg.gap_penalty.cost(gap);
        }
    }
    if let Some(&first) = positions.first() {
        let ratio = (first as f64 / cfg.first_match_bonus_range).min(1.0).max(0.0);
        bonus += cfg.first_match_bonus * (1.0 - ratio);
    }
    bonus
}

/// `base = max(0, 1 - distance/q_len)`.
pub fn base_score(distance: usize, q_len: usize) -> f64 {
    if q_len == 0 {
        return 1.0;
    }
    (1.0 - distance as f64 / q_len as f64).max(0.0)
}

/// Asymptotic weighting: `weighted = max(0, 1 - (1 - base) / weight)`.
pub fn weighted_score(base: f64, weight: f64) -> f64 {
    (1.0 - (1.0 - base) / weight).max(0.0)
}

/// `(c_len - q_len) * length_penalty`, only meaningful for prefix/substring
/// paths.
pub fn length_penalty(c_len: usize, q_len: usize, length_penalty: f64) -> f64 {
    (c_len as f64 - q_len as f64) * length_penalty
}

/// Applies the final bonus cap rule: if `distance == 0`, bonuses add
/// unclamped (capped only by the overall `1.0` ceiling); otherwise bonuses
/// are capped at `0.8 * (1 - composed)` so imperfect matches can never reach
/// a perfect score through bonuses alone.
pub fn apply_bonuses(composed: f64, bonuses: f64, exact_distance: bool) -> f64 {
    if exact_distance {
        (composed + bonuses).min(1.0)
    } else {
        composed + bonuses.min(0.8 * (1.0 - composed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditDistanceConfig;

    #[test]
    fn greedy_finds_simple_subsequence() {
        let positions = greedy_positions(b"gubi", b"getUserById", 0).unwrap();
        assert_eq!(positions.len(), 4);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn greedy_prefers_consecutive_over_boundary() {
        // after placing 'a' at index 0, the next char 'a' should prefer the
        // immediately-following byte if it matches
        let positions = greedy_positions(b"aa", b"aab", 0).unwrap();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn greedy_returns_none_when_unplaceable() {
        assert!(greedy_positions(b"xyz", b"abc", 0).is_none());
    }

    #[test]
    fn base_and_weighted_scores() {
        assert_eq!(base_score(0, 4), 1.0);
        assert_eq!(base_score(2, 4), 0.5);
        let w = weighted_score(0.5, 1.5);
        assert!(w > 0.0 && w < 1.0);
    }

    #[test]
    fn bonus_caps_for_imperfect_matches() {
        let composed = 0.9;
        let capped = apply_bonuses(composed, 1.0, false);
        assert!(capped < 1.0);
        let exact = apply_bonuses(composed, 1.0, true);
        assert_eq!(exact, 1.0);
    }

    #[test]
    fn dp_optimal_positions_matches_greedy_len() {
        let cfg = EditDistanceConfig::default();
        let mut buf = ScoringBuffer::new();
        let positions = dp_optimal_positions(b"hello world", b"hello there world", 0, &cfg, &mut buf);
        assert!(positions.is_some());
        assert_eq!(positions.unwrap().len(), 11);
    }
}
