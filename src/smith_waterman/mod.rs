//! Integer Smith-Waterman local alignment core (spec.md §4.9), grounded on
//! the reference crate's scalar `smith_waterman` function but retargeted to
//! this spec's bonus vocabulary (whitespace/delimiter/camelCase/boundary
//! instead of prefix/offset-prefix/delimiter/capitalization).

pub mod pipeline;

use crate::boundary::is_boundary;
use crate::bytes::{is_ascii_lower, is_ascii_upper, is_delimiter, is_whitespace};
use crate::buffer::ScoringBuffer;
use crate::config::SmithWatermanConfig;

/// Per-position starting bonus for a match landing at candidate byte `j`,
/// computed from the *original-case* compressed candidate so camelCase and
/// whitespace/delimiter context survive case folding.
fn bonus_for_position(original_case: &[u8], j: usize, cfg: &SmithWatermanConfig) -> i32 {
    if j == 0 {
        return cfg.bonus_boundary_whitespace;
    }
    let prev = original_case[j - 1];
    let cur = original_case[j];
    if is_whitespace(prev) {
        cfg.bonus_boundary_whitespace
    } else if is_delimiter(prev) || prev == b'_' {
        cfg.bonus_boundary_delimiter
    } else if is_ascii_lower(prev) && is_ascii_upper(cur) {
        cfg.bonus_camel_case
    } else if is_boundary(original_case, j) {
        cfg.bonus_boundary
    } else {
        0
    }
}

/// Precomputes the per-position bonus array over the whole (original-case)
/// candidate.
pub fn precompute_bonus(original_case: &[u8], cfg: &SmithWatermanConfig, out: &mut Vec<i32>) {
    out.clear();
    out.reserve(original_case.len());
    for j in 0..original_case.len() {
        out.push(bonus_for_position(original_case, j, cfg));
    }
}

/// Runs the local-alignment DP of `query` (lowercased) against `candidate`
/// (lowercased), using the precomputed `position_bonus` array (parallel to
/// `candidate`), and returns the best score that fully aligns every query
/// byte (spec.md §4.9). Three logical rows of `qLen` i32s — `M` (match), `G`
/// (gap), `B` (carried bonus) — live in `buf.sw_rows`; `i` walks the
/// candidate, `j` walks the query, and the diagonal `(i-1, j-1)` needed for
/// `M`/`B` is carried as three scalars rather than kept as a second row,
/// since only one row back is ever read. Only the final query column
/// (`j == qLen - 1`) contributes to the result: a match that never consumes
/// the whole query scores 0, not a partial/prefix score.
pub fn align(query: &[u8], candidate: &[u8], position_bonus: &[i32], cfg: &SmithWatermanConfig, buf: &mut ScoringBuffer) -> i32 {
    let q_len = query.len();
    let c_len = candidate.len();
    if q_len == 0 || c_len == 0 {
        return 0;
    }

    buf.ensure_capacity(q_len, c_len);
    let mut rows = [
        std::mem::take(&mut buf.sw_rows[0]),
        std::mem::take(&mut buf.sw_rows[1]),
        std::mem::take(&mut buf.sw_rows[2]),
    ];
    for row in &mut rows {
        if row.len() < q_len {
            row.resize(q_len, 0);
        }
        for v in &mut row[..q_len] {
            *v = 0;
        }
    }

    let mut best = 0i32;

    for i in 0..c_len {
        let cand_byte = candidate[i];
        let bonus_i = position_bonus[i];

        // Diagonal (i-1, j-1), carried forward one column at a time; 0 at
        // j == 0 since there is no column -1.
        let mut diag_m = 0i32;
        let mut diag_g = 0i32;
        let mut diag_b = 0i32;

        for j in 0..q_len {
            let old_m = rows[0][j];
            let old_g = rows[1][j];
            let old_b = rows[2][j];

            let new_g = (old_m - cfg.penalty_gap_start).max(old_g - cfg.penalty_gap_extend).max(0);

            let (new_m, new_b) = if cand_byte == query[j] {
                if j == 0 {
                    (cfg.score_match + bonus_i * cfg.bonus_first_char_multiplier, bonus_i)
                } else {
                    let mut carried = diag_b.max(cfg.bonus_consecutive);
                    if bonus_i >= cfg.bonus_boundary && bonus_i > carried {
                        carried = bonus_i;
                    }
                    let eff = carried.max(bonus_i);

                    let from_cons = (diag_m > 0).then(|| diag_m + cfg.score_match + eff);
                    let from_gap = (diag_g > 0).then(|| diag_g + cfg.score_match + bonus_i);

                    match (from_cons, from_gap) {
                        (Some(cons), Some(gap)) if cons >= gap => (cons, eff),
                        (Some(_), Some(gap)) => (gap, bonus_i),
                        (Some(cons), None) => (cons, eff),
                        (None, Some(gap)) => (gap, bonus_i),
                        (None, None) => (0, 0),
                    }
                }
            } else {
                (0, 0)
            };

            rows[0][j] = new_m;
            rows[1][j] = new_g;
            rows[2][j] = new_b;

            diag_m = old_m;
            diag_g = old_g;
            diag_b = old_b;
        }

        best = best.max(rows[0][q_len - 1]).max(rows[1][q_len - 1]);
    }

    let [a, b, c] = rows;
    buf.sw_rows[0] = a;
    buf.sw_rows[1] = b;
    buf.sw_rows[2] = c;

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::compress;
    use crate::config::SmithWatermanConfig;

    fn run(query: &str, candidate: &str) -> i32 {
        let cfg = SmithWatermanConfig::default();
        let lowercased = compress(candidate.as_bytes());
        let mut bonus = Vec::new();
        precompute_bonus(candidate.as_bytes(), &cfg, &mut bonus);
        let q = compress(query.as_bytes());
        let mut buf = ScoringBuffer::new();
        align(&q, &lowercased, &bonus, &cfg, &mut buf)
    }

    #[test]
    fn prefix_scores_higher_than_mid_word() {
        let prefix = run("a", "abc");
        let mid = run("b", "abc");
        assert!(prefix > mid);
    }

    #[test]
    fn contiguous_beats_scattered() {
        let good = run("sortedmap", "sortedarraymap");
        let bad = run("sortedmap", "lightsourceteamapikeys");
        assert!(good > bad);
    }

    #[test]
    fn camel_case_boundary_scores_bonus() {
        let camel = run("d", "forDist");
        let plain = run("d", "fordist");
        assert!(camel > plain);
    }

    #[test]
    fn no_match_scores_zero() {
        assert_eq!(run("zzz", "abc"), 0);
    }

    #[test]
    fn affine_gap_penalizes_extension_more_gently_than_open() {
        let one_gap = run("test", "uterst");
        let two_gap = run("test", "uterrst");
        assert!(one_gap > two_gap);
    }
}
