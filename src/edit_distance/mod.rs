//! Restricted Damerau-Levenshtein (Optimal String Alignment) core: prefix
//! and substring distance variants sharing one three-rolling-row DP with
//! row-minimum pruning (spec.md §4.5).

pub mod bonus;
pub mod pipeline;

use crate::buffer::ScoringBuffer;

/// Best distance matching the full `query` against any *prefix* of
/// `candidate` (trailing candidate bytes are free). `None` if the minimum
/// possible cost exceeds `max_edit_distance`.
pub fn prefix_distance(
    query: &[u8],
    candidate: &[u8],
    max_edit_distance: usize,
    buf: &mut ScoringBuffer,
) -> Option<usize> {
    restricted_dl(query, candidate, max_edit_distance, buf, false)
}

/// Best distance matching the full `query` against any contiguous *window*
/// of `candidate` (both leading and trailing candidate bytes are free).
pub fn substring_distance(
    query: &[u8],
    candidate: &[u8],
    max_edit_distance: usize,
    buf: &mut ScoringBuffer,
) -> Option<usize> {
    restricted_dl(query, candidate, max_edit_distance, buf, true)
}

fn restricted_dl(
    query: &[u8],
    candidate: &[u8],
    max_edit_distance: usize,
    buf: &mut ScoringBuffer,
    free_start: bool,
) -> Option<usize> {
    let q_len = query.len();
    let c_len = candidate.len();

    if q_len == 0 {
        return Some(0);
    }

    buf.ensure_capacity(q_len, c_len);
    let mut rows = [
        std::mem::take(&mut buf.edit_rows[0]),
        std::mem::take(&mut buf.edit_rows[1]),
        std::mem::take(&mut buf.edit_rows[2]),
    ];
    for row in &mut rows {
        if row.len() < q_len + 1 {
            row.resize(q_len + 1, 0);
        }
    }

    // row_prev1 represents i = 0: dp[0][j] = j (spec.md §4.5).
    for j in 0..=q_len {
        rows[0][j] = j as i32;
    }
    let mut best = q_len as i32;

    // Rotate through three owned row buffers to support the transposition
    // lookup at dp[i-2][j-2] without re-allocating each iteration.
    let mut idx_prev2 = 1usize; // unused until i >= 2
    let mut idx_prev1 = 0usize;
    let mut idx_cur = 2usize;
    let mut aborted = false;

    for i in 1..=c_len {
        {
            let cur_init = if free_start { 0 } else { i as i32 };
            rows[idx_cur][0] = cur_init;
        }
        let cand_byte = candidate[i - 1];

        for j in 1..=q_len {
            let cost_sub = if cand_byte == query[j - 1] { 0 } else { 1 };
            let diag = rows[idx_prev1][j - 1] + cost_sub;
            let del = rows[idx_prev1][j] + 1;
            let ins = rows[idx_cur][j - 1] + 1;
            let mut val = diag.min(del).min(ins);

            if i >= 2 && j >= 2 && cand_byte == query[j - 2] && candidate[i - 2] == query[j - 1] {
                let transposition = rows[idx_prev2][j - 2] + 1;
                val = val.min(transposition);
            }

            rows[idx_cur][j] = val;
        }

        let row_min = rows[idx_cur][..=q_len].iter().copied().min().unwrap_or(0);
        if row_min > max_edit_distance as i32 {
            aborted = true;
            break;
        }

        best = best.min(rows[idx_cur][q_len]);

        // Rotate: prev2 <- prev1, prev1 <- cur, cur <- (old prev2, reused)
        let tmp = idx_prev2;
        idx_prev2 = idx_prev1;
        idx_prev1 = idx_cur;
        idx_cur = tmp;
    }

    let [a, b, c] = rows;
    buf.edit_rows[0] = a;
    buf.edit_rows[1] = b;
    buf.edit_rows[2] = c;

    if aborted {
        return None;
    }
    if best <= max_edit_distance as i32 {
        Some(best as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf() -> ScoringBuffer {
        ScoringBuffer::new()
    }

    #[test]
    fn identical_strings_zero_distance() {
        let mut b = buf();
        assert_eq!(prefix_distance(b"abc", b"abc", 2, &mut b), Some(0));
        assert_eq!(substring_distance(b"abc", b"abc", 2, &mut b), Some(0));
    }

    #[test]
    fn empty_query_is_zero_distance() {
        let mut b = buf();
        assert_eq!(prefix_distance(b"", b"abc", 2, &mut b), Some(0));
    }

    #[test]
    fn single_char_query_no_panic() {
        let mut b = buf();
        assert_eq!(prefix_distance(b"a", b"a", 1, &mut b), Some(0));
        assert_eq!(prefix_distance(b"a", b"b", 1, &mut b), Some(1));
        assert_eq!(substring_distance(b"a", b"xax", 1, &mut b), Some(0));
    }

    #[test]
    fn transposition_counts_as_one_edit() {
        let mut b = buf();
        // "teh" -> "the" via adjacent transposition
        assert_eq!(prefix_distance(b"teh", b"the", 2, &mut b), Some(1));
    }

    #[test]
    fn prefix_allows_trailing_candidate_bytes() {
        let mut b = buf();
        assert_eq!(prefix_distance(b"hello", b"hello world", 2, &mut b), Some(0));
    }

    #[test]
    fn substring_allows_leading_and_trailing_bytes() {
        let mut b = buf();
        assert_eq!(substring_distance(b"bar", b"foobarbaz", 2, &mut b), Some(0));
    }

    #[test]
    fn exceeding_bound_returns_none() {
        let mut b = buf();
        assert_eq!(prefix_distance(b"completely", b"different", 2, &mut b), None);
    }

    #[test]
    fn symmetry_for_same_length_strings() {
        let mut b = buf();
        let d1 = prefix_distance(b"abcd", b"abdc", 3, &mut b);
        let d2 = prefix_distance(b"abdc", b"abcd", 3, &mut b);
        assert_eq!(d1, d2);
    }
}
