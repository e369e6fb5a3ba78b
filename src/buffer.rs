//! Caller-owned scratch buffer: every DP row, the lowercased candidate, the
//! bonus array, match positions, and the alignment-path state live here so a
//! hot-path `score()` call never allocates. Thread-confined by construction:
//! `ScoringBuffer` is not `Clone`, so the borrow checker rejects sharing one
//! across concurrent `score()` calls (spec.md §5, §9).

const SHRINK_CHECK_INTERVAL: usize = 128;
const CANDIDATE_FLOOR: usize = 128;
const QUERY_FLOOR: usize = 64;
const SW_FLOOR: usize = 64;
/// Alignment DP falls back to greedy positions above this candidate length
/// (spec.md §4.6).
pub const ALIGNMENT_MAX_CLEN: usize = 512;

#[derive(Debug, Default)]
pub struct ScoringBuffer {
    /// Three rolling rows of `qLen + 1` i32s for the Damerau-Levenshtein DP.
    pub(crate) edit_rows: [Vec<i32>; 3],
    /// Lowercased, compressed candidate bytes.
    pub(crate) candidate_bytes: Vec<u8>,
    /// Case-preserving compressed candidate bytes, index-aligned with
    /// `candidate_bytes`; used only to compute the word-boundary mask.
    pub(crate) candidate_original: Vec<u8>,
    /// Per-byte i32 bonus, parallel to `candidate_bytes` (Smith-Waterman).
    pub(crate) candidate_bonus: Vec<i32>,
    /// Recovered match positions (into the compressed candidate).
    pub(crate) match_positions: Vec<usize>,
    /// DP-optimal alignment matrices, flattened row-major `[q_len][c_len]`,
    /// capped at `ALIGNMENT_MAX_CLEN` per dimension.
    pub(crate) align_m: Vec<i32>,
    pub(crate) align_g: Vec<i32>,
    pub(crate) align_dim_q: usize,
    pub(crate) align_dim_c: usize,
    /// First byte of each detected word, for the acronym matcher.
    pub(crate) word_initials: Vec<u8>,
    /// Three rows of `qLen` i32s for the Smith-Waterman DP: match, gap,
    /// carried-bonus.
    pub(crate) sw_rows: [Vec<i32>; 3],

    high_water_q: usize,
    high_water_c: usize,
    high_water_sw: usize,
    calls_since_check: usize,
}

impl ScoringBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows buffers to accommodate a query of length `q_len` and a
    /// candidate whose raw byte length is `c_len_hint` (compressed length is
    /// always <= raw length, so this is a safe upper bound), recording the
    /// high-water marks used by the shrink policy.
    pub(crate) fn ensure_capacity(&mut self, q_len: usize, c_len_hint: usize) {
        self.high_water_q = self.high_water_q.max(q_len);
        self.high_water_c = self.high_water_c.max(c_len_hint);
        self.high_water_sw = self.high_water_sw.max(q_len);

        for row in &mut self.edit_rows {
            if row.len() < q_len + 1 {
                row.resize(q_len + 1, 0);
            }
        }
        if self.candidate_bytes.capacity() < c_len_hint {
            self.candidate_bytes.reserve(c_len_hint - self.candidate_bytes.capacity());
        }
        if self.candidate_original.capacity() < c_len_hint {
            self.candidate_original.reserve(c_len_hint - self.candidate_original.capacity());
        }
        if self.candidate_bonus.len() < c_len_hint {
            self.candidate_bonus.resize(c_len_hint, 0);
        }
        if self.match_positions.capacity() < q_len {
            self.match_positions.reserve(q_len - self.match_positions.capacity());
        }
        if self.word_initials.capacity() < q_len.min(64) {
            self.word_initials.reserve(q_len.min(64) - self.word_initials.capacity());
        }
        for row in &mut self.sw_rows {
            if row.len() < q_len {
                row.resize(q_len, 0);
            }
        }

        let dim_q = q_len.min(ALIGNMENT_MAX_CLEN);
        let dim_c = c_len_hint.min(ALIGNMENT_MAX_CLEN);
        if dim_q * dim_c > self.align_m.len() {
            self.align_m.resize(dim_q * dim_c, 0);
            self.align_g.resize(dim_q * dim_c, 0);
        }
        self.align_dim_q = dim_q;
        self.align_dim_c = dim_c;
    }

    /// Runs the periodic shrink check (spec.md §3 shrink policy): every
    /// `SHRINK_CHECK_INTERVAL` calls, reallocate any buffer whose capacity
    /// exceeds `4 * high_water` down to `max(floor, 2 * high_water)`, then
    /// reset the high-water marks.
    pub(crate) fn maybe_shrink(&mut self) {
        self.calls_since_check += 1;
        if self.calls_since_check < SHRINK_CHECK_INTERVAL {
            return;
        }
        self.calls_since_check = 0;

        if self.candidate_bytes.capacity() > 4 * self.high_water_c.max(1) {
            let target = (2 * self.high_water_c).max(CANDIDATE_FLOOR);
            self.candidate_bytes = Vec::with_capacity(target);
            self.candidate_original = Vec::with_capacity(target);
            self.candidate_bonus = vec![0; target.max(self.candidate_bonus.len().min(target))];
            self.candidate_bonus.truncate(target);
        }
        for row in &mut self.edit_rows {
            if row.len() > 4 * self.high_water_q.max(1) {
                let target = (2 * self.high_water_q).max(QUERY_FLOOR);
                row.resize(target + 1, 0);
                row.shrink_to_fit();
            }
        }
        if self.match_positions.capacity() > 4 * self.high_water_q.max(1) {
            let target = (2 * self.high_water_q).max(QUERY_FLOOR);
            self.match_positions = Vec::with_capacity(target);
        }
        for row in &mut self.sw_rows {
            if row.len() > 4 * self.high_water_sw.max(1) {
                let target = (2 * self.high_water_sw).max(SW_FLOOR);
                row.resize(target, 0);
                row.shrink_to_fit();
            }
        }

        self.high_water_q = 0;
        self.high_water_c = 0;
        self.high_water_sw = 0;
    }

    #[inline]
    pub(crate) fn align_index(&self, i: usize, j: usize) -> usize {
        i * self.align_dim_c + j
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_on_demand() {
        let mut buf = ScoringBuffer::new();
        buf.ensure_capacity(10, 50);
        assert!(buf.edit_rows[0].len() >= 11);
        assert!(buf.candidate_bonus.len() >= 50);
        assert!(buf.candidate_original.capacity() >= 50);
    }

    #[test]
    fn shrink_resets_after_interval() {
        let mut buf = ScoringBuffer::new();
        buf.ensure_capacity(1000, 1000);
        for _ in 0..SHRINK_CHECK_INTERVAL {
            buf.ensure_capacity(2, 2);
            buf.maybe_shrink();
        }
        // after repeatedly scoring tiny inputs, the oversized buffers shrink
        assert!(buf.edit_rows[0].len() < 1001);
    }
}
