//! Acronym matcher (spec.md §4.10): treats each word's initial letter as a
//! character and checks whether the query is a subsequence of the resulting
//! initials string. Competes as a fallback alongside the primary pipelines
//! rather than a single line of computation, since it can occasionally beat
//! a weak subsequence score on abbreviation-style queries like `gsi` against
//! `getStorageItem`.

use crate::boundary::is_boundary;

/// Gate per spec.md §4.10: the query must be short (`2..=8` chars) and the
/// candidate must actually look word-like (at least three words, and at
/// least as many words as query characters).
pub fn eligible(q_len: usize, word_count: usize) -> bool {
    (2..=8).contains(&q_len) && word_count >= 3 && word_count >= q_len
}

/// Collects the first lowercased byte of every word in `lowercased`
/// (case-folded candidate), using the *original-case* `original` bytes
/// (index-aligned with `lowercased`) to find word boundaries.
pub fn word_initials(lowercased: &[u8], original: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..lowercased.len() {
        if is_boundary(original, i) {
            out.push(lowercased[i]);
        }
    }
    out
}

/// True if every byte of `query` appears in `initials`, in order (not
/// necessarily contiguous).
fn is_subsequence(query: &[u8], initials: &[u8]) -> bool {
    let mut it = initials.iter();
    query.iter().all(|qc| it.any(|ic| ic == qc))
}

/// Scores an acronym match per spec.md §4.10:
/// `(0.55 + 0.4 * qLen / wordCount) * acronymWeight`. Returns `None` if the
/// query is not a subsequence of the word initials.
pub fn score(query: &[u8], initials: &[u8], word_count: usize, acronym_weight: f64) -> Option<f64> {
    if !is_subsequence(query, initials) {
        return None;
    }
    let q_len = query.len() as f64;
    Some((0.55 + 0.4 * q_len / word_count as f64) * acronym_weight)
}
