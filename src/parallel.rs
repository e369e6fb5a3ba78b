//! Optional thread-scoped parallel convenience layer (spec.md §4.13),
//! grounded on the reference crate's
//! `one_shot::parallel::match_list_parallel`: an atomic chunk-claim over
//! `std::thread::scope`, each worker building an independently sorted
//! `Vec<MatchResult>`, merged back together with `itertools::kmerge`. Gated
//! behind the `parallel` feature since it pulls in `itertools`.

use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use crate::{FuzzyMatcher, MatchResult, ScoringBuffer};

const CHUNK_SIZE: usize = 256;

impl FuzzyMatcher {
    /// Scores `candidates` against `query` across `num_threads` worker
    /// threads, sorts descending by score (ties broken by ascending
    /// index), and truncates to `limit`.
    pub fn top_matches_parallel<S: AsRef<str> + Sync>(
        &self,
        query: &str,
        candidates: &[S],
        limit: usize,
        num_threads: usize,
    ) -> Vec<MatchResult> {
        let mut out = self.all_matches_parallel(query, candidates, num_threads);
        out.sort_unstable();
        out.truncate(limit);
        out
    }

    /// Scores every candidate against `query` across `num_threads` worker
    /// threads. Each thread claims fixed-size chunks of `candidates` from a
    /// shared atomic counter (no work-stealing queue needed: chunks are
    /// cheap and roughly uniform), scores them with its own
    /// [`ScoringBuffer`], and sorts its partial results before the final
    /// k-way merge.
    pub fn all_matches_parallel<S: AsRef<str> + Sync>(
        &self,
        query: &str,
        candidates: &[S],
        num_threads: usize,
    ) -> Vec<MatchResult> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let num_threads = num_threads.max(1).min(candidates.len());
        if num_threads == 1 {
            return self.all_matches(query, candidates);
        }

        let prepared = self.prepare(query);
        let next_chunk = AtomicUsize::new(0);

        let partials: Vec<Vec<MatchResult>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..num_threads)
                .map(|_| {
                    let prepared = &prepared;
                    let next_chunk = &next_chunk;
                    scope.spawn(move || {
                        let mut buf = ScoringBuffer::new();
                        let mut local = Vec::new();
                        loop {
                            let chunk_idx = next_chunk.fetch_add(1, AtomicOrdering::Relaxed);
                            let start = chunk_idx * CHUNK_SIZE;
                            if start >= candidates.len() {
                                break;
                            }
                            let end = (start + CHUNK_SIZE).min(candidates.len());
                            for index in start..end {
                                if let Some(m) = self.score(candidates[index].as_ref().as_bytes(), prepared, &mut buf) {
                                    local.push(MatchResult {
                                        index: index as u32,
                                        score: m.score,
                                        kind: m.kind,
                                    });
                                }
                            }
                        }
                        local.sort_unstable();
                        local
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("worker thread panicked")).collect()
        });

        itertools::kmerge(partials).collect()
    }
}
