//! Chunk planning for bulk provider calls.
//!
//! Splits an identifier set into consecutive chunks no larger than the
//! provider's per-call cap, preserving input order.

use std::collections::HashSet;

use crate::provider::{VideoId, MAX_IDS_PER_CALL};

/// Effective chunk size: at least 1, never above the provider cap.
pub fn effective_chunk_size(max_per_chunk: usize) -> usize {
    max_per_chunk.clamp(1, MAX_IDS_PER_CALL)
}

/// Builds the chunk plan for `ids`.
///
/// Every chunk but the last holds exactly `effective_chunk_size(max_per_chunk)`
/// ids. Returns an empty vec for empty input.
pub fn plan_chunks(ids: &[VideoId], max_per_chunk: usize) -> Vec<&[VideoId]> {
    ids.chunks(effective_chunk_size(max_per_chunk)).collect()
}

/// Number of chunks `plan_chunks` produces for `total` ids (ceil division).
pub fn chunk_count(total: usize, max_per_chunk: usize) -> usize {
    total.div_ceil(effective_chunk_size(max_per_chunk))
}

/// Drop blank ids and repeats, keeping the first occurrence of each.
pub fn dedup_ids<I, S>(ids: I) -> Vec<VideoId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        let id = id.as_ref().trim();
        if id.is_empty() || !seen.insert(id.to_string()) {
            continue;
        }
        out.push(id.to_string());
    }
    out
}
