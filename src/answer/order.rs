//! Putting retrieved chunks back into document order.
//!
//! Retrieval ranks chunks by relevance. Answers read better when the
//! passages appear in the order the document presents them.

use std::collections::HashMap;

use crate::documents::{Chunk, ChunkSequence};

/// Sort key for chunks that cannot be found in the sequence.
const UNMATCHED: usize = usize::MAX;

/// Sort `retrieved` ascending by chunk index.
///
/// A chunk is matched by its index; if that index is out of range, or the
/// sequence holds different text there, it is sorted after all matched
/// chunks. The sort is stable, so equal keys keep their retrieval order.
pub fn restore_order(mut retrieved: Vec<Chunk>, full_sequence: &ChunkSequence) -> Vec<Chunk> {
    retrieved.sort_by_key(|chunk| match full_sequence.get(chunk.index) {
        Some(stored) if stored.text == chunk.text => chunk.index,
        _ => UNMATCHED,
    });
    retrieved
}

/// Text-keyed variant for callers that only kept chunk texts.
///
/// Chunks are identified by exact text. If the sequence holds the same text
/// more than once, the last occurrence decides the position. Prefer
/// [`restore_order`], which cannot confuse two chunks with equal text.
pub fn restore_order_by_text(mut retrieved: Vec<String>, full_sequence: &ChunkSequence) -> Vec<String> {
    let positions: HashMap<&str, usize> = full_sequence
        .iter()
        .map(|chunk| (chunk.text.as_str(), chunk.index))
        .collect();

    retrieved.sort_by_key(|text| positions.get(text.as_str()).copied().unwrap_or(UNMATCHED));
    retrieved
}
