//! Core types for segmented documents.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A segment of the loaded document.
///
/// `index` is the chunk's position in the full [`ChunkSequence`] and is assigned
/// exactly once, by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the document's chunk sequence.
    pub index: usize,

    /// Trimmed text content of this chunk.
    pub text: String,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Get character count.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// The complete, ordered chunk sequence of one document.
///
/// Indices are always `0..len` with no gaps. The only way to build one is
/// through [`ChunkSequence::from_texts`], which assigns them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkSequence {
    chunks: Vec<Chunk>,
}

impl ChunkSequence {
    /// Build a sequence from kept chunk texts in document order.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(index, text))
            .collect();
        Self { chunks }
    }

    /// Chunk at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Chunk texts in document order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|c| c.text.as_str())
    }

    /// Total characters across all chunks.
    pub fn total_chars(&self) -> usize {
        self.chunks.iter().map(Chunk::char_count).sum()
    }

    /// Consume the sequence, returning the chunks.
    pub fn into_inner(self) -> Vec<Chunk> {
        self.chunks
    }
}

impl Deref for ChunkSequence {
    type Target = [Chunk];

    fn deref(&self) -> &Self::Target {
        &self.chunks
    }
}

impl<'a> IntoIterator for &'a ChunkSequence {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
