//! Turning ordered chunks into the final answer text.

use indexmap::IndexSet;

use crate::documents::Chunk;

/// Lines shorter than this are dropped by default.
pub const DEFAULT_MIN_LINE_CHARS: usize = 4;

/// Joins chunks and cleans up the seams left by fixed-window segmentation.
#[derive(Debug, Clone, Copy)]
pub struct AnswerCompositor {
    min_line_chars: usize,
}

impl Default for AnswerCompositor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LINE_CHARS)
    }
}

impl AnswerCompositor {
    pub fn new(min_line_chars: usize) -> Self {
        Self { min_line_chars }
    }

    /// Compose the answer for chunks already in document order.
    ///
    /// Lines are trimmed; short lines are dropped; numbered items get a
    /// blank line before them; exact duplicate lines are kept once, at
    /// their first occurrence. An empty string means "no answer".
    pub fn compose(&self, ordered_chunks: &[Chunk]) -> String {
        let joined = ordered_chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut lines: IndexSet<String> = IndexSet::new();

        for line in joined.split('\n') {
            let line = line.trim();

            if line.chars().count() < self.min_line_chars {
                continue;
            }

            let line = if looks_like_numbered_item(line) {
                format!("\n{line}")
            } else {
                line.to_string()
            };

            lines.insert(line);
        }

        lines
            .into_iter()
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

/// Compose with the default line threshold.
pub fn compose(ordered_chunks: &[Chunk]) -> String {
    AnswerCompositor::default().compose(ordered_chunks)
}

/// Starts with a numeric character and has a `.` within the first three
/// characters.
///
/// Any Unicode digit counts, so "٣. النتائج" and "３. Results" match too.
/// Approximate: "3. Results" matches, and so do "3.5 Results" and "1.30 pm".
/// It only decides where paragraph breaks go.
fn looks_like_numbered_item(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_numeric) && line.chars().take(3).any(|c| c == '.')
}
