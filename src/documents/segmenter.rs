//! Fixed-window document segmentation.
//!
//! The document is cut into consecutive, non-overlapping windows of
//! `window_chars` characters. Each window is trimmed and kept only if it is
//! longer than the profile threshold. Kept windows are numbered from zero in
//! source order, so dropped windows leave no gaps.

use super::config::SegmentProfile;
use super::types::ChunkSequence;

/// Trait for document segmentation strategies.
pub trait Segmenter: Send + Sync {
    /// Split document text into a chunk sequence.
    fn segment(&self, text: &str, profile: &SegmentProfile) -> ChunkSequence;
}

/// Non-overlapping fixed-size character windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowSegmenter;

impl WindowSegmenter {
    /// Create a new window segmenter.
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for WindowSegmenter {
    fn segment(&self, text: &str, profile: &SegmentProfile) -> ChunkSequence {
        let window_chars = profile.window_chars.max(1);
        let mut dropped = 0usize;

        let kept: Vec<&str> = char_windows(text, window_chars)
            .filter_map(|window| {
                let trimmed = window.trim();
                if trimmed.chars().count() > profile.min_chars {
                    Some(trimmed)
                } else {
                    dropped += 1;
                    None
                }
            })
            .collect();

        tracing::debug!(
            target: "segmenter",
            "segmented {} chars into {} chunks ({} windows dropped, window={}, min={})",
            text.chars().count(),
            kept.len(),
            dropped,
            window_chars,
            profile.min_chars
        );

        ChunkSequence::from_texts(kept)
    }
}

/// Segment `text` with the interactive threshold and a custom window size.
pub fn segment(text: &str, size: usize) -> ChunkSequence {
    let profile = SegmentProfile::interactive().with_window(size);
    WindowSegmenter.segment(text, &profile)
}

/// Consecutive slices of at most `size` characters, always on char boundaries.
fn char_windows(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let starts: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .step_by(size)
        .chain(std::iter::once(text.len()))
        .collect();

    (0..starts.len().saturating_sub(1)).map(move |i| &text[starts[i]..starts[i + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(window_chars: usize, min_chars: usize) -> SegmentProfile {
        SegmentProfile {
            window_chars,
            min_chars,
        }
    }

    #[test]
    fn test_empty_content() {
        let chunks = WindowSegmenter.segment("", &SegmentProfile::interactive());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_text_below_threshold_is_dropped() {
        for len in 0..40 {
            let text = "x".repeat(len);
            assert!(segment(&text, 350).is_empty(), "len {len} should be dropped");
        }
        // Exactly at the threshold is still dropped, one more is kept
        assert!(segment(&"x".repeat(40), 350).is_empty());
        assert_eq!(segment(&"x".repeat(41), 350).len(), 1);
    }

    #[test]
    fn test_short_input_yields_single_chunk() {
        let text = "  A single paragraph that is comfortably longer than forty characters.  ";
        let chunks = segment(text, 350);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text.trim());
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn test_windows_do_not_overlap() {
        let text = "abcdefghij".repeat(3);
        let chunks = WindowSegmenter.segment(&text, &profile(10, 0));
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert_eq!(chunk.text, "abcdefghij");
        }
    }

    #[test]
    fn test_dropped_windows_leave_no_gaps() {
        // window 2 is whitespace only, window 4 is too short after trimming
        let text = format!(
            "{}{}{}{}",
            "a".repeat(20),
            " ".repeat(20),
            "b".repeat(20),
            format!("{}cc ", " ".repeat(17))
        );
        let chunks = WindowSegmenter.segment(&text, &profile(20, 5));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "a".repeat(20));
        assert_eq!(chunks[1].text, "b".repeat(20));
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_indices_contiguous_for_varied_input() {
        let text = "Lorem ipsum dolor sit amet.\n\n   \n".repeat(50);
        for window in [7, 13, 40, 100, 350] {
            let chunks = WindowSegmenter.segment(&text, &profile(window, 3));
            for (expected, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index, expected);
            }
        }
    }

    #[test]
    fn test_windows_count_characters_not_bytes() {
        let text = "é".repeat(25);
        let chunks = WindowSegmenter.segment(&text, &profile(10, 0));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].char_count(), 10);
        assert_eq!(chunks[2].char_count(), 5);
    }

    #[test]
    fn test_export_profile_keeps_short_windows() {
        let text = format!("{}{}", "x".repeat(300), "tail");
        let export = WindowSegmenter.segment(&text, &SegmentProfile::export());
        let interactive =
            WindowSegmenter.segment(&text, &SegmentProfile::interactive().with_window(300));
        assert_eq!(export.len(), 2);
        assert_eq!(export[1].text, "tail");
        assert_eq!(interactive.len(), 1);
    }
}
