//! Flat-file chunk export.
//!
//! Format, repeated per chunk in index order:
//!
//! ```text
//! [CHUNK {i}]
//! {trimmed text}
//!
//! ```
//!
//! Existing exports are consumed by other tooling, so the layout is fixed
//! byte-for-byte.

use std::io::{self, Write};

use super::types::ChunkSequence;

/// Default output file name for exports.
pub const DEFAULT_EXPORT_FILE: &str = "chunks.txt";

/// Write every chunk of `chunks` to `writer` in export format.
pub fn write_chunks<W: Write>(chunks: &ChunkSequence, mut writer: W) -> io::Result<usize> {
    for chunk in chunks {
        write!(writer, "[CHUNK {}]\n{}\n\n", chunk.index, chunk.text.trim())?;
    }
    writer.flush()?;
    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(chunks: &ChunkSequence) -> String {
        let mut out = Vec::new();
        let count = write_chunks(chunks, &mut out).unwrap();
        assert_eq!(count, chunks.len());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_export_format_is_exact() {
        let chunks = ChunkSequence::from_texts(["first chunk", "second chunk"]);
        assert_eq!(
            render(&chunks),
            "[CHUNK 0]\nfirst chunk\n\n[CHUNK 1]\nsecond chunk\n\n"
        );
    }

    #[test]
    fn test_export_empty_sequence() {
        assert_eq!(render(&ChunkSequence::default()), "");
    }
}
