//! Document segmentation and chunk export.
//!
//! This module provides:
//! - The chunk data model (`Chunk`, `ChunkSequence`)
//! - Fixed-window segmentation with named profiles
//! - The flat-file `[CHUNK i]` export format

pub mod config;
pub mod export;
pub mod segmenter;
pub mod types;

pub use config::{ProfileName, SegmentProfile, SegmentationConfig};
pub use export::{DEFAULT_EXPORT_FILE, write_chunks};
pub use segmenter::{Segmenter, WindowSegmenter, segment};
pub use types::{Chunk, ChunkSequence};
