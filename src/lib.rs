pub mod answer;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod documents;
pub mod error;
pub mod extract;
pub mod logging;
pub mod session;
pub mod vector;

pub use answer::{AnswerCompositor, Retriever, compose, restore_order};
pub use assistant::{Answer, Assistant, UploadProgress, UploadSummary};
pub use config::Settings;
pub use documents::{Chunk, ChunkSequence, SegmentProfile, WindowSegmenter, segment};
pub use error::{QaError, QaResult};
pub use session::{Session, SessionStore};
pub use vector::{EmbeddingGenerator, FastEmbedGenerator, FlatL2Index, VectorDimension};
