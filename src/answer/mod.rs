//! From question to answer text.
//!
//! - `retriever`: embed the question and pull the nearest chunks
//! - `order`: put retrieved chunks back in document order
//! - `compose`: join them and clean up segmentation seams

pub mod compose;
pub mod order;
pub mod retriever;

pub use compose::{AnswerCompositor, DEFAULT_MIN_LINE_CHARS, compose};
pub use order::{restore_order, restore_order_by_text};
pub use retriever::{DEFAULT_TOP_K, RetrievedChunk, Retriever};
