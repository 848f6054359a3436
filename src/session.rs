//! The currently loaded document.
//!
//! A [`Session`] is immutable once built. [`SessionStore`] holds the current
//! one as an `Arc` and swaps it in a single write. Readers clone the `Arc`
//! and keep answering from that snapshot even if an upload replaces it
//! meanwhile.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::documents::ChunkSequence;
use crate::error::{QaError, QaResult};
use crate::vector::FlatL2Index;

/// One indexed document.
#[derive(Debug)]
pub struct Session {
    chunks: ChunkSequence,
    index: FlatL2Index,
    source: Option<String>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Pair a chunk sequence with the index built from its embeddings.
    ///
    /// Fails with [`QaError::InvalidQuery`] if the index does not hold exactly
    /// one vector per chunk.
    pub fn new(chunks: ChunkSequence, index: FlatL2Index, source: Option<String>) -> QaResult<Self> {
        if chunks.len() != index.len() {
            return Err(QaError::InvalidQuery(format!(
                "index holds {} vectors for {} chunks",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            chunks,
            index,
            source,
            created_at: Utc::now(),
        })
    }

    pub fn chunks(&self) -> &ChunkSequence {
        &self.chunks
    }

    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }

    /// Label of the uploaded document, usually its file name.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Holder of the current session.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.read().clone()
    }

    /// Install `session`, returning the one it replaced.
    pub fn replace(&self, session: Session) -> Option<Arc<Session>> {
        let session = Arc::new(session);
        tracing::info!(
            target: "session",
            "session replaced: {} chunks from {} at {}",
            session.chunks().len(),
            session.source().unwrap_or("<unnamed>"),
            session.created_at().format("%H:%M:%S")
        );
        self.current.write().replace(session)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::VectorDimension;

    fn session(texts: &[&str]) -> Session {
        let chunks = ChunkSequence::from_texts(texts.iter().copied());
        let dim = VectorDimension::new(1).unwrap();
        let index = FlatL2Index::build(dim, (0..texts.len()).map(|i| vec![i as f32])).unwrap();
        Session::new(chunks, index, Some("test.txt".to_string())).unwrap()
    }

    #[test]
    fn test_session_requires_matching_index() {
        let chunks = ChunkSequence::from_texts(["one", "two"]);
        let index =
            FlatL2Index::build(VectorDimension::new(1).unwrap(), vec![vec![0.0]]).unwrap();
        let err = Session::new(chunks, index, None).unwrap_err();
        assert!(matches!(err, QaError::InvalidQuery(_)));
    }

    #[test]
    fn test_replace_swaps_whole_session() {
        let store = SessionStore::new();
        assert!(store.current().is_none());

        assert!(store.replace(session(&["first document"])).is_none());
        let previous = store.replace(session(&["second", "document"])).unwrap();

        assert_eq!(previous.chunks().len(), 1);
        assert_eq!(store.current().unwrap().chunks().len(), 2);
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let store = SessionStore::new();
        store.replace(session(&["old"]));
        let snapshot = store.current().unwrap();

        store.replace(session(&["new", "newer"]));

        assert_eq!(snapshot.chunks()[0].text, "old");
        assert_eq!(store.current().unwrap().chunks()[0].text, "new");
    }

    #[test]
    fn test_is_loaded_and_load_time() {
        let store = SessionStore::new();
        assert!(!store.is_loaded());

        let before = Utc::now();
        store.replace(session(&["doc"]));
        assert!(store.is_loaded());
        assert!(store.current().unwrap().created_at() >= before);
    }
}
