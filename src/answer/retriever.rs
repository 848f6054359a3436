//! Question to nearest chunks.

use serde::Serialize;

use crate::documents::Chunk;
use crate::error::{QaError, QaResult};
use crate::session::Session;
use crate::vector::EmbeddingGenerator;

/// Default number of chunks pulled per question.
pub const DEFAULT_TOP_K: usize = 8;

/// A retrieved chunk with its squared L2 distance to the question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Embeds questions and resolves index hits back to chunks.
pub struct Retriever<'a> {
    generator: &'a dyn EmbeddingGenerator,
}

impl<'a> Retriever<'a> {
    pub fn new(generator: &'a dyn EmbeddingGenerator) -> Self {
        Self { generator }
    }

    /// Up to `k` chunks nearest to `question`, most relevant first.
    ///
    /// Asking for more chunks than the document has returns all of them.
    pub fn retrieve_with_scores(
        &self,
        session: Option<&Session>,
        question: &str,
        k: usize,
    ) -> QaResult<Vec<RetrievedChunk>> {
        let session = session.ok_or(QaError::NoDocumentLoaded)?;

        let query = self.generator.embed_one(question)?;
        let neighbors = session.index().query(&query, k)?;

        let retrieved = neighbors
            .into_iter()
            .map(|neighbor| {
                session
                    .chunks()
                    .get(neighbor.position)
                    .cloned()
                    .map(|chunk| RetrievedChunk {
                        chunk,
                        distance: neighbor.distance,
                    })
                    .ok_or_else(|| {
                        QaError::InvalidQuery(format!(
                            "index position {} has no chunk ({} chunks loaded)",
                            neighbor.position,
                            session.chunks().len()
                        ))
                    })
            })
            .collect::<QaResult<Vec<_>>>()?;

        tracing::debug!(
            target: "retrieval",
            "retrieved {} of {} chunks (k={k}): {:?}",
            retrieved.len(),
            session.chunks().len(),
            retrieved.iter().map(|r| r.chunk.index).collect::<Vec<_>>()
        );

        Ok(retrieved)
    }

    /// Like [`Self::retrieve_with_scores`] without the distances.
    pub fn retrieve(
        &self,
        session: Option<&Session>,
        question: &str,
        k: usize,
    ) -> QaResult<Vec<Chunk>> {
        Ok(self
            .retrieve_with_scores(session, question, k)?
            .into_iter()
            .map(|r| r.chunk)
            .collect())
    }
}
