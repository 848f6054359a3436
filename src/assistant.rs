//! Upload a document, ask questions about it.
//!
//! [`Assistant`] owns the collaborators (text extractor, embedding model)
//! and the session store, and runs the two request paths:
//!
//! - upload: extract, segment, embed, build the index, then swap the session
//! - ask: snapshot the session, retrieve, restore order, compose

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use crate::answer::{AnswerCompositor, RetrievedChunk, Retriever, restore_order};
use crate::config::Settings;
use crate::documents::{
    ChunkSequence, SegmentProfile, SegmentationConfig, Segmenter, WindowSegmenter, write_chunks,
};
use crate::error::{QaError, QaResult};
use crate::extract::TextExtractor;
use crate::session::{Session, SessionStore};
use crate::vector::{EmbeddingGenerator, FlatL2Index};

/// Progress updates during upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadProgress {
    /// Text extraction started.
    Extracting,
    /// Segmentation finished.
    Segmented { chunks: usize },
    /// Embedding batches done so far.
    Embedding { current: usize, total: usize },
    /// Index built; the session is about to be swapped.
    Indexed { chunks: usize },
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadSummary {
    pub chunk_count: usize,
    pub total_chars: usize,
    pub dimension: usize,
    pub source: Option<String>,
}

/// Answer to one question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Composed answer text; empty means nothing relevant survived cleanup.
    pub text: String,
    /// Chunks the answer was built from, in document order.
    pub chunks: Vec<RetrievedChunk>,
}

impl Answer {
    fn empty() -> Self {
        Self {
            text: String::new(),
            chunks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Question answering over one document at a time.
pub struct Assistant {
    extractor: Box<dyn TextExtractor>,
    generator: Box<dyn EmbeddingGenerator>,
    segmenter: WindowSegmenter,
    segmentation: SegmentationConfig,
    top_k: usize,
    batch_size: usize,
    compositor: AnswerCompositor,
    sessions: SessionStore,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("segmentation", &self.segmentation)
            .field("top_k", &self.top_k)
            .field("batch_size", &self.batch_size)
            .field("dimension", &self.generator.dimension())
            .field("loaded", &self.sessions.is_loaded())
            .finish()
    }
}

impl Assistant {
    /// Create an assistant with default settings.
    pub fn new(extractor: Box<dyn TextExtractor>, generator: Box<dyn EmbeddingGenerator>) -> Self {
        let settings = Settings::default();
        Self {
            extractor,
            generator,
            segmenter: WindowSegmenter::new(),
            segmentation: settings.segmentation,
            top_k: settings.retrieval.top_k,
            batch_size: settings.embedding.batch_size,
            compositor: AnswerCompositor::new(settings.answer.min_line_chars),
            sessions: SessionStore::new(),
        }
    }

    /// Create an assistant configured from settings.
    pub fn from_settings(
        settings: &Settings,
        extractor: Box<dyn TextExtractor>,
        generator: Box<dyn EmbeddingGenerator>,
    ) -> QaResult<Self> {
        settings.validate().map_err(QaError::Config)?;
        Ok(Self {
            segmentation: settings.segmentation.clone(),
            top_k: settings.retrieval.top_k,
            batch_size: settings.embedding.batch_size,
            compositor: AnswerCompositor::new(settings.answer.min_line_chars),
            ..Self::new(extractor, generator)
        })
    }

    /// Override the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Extract, segment and index `document`, replacing the current session.
    pub fn upload(&self, document: &[u8], source: Option<&str>) -> QaResult<UploadSummary> {
        self.upload_with_progress(document, source, |_| {})
    }

    /// Upload with progress callbacks.
    ///
    /// On any error the current session is left as it was.
    pub fn upload_with_progress<F>(
        &self,
        document: &[u8],
        source: Option<&str>,
        mut on_progress: F,
    ) -> QaResult<UploadSummary>
    where
        F: FnMut(UploadProgress),
    {
        on_progress(UploadProgress::Extracting);
        let text = self.extractor.extract_text(document)?;
        self.index_text(&text, source, &mut on_progress)
    }

    /// Upload text that needs no extraction.
    pub fn upload_text(&self, text: &str, source: Option<&str>) -> QaResult<UploadSummary> {
        self.index_text(text, source, &mut |_| {})
    }

    fn index_text<F>(
        &self,
        text: &str,
        source: Option<&str>,
        on_progress: &mut F,
    ) -> QaResult<UploadSummary>
    where
        F: FnMut(UploadProgress),
    {
        let chunks = self.segmenter.segment(text, &self.segmentation.interactive);
        if chunks.is_empty() {
            tracing::warn!(
                target: "session",
                "no chunks from {} ({} chars extracted), keeping current session",
                source.unwrap_or("<unnamed>"),
                text.chars().count()
            );
            return Err(QaError::NoContent);
        }
        on_progress(UploadProgress::Segmented {
            chunks: chunks.len(),
        });

        let index = self.build_index(&chunks, on_progress)?;
        on_progress(UploadProgress::Indexed {
            chunks: chunks.len(),
        });

        let summary = UploadSummary {
            chunk_count: chunks.len(),
            total_chars: chunks.total_chars(),
            dimension: index.dimension().get(),
            source: source.map(str::to_string),
        };

        let session = Session::new(chunks, index, summary.source.clone())?;
        self.sessions.replace(session);

        Ok(summary)
    }

    /// Embed chunks in batches and build the index over them.
    fn build_index<F>(&self, chunks: &ChunkSequence, on_progress: &mut F) -> QaResult<FlatL2Index>
    where
        F: FnMut(UploadProgress),
    {
        let texts: Vec<&str> = chunks.texts().collect();
        let total = texts.len();
        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(total);

        for batch in texts.chunks(self.batch_size) {
            let embeddings = self.generator.embed_batch(batch)?;
            if embeddings.len() != batch.len() {
                return Err(QaError::ModelUnavailable(format!(
                    "embedding model returned {} vectors for {} chunks",
                    embeddings.len(),
                    batch.len()
                )));
            }
            vectors.extend(embeddings);

            on_progress(UploadProgress::Embedding {
                current: vectors.len(),
                total,
            });
        }

        Ok(FlatL2Index::build(self.generator.dimension(), vectors)?)
    }

    /// Answer `question` from the current document.
    pub fn ask(&self, question: &str) -> QaResult<Answer> {
        self.ask_with_top_k(question, self.top_k)
    }

    /// Answer with an explicit number of retrieved chunks.
    pub fn ask_with_top_k(&self, question: &str, top_k: usize) -> QaResult<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(Answer::empty());
        }

        // The snapshot keeps answering from this document even if an upload
        // swaps the session before we finish
        let Some(session) = self.sessions.current() else {
            return Err(QaError::NoDocumentLoaded);
        };
        let retriever = Retriever::new(self.generator.as_ref());
        let retrieved = retriever.retrieve_with_scores(Some(session.as_ref()), question, top_k)?;

        let distances: Vec<(usize, f32)> = retrieved
            .iter()
            .map(|r| (r.chunk.index, r.distance))
            .collect();
        let ordered = restore_order(
            retrieved.into_iter().map(|r| r.chunk).collect(),
            session.chunks(),
        );
        let text = self.compositor.compose(&ordered);

        let chunks = ordered
            .into_iter()
            .map(|chunk| {
                let distance = distances
                    .iter()
                    .find(|(index, _)| *index == chunk.index)
                    .map_or(f32::INFINITY, |(_, d)| *d);
                RetrievedChunk { chunk, distance }
            })
            .collect();

        tracing::debug!(
            target: "retrieval",
            "answered from {}: {} chars",
            session.source().unwrap_or("<unnamed>"),
            text.len()
        );

        Ok(Answer { text, chunks })
    }

    /// Segment `document` with the export profile and write it in export format.
    ///
    /// Nothing is embedded and the session is not touched.
    pub fn export<W: Write>(&self, document: &[u8], writer: W) -> QaResult<usize> {
        self.export_with_profile(document, &self.segmentation.export, writer)
    }

    /// Export with an explicit segmentation profile.
    pub fn export_with_profile<W: Write>(
        &self,
        document: &[u8],
        profile: &SegmentProfile,
        writer: W,
    ) -> QaResult<usize> {
        profile.validate().map_err(QaError::Config)?;
        let text = self.extractor.extract_text(document)?;
        let chunks = self.segmenter.segment(&text, profile);
        Ok(write_chunks(&chunks, writer)?)
    }

    /// Segment `document` with the interactive profile without indexing it.
    pub fn preview_chunks(&self, document: &[u8]) -> QaResult<ChunkSequence> {
        let text = self.extractor.extract_text(document)?;
        Ok(self.segmenter.segment(&text, &self.segmentation.interactive))
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.sessions.current()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
