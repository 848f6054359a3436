//! Embedding generation.
//!
//! `EmbeddingGenerator` is the seam between the retrieval pipeline and the
//! embedding model. The pipeline only relies on two properties: output order
//! matches input order, and every vector has `dimension()` entries.

use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;

use super::{VectorDimension, VectorError, VectorResult};
use crate::config::EmbeddingConfig;

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "AllMiniLML6V2";

/// Maps text to fixed-length vectors.
pub trait EmbeddingGenerator: Send + Sync {
    /// Embed every text, returning one vector per input in the same order.
    fn embed_batch(&self, texts: &[&str]) -> VectorResult<Vec<Vec<f32>>>;

    /// Output dimension, constant for the lifetime of the generator.
    fn dimension(&self) -> VectorDimension;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> VectorResult<Vec<f32>> {
        self.embed_batch(&[text])?.into_iter().next().ok_or_else(|| {
            VectorError::ModelUnavailable("model returned no embedding".to_string())
        })
    }
}

/// fastembed-backed generator.
///
/// The model is loaded once and reused. Inference needs `&mut`, so the model
/// sits behind a mutex and calls are serialized.
pub struct FastEmbedGenerator {
    model: Mutex<TextEmbedding>,
    dimension: VectorDimension,
    model_name: String,
}

impl std::fmt::Debug for FastEmbedGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedGenerator")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl FastEmbedGenerator {
    /// Create a generator with the default model and cache directory.
    pub fn new() -> VectorResult<Self> {
        Self::from_settings(&EmbeddingConfig::default())
    }

    /// Create a generator from the embedding section of the settings.
    pub fn from_settings(config: &EmbeddingConfig) -> VectorResult<Self> {
        let model = parse_model_name(&config.model).ok_or_else(|| {
            VectorError::ModelUnavailable(format!("unknown embedding model '{}'", config.model))
        })?;
        Self::with_model(model, config.effective_cache_dir(), config.show_download_progress)
    }

    /// Create a generator for a specific model.
    pub fn with_model(
        model: EmbeddingModel,
        cache_dir: PathBuf,
        show_download_progress: bool,
    ) -> VectorResult<Self> {
        let model_name = model_to_string(&model);
        tracing::info!(
            target: "embedding",
            "loading embedding model {model_name} (cache: {})",
            cache_dir.display()
        );

        let mut text_model = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(show_download_progress),
        )
        .map_err(|e| {
            VectorError::ModelUnavailable(format!("failed to initialize {model_name}: {e}"))
        })?;

        // Get dimensions by generating a probe embedding
        let probe = text_model
            .embed(vec!["probe"], None)
            .map_err(|e| VectorError::ModelUnavailable(e.to_string()))?;
        let dimension = probe
            .first()
            .map(Vec::len)
            .ok_or_else(|| VectorError::ModelUnavailable("probe embedding was empty".into()))
            .and_then(|len| {
                VectorDimension::new(len)
                    .map_err(|_| VectorError::ModelUnavailable("model reported dimension 0".into()))
            })?;

        tracing::info!(target: "embedding", "embedding model ready: {dimension} dimensions");

        Ok(Self {
            model: Mutex::new(text_model),
            dimension,
            model_name,
        })
    }

    /// Name of the loaded model.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl EmbeddingGenerator for FastEmbedGenerator {
    fn embed_batch(&self, texts: &[&str]) -> VectorResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .model
            .lock()
            .embed(texts.to_vec(), None)
            .map_err(|e| VectorError::ModelUnavailable(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(VectorError::ModelUnavailable(format!(
                "model returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

/// Parse a model name from settings.
pub fn parse_model_name(name: &str) -> Option<EmbeddingModel> {
    let model = match name {
        "AllMiniLML6V2" => EmbeddingModel::AllMiniLML6V2,
        "AllMiniLML6V2Q" => EmbeddingModel::AllMiniLML6V2Q,
        "AllMiniLML12V2" => EmbeddingModel::AllMiniLML12V2,
        "BGESmallENV15" => EmbeddingModel::BGESmallENV15,
        "BGEBaseENV15" => EmbeddingModel::BGEBaseENV15,
        "MultilingualE5Small" => EmbeddingModel::MultilingualE5Small,
        "NomicEmbedTextV15" => EmbeddingModel::NomicEmbedTextV15,
        _ => return None,
    };
    Some(model)
}

/// Settings name for a model.
pub fn model_to_string(model: &EmbeddingModel) -> String {
    match model {
        EmbeddingModel::AllMiniLML6V2 => "AllMiniLML6V2".to_string(),
        EmbeddingModel::AllMiniLML6V2Q => "AllMiniLML6V2Q".to_string(),
        EmbeddingModel::AllMiniLML12V2 => "AllMiniLML12V2".to_string(),
        EmbeddingModel::BGESmallENV15 => "BGESmallENV15".to_string(),
        EmbeddingModel::BGEBaseENV15 => "BGEBaseENV15".to_string(),
        EmbeddingModel::MultilingualE5Small => "MultilingualE5Small".to_string(),
        EmbeddingModel::NomicEmbedTextV15 => "NomicEmbedTextV15".to_string(),
        other => format!("{other:?}"),
    }
}
