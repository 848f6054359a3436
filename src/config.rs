//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Default values
//! - `.docqa/settings.toml`, found by walking up from the current directory
//! - Environment variables
//! - CLI argument overrides (applied by the caller)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DOCQA_` and use double
//! underscores to separate nested levels:
//! - `DOCQA_RETRIEVAL__TOP_K=4` sets `retrieval.top_k`
//! - `DOCQA_EMBEDDING__MODEL=BGESmallENV15` sets `embedding.model`
//! - `DOCQA_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::documents::SegmentationConfig;
use crate::vector::DEFAULT_MODEL;

/// Directory holding the settings file.
pub const CONFIG_DIR: &str = ".docqa";

/// Settings file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "settings.toml";

const ENV_PREFIX: &str = "DOCQA_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Logging levels
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Segmentation profiles
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Answer formatting
    #[serde(default)]
    pub answer: AnswerConfig,

    /// Embedding model settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Text extraction backends
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Log levels, global and per target.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default level for every target
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `retrieval = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Number of nearest chunks pulled for every question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AnswerConfig {
    /// Lines shorter than this many characters are dropped from answers
    #[serde(default = "default_min_line_chars")]
    pub min_line_chars: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    /// fastembed model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Where downloaded model files are cached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Show a progress bar while the model downloads
    #[serde(default = "default_true")]
    pub show_download_progress: bool,

    /// Chunks embedded per model call during upload
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Backend used for PDF documents.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PdfBackend {
    /// Text layer via `pdftotext`, with OCR for pages that have none.
    Pdftotext,
    /// Rasterize with `pdftoppm`, then OCR each page with `tesseract`.
    #[default]
    Ocr,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// How PDF input is turned into text
    #[serde(default)]
    pub pdf_backend: PdfBackend,

    /// Rasterization resolution for OCR
    #[serde(default = "default_ocr_dpi")]
    pub ocr_dpi: u32,

    /// Tesseract language code
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,

    #[serde(default = "default_pdftotext_bin")]
    pub pdftotext_bin: String,

    #[serde(default = "default_pdftoppm_bin")]
    pub pdftoppm_bin: String,

    #[serde(default = "default_tesseract_bin")]
    pub tesseract_bin: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_top_k() -> usize {
    8
}
fn default_min_line_chars() -> usize {
    4
}
fn default_embedding_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_ocr_dpi() -> u32 {
    300
}
fn default_ocr_language() -> String {
    "eng".to_string()
}
fn default_pdftotext_bin() -> String {
    "pdftotext".to_string()
}
fn default_pdftoppm_bin() -> String {
    "pdftoppm".to_string()
}
fn default_tesseract_bin() -> String {
    "tesseract".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            logging: LoggingConfig::default(),
            segmentation: SegmentationConfig::default(),
            retrieval: RetrievalConfig::default(),
            answer: AnswerConfig::default(),
            embedding: EmbeddingConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            min_line_chars: default_min_line_chars(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            cache_dir: None,
            show_download_progress: true,
            batch_size: default_batch_size(),
        }
    }
}

impl EmbeddingConfig {
    /// Configured cache dir, else the user cache dir, else `.docqa/models`.
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|dir| dir.join("docqa").join("models"))
                .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("models"))
        })
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_backend: PdfBackend::default(),
            ocr_dpi: default_ocr_dpi(),
            ocr_language: default_ocr_language(),
            pdftotext_bin: default_pdftotext_bin(),
            pdftoppm_bin: default_pdftoppm_bin(),
            tesseract_bin: default_tesseract_bin(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, still layering env vars on top
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nesting levels, single underscores
            // stay inside field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find `.docqa/settings.toml` from the current directory upwards
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        self.segmentation.validate()?;

        if self.retrieval.top_k == 0 {
            return Err("retrieval.top_k must be greater than 0".to_string());
        }
        if self.embedding.batch_size == 0 {
            return Err("embedding.batch_size must be greater than 0".to_string());
        }
        if self.extraction.ocr_dpi == 0 {
            return Err("extraction.ocr_dpi must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Write a default settings file under the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
