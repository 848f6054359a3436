//! Configuration types for document segmentation.

use serde::{Deserialize, Serialize};

/// Segmentation profiles.
///
/// The interactive and export paths deliberately keep separate settings:
/// one drops short windows, the other keeps everything that is not blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentationConfig {
    /// Profile used when a document is uploaded for questions.
    #[serde(default = "SegmentProfile::interactive")]
    pub interactive: SegmentProfile,

    /// Profile used by the bulk chunk export.
    #[serde(default = "SegmentProfile::export")]
    pub export: SegmentProfile,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            interactive: SegmentProfile::interactive(),
            export: SegmentProfile::export(),
        }
    }
}

impl SegmentationConfig {
    /// Look up a profile by name.
    pub fn profile(&self, name: ProfileName) -> &SegmentProfile {
        match name {
            ProfileName::Interactive => &self.interactive,
            ProfileName::Export => &self.export,
        }
    }

    /// Validate both profiles.
    pub fn validate(&self) -> Result<(), String> {
        self.interactive
            .validate()
            .map_err(|e| format!("segmentation.interactive: {e}"))?;
        self.export
            .validate()
            .map_err(|e| format!("segmentation.export: {e}"))
    }
}

/// Named segmentation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    Interactive,
    Export,
}

/// Window size and keep threshold for one segmentation profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentProfile {
    /// Window size in characters. Windows never overlap.
    pub window_chars: usize,

    /// A window is kept only if its trimmed length is strictly greater than this.
    /// Zero keeps every window that is not whitespace-only.
    #[serde(default)]
    pub min_chars: usize,
}

impl SegmentProfile {
    /// Profile for question answering: 350-char windows, drop anything of 40 chars or less.
    pub fn interactive() -> Self {
        Self {
            window_chars: 350,
            min_chars: 40,
        }
    }

    /// Profile for bulk export: 300-char windows, only blank windows dropped.
    pub fn export() -> Self {
        Self {
            window_chars: 300,
            min_chars: 0,
        }
    }

    /// Same threshold, different window size.
    pub fn with_window(self, window_chars: usize) -> Self {
        Self {
            window_chars,
            ..self
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.window_chars == 0 {
            return Err("window_chars must be greater than 0".to_string());
        }

        if self.min_chars >= self.window_chars {
            return Err(format!(
                "min_chars ({}) must be less than window_chars ({}), otherwise no window can be kept",
                self.min_chars, self.window_chars
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let config = SegmentationConfig::default();
        assert_eq!(config.interactive.window_chars, 350);
        assert_eq!(config.interactive.min_chars, 40);
        assert_eq!(config.export.window_chars, 300);
        assert_eq!(config.export.min_chars, 0);
        assert_eq!(config.profile(ProfileName::Export), &config.export);
    }

    #[test]
    fn test_profile_validation() {
        let mut profile = SegmentProfile::interactive();
        assert!(profile.validate().is_ok());

        profile.window_chars = 0;
        assert!(profile.validate().is_err());

        profile.window_chars = 40;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_profiles_are_independent() {
        let toml_str = r#"
[interactive]
window_chars = 500
min_chars = 60
"#;
        let config: SegmentationConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interactive.window_chars, 500);
        assert_eq!(config.export, SegmentProfile::export());
    }
}
