//! Configuration file support for Occard.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/occard/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Export defaults (Anki manifest fields, image embedding)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_deck_name")]
    pub deck_name: String,

    #[serde(default = "default_deck_description")]
    pub deck_description: String,

    #[serde(default = "default_include_images")]
    pub include_images: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            deck_name: default_deck_name(),
            deck_description: default_deck_description(),
            include_images: default_include_images(),
        }
    }
}

/// OCR adapter defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_language")]
    pub language: String,

    /// Words below this confidence are skipped when suggesting occlusions
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_ocr_language(),
            min_confidence: default_min_confidence(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("occard")
}

fn default_deck_name() -> String {
    "Image Occlusion Cards".into()
}

fn default_deck_description() -> String {
    "Exported from Occard".into()
}

fn default_include_images() -> bool {
    true
}

fn default_ocr_language() -> String {
    "eng".into()
}

fn default_min_confidence() -> f64 {
    60.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("occard").join("config.toml")
    }

    /// Export options derived from the configured defaults
    pub fn export_options(&self) -> crate::ExportOptions {
        crate::ExportOptions {
            include_images: self.export.include_images,
            deck_name: self.export.deck_name.clone(),
            deck_description: self.export.deck_description.clone(),
        }
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.export.deck_name, "Image Occlusion Cards");
        assert!(config.export.include_images);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.export.deck_name, parsed.export.deck_name);
        assert_eq!(config.ocr.min_confidence, parsed.ocr.min_confidence);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[export]
deck_name = "Anatomy"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.export.deck_name, "Anatomy");
        assert!(config.export.include_images); // default
        assert_eq!(config.ocr.language, "eng"); // default
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.ocr.min_confidence = 75.0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ocr.min_confidence, 75.0);
    }
}
