//! Cardforge configuration file handling
//!
//! `cardforge.toml` in the working directory sets export, CSS and storage
//! defaults. Every section and key is optional.

use anyhow::{Context, Result};
use cardforge_paint::ImageFormat;
use cardforge_style::CssExportOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "cardforge.toml";

/// Workspace configuration stored in cardforge.toml
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CardforgeConfig {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub css: CssConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Image export settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_format")]
    pub format: String,
    /// Lossy quality, 0 to 1
    #[serde(default = "default_quality")]
    pub quality: f32,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_scale() -> f32 {
    cardforge_paint::DEVICE_SCALE
}

fn default_format() -> String {
    "png".to_string()
}

fn default_quality() -> f32 {
    cardforge_paint::DEFAULT_QUALITY
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            format: default_format(),
            quality: default_quality(),
            output_dir: default_output_dir(),
        }
    }
}

/// Parse an image format name, listing the accepted names on failure
pub fn parse_image_format(name: &str) -> Result<ImageFormat> {
    name.parse().with_context(|| {
        let names: Vec<&str> = ImageFormat::ALL.iter().map(|f| f.extension()).collect();
        format!(
            "Invalid image format '{}' (expected one of: {})",
            name,
            names.join(", ")
        )
    })
}

impl ExportConfig {
    pub fn image_format(&self) -> Result<ImageFormat> {
        parse_image_format(&self.format)
    }
}

/// CSS export settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct CssConfig {
    #[serde(default = "default_selector")]
    pub selector: String,
    #[serde(default)]
    pub minify: bool,
    #[serde(default = "default_true")]
    pub include_hover: bool,
    #[serde(default = "default_true")]
    pub include_animations: bool,
    #[serde(default)]
    pub include_responsive: bool,
}

fn default_selector() -> String {
    ".card".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            minify: false,
            include_hover: true,
            include_animations: true,
            include_responsive: false,
        }
    }
}

impl CssConfig {
    pub fn to_options(&self) -> CssExportOptions {
        CssExportOptions {
            selector: self.selector.clone(),
            minify: self.minify,
            include_hover: self.include_hover,
            include_animations: self.include_animations,
            include_responsive: self.include_responsive,
        }
    }
}

/// Saved-style storage settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: String,
}

fn default_store_dir() -> String {
    ".cardforge".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

impl CardforgeConfig {
    /// Load cardforge.toml from a directory, or defaults when absent
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: CardforgeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    }

    /// Storage directory, relative paths resolved against `base`
    pub fn store_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.store.dir)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CardforgeConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, CardforgeConfig::default());
        assert_eq!(config.export.image_format().unwrap(), ImageFormat::Png);
        assert_eq!(config.css.to_options(), CssExportOptions::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[export]\nformat = \"webp\"\n\n[css]\nminify = true\n",
        )
        .unwrap();

        let config = CardforgeConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.export.image_format().unwrap(), ImageFormat::Webp);
        assert_eq!(config.export.scale, 2.0);
        assert!(config.css.minify);
        assert!(config.css.include_hover);
        assert_eq!(config.store.dir, ".cardforge");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[export\nscale = ").unwrap();
        let err = CardforgeConfig::load_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_bad_format_name() {
        let config = CardforgeConfig {
            export: ExportConfig {
                format: "gif".to_string(),
                ..ExportConfig::default()
            },
            ..CardforgeConfig::default()
        };
        let err = config.export.image_format().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid image format 'gif' (expected one of: png, jpeg, webp)"
        );
    }

    #[test]
    fn test_format_aliases() {
        assert_eq!(parse_image_format("JPG").unwrap(), ImageFormat::Jpeg);
        assert_eq!(parse_image_format(" webp ").unwrap(), ImageFormat::Webp);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CardforgeConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(toml::from_str::<CardforgeConfig>(&text).unwrap(), config);
    }
}
