//! Configuration loading and management.
//!
//! This module provides utilities for loading scan configuration from various
//! sources (TOML, YAML, JSON) and discovering configuration files in the project hierarchy.

use crate::{MailsiftError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main scan configuration.
///
/// All values are static for the lifetime of a job.
///
/// # Example
///
/// ```rust
/// use mailsift::MailsiftConfig;
///
/// let config = MailsiftConfig::default();
/// assert!(!config.validation.enable_dns_lookup);
///
/// // let config = MailsiftConfig::from_toml_file("mailsift.toml")?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailsiftConfig {
    /// Scoring configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Optical-recognition configuration
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Text-layer escalation configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Default log filter for binaries embedding the library (e.g. "info", "mailsift=debug")
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Scorer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Query mail-exchange records for addresses that already score >= 50
    #[serde(default)]
    pub enable_dns_lookup: bool,

    /// Per-lookup DNS timeout in seconds
    #[serde(default = "default_dns_timeout")]
    pub dns_timeout_secs: u64,

    /// Maximum number of domains memoized by one scorer
    #[serde(default = "default_mx_cache_capacity")]
    pub mx_cache_capacity: usize,

    /// Exact addresses that are never valid
    #[serde(default = "default_email_blacklist")]
    pub email_blacklist: Vec<String>,

    /// Domains whose addresses are never valid
    #[serde(default = "default_domain_blacklist")]
    pub domain_blacklist: Vec<String>,

    /// Reputable providers earning the known-provider bonus
    #[serde(default = "default_known_valid_domains")]
    pub known_valid_domains: Vec<String>,
}

/// Optical-recognition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Allow escalation to the optical-recognition layer
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tesseract language code (e.g., "eng", "deu", "eng+fra")
    #[serde(default = "default_eng")]
    pub language: String,

    /// Raster resolution for recognition (288 = 4x the 72 DPI page space)
    #[serde(default = "default_render_dpi")]
    pub render_dpi: u32,

    /// Upper bound on either raster side; DPI is lowered to fit
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
}

/// Escalation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Content weight (trimmed characters) below which the next strategy is tried
    #[serde(default = "default_min_content_weight")]
    pub min_content_weight: usize,
}

fn default_true() -> bool {
    true
}
fn default_eng() -> String {
    "eng".to_string()
}
fn default_dns_timeout() -> u64 {
    5
}
fn default_mx_cache_capacity() -> usize {
    1000
}
fn default_render_dpi() -> u32 {
    288
}
fn default_max_image_dimension() -> u32 {
    65536
}
fn default_min_content_weight() -> usize {
    50
}
fn default_email_blacklist() -> Vec<String> {
    ["test@test.com", "example@example.com", "admin@localhost", "noreply@localhost"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_domain_blacklist() -> Vec<String> {
    ["localhost", "example.com", "test.com", "invalid.com"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_known_valid_domains() -> Vec<String> {
    [
        "gmail.com",
        "yahoo.com",
        "hotmail.com",
        "outlook.com",
        "icloud.com",
        "aol.com",
        "protonmail.com",
        "mail.com",
        "zoho.com",
        "yandex.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enable_dns_lookup: false,
            dns_timeout_secs: default_dns_timeout(),
            mx_cache_capacity: default_mx_cache_capacity(),
            email_blacklist: default_email_blacklist(),
            domain_blacklist: default_domain_blacklist(),
            known_valid_domains: default_known_valid_domains(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: default_eng(),
            render_dpi: default_render_dpi(),
            max_image_dimension: default_max_image_dimension(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_content_weight: default_min_content_weight(),
        }
    }
}

impl MailsiftConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `MailsiftError::Validation` if file doesn't exist or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| MailsiftError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| MailsiftError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_json::from_str(&content)
            .map_err(|e| MailsiftError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, choosing the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(MailsiftError::validation(format!(
                "Unsupported config format: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `mailsift.toml` or `.mailsift.toml` in the current directory
    /// and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(MailsiftError::Io)?;

        loop {
            for name in ["mailsift.toml", ".mailsift.toml"] {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Ok(Some(Self::from_toml_file(candidate)?));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Reject values no scan can run with.
    pub fn validate(&self) -> Result<()> {
        if self.ocr.language.trim().is_empty() {
            return Err(MailsiftError::validation(
                "OCR language cannot be empty. Please specify a valid language code (e.g., 'eng')",
            ));
        }
        if self.validation.dns_timeout_secs == 0 {
            return Err(MailsiftError::validation("dns_timeout_secs must be greater than zero"));
        }
        if self.validation.mx_cache_capacity == 0 {
            return Err(MailsiftError::validation("mx_cache_capacity must be greater than zero"));
        }
        if self.ocr.render_dpi == 0 {
            return Err(MailsiftError::validation("render_dpi must be greater than zero"));
        }
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| MailsiftError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
