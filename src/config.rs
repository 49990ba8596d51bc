use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EnricherError, Result};

pub const CONFIG_FILE_NAME: &str = "enricher.toml";

/// Validated plugin settings.
///
/// Build it through [`EnricherConfig::load`], [`EnricherConfig::from_toml_str`]
/// or [`EnricherConfig::from_json_str`]; all of them reject a negative
/// `min_query_length`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnricherConfig {
    pub double_pass: bool,
    pub utm_source: String,
    pub min_query_length: usize,
    pub default_message: String,
    pub panic_button_enabled: bool,
    pub panic_button_text: String,
}

impl EnricherConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::info!(
                "No config file found at {}. Using EnricherConfig::default().",
                path.display()
            );
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|source| EnricherError::ConfigIo {
            path: path.clone(),
            source,
        })?;
        let raw = toml::from_str::<RawSettings>(&text).map_err(|source| {
            EnricherError::ConfigToml {
                origin: path.display().to_string(),
                source,
            }
        })?;
        Self::validate(raw)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw = toml::from_str::<RawSettings>(text).map_err(|source| {
            EnricherError::ConfigToml {
                origin: "<inline>".to_string(),
                source,
            }
        })?;
        Self::validate(raw)
    }

    /// Parse the JSON settings object a plugin host stores for us.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw = serde_json::from_str::<RawSettings>(text)?;
        Self::validate(raw)
    }

    /// Tracking is off when the tag is empty.
    pub fn tracking_enabled(&self) -> bool {
        !self.utm_source.is_empty()
    }
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            double_pass: false,
            utm_source: String::new(),
            min_query_length: RawSettings::default_min_query_length() as usize,
            default_message: RawSettings::default_message(),
            panic_button_enabled: false,
            panic_button_text: RawSettings::default_panic_button_text(),
        }
    }
}

impl EnricherConfig {
    fn validate(raw: RawSettings) -> Result<Self> {
        let min_query_length =
            usize::try_from(raw.min_query_length).map_err(|_| EnricherError::InvalidConfig {
                field: "min_query_length",
                reason: format!(
                    "Minimum query length must be non-negative (got {})",
                    raw.min_query_length
                ),
            })?;
        Ok(Self {
            double_pass: raw.double_pass,
            utm_source: raw.utm_source,
            min_query_length,
            default_message: raw.default_message,
            panic_button_enabled: raw.panic_button_enabled,
            panic_button_text: raw.panic_button_text,
        })
    }
}

/// Settings as written by the user, before validation.
#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    #[serde(default)]
    double_pass: bool,
    #[serde(default)]
    utm_source: String,
    #[serde(default = "RawSettings::default_min_query_length")]
    min_query_length: i64,
    #[serde(default = "RawSettings::default_message")]
    default_message: String,
    #[serde(default)]
    panic_button_enabled: bool,
    #[serde(default = "RawSettings::default_panic_button_text")]
    panic_button_text: String,
}

impl RawSettings {
    fn default_min_query_length() -> i64 {
        10
    }

    fn default_message() -> String {
        "Sorry, I can't help you. To answer adequately: \u{2022} Write short, complete sentences \u{2022} Express one request at a time".to_string()
    }

    fn default_panic_button_text() -> String {
        "Sorry, I'm under maintenance right now. Please try again later.".to_string()
    }
}
