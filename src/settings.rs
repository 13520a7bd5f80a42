use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_DELIMITER: &str = "-";

/// Formatting applied when fragments are joined into a SKU.
///
/// All three fields are plain strings with no validation. Missing fields in
/// a JSON document fall back to the defaults (`"-"`, `""`, `""`).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SkuSettings {
    /// Inserted between non-empty fragments.
    pub delimiter: String,
    /// Prepended once to the whole SKU.
    pub prefix: String,
    /// Appended once to the whole SKU.
    pub suffix: String,
}

impl Default for SkuSettings {
    fn default() -> Self {
        SkuSettings {
            delimiter: DEFAULT_DELIMITER.to_string(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SkuSettings {
    pub fn new(delimiter: &str, prefix: &str, suffix: &str) -> Self {
        SkuSettings {
            delimiter: delimiter.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn with_delimiter(delimiter: &str) -> Self {
        SkuSettings {
            delimiter: delimiter.to_string(),
            ..SkuSettings::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file.
    ///
    /// # Examples
    /// ```no_run
    /// use skusheet::settings::SkuSettings;
    ///
    /// let settings = SkuSettings::load("sku-settings.json").unwrap_or_default();
    /// println!("delimiter is {:?}", settings.delimiter);
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
