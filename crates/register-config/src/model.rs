use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Stores user-configurable shell preferences and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub currency_precision: Option<u8>,
    #[serde(default)]
    pub accessibility: AccessibilitySettings,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_csv_delimiter")]
    pub csv_delimiter: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_register: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for registers.
    pub default_register_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for register backups.
    pub default_backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "fr-FR".into(),
            currency: "EUR".into(),
            currency_precision: None,
            accessibility: AccessibilitySettings::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            csv_delimiter: Self::default_csv_delimiter(),
            last_opened_register: None,
            default_register_root: None,
            default_backup_root: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`].
    pub const SETTABLE_KEYS: [&'static str; 8] = [
        "locale",
        "currency",
        "currency_precision",
        "ui_color_enabled",
        "plain_output",
        "csv_delimiter",
        "register_root",
        "backup_root",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_csv_delimiter() -> char {
        ';'
    }

    /// Decimal places used when printing amounts.
    pub fn precision(&self) -> usize {
        usize::from(self.currency_precision.unwrap_or(2))
    }

    /// Whether output should be colored, taking plain mode into account.
    pub fn colors_enabled(&self) -> bool {
        self.ui_color_enabled && !self.accessibility.plain_output
    }

    pub fn resolve_default_register_root(&self) -> PathBuf {
        if let Some(path) = &self.default_register_root {
            return path.clone();
        }
        documents_dir().join("AssetRegister").join("registers")
    }

    pub fn resolve_default_backup_root(&self) -> PathBuf {
        if let Some(path) = &self.default_backup_root {
            return path.clone();
        }
        documents_dir().join("AssetRegister").join("backups")
    }

    /// Updates one setting from its textual form. `none` clears optional values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "locale" => {
                if value.is_empty() {
                    return Err(invalid("locale cannot be empty"));
                }
                self.locale = value.to_string();
            }
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid("expected a three-letter ISO code"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "currency_precision" => {
                self.currency_precision = if is_none(value) {
                    None
                } else {
                    let digits: u8 = value
                        .parse()
                        .map_err(|_| invalid("expected a number between 0 and 6"))?;
                    if digits > 6 {
                        return Err(invalid("expected a number between 0 and 6"));
                    }
                    Some(digits)
                };
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_bool(value).ok_or_else(|| invalid("expected on/off"))?
            }
            "plain_output" => {
                self.accessibility.plain_output =
                    parse_bool(value).ok_or_else(|| invalid("expected on/off"))?
            }
            "csv_delimiter" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(delimiter), None) if delimiter.is_ascii() => {
                        self.csv_delimiter = delimiter
                    }
                    _ => return Err(invalid("expected a single ASCII character")),
                }
            }
            "register_root" => {
                self.default_register_root = optional_path(value);
            }
            "backup_root" => {
                self.default_backup_root = optional_path(value);
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub plain_output: bool,
}

fn documents_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn is_none(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("none")
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if is_none(value) {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
