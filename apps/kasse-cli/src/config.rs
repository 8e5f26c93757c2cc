//! # Application Configuration
//!
//! Receipt policy and session settings, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     --style totals                                                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     KASSE_RECEIPT_STYLE=totals                                         │
//! │     KASSE_TAX_PERCENT=25                                               │
//! │                                                                         │
//! │  3. TOML Config File (--config, else KASSE_CONFIG, else default)       │
//! │     ~/.config/kasse/kasse.toml (Linux)                                 │
//! │     ~/Library/Application Support/dk.kasse.kasse/kasse.toml (macOS)    │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     category receipt, 25% tax, one mark per 50,00                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kasse.toml
//! [receipt]
//! style = "category"     # category | totals
//! tax_percent = 25
//! kroner_per_mark = 50
//!
//! [session]
//! prompt = "> "
//! ```

use std::path::{Path, PathBuf};

use kasse_core::{Money, ReceiptLayout, ReceiptStyle, TaxRate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "kasse.toml";

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[receipt]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptSettings {
    /// Which renderer prints receipts.
    pub style: ReceiptStyle,

    /// Sales tax included in every price, in whole percent.
    pub tax_percent: u32,

    /// Whole kroner spent per loyalty mark.
    pub kroner_per_mark: u32,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            style: ReceiptStyle::default(),
            tax_percent: kasse_core::receipt::SALES_TAX_PERCENT,
            kroner_per_mark: 50,
        }
    }
}

/// `[session]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Printed before each command is read.
    pub prompt: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            prompt: "> ".to_string(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub receipt: ReceiptSettings,
    pub session: SessionSettings,
}

impl AppConfig {
    /// Loads configuration: defaults, then the TOML file, then `KASSE_*` env vars.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("KASSE_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(path = %path.display(), "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the receipt policy.
    pub fn validate(&self) -> ConfigResult<()> {
        TaxRate::try_from_percent(self.receipt.tax_percent).map_err(|e| {
            ConfigError::Invalid(format!("receipt.{} (got {})", e, self.receipt.tax_percent))
        })?;

        if self.receipt.kroner_per_mark == 0 {
            return Err(ConfigError::Invalid(
                "receipt.kroner_per_mark must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Receipt layout for the configured tax and mark policy.
    pub fn layout(&self) -> ReceiptLayout {
        ReceiptLayout {
            tax_rate: TaxRate::from_percent(self.receipt.tax_percent),
            kroner_per_mark: Money::from_major_minor(i64::from(self.receipt.kroner_per_mark), 0),
            ..ReceiptLayout::default()
        }
    }

    /// Applies `KASSE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(style) = lookup("KASSE_RECEIPT_STYLE") {
            match style.parse::<ReceiptStyle>() {
                Ok(parsed) => {
                    debug!(style = %style, "Overriding receipt style from environment");
                    self.receipt.style = parsed;
                }
                Err(e) => warn!(style = %style, "Ignoring KASSE_RECEIPT_STYLE: {}", e),
            }
        }

        if let Some(percent) = lookup("KASSE_TAX_PERCENT") {
            match percent.trim().parse::<u32>() {
                Ok(p) => {
                    debug!(tax_percent = p, "Overriding tax percent from environment");
                    self.receipt.tax_percent = p;
                }
                Err(_) => warn!(value = %percent, "Ignoring KASSE_TAX_PERCENT"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dk", "kasse", "kasse")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.receipt.style, ReceiptStyle::Category);
        assert_eq!(config.receipt.tax_percent, 25);
        assert_eq!(config.session.prompt, "> ");
        assert!(config.validate().is_ok());
        assert_eq!(config.layout(), ReceiptLayout::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [receipt]
            style = "totals"
            "#,
        )
        .unwrap();

        assert_eq!(config.receipt.style, ReceiptStyle::Totals);
        assert_eq!(config.receipt.kroner_per_mark, 50);
        assert_eq!(config.session.prompt, "> ");
    }

    #[test]
    fn test_validate_rejects_bad_policy() {
        let mut config = AppConfig::default();
        config.receipt.tax_percent = 101;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("tax_percent"));

        config.receipt.tax_percent = 100;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.receipt.kroner_per_mark = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([("KASSE_RECEIPT_STYLE", "simple"), ("KASSE_TAX_PERCENT", "12")]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.receipt.style, ReceiptStyle::Totals);
        assert_eq!(config.receipt.tax_percent, 12);
        assert_eq!(config.layout().tax_rate, TaxRate::from_percent(12));
    }

    #[test]
    fn test_bad_override_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "KASSE_TAX_PERCENT" => Some("lots".to_string()),
            "KASSE_RECEIPT_STYLE" => Some("fancy".to_string()),
            _ => None,
        });
        assert_eq!(config, AppConfig::default());
    }
}
