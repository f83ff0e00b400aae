//! # Till Configuration
//!
//! Store-level settings the till needs: display name, currency formatting,
//! tax rate and where the menu lives.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TABLESIDE_STORE_NAME="Harbor Grill"                                │
//! │     TABLESIDE_TAX_RATE=500                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tableside/till.toml (Linux)                              │
//! │     ~/Library/Application Support/com.tableside.till/till.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # till.toml
//! [store]
//! name = "Harbor Grill"
//!
//! [currency]
//! symbol = "$"
//! decimals = 2
//!
//! [tax]
//! rate_bps = 500  # 5%
//!
//! [catalog]
//! path = "menu.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tableside_core::validation::validate_tax_rate_bps;
use tableside_core::{Money, TaxRate};
use tracing::{debug, info, warn};

use crate::error::{TillError, TillResult};

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Shown on the ticket header.
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Tableside".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    /// Digits after the decimal point. Amounts are stored in minor units.
    #[serde(default = "default_currency_decimals")]
    pub decimals: u8,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            symbol: default_currency_symbol(),
            decimals: default_currency_decimals(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Basis points (500 = 5%). Zero disables tax.
    #[serde(default)]
    pub rate_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON menu file. Relative paths resolve against the working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Till Config
// =============================================================================

/// Complete till configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TillConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub currency: CurrencyConfig,

    #[serde(default)]
    pub tax: TaxConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl TillConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Load Order
    /// 1. Start with defaults
    /// 2. Load from TOML file (if exists)
    /// 3. Apply environment variable overrides
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> TillResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading till config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load till config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TillResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(TillError::InvalidConfig("store.name must not be empty".into()));
        }

        if self.currency.decimals > 4 {
            return Err(TillError::InvalidConfig(format!(
                "currency.decimals must be between 0 and 4, got {}",
                self.currency.decimals
            )));
        }

        validate_tax_rate_bps(self.tax.rate_bps)
            .map_err(|e| TillError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("TABLESIDE_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Ok(rate) = std::env::var("TABLESIDE_TAX_RATE") {
            match rate.parse::<u32>() {
                Ok(bps) => {
                    debug!(rate_bps = bps, "Overriding tax rate from environment");
                    self.tax.rate_bps = bps;
                }
                Err(_) => warn!(rate = %rate, "Ignoring non-numeric TABLESIDE_TAX_RATE"),
            }
        }

        if let Ok(symbol) = std::env::var("TABLESIDE_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Ok(path) = std::env::var("TABLESIDE_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = Some(PathBuf::from(path));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tableside", "till")
            .map(|dirs| dirs.config_dir().join("till.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax.rate_bps)
    }

    pub fn store_name(&self) -> &str {
        &self.store.name
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use tableside_core::Money;
    /// use tableside_till::state::TillConfig;
    ///
    /// let config = TillConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let divisor = 10_i64.pow(self.currency.decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();
        let sign = if cents < 0 { "-" } else { "" };

        if self.currency.decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency.symbol,
                whole,
                frac,
                width = self.currency.decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.currency.symbol, whole)
        }
    }
}
