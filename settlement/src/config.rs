//! Configuration for the settlement engine

use serde::{Deserialize, Serialize};
use split_core::Currency;

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Fiat currency of receipts
    pub currency: Currency,

    /// Recipient address for the group's payment
    pub recipient: String,

    /// Counterparty label stamped on settlement records
    pub counterparty_label: String,

    /// Settlement asset configuration
    pub asset: AssetConfig,

    /// Finality confirmation configuration
    pub confirmation: ConfirmationConfig,

    /// History read configuration
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement-engine".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            currency: Currency::USD,
            // Development recipient; override in deployment.
            recipient: "7C4jsPZpht1JHMi1Y5Nfu8X9XcNYCTJbCpz9aQTLVUKp".to_string(),
            counterparty_label: "Solana Sushi".to_string(),
            asset: AssetConfig::default(),
            confirmation: ConfirmationConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Settlement asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Asset ticker symbol
    pub symbol: String,

    /// Decimal places of the smallest transferable unit
    pub decimals: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            symbol: "SOL".to_string(),
            decimals: 9, // 10^9 smallest units per whole unit
        }
    }
}

/// Finality confirmation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Maximum wait for network finality (seconds)
    pub timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60, // block finality is usually well under this
        }
    }
}

/// History read configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Default bounded-prefix length for recent-history reads
    pub recent_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { recent_limit: 10 }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(recipient) = std::env::var("SPLIT_RECIPIENT") {
            config.recipient = recipient;
        }

        if let Ok(label) = std::env::var("SPLIT_COUNTERPARTY_LABEL") {
            config.counterparty_label = label;
        }

        if let Ok(timeout) = std::env::var("SPLIT_CONFIRM_TIMEOUT_SECS") {
            config.confirmation.timeout_secs = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "settlement-engine");
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.asset.decimals, 9);
        assert_eq!(config.confirmation.timeout_secs, 60);
        assert!(!config.recipient.is_empty());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.recipient, config.recipient);
        assert_eq!(parsed.asset.decimals, config.asset.decimals);
    }
}
