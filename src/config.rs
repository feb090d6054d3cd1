//! Runtime configuration
//!
//! Defaults, overridden by `<data_dir>/config.json` when present, then by
//! command-line flags.

use crate::client::SubmissionSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Unknown network: {0} (expected mainnet, testnet, devnet or local)")]
    UnknownNetwork(String),
}

/// Well-known network endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl Network {
    pub fn url(&self) -> &'static str {
        match self {
            Network::Mainnet => "wss://xrplcluster.com",
            Network::Testnet => "wss://s.altnet.rippletest.net:51233",
            Network::Devnet => "wss://s.devnet.rippletest.net:51233",
            Network::Local => "ws://127.0.0.1:6006",
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" => Ok(Network::Local),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

/// Wallet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// WebSocket endpoint of the ledger node
    pub url: String,
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Ledgers between the current one and `LastLedgerSequence`
    pub ledger_offset: u32,
    pub poll_interval_ms: u64,
    pub fee_cushion_percent: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            url: Network::Local.url().to_string(),
            data_dir: PathBuf::from(".ledger_wallet"),
            ledger_offset: 20,
            poll_interval_ms: 1000,
            fee_cushion_percent: 0,
        }
    }
}

impl WalletConfig {
    /// Load `<data_dir>/config.json`, falling back to defaults
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let json = fs::read_to_string(&path)?;
            log::debug!("Loaded config from {:?}", path);
            serde_json::from_str(&json)?
        } else {
            Self::default()
        };
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.data_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(self.data_dir.join(CONFIG_FILE), json)?;
        Ok(())
    }

    /// Apply command-line overrides; an explicit URL beats a network name
    pub fn with_overrides(mut self, url: Option<&str>, network: Option<Network>) -> Self {
        if let Some(network) = network {
            self.url = network.url().to_string();
        }
        if let Some(url) = url {
            self.url = url.to_string();
        }
        self
    }

    pub fn wallets_dir(&self) -> PathBuf {
        self.data_dir.join("wallets")
    }

    pub fn submission_settings(&self) -> SubmissionSettings {
        SubmissionSettings {
            ledger_offset: self.ledger_offset,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            fee_cushion_percent: self.fee_cushion_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = WalletConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.ledger_offset, 20);
        assert_eq!(config.data_dir, temp_dir.path());
        assert_eq!(config.submission_settings(), SubmissionSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            r#"{ "url": "ws://node:6006", "fee_cushion_percent": 20 }"#,
        )
        .unwrap();

        let config = WalletConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.url, "ws://node:6006");
        assert_eq!(config.fee_cushion_percent, 20);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = WalletConfig::load(temp_dir.path()).unwrap();
        config.ledger_offset = 40;
        config.save().unwrap();

        assert_eq!(WalletConfig::load(temp_dir.path()).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let config = WalletConfig::default().with_overrides(None, Some(Network::Testnet));
        assert_eq!(config.url, Network::Testnet.url());

        let config = config.with_overrides(Some("ws://mine:1"), Some(Network::Devnet));
        assert_eq!(config.url, "ws://mine:1");

        assert!(matches!(
            "moonnet".parse::<Network>(),
            Err(ConfigError::UnknownNetwork(_))
        ));
    }
}
