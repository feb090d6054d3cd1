//! On-disk wallet store
//!
//! One JSON file per wallet under the wallets directory, plus a small
//! cache of signer addresses last used to co-sign for each account.
//! Signer seeds are never written to the cache.

use crate::wallet::wallet::{Wallet, WalletError, WalletInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SIGNER_CACHE_FILE: &str = "signer_lists.json";

/// Serializable wallet data for persistence
#[derive(Debug, Serialize, Deserialize)]
struct WalletData {
    seed: String,
    address: String,
    label: Option<String>,
    created_at: DateTime<Utc>,
}

/// Wallet store for handling multiple wallets
pub struct WalletStore {
    wallets_dir: PathBuf,
}

impl WalletStore {
    /// Open (creating if needed) a store rooted at `wallets_dir`
    pub fn new(wallets_dir: &Path) -> Result<Self, WalletError> {
        fs::create_dir_all(wallets_dir)?;
        Ok(Self {
            wallets_dir: wallets_dir.to_path_buf(),
        })
    }

    fn wallet_path(&self, address: &str) -> PathBuf {
        self.wallets_dir.join(format!("{}.json", address))
    }

    /// Save a wallet, refusing to overwrite an existing one
    pub fn save(&self, wallet: &Wallet) -> Result<(), WalletError> {
        let path = self.wallet_path(&wallet.address());
        if path.exists() {
            return Err(WalletError::AlreadyExists(wallet.address()));
        }

        let data = WalletData {
            seed: wallet.seed(),
            address: wallet.address(),
            label: wallet.label.clone(),
            created_at: wallet.created_at,
        };

        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json)?;
        log::info!("Saved wallet {}", wallet.address());
        Ok(())
    }

    /// Create and save a new wallet
    pub fn create_wallet(&self, label: Option<&str>) -> Result<Wallet, WalletError> {
        let wallet = match label {
            Some(l) => Wallet::with_label(l)?,
            None => Wallet::generate()?,
        };
        self.save(&wallet)?;
        Ok(wallet)
    }

    /// Import a wallet from its seed and save it
    pub fn import_wallet(&self, seed: &str, label: Option<&str>) -> Result<Wallet, WalletError> {
        let mut wallet = Wallet::from_seed(seed)?;
        wallet.label = label.map(str::to_string);
        self.save(&wallet)?;
        Ok(wallet)
    }

    /// Load a specific wallet by address
    pub fn load_wallet(&self, address: &str) -> Result<Wallet, WalletError> {
        let path = self.wallet_path(address);
        if !path.exists() {
            return Err(WalletError::NotFound(address.to_string()));
        }

        let json = fs::read_to_string(&path)?;
        let data: WalletData = serde_json::from_str(&json)?;

        let mut wallet = Wallet::from_seed(&data.seed)?;
        wallet.label = data.label;
        wallet.created_at = data.created_at;
        Ok(wallet)
    }

    /// Public info of every stored wallet, oldest first
    pub fn list_wallets(&self) -> Result<Vec<WalletInfo>, WalletError> {
        let mut wallets = Vec::new();

        for entry in fs::read_dir(&self.wallets_dir)? {
            let path = entry?.path();
            let is_wallet = path.extension().map(|e| e == "json").unwrap_or(false)
                && path.file_name().map(|n| n != SIGNER_CACHE_FILE).unwrap_or(false);
            if !is_wallet {
                continue;
            }

            let Some(address) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load_wallet(address) {
                Ok(wallet) => wallets.push(wallet.export_public_info()),
                Err(e) => log::warn!("Skipping unreadable wallet file {:?}: {}", path, e),
            }
        }

        wallets.sort_by_key(|w| w.created_at);
        Ok(wallets)
    }

    /// Delete a wallet
    pub fn delete_wallet(&self, address: &str) -> Result<(), WalletError> {
        let path = self.wallet_path(address);
        if !path.exists() {
            return Err(WalletError::NotFound(address.to_string()));
        }
        fs::remove_file(path)?;
        log::info!("Deleted wallet {}", address);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Signer list cache
    // -------------------------------------------------------------------------

    fn read_signer_cache(&self) -> Result<BTreeMap<String, Vec<String>>, WalletError> {
        let path = self.wallets_dir.join(SIGNER_CACHE_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Remember which signer addresses co-signed for `account`
    pub fn remember_signers(&self, account: &str, signers: &[String]) -> Result<(), WalletError> {
        let mut cache = self.read_signer_cache()?;
        cache.insert(account.to_string(), signers.to_vec());
        let json = serde_json::to_string_pretty(&cache)?;
        fs::write(self.wallets_dir.join(SIGNER_CACHE_FILE), json)?;
        Ok(())
    }

    /// Signer addresses last used for `account`
    pub fn cached_signers(&self, account: &str) -> Result<Vec<String>, WalletError> {
        Ok(self
            .read_signer_cache()?
            .remove(account)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path()).unwrap();

        let wallet = store.create_wallet(Some("savings")).unwrap();
        let loaded = store.load_wallet(&wallet.address()).unwrap();

        assert_eq!(loaded.address(), wallet.address());
        assert_eq!(loaded.label.as_deref(), Some("savings"));
        assert_eq!(loaded.seed(), wallet.seed());
    }

    #[test]
    fn test_import_twice_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path()).unwrap();
        let seed = Wallet::generate().unwrap().seed();

        store.import_wallet(&seed, None).unwrap();
        assert!(matches!(
            store.import_wallet(&seed, None),
            Err(WalletError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_list_and_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path()).unwrap();

        let a = store.create_wallet(None).unwrap();
        let b = store.create_wallet(Some("b")).unwrap();
        store
            .remember_signers(&a.address(), &[b.address()])
            .unwrap();

        let listed: Vec<String> = store
            .list_wallets()
            .unwrap()
            .into_iter()
            .map(|w| w.address)
            .collect();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&a.address()));
        assert!(listed.contains(&b.address()));

        store.delete_wallet(&a.address()).unwrap();
        assert_eq!(store.list_wallets().unwrap().len(), 1);
        assert!(matches!(
            store.load_wallet(&a.address()),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn test_signer_cache() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(temp_dir.path()).unwrap();

        assert!(store.cached_signers("rAccount").unwrap().is_empty());
        store
            .remember_signers("rAccount", &["rOne".to_string(), "rTwo".to_string()])
            .unwrap();
        assert_eq!(
            store.cached_signers("rAccount").unwrap(),
            vec!["rOne".to_string(), "rTwo".to_string()]
        );

        let raw = fs::read_to_string(temp_dir.path().join(SIGNER_CACHE_FILE)).unwrap();
        assert!(!raw.contains("seed"));
    }
}
