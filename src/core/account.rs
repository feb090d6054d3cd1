//! Account and network reserve snapshots
//!
//! Both are fetched fresh for each operation and never cached.

use crate::core::amount::Drops;
use crate::core::flags::AccountRootFlags;
use crate::core::transaction::SignerEntry;
use serde::{Deserialize, Serialize};

/// Point-in-time view of an account root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: String,
    pub balance: Drops,
    pub owner_count: u32,
    pub sequence: u32,
    pub flags: u32,
}

impl AccountSnapshot {
    pub fn master_key_disabled(&self) -> bool {
        AccountRootFlags::from_bits_truncate(self.flags).contains(AccountRootFlags::DISABLE_MASTER)
    }
}

/// Network reserve requirements, in drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSchedule {
    /// Reserve every funded account must hold
    pub base: Drops,
    /// Additional reserve per owned ledger object
    pub increment: Drops,
}

impl ReserveSchedule {
    pub fn new(base: Drops, increment: Drops) -> Self {
        Self { base, increment }
    }

    /// Reserve held for an account owning `owner_count` objects
    pub fn reserve_for(&self, owner_count: u32) -> Drops {
        self.base
            .saturating_add(self.increment.saturating_mul(owner_count as u64))
    }
}

/// An account's on-ledger multi-signing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerList {
    pub quorum: u32,
    pub entries: Vec<SignerEntry>,
}

impl SignerList {
    /// Weight of `address` in the list, if it is a member
    pub fn weight_of(&self, address: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|e| e.account == address)
            .map(|e| e.signer_weight)
    }

    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|e| e.signer_weight as u32).sum()
    }
}
