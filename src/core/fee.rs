//! Fee quoting
//!
//! Turns the network's fee levels into the fee a particular transaction
//! should carry:
//! - single-signed: the quoted fee
//! - multi-signed: quoted × (signers + 1)
//! - batch envelope: base × (2 + inner count)

use crate::core::amount::Drops;
use serde::{Deserialize, Serialize};

// =============================================================================
// Fee Levels
// =============================================================================

/// Fee levels reported by the network, in drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLevels {
    /// Reference cost of the cheapest transaction
    pub base: Drops,
    /// Minimum to get into the open ledger right now
    pub open_ledger: Drops,
    pub median: Drops,
    pub minimum: Drops,
}

impl FeeLevels {
    /// Flat levels, for networks that only report a base fee
    pub fn flat(base: Drops) -> Self {
        Self {
            base,
            open_ledger: base,
            median: base,
            minimum: base,
        }
    }

    /// Fee to quote for one ordinary transaction
    pub fn recommended(&self) -> Drops {
        self.base.max(self.open_ledger)
    }
}

// =============================================================================
// Quotes
// =============================================================================

/// Multi-sign surcharge: every signer pays for one more base transaction
pub fn multisign_fee(quoted: Drops, signer_count: usize) -> Drops {
    quoted.saturating_mul(signer_count as u64 + 1)
}

/// Fee of a batch envelope with `inner_count` inner transactions
pub fn batch_fee(base: Drops, inner_count: usize) -> Drops {
    base.saturating_mul(2 + inner_count as u64)
}

/// Add a percentage on top of a quote, rounding up
pub fn with_cushion(fee: Drops, percent: u32) -> Drops {
    if percent == 0 {
        return fee;
    }
    let extra = (fee.as_u64().saturating_mul(percent as u64)).div_ceil(100);
    fee.saturating_add(Drops(extra))
}
