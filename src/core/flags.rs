//! Transaction and ledger-object flag sets

use bitflags::bitflags;

bitflags! {
    /// Flags shared by every transaction type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GlobalFlags: u32 {
        /// Marks a transaction that only executes inside a batch envelope
        const INNER_BATCH_TXN = 0x4000_0000;
    }
}

bitflags! {
    /// Execution semantics of a batch envelope
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BatchFlags: u32 {
        const ALL_OR_NOTHING = 0x0001_0000;
        const ONLY_ONE = 0x0002_0000;
        const UNTIL_FAILURE = 0x0004_0000;
        const INDEPENDENT = 0x0008_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NfTokenMintFlags: u32 {
        const BURNABLE = 0x0000_0001;
        const ONLY_XRP = 0x0000_0002;
        const TRUSTLINE = 0x0000_0004;
        const TRANSFERABLE = 0x0000_0008;
        const MUTABLE = 0x0000_0010;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MpTokenAuthorizeFlags: u32 {
        const UNAUTHORIZE = 0x0000_0001;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrustSetFlags: u32 {
        const SET_AUTH = 0x0001_0000;
        const SET_NO_RIPPLE = 0x0002_0000;
        const CLEAR_NO_RIPPLE = 0x0004_0000;
        const SET_FREEZE = 0x0010_0000;
        const CLEAR_FREEZE = 0x0020_0000;
    }
}

bitflags! {
    /// AccountRoot ledger flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccountRootFlags: u32 {
        const PASSWORD_SPENT = 0x0001_0000;
        const REQUIRE_DEST_TAG = 0x0002_0000;
        const REQUIRE_AUTH = 0x0004_0000;
        const DISALLOW_XRP = 0x0008_0000;
        const DISABLE_MASTER = 0x0010_0000;
        const NO_FREEZE = 0x0020_0000;
        const GLOBAL_FREEZE = 0x0040_0000;
        const DEFAULT_RIPPLE = 0x0080_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_flags_are_disjoint() {
        let all = BatchFlags::all();
        assert_eq!(all.bits().count_ones(), 4);
    }

    #[test]
    fn test_unknown_account_bits_are_ignored() {
        let flags = AccountRootFlags::from_bits_truncate(0x0010_0000 | 0x1);
        assert!(flags.contains(AccountRootFlags::DISABLE_MASTER));
        assert_eq!(flags.bits(), 0x0010_0000);
    }
}
