//! Binary field definitions
//!
//! Every serialized field is identified by its type code and its ordinal
//! (`nth`) within that type. Fields of an object are written sorted by
//! `(type code, nth)`.

/// Serialized field types and their type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    UInt16,
    UInt32,
    Hash256,
    Amount,
    Blob,
    AccountId,
    StObject,
    StArray,
    Hash192,
    Issue,
}

impl FieldType {
    pub fn code(self) -> u8 {
        match self {
            FieldType::UInt16 => 1,
            FieldType::UInt32 => 2,
            FieldType::Hash256 => 5,
            FieldType::Amount => 6,
            FieldType::Blob => 7,
            FieldType::AccountId => 8,
            FieldType::StObject => 14,
            FieldType::StArray => 15,
            FieldType::Hash192 => 21,
            FieldType::Issue => 24,
        }
    }
}

/// One serializable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub nth: u8,
    /// Part of the data a signature covers
    pub signing: bool,
}

impl FieldDef {
    /// Sort key inside an object
    pub fn ordinal(&self) -> (u8, u8) {
        (self.field_type.code(), self.nth)
    }

    /// Field ID bytes: one to three depending on code sizes
    pub fn header(&self) -> Vec<u8> {
        let type_code = self.field_type.code();
        match (type_code < 16, self.nth < 16) {
            (true, true) => vec![(type_code << 4) | self.nth],
            (true, false) => vec![type_code << 4, self.nth],
            (false, true) => vec![self.nth, type_code],
            (false, false) => vec![0, type_code, self.nth],
        }
    }
}

const fn field(name: &'static str, field_type: FieldType, nth: u8) -> FieldDef {
    FieldDef {
        name,
        field_type,
        nth,
        signing: true,
    }
}

const fn unsigned_field(name: &'static str, field_type: FieldType, nth: u8) -> FieldDef {
    FieldDef {
        name,
        field_type,
        nth,
        signing: false,
    }
}

/// Header that closes an object
pub const OBJECT_END_MARKER: u8 = 0xE1;

/// Header that closes an array
pub const ARRAY_END_MARKER: u8 = 0xF1;

pub const FIELDS: &[FieldDef] = &[
    // UInt16
    field("TransactionType", FieldType::UInt16, 2),
    field("SignerWeight", FieldType::UInt16, 3),
    field("TransferFee", FieldType::UInt16, 4),
    field("TradingFee", FieldType::UInt16, 5),
    // UInt32
    field("Flags", FieldType::UInt32, 2),
    field("SourceTag", FieldType::UInt32, 3),
    field("Sequence", FieldType::UInt32, 4),
    field("Expiration", FieldType::UInt32, 10),
    field("DestinationTag", FieldType::UInt32, 14),
    field("QualityIn", FieldType::UInt32, 20),
    field("QualityOut", FieldType::UInt32, 21),
    field("OfferSequence", FieldType::UInt32, 25),
    field("LastLedgerSequence", FieldType::UInt32, 27),
    field("SetFlag", FieldType::UInt32, 33),
    field("ClearFlag", FieldType::UInt32, 34),
    field("SignerQuorum", FieldType::UInt32, 35),
    field("CancelAfter", FieldType::UInt32, 36),
    field("FinishAfter", FieldType::UInt32, 37),
    field("SettleDelay", FieldType::UInt32, 39),
    field("TicketCount", FieldType::UInt32, 40),
    field("TicketSequence", FieldType::UInt32, 41),
    field("NFTokenTaxon", FieldType::UInt32, 42),
    field("PermissionValue", FieldType::UInt32, 52),
    // Hash256
    field("NFTokenID", FieldType::Hash256, 10),
    field("Channel", FieldType::Hash256, 22),
    field("CheckID", FieldType::Hash256, 24),
    // Amount
    field("Amount", FieldType::Amount, 1),
    field("Balance", FieldType::Amount, 2),
    field("LimitAmount", FieldType::Amount, 3),
    field("TakerPays", FieldType::Amount, 4),
    field("TakerGets", FieldType::Amount, 5),
    field("Fee", FieldType::Amount, 8),
    field("SendMax", FieldType::Amount, 9),
    field("DeliverMin", FieldType::Amount, 10),
    field("Amount2", FieldType::Amount, 11),
    field("LPTokenOut", FieldType::Amount, 25),
    field("LPTokenIn", FieldType::Amount, 26),
    // Blob
    field("PublicKey", FieldType::Blob, 1),
    field("SigningPubKey", FieldType::Blob, 3),
    unsigned_field("TxnSignature", FieldType::Blob, 4),
    field("URI", FieldType::Blob, 5),
    field("Signature", FieldType::Blob, 6),
    field("Domain", FieldType::Blob, 7),
    field("MemoType", FieldType::Blob, 12),
    field("MemoData", FieldType::Blob, 13),
    field("MemoFormat", FieldType::Blob, 14),
    field("Fulfillment", FieldType::Blob, 16),
    field("Condition", FieldType::Blob, 17),
    // AccountID
    field("Account", FieldType::AccountId, 1),
    field("Owner", FieldType::AccountId, 2),
    field("Destination", FieldType::AccountId, 3),
    field("Issuer", FieldType::AccountId, 4),
    field("Authorize", FieldType::AccountId, 5),
    field("Holder", FieldType::AccountId, 11),
    field("Delegate", FieldType::AccountId, 12),
    // STObject
    field("Memo", FieldType::StObject, 10),
    field("SignerEntry", FieldType::StObject, 11),
    field("Permission", FieldType::StObject, 15),
    field("Signer", FieldType::StObject, 16),
    field("RawTransaction", FieldType::StObject, 34),
    // STArray
    unsigned_field("Signers", FieldType::StArray, 3),
    field("SignerEntries", FieldType::StArray, 4),
    field("Memos", FieldType::StArray, 9),
    field("Permissions", FieldType::StArray, 29),
    field("RawTransactions", FieldType::StArray, 30),
    // Hash192
    field("MPTokenIssuanceID", FieldType::Hash192, 1),
    // Issue
    field("Asset", FieldType::Issue, 3),
    field("Asset2", FieldType::Issue, 4),
];

pub fn field_by_name(name: &str) -> Option<&'static FieldDef> {
    FIELDS.iter().find(|f| f.name == name)
}

pub fn field_by_code(type_code: u8, nth: u8) -> Option<&'static FieldDef> {
    FIELDS
        .iter()
        .find(|f| f.field_type.code() == type_code && f.nth == nth)
}

/// Wire codes of the transaction types
pub const TRANSACTION_TYPES: &[(&str, u16)] = &[
    ("Payment", 0),
    ("EscrowCreate", 1),
    ("EscrowFinish", 2),
    ("AccountSet", 3),
    ("EscrowCancel", 4),
    ("SetRegularKey", 5),
    ("OfferCreate", 7),
    ("OfferCancel", 8),
    ("TicketCreate", 10),
    ("SignerListSet", 12),
    ("PaymentChannelCreate", 13),
    ("PaymentChannelFund", 14),
    ("PaymentChannelClaim", 15),
    ("CheckCreate", 16),
    ("CheckCash", 17),
    ("CheckCancel", 18),
    ("DepositPreauth", 19),
    ("TrustSet", 20),
    ("AccountDelete", 21),
    ("NFTokenMint", 25),
    ("NFTokenBurn", 26),
    ("NFTokenCreateOffer", 27),
    ("NFTokenCancelOffer", 28),
    ("NFTokenAcceptOffer", 29),
    ("Clawback", 30),
    ("AMMClawback", 31),
    ("AMMCreate", 35),
    ("AMMDeposit", 36),
    ("AMMWithdraw", 37),
    ("AMMVote", 38),
    ("AMMBid", 39),
    ("AMMDelete", 40),
    ("MPTokenIssuanceCreate", 54),
    ("MPTokenIssuanceDestroy", 55),
    ("MPTokenIssuanceSet", 56),
    ("MPTokenAuthorize", 57),
    ("NFTokenModify", 61),
    ("DelegateSet", 64),
    ("Batch", 71),
];

pub fn transaction_type_code(name: &str) -> Option<u16> {
    TRANSACTION_TYPES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

pub fn transaction_type_name(code: u16) -> Option<&'static str> {
    TRANSACTION_TYPES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

/// Permissions narrower than a whole transaction type
pub const GRANULAR_PERMISSIONS: &[(&str, u32)] = &[
    ("TrustlineAuthorize", 65537),
    ("TrustlineFreeze", 65538),
    ("TrustlineUnfreeze", 65539),
    ("AccountDomainSet", 65540),
    ("AccountEmailHashSet", 65541),
    ("AccountMessageKeySet", 65542),
    ("AccountTransferRateSet", 65543),
    ("AccountTickSizeSet", 65544),
    ("PaymentMint", 65545),
    ("PaymentBurn", 65546),
    ("MPTokenIssuanceLock", 65547),
    ("MPTokenIssuanceUnlock", 65548),
];

/// A granular permission, or a transaction type (its code plus one)
pub fn permission_code(name: &str) -> Option<u32> {
    GRANULAR_PERMISSIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
        .or_else(|| transaction_type_code(name).map(|code| u32::from(code) + 1))
}

pub fn permission_name(code: u32) -> Option<&'static str> {
    GRANULAR_PERMISSIONS
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
        .or_else(|| {
            code.checked_sub(1)
                .and_then(|c| u16::try_from(c).ok())
                .and_then(transaction_type_name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        let header = |name: &str| field_by_name(name).unwrap().header();
        assert_eq!(header("TransactionType"), vec![0x12]);
        assert_eq!(header("Fee"), vec![0x68]);
        assert_eq!(header("Account"), vec![0x81]);
        assert_eq!(header("LastLedgerSequence"), vec![0x20, 0x1B]);
        assert_eq!(header("MPTokenIssuanceID"), vec![0x01, 0x15]);
        assert_eq!(header("RawTransaction"), vec![0xE0, 0x22]);
    }

    #[test]
    fn test_field_lookup_both_ways() {
        for def in FIELDS {
            assert_eq!(field_by_code(def.field_type.code(), def.nth), Some(def));
        }
    }

    #[test]
    fn test_signature_fields_are_not_signed() {
        assert!(!field_by_name("TxnSignature").unwrap().signing);
        assert!(!field_by_name("Signers").unwrap().signing);
        assert!(field_by_name("SigningPubKey").unwrap().signing);
    }

    #[test]
    fn test_permissions() {
        assert_eq!(permission_code("Payment"), Some(1));
        assert_eq!(permission_code("TrustSet"), Some(21));
        assert_eq!(permission_code("PaymentMint"), Some(65545));
        assert_eq!(permission_name(21), Some("TrustSet"));
        assert_eq!(permission_code("NotAThing"), None);
        assert_eq!(permission_name(0), None);
    }
}
