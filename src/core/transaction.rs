//! Typed ledger transactions
//!
//! Every transaction is a set of common fields plus exactly one
//! [`TransactionKind`] variant. The JSON form matches the ledger's
//! (`"TransactionType": "Payment"`, PascalCase field names), so a
//! transaction can be sent to and read back from the network unchanged.
//!
//! Transactions are assembled with [`TransactionBuilder`] instead of being
//! patched field by field after creation.

use crate::core::amount::{Amount, Drops, IssuedAmount, Issue};
use crate::core::flags::TrustSetFlags;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Transaction Type
// =============================================================================

/// Discriminator of a transaction variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Payment,
    EscrowCreate,
    EscrowFinish,
    EscrowCancel,
    CheckCreate,
    CheckCash,
    CheckCancel,
    PaymentChannelCreate,
    PaymentChannelFund,
    PaymentChannelClaim,
    OfferCreate,
    OfferCancel,
    AmmCreate,
    AmmDeposit,
    AmmWithdraw,
    TrustSet,
    TicketCreate,
    SignerListSet,
    AccountSet,
    NfTokenMint,
    NfTokenBurn,
    NfTokenModify,
    DelegateSet,
    MpTokenAuthorize,
    Batch,
}

impl TransactionType {
    /// Types able to move native currency out of the sending account
    pub const NATIVE_TRANSFER: &'static [TransactionType] = &[
        TransactionType::Payment,
        TransactionType::EscrowCreate,
        TransactionType::EscrowFinish,
        TransactionType::EscrowCancel,
        TransactionType::CheckCreate,
        TransactionType::CheckCash,
        TransactionType::CheckCancel,
        TransactionType::PaymentChannelCreate,
        TransactionType::PaymentChannelFund,
        TransactionType::PaymentChannelClaim,
        TransactionType::OfferCreate,
        TransactionType::OfferCancel,
        TransactionType::AmmCreate,
        TransactionType::AmmDeposit,
        TransactionType::AmmWithdraw,
    ];

    pub fn moves_native_currency(&self) -> bool {
        Self::NATIVE_TRANSFER.contains(self)
    }

    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Payment => "Payment",
            TransactionType::EscrowCreate => "EscrowCreate",
            TransactionType::EscrowFinish => "EscrowFinish",
            TransactionType::EscrowCancel => "EscrowCancel",
            TransactionType::CheckCreate => "CheckCreate",
            TransactionType::CheckCash => "CheckCash",
            TransactionType::CheckCancel => "CheckCancel",
            TransactionType::PaymentChannelCreate => "PaymentChannelCreate",
            TransactionType::PaymentChannelFund => "PaymentChannelFund",
            TransactionType::PaymentChannelClaim => "PaymentChannelClaim",
            TransactionType::OfferCreate => "OfferCreate",
            TransactionType::OfferCancel => "OfferCancel",
            TransactionType::AmmCreate => "AMMCreate",
            TransactionType::AmmDeposit => "AMMDeposit",
            TransactionType::AmmWithdraw => "AMMWithdraw",
            TransactionType::TrustSet => "TrustSet",
            TransactionType::TicketCreate => "TicketCreate",
            TransactionType::SignerListSet => "SignerListSet",
            TransactionType::AccountSet => "AccountSet",
            TransactionType::NfTokenMint => "NFTokenMint",
            TransactionType::NfTokenBurn => "NFTokenBurn",
            TransactionType::NfTokenModify => "NFTokenModify",
            TransactionType::DelegateSet => "DelegateSet",
            TransactionType::MpTokenAuthorize => "MPTokenAuthorize",
            TransactionType::Batch => "Batch",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Shared field objects
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Memo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoWrapper {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

/// One signature of a multi-signed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Signer {
    pub account: String,
    pub txn_signature: String,
    pub signing_pub_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerWrapper {
    #[serde(rename = "Signer")]
    pub signer: Signer,
}

/// Authorized co-signer and its weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignerEntry {
    pub account: String,
    pub signer_weight: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerEntryWrapper {
    #[serde(rename = "SignerEntry")]
    pub signer_entry: SignerEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Permission {
    pub permission_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionWrapper {
    #[serde(rename = "Permission")]
    pub permission: Permission,
}

impl PermissionWrapper {
    pub fn new(value: &str) -> Self {
        Self {
            permission: Permission {
                permission_value: value.to_string(),
            },
        }
    }
}

/// Inner transaction of a batch envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "RawTransaction")]
    pub raw_transaction: Transaction,
}

// =============================================================================
// Common Fields
// =============================================================================

/// Fields every transaction type may carry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommonFields {
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Drops>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ledger_sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tag: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memos: Option<Vec<MemoWrapper>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_pub_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<SignerWrapper>>,
}

// =============================================================================
// Transaction Variants
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub destination: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_tag: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_max: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliver_min: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EscrowCreate {
    pub destination: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_after: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_after: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EscrowFinish {
    pub owner: String,
    pub offer_sequence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EscrowCancel {
    pub owner: String,
    pub offer_sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckCreate {
    pub destination: String,
    pub send_max: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CheckCash {
    #[serde(rename = "CheckID")]
    pub check_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliver_min: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckCancel {
    #[serde(rename = "CheckID")]
    pub check_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelCreate {
    pub destination: String,
    pub amount: Amount,
    pub settle_delay: u32,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelFund {
    pub channel: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentChannelClaim {
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCreate {
    pub taker_gets: Amount,
    pub taker_pays: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_sequence: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferCancel {
    pub offer_sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AmmCreate {
    pub amount: Amount,
    pub amount2: Amount,
    pub trading_fee: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AmmDeposit {
    pub asset: Issue,
    pub asset2: Issue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount2: Option<Amount>,
    #[serde(rename = "LPTokenOut", default, skip_serializing_if = "Option::is_none")]
    pub lp_token_out: Option<IssuedAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AmmWithdraw {
    pub asset: Issue,
    pub asset2: Issue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount2: Option<Amount>,
    #[serde(rename = "LPTokenIn", default, skip_serializing_if = "Option::is_none")]
    pub lp_token_in: Option<IssuedAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrustSet {
    pub limit_amount: IssuedAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_in: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_out: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TicketCreate {
    pub ticket_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignerListSet {
    pub signer_quorum: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_entries: Option<Vec<SignerEntryWrapper>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_flag: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_flag: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NfTokenMint {
    #[serde(rename = "NFTokenTaxon")]
    pub nftoken_taxon: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_fee: Option<u16>,
    #[serde(rename = "URI", default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NfTokenBurn {
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NfTokenModify {
    #[serde(rename = "NFTokenID")]
    pub nftoken_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "URI", default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DelegateSet {
    pub authorize: String,
    pub permissions: Vec<PermissionWrapper>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MpTokenAuthorize {
    #[serde(rename = "MPTokenIssuanceID")]
    pub mptoken_issuance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Batch {
    pub raw_transactions: Vec<RawTransaction>,
}

// =============================================================================
// Transaction Kind
// =============================================================================

/// The closed set of supported transaction variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "TransactionType")]
pub enum TransactionKind {
    Payment(Payment),
    EscrowCreate(EscrowCreate),
    EscrowFinish(EscrowFinish),
    EscrowCancel(EscrowCancel),
    CheckCreate(CheckCreate),
    CheckCash(CheckCash),
    CheckCancel(CheckCancel),
    PaymentChannelCreate(PaymentChannelCreate),
    PaymentChannelFund(PaymentChannelFund),
    PaymentChannelClaim(PaymentChannelClaim),
    OfferCreate(OfferCreate),
    OfferCancel(OfferCancel),
    #[serde(rename = "AMMCreate")]
    AmmCreate(AmmCreate),
    #[serde(rename = "AMMDeposit")]
    AmmDeposit(AmmDeposit),
    #[serde(rename = "AMMWithdraw")]
    AmmWithdraw(AmmWithdraw),
    TrustSet(TrustSet),
    TicketCreate(TicketCreate),
    SignerListSet(SignerListSet),
    AccountSet(AccountSet),
    #[serde(rename = "NFTokenMint")]
    NfTokenMint(NfTokenMint),
    #[serde(rename = "NFTokenBurn")]
    NfTokenBurn(NfTokenBurn),
    #[serde(rename = "NFTokenModify")]
    NfTokenModify(NfTokenModify),
    DelegateSet(DelegateSet),
    #[serde(rename = "MPTokenAuthorize")]
    MpTokenAuthorize(MpTokenAuthorize),
    Batch(Batch),
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for TransactionKind {
                fn from(inner: $variant) -> Self {
                    TransactionKind::$variant(inner)
                }
            }
        )*
    };
}

impl_from_variant!(
    Payment,
    EscrowCreate,
    EscrowFinish,
    EscrowCancel,
    CheckCreate,
    CheckCash,
    CheckCancel,
    PaymentChannelCreate,
    PaymentChannelFund,
    PaymentChannelClaim,
    OfferCreate,
    OfferCancel,
    AmmCreate,
    AmmDeposit,
    AmmWithdraw,
    TrustSet,
    TicketCreate,
    SignerListSet,
    AccountSet,
    NfTokenMint,
    NfTokenBurn,
    NfTokenModify,
    DelegateSet,
    MpTokenAuthorize,
    Batch,
);

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Payment(_) => TransactionType::Payment,
            TransactionKind::EscrowCreate(_) => TransactionType::EscrowCreate,
            TransactionKind::EscrowFinish(_) => TransactionType::EscrowFinish,
            TransactionKind::EscrowCancel(_) => TransactionType::EscrowCancel,
            TransactionKind::CheckCreate(_) => TransactionType::CheckCreate,
            TransactionKind::CheckCash(_) => TransactionType::CheckCash,
            TransactionKind::CheckCancel(_) => TransactionType::CheckCancel,
            TransactionKind::PaymentChannelCreate(_) => TransactionType::PaymentChannelCreate,
            TransactionKind::PaymentChannelFund(_) => TransactionType::PaymentChannelFund,
            TransactionKind::PaymentChannelClaim(_) => TransactionType::PaymentChannelClaim,
            TransactionKind::OfferCreate(_) => TransactionType::OfferCreate,
            TransactionKind::OfferCancel(_) => TransactionType::OfferCancel,
            TransactionKind::AmmCreate(_) => TransactionType::AmmCreate,
            TransactionKind::AmmDeposit(_) => TransactionType::AmmDeposit,
            TransactionKind::AmmWithdraw(_) => TransactionType::AmmWithdraw,
            TransactionKind::TrustSet(_) => TransactionType::TrustSet,
            TransactionKind::TicketCreate(_) => TransactionType::TicketCreate,
            TransactionKind::SignerListSet(_) => TransactionType::SignerListSet,
            TransactionKind::AccountSet(_) => TransactionType::AccountSet,
            TransactionKind::NfTokenMint(_) => TransactionType::NfTokenMint,
            TransactionKind::NfTokenBurn(_) => TransactionType::NfTokenBurn,
            TransactionKind::NfTokenModify(_) => TransactionType::NfTokenModify,
            TransactionKind::DelegateSet(_) => TransactionType::DelegateSet,
            TransactionKind::MpTokenAuthorize(_) => TransactionType::MpTokenAuthorize,
            TransactionKind::Batch(_) => TransactionType::Batch,
        }
    }

    /// The variant's own `Amount` field, if it has one
    pub fn amount_field(&self) -> Option<&Amount> {
        match self {
            TransactionKind::Payment(tx) => Some(&tx.amount),
            TransactionKind::EscrowCreate(tx) => Some(&tx.amount),
            TransactionKind::CheckCash(tx) => tx.amount.as_ref(),
            TransactionKind::PaymentChannelCreate(tx) => Some(&tx.amount),
            TransactionKind::PaymentChannelFund(tx) => Some(&tx.amount),
            TransactionKind::PaymentChannelClaim(tx) => tx.amount.as_ref(),
            TransactionKind::AmmCreate(tx) => Some(&tx.amount),
            TransactionKind::AmmDeposit(tx) => tx.amount.as_ref(),
            TransactionKind::AmmWithdraw(tx) => tx.amount.as_ref(),
            TransactionKind::NfTokenMint(tx) => tx.amount.as_ref(),
            _ => None,
        }
    }

    /// Whether this transaction adds one owned ledger object to its sender.
    ///
    /// Decided from the type alone (plus limit/flags for TrustSet), not from
    /// what the ledger ends up doing.
    pub fn increases_owner_count(&self, flags: u32) -> bool {
        match self {
            TransactionKind::TrustSet(tx) => {
                let limit_is_zero = tx
                    .limit_amount
                    .value
                    .parse::<f64>()
                    .map(|v| v == 0.0)
                    .unwrap_or(false);
                let trust_flags = TrustSetFlags::from_bits_truncate(flags);
                !limit_is_zero || !trust_flags.is_empty()
            }
            TransactionKind::OfferCreate(_)
            | TransactionKind::CheckCreate(_)
            | TransactionKind::EscrowCreate(_)
            | TransactionKind::PaymentChannelCreate(_)
            | TransactionKind::TicketCreate(_)
            | TransactionKind::SignerListSet(_)
            | TransactionKind::AmmDeposit(_)
            | TransactionKind::NfTokenMint(_) => true,
            _ => false,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A ledger transaction: common fields plus one typed variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    // Must stay first: flattened structs claim their keys in declaration order
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn account(&self) -> &str {
        &self.common.account
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    pub fn flags(&self) -> u32 {
        self.common.flags.unwrap_or(0)
    }

    pub fn fee(&self) -> Option<Drops> {
        self.common.fee
    }

    /// Native value carried in the `Amount` field, if any
    pub fn native_amount(&self) -> Option<Drops> {
        self.kind.amount_field().and_then(Amount::as_native)
    }

    pub fn increases_owner_count(&self) -> bool {
        self.kind.increases_owner_count(self.flags())
    }

    /// Remove every signature-bearing field
    pub fn strip_signatures(&mut self) {
        self.common.signers = None;
        self.common.txn_signature = None;
    }

    pub fn is_multisigned(&self) -> bool {
        self.common
            .signers
            .as_ref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }

    /// Inner transactions when this is a batch envelope
    pub fn inner_transactions(&self) -> Option<Vec<&Transaction>> {
        match &self.kind {
            TransactionKind::Batch(batch) => Some(
                batch
                    .raw_transactions
                    .iter()
                    .map(|raw| &raw.raw_transaction)
                    .collect(),
            ),
            _ => None,
        }
    }
}

// =============================================================================
// Transaction Builder
// =============================================================================

/// Builder for a [`Transaction`]
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    common: CommonFields,
}

impl TransactionBuilder {
    pub fn new(account: &str) -> Self {
        Self {
            common: CommonFields {
                account: account.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn fee(mut self, fee: Drops) -> Self {
        self.common.fee = Some(fee);
        self
    }

    pub fn sequence(mut self, sequence: u32) -> Self {
        self.common.sequence = Some(sequence);
        self
    }

    /// Consume a ticket instead of the account sequence
    pub fn ticket_sequence(mut self, ticket: u32) -> Self {
        self.common.ticket_sequence = Some(ticket);
        self.common.sequence = Some(0);
        self
    }

    pub fn last_ledger_sequence(mut self, ledger: u32) -> Self {
        self.common.last_ledger_sequence = Some(ledger);
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.common.flags = Some(flags);
        self
    }

    pub fn source_tag(mut self, tag: u32) -> Self {
        self.common.source_tag = Some(tag);
        self
    }

    /// Send on behalf of `delegate`'s grant
    pub fn delegate(mut self, delegate: &str) -> Self {
        self.common.delegate = Some(delegate.to_string());
        self
    }

    /// Attach a memo (type and data are hex-encoded here)
    pub fn memo(mut self, memo_type: &str, memo_data: &str) -> Self {
        let memo = MemoWrapper {
            memo: Memo {
                memo_type: Some(hex::encode_upper(memo_type)),
                memo_data: Some(hex::encode_upper(memo_data)),
                memo_format: None,
            },
        };
        self.common.memos.get_or_insert_with(Vec::new).push(memo);
        self
    }

    pub fn build(self, kind: impl Into<TransactionKind>) -> Transaction {
        Transaction {
            common: self.common,
            kind: kind.into(),
        }
    }
}
