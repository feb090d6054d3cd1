//! CLI commands for the wallet
//!
//! Implements all command handlers for the CLI interface. Network commands
//! are async and take any [`LedgerClient`].

use crate::actions::{build_action, ACTIONS};
use crate::batch::{build_envelope, submit_batch, BatchMode, SubmitOptions};
use crate::client::{
    fetch_account_context, submission_fee, AccountContext, LedgerClient, SubmitResponse,
};
use crate::config::WalletConfig;
use crate::core::{
    batch_requirement, reserve_requirement, spendable, ActionState, Drops, ReserveRequirement,
    Transaction, TransactionType,
};
use crate::multisig::{submit_multisigned, SignerCredential};
use crate::validation::{Form, Validator};
use crate::wallet::{Wallet, WalletStore};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub config: WalletConfig,
    pub store: WalletStore,
    pub validator: Validator,
}

impl AppState {
    /// Initialize application state
    pub fn new(config: WalletConfig) -> CliResult<Self> {
        let store = WalletStore::new(&config.wallets_dir())?;
        Ok(Self {
            config,
            store,
            validator: Validator::builtin()?,
        })
    }
}

/// Parse `key=value` pairs into a form
pub fn parse_fields(pairs: &[String]) -> CliResult<Form> {
    let mut form = Form::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got {}", pair))?;
        form.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(form)
}

/// Parse `address:seed` signer arguments
pub fn parse_signers(args: &[String]) -> CliResult<Vec<SignerCredential>> {
    Ok(args
        .iter()
        .map(|a| a.parse::<SignerCredential>())
        .collect::<Result<Vec<_>, _>>()?)
}

// =============================================================================
// Wallet commands
// =============================================================================

fn print_new_wallet(wallet: &Wallet) {
    println!("   📍 Address: {}", wallet.address());
    println!("   🔑 Public Key: {}", wallet.public_key());
    if let Some(l) = &wallet.label {
        println!("   🏷️  Label: {}", l);
    }
}

/// Create a new wallet
pub fn cmd_wallet_new(state: &AppState, label: Option<&str>) -> CliResult<()> {
    let wallet = state.store.create_wallet(label)?;

    println!("🔐 New wallet created!");
    print_new_wallet(&wallet);
    println!("\n   ⚠️  IMPORTANT: The seed is stored in the wallets directory.");
    println!("   Back up this directory to avoid losing access to your funds!");
    println!("   The account exists on the ledger only once it receives the base reserve.");

    Ok(())
}

/// Import a wallet from its seed
pub fn cmd_wallet_import(state: &AppState, seed: &str, label: Option<&str>) -> CliResult<()> {
    let wallet = state.store.import_wallet(seed, label)?;

    println!("📥 Wallet imported!");
    print_new_wallet(&wallet);

    Ok(())
}

/// List all wallets
pub fn cmd_wallet_list(state: &AppState) -> CliResult<()> {
    let wallets = state.store.list_wallets()?;

    if wallets.is_empty() {
        println!("📭 No wallets found. Create one with: ledger-wallet wallet new");
        return Ok(());
    }

    println!("📋 Wallets:");
    for info in wallets {
        let label = info.label.as_deref().unwrap_or("unlabeled");
        println!(
            "   {} ({}) - created {}",
            info.address,
            label,
            info.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

/// Show one wallet, optionally with its seed
pub fn cmd_wallet_show(state: &AppState, address: &str, show_seed: bool) -> CliResult<()> {
    let wallet = state.store.load_wallet(address)?;

    println!("👛 Wallet {}", wallet.address());
    println!("   ├─ Public Key: {}", wallet.public_key());
    println!(
        "   ├─ Label: {}",
        wallet.label.as_deref().unwrap_or("unlabeled")
    );
    println!("   └─ Created: {}", wallet.created_at.to_rfc3339());
    if show_seed {
        println!("\n   🔑 Seed: {}", wallet.seed());
        println!("   ⚠️  Anyone with this seed controls the account.");
    }

    let cached = state.store.cached_signers(address)?;
    if !cached.is_empty() {
        println!("\n   Last co-signers: {}", cached.join(", "));
    }

    Ok(())
}

/// Delete a wallet
pub fn cmd_wallet_delete(state: &AppState, address: &str) -> CliResult<()> {
    state.store.delete_wallet(address)?;
    println!("🗑️  Wallet {} deleted", address);
    Ok(())
}

/// List the supported actions with their fields (`*` marks required)
pub fn cmd_actions(state: &AppState) -> CliResult<()> {
    println!("🧩 Actions:");
    for action in ACTIONS {
        let fields = state
            .validator
            .fields(action)
            .map(|rules| {
                rules
                    .iter()
                    .map(|(name, rule)| {
                        if rule.required {
                            format!("{}*", name)
                        } else {
                            name.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!("   • {}: {}", action, fields);
    }
    Ok(())
}

// =============================================================================
// Account view
// =============================================================================

/// Show an account's balance, reserve and owned objects
pub async fn cmd_account<C: LedgerClient + ?Sized>(client: &C, address: &str) -> CliResult<()> {
    let context = fetch_account_context(client, address).await?;
    let objects = client.account_objects(address).await?;

    let account = &context.account;
    let reserve = context.reserve.reserve_for(account.owner_count);

    println!("🏦 Account {}", address);
    println!("   ├─ Balance: {} XRP", account.balance.to_xrp());
    println!("   ├─ Reserve: {} XRP", reserve.to_xrp());
    println!(
        "   ├─ Spendable: {} XRP",
        spendable(&context.reserve, account).to_xrp()
    );
    println!("   ├─ Sequence: {}", account.sequence);
    println!("   ├─ Owner count: {}", account.owner_count);
    println!(
        "   └─ Master key: {}",
        if account.master_key_disabled() {
            "disabled"
        } else {
            "enabled"
        }
    );

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for object in &objects {
        let kind = object
            .get("LedgerEntryType")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        *by_type.entry(kind.to_string()).or_default() += 1;
    }

    if !by_type.is_empty() {
        println!("\n   Owned objects:");
        for (kind, count) in by_type {
            println!("   • {}: {}", kind, count);
        }
    }

    println!(
        "\n   Ledger {} · fee {} drops",
        context.ledger_index,
        context.fees.recommended()
    );

    Ok(())
}

// =============================================================================
// Sufficiency and submission
// =============================================================================

/// Display-unit native amount a built transaction sends, "0" for none.
/// Forms are not consulted: an MPT or issued `amount` is not native.
fn sent_amount(tx: &Transaction) -> String {
    tx.native_amount().unwrap_or(Drops::ZERO).to_xrp()
}

/// What `tx` needs from its sender at `fee`; envelopes count their inner
/// transactions
fn requirement(
    context: &AccountContext,
    tx: &Transaction,
    fee: Drops,
) -> CliResult<ReserveRequirement> {
    if tx.transaction_type() == TransactionType::Batch {
        return Ok(batch_requirement(&context.reserve, &context.account, tx, fee));
    }
    Ok(reserve_requirement(
        &context.reserve,
        &context.account,
        &sent_amount(tx),
        tx,
        fee,
    )?)
}

/// Fail early when `tx` cannot be afforded by its sender. The fee is the
/// one submission will pay: multisign surcharge and override included.
async fn ensure_sufficient<C: LedgerClient + ?Sized>(
    client: &C,
    tx: &Transaction,
    signer_count: usize,
    fee_override: Option<Drops>,
) -> CliResult<()> {
    let context = fetch_account_context(client, tx.account()).await?;
    let fee = submission_fee(client, tx, signer_count, fee_override).await?;
    let needed = requirement(&context, tx, fee)?;

    log::debug!(
        "{} from {} needs {} (fee {}), balance {}",
        tx.transaction_type(),
        tx.account(),
        needed.total,
        needed.fee,
        context.account.balance
    );
    if context.account.balance < needed.total {
        return Err(format!(
            "insufficient balance: {} XRP needed, {} XRP available",
            needed.total.to_xrp(),
            context.account.balance.to_xrp()
        )
        .into());
    }
    Ok(())
}

/// Dry-run the sufficiency check for an action
pub async fn cmd_check<C: LedgerClient + ?Sized>(
    state: &AppState,
    client: &C,
    from: &str,
    action: &str,
    form: &Form,
    signer_count: usize,
    fee_override: Option<Drops>,
) -> CliResult<()> {
    let tx = build_action(&state.validator, action, from, form)?;

    let context = fetch_account_context(client, from).await?;
    let fee = submission_fee(client, &tx, signer_count, fee_override).await?;
    let needed = requirement(&context, &tx, fee)?;

    println!("🧮 {} from {}", tx.transaction_type(), from);
    println!("   ├─ Sent: {} XRP", needed.native.to_xrp());
    println!("   ├─ Fee: {} drops", needed.fee);
    println!("   ├─ Reserve after: {} XRP", needed.reserve.to_xrp());
    println!("   ├─ Total needed: {} XRP", needed.total.to_xrp());
    println!("   └─ Balance: {} XRP", context.account.balance.to_xrp());

    if context.account.balance < needed.total {
        println!("\n❌ Insufficient balance");
    } else {
        println!("\n✅ Balance is sufficient");
    }

    Ok(())
}

/// Ask the ledger how an action would apply, without submitting it
pub async fn cmd_simulate<C: LedgerClient + ?Sized>(
    state: &AppState,
    client: &C,
    from: &str,
    action: &str,
    form: &Form,
) -> CliResult<()> {
    let tx = build_action(&state.validator, action, from, form)?;
    let filled = client.autofill(tx).await?;
    let simulation = client.simulate(&filled).await?;

    println!("🔮 Simulated {} from {}", filled.transaction_type(), from);
    println!("   ├─ Fee: {} drops", filled.common.fee.unwrap_or(Drops::ZERO));
    if let Some(message) = &simulation.engine_result_message {
        println!("   ├─ Message: {}", message);
    }
    println!("   └─ Engine result: {}", simulation.engine_result);

    if simulation.is_success() {
        println!("\n✅ Would succeed (nothing was submitted)");
    } else {
        println!("\n❌ Would fail (nothing was submitted)");
    }

    Ok(())
}

fn print_response(response: &SubmitResponse) {
    println!("   ├─ Hash: {}", response.hash);
    println!("   ├─ Engine result: {}", response.engine_result);
    if let Some(message) = &response.engine_result_message {
        println!("   ├─ Message: {}", message);
    }
    println!(
        "   └─ Validated: {}",
        if response.validated { "yes" } else { "no" }
    );
}

/// Settle an async submission into an [`ActionState`] and report it
fn report(progress: ActionState<SubmitResponse>) -> CliResult<()> {
    match progress {
        ActionState::Succeeded(response) => {
            println!("\n✅ Submitted");
            print_response(&response);
            Ok(())
        }
        ActionState::Failed(reason) => {
            println!("\n❌ {}", reason);
            Err(reason.into())
        }
        other => Err(format!("submission ended {:?}", other).into()),
    }
}

/// Build, sign and submit one action
pub async fn cmd_submit<C: LedgerClient + ?Sized>(
    state: &AppState,
    client: &C,
    from: &str,
    action: &str,
    form: &Form,
    signers: &[SignerCredential],
    fee_override: Option<Drops>,
) -> CliResult<()> {
    let mut tx = build_action(&state.validator, action, from, form)?;
    ensure_sufficient(client, &tx, signers.len(), fee_override).await?;

    println!("📤 Submitting {} from {}", tx.transaction_type(), from);

    let mut progress = ActionState::new();
    progress.start();

    if signers.is_empty() {
        let wallet = state.store.load_wallet(from)?;
        if let Some(fee) = fee_override {
            tx.common.fee = Some(fee);
        }
        let filled = client.autofill(tx).await?;
        let signed = wallet.sign(&filled)?;
        progress.finish(client.submit_and_wait(&signed).await);
    } else {
        let result = submit_multisigned(client, tx, signers, fee_override).await;
        if let Ok(outcome) = &result {
            let addresses: Vec<String> = signers.iter().map(|s| s.address.clone()).collect();
            state.store.remember_signers(from, &addresses)?;
            println!("   ✍️  Signed by {} co-signers", outcome.signers.len());
        }
        progress.finish(result.map(|outcome| outcome.response));
    }

    report(progress)
}

/// One entry of a batch file
#[derive(Debug, Deserialize)]
pub struct BatchItem {
    pub action: String,
    #[serde(default)]
    pub fields: Form,
}

/// Submit the actions listed in a JSON batch file
pub async fn cmd_batch<C: LedgerClient + ?Sized>(
    state: &AppState,
    client: &C,
    from: &str,
    file: &Path,
    mode: BatchMode,
    options: SubmitOptions,
) -> CliResult<()> {
    let json = fs::read_to_string(file)?;
    let items: Vec<BatchItem> = serde_json::from_str(&json)?;
    let wallet = state.store.load_wallet(from)?;

    let inner = items
        .iter()
        .map(|item| build_action(&state.validator, &item.action, from, &item.fields))
        .collect::<Result<Vec<_>, _>>()?;

    // A single item goes out on its own, single-signed
    match inner.as_slice() {
        [] => {}
        [only] => ensure_sufficient(client, only, 0, options.fee_override).await?,
        _ => {
            let envelope = build_envelope(from, inner.clone(), mode)?;
            ensure_sufficient(client, &envelope, options.signers.len(), options.fee_override)
                .await?;
        }
    }

    println!(
        "📦 Submitting {} transaction(s) from {} ({})",
        inner.len(),
        from,
        mode
    );

    let signer_addresses: Vec<String> = options.signers.iter().map(|s| s.address.clone()).collect();

    let mut progress = ActionState::new();
    progress.start();
    progress.finish(submit_batch(client, &wallet, inner, mode, options).await);

    if progress.payload().is_some() && !signer_addresses.is_empty() {
        state.store.remember_signers(from, &signer_addresses)?;
    }

    report(progress)
}
