//! Ledger Wallet CLI Application
//!
//! A command-line interface for managing wallets and submitting
//! transactions to a ledger node.

use clap::{Parser, Subcommand};
use ledger_wallet::batch::{BatchMode, SubmitOptions};
use ledger_wallet::cli::{self, AppState, CliResult};
use ledger_wallet::client::WsLedgerClient;
use ledger_wallet::config::{Network, WalletConfig};
use ledger_wallet::core::Drops;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ledger-wallet")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Multi-wallet client for XRP-Ledger-style networks", long_about = None)]
struct Cli {
    /// Data directory for wallets and configuration
    #[arg(short, long, default_value = ".ledger_wallet")]
    data_dir: PathBuf,

    /// WebSocket endpoint of the ledger node
    #[arg(long)]
    url: Option<String>,

    /// Well-known network (mainnet, testnet, devnet, local)
    #[arg(long)]
    network: Option<Network>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Show an account's balance, reserve and owned objects
    Account {
        /// Account address
        address: String,
    },

    /// Check whether an account can afford an action, without submitting
    Check {
        /// Sending wallet address
        #[arg(short, long)]
        from: String,

        /// Action name (payment, trust_set, nft_mint, ...)
        action: String,

        /// Action fields as key=value
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,

        /// Number of co-signers the submission will carry
        #[arg(long, default_value_t = 0)]
        signers: usize,

        /// Fee in drops instead of the network quote
        #[arg(long)]
        fee: Option<u64>,
    },

    /// Ask the ledger how an action would apply, without submitting it
    Simulate {
        /// Sending wallet address
        #[arg(short, long)]
        from: String,

        /// Action name (payment, trust_set, nft_mint, ...)
        action: String,

        /// Action fields as key=value
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,
    },

    /// Build, sign and submit an action
    Submit {
        /// Sending wallet address
        #[arg(short, long)]
        from: String,

        /// Action name (payment, trust_set, nft_mint, ...)
        action: String,

        /// Action fields as key=value
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,

        /// Co-signer as address:seed; repeat for each signer
        #[arg(short, long = "signer")]
        signers: Vec<String>,

        /// Fee in drops instead of the network quote
        #[arg(long)]
        fee: Option<u64>,
    },

    /// Submit several actions as one batch
    Batch {
        /// Sending wallet address
        #[arg(short, long)]
        from: String,

        /// JSON file: [{"action": "...", "fields": {...}}, ...]
        file: PathBuf,

        /// all-or-nothing, only-one, until-failure or independent
        #[arg(short, long, default_value = "all-or-nothing")]
        mode: BatchMode,

        /// Co-signer of the envelope as address:seed
        #[arg(short, long = "signer")]
        signers: Vec<String>,

        /// Envelope fee in drops instead of the network quote
        #[arg(long)]
        fee: Option<u64>,
    },

    /// List the supported actions and their fields
    Actions,
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a new wallet
    New {
        /// Optional label for the wallet
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Import a wallet from its family seed
    Import {
        /// Family seed (s...)
        seed: String,

        #[arg(short, long)]
        label: Option<String>,
    },

    /// List all wallets
    List,

    /// Show wallet details
    Show {
        /// Wallet address
        address: String,

        /// Also print the seed
        #[arg(long)]
        reveal_seed: bool,
    },

    /// Delete a wallet
    Delete {
        /// Wallet address
        address: String,
    },
}

fn main() -> CliResult<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config =
        WalletConfig::load(&cli.data_dir)?.with_overrides(cli.url.as_deref(), cli.network);
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Wallet { action } => match action {
            WalletCommands::New { label } => cli::cmd_wallet_new(&state, label.as_deref()),
            WalletCommands::Import { seed, label } => {
                cli::cmd_wallet_import(&state, &seed, label.as_deref())
            }
            WalletCommands::List => cli::cmd_wallet_list(&state),
            WalletCommands::Show {
                address,
                reveal_seed,
            } => cli::cmd_wallet_show(&state, &address, reveal_seed),
            WalletCommands::Delete { address } => cli::cmd_wallet_delete(&state, &address),
        },
        Commands::Actions => cli::cmd_actions(&state),
        command => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_network_command(&state, command))
        }
    }
}

/// Commands that talk to the ledger node
async fn run_network_command(state: &AppState, command: Commands) -> CliResult<()> {
    log::info!("Connecting to {}", state.config.url);
    let client =
        WsLedgerClient::connect(&state.config.url, state.config.submission_settings()).await?;

    let result = match command {
        Commands::Account { address } => cli::cmd_account(&client, &address).await,
        Commands::Check {
            from,
            action,
            fields,
            signers,
            fee,
        } => {
            let form = cli::parse_fields(&fields)?;
            cli::cmd_check(state, &client, &from, &action, &form, signers, fee.map(Drops)).await
        }
        Commands::Simulate {
            from,
            action,
            fields,
        } => {
            let form = cli::parse_fields(&fields)?;
            cli::cmd_simulate(state, &client, &from, &action, &form).await
        }
        Commands::Submit {
            from,
            action,
            fields,
            signers,
            fee,
        } => {
            let form = cli::parse_fields(&fields)?;
            let signers = cli::parse_signers(&signers)?;
            cli::cmd_submit(state, &client, &from, &action, &form, &signers, fee.map(Drops))
                .await
        }
        Commands::Batch {
            from,
            file,
            mode,
            signers,
            fee,
        } => {
            let options = SubmitOptions {
                signers: cli::parse_signers(&signers)?,
                fee_override: fee.map(Drops),
                fallback_signer: None,
            };
            cli::cmd_batch(state, &client, &from, &file, mode, options).await
        }
        Commands::Wallet { .. } | Commands::Actions => unreachable!(),
    };

    if let Err(e) = client.close().await {
        log::debug!("Closing connection failed: {}", e);
    }
    result
}
