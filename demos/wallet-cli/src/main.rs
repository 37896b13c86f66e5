//! Command-line front end for the Column wallet session.
//!
//! Run with: cargo run -p wallet-cli -- callback 'http://localhost:5173/#address=0xABC&column_encryption_public_key=KEY'
//!
//! Each invocation is a page load: the session is hydrated from the session
//! file, so state carries over between runs like it does between reloads.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use column_wallet_core::{
    AuthState, CrossTabChannel, DeepLinkWallet, LogEntry, NetworkConfig, SdkConfig, Session,
    TabHost, TransactionRecord, TransferForm,
};
use column_wallet_rpc::{DecimalsLookup, decimals::NATIVE_COIN};
use column_wallet_session::{CleanupPolicy, Tab, UrlTab, storage::FileStore};
use column_wallet_transport::ChannelHub;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

type WalletTab = Tab<Arc<FileStore>, DeepLinkWallet>;

#[derive(Parser)]
#[command(name = "wallet-cli", about = "Column wallet session sync from the command line")]
struct Cli {
    /// Session file. Defaults to the platform data directory.
    #[arg(long, env = "COLUMN_WALLET_STORE")]
    store: Option<PathBuf>,

    /// Origin the app is served from.
    #[arg(long, env = "COLUMN_WALLET_ORIGIN", default_value = "http://localhost:5173")]
    origin: Url,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a wallet callback URL next to an already open app tab.
    Callback {
        url: Url,
        /// Treat the callback tab as opened by another window.
        #[arg(long)]
        opener: bool,
        /// Let the callback tab close itself after cleanup.
        #[arg(long)]
        self_close: bool,
    },
    /// Show the persisted session.
    Status,
    /// Print the wallet connect link.
    Connect,
    /// Print the wallet link for a MOVE transfer.
    Transfer {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
    /// Look up the decimals of a token.
    Decimals {
        #[arg(default_value = NATIVE_COIN)]
        token: String,
        #[arg(long, default_value = "mainnet")]
        network: String,
    },
    /// Forget the wallet.
    Logout,
}

#[derive(Serialize)]
struct TabReport<'a> {
    url: String,
    state: AuthState,
    session: &'a Session,
    log: Option<&'a LogEntry>,
    last_transaction: Option<&'a TransactionRecord>,
    explorer_url: Option<String>,
}

impl<'a> TabReport<'a> {
    fn new(tab: &'a WalletTab) -> Self {
        let location = tab.host().location();
        let network = NetworkConfig::lookup_or_default(tab.session().network());
        Self {
            url: format!("{}{}", location.path, query_suffix(&location.query)),
            state: tab.state(),
            session: tab.session(),
            log: tab.log(),
            last_transaction: tab.last_transaction(),
            explorer_url: tab.last_transaction().map(|tx| network.explorer_tx_url(&tx.hash)),
        }
    }
}

fn query_suffix(query: &str) -> String {
    if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(match cli.store {
        Some(path) => FileStore::new(path),
        None => FileStore::open_default().context("Failed to locate session file")?,
    });
    tracing::debug!(path = %store.path().display(), "Using session file");

    let sdk = SdkConfig::for_origin(cli.origin.as_str());
    let open_tab = |url: Url, channel: Option<Box<dyn CrossTabChannel>>, policy: &CleanupPolicy| {
        Tab::mount(
            Arc::clone(&store),
            DeepLinkWallet::new(sdk.clone()),
            Arc::new(UrlTab::new(url)),
            channel,
            policy,
        )
    };

    match cli.command {
        Command::Callback {
            url,
            opener,
            self_close,
        } => {
            let hub = ChannelHub::new();
            let policy = CleanupPolicy {
                self_close,
                ..CleanupPolicy::default()
            };

            let mut app_tab = open_tab(
                cli.origin.clone(),
                Some(Box::new(hub.open_wallet_channel())),
                &policy,
            );

            let host = Arc::new(UrlTab::new(url).with_opener(opener));
            let mut callback_tab = Tab::mount(
                Arc::clone(&store),
                DeepLinkWallet::new(sdk.clone()),
                host.clone(),
                Some(Box::new(hub.open_wallet_channel())),
                &policy,
            );

            if let Some(cleanup) = callback_tab.take_cleanup() {
                cleanup.await.context("Cleanup task failed")?;
            }
            callback_tab.close();

            while let Ok(Some(_)) =
                tokio::time::timeout(Duration::from_millis(50), app_tab.next_inbound()).await
            {}

            let report = serde_json::json!({
                "callback_tab": TabReport::new(&callback_tab),
                "callback_tab_closed": host.is_closed(),
                "app_tab": TabReport::new(&app_tab),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Status => {
            let tab = open_tab(cli.origin.clone(), None, &CleanupPolicy::default());
            println!("{}", serde_json::to_string_pretty(&TabReport::new(&tab))?);
        }
        Command::Connect => {
            let tab = open_tab(cli.origin.clone(), None, &CleanupPolicy::default());
            println!("{}", tab.connect()?);
        }
        Command::Transfer { to, amount } => {
            let tab = open_tab(cli.origin.clone(), None, &CleanupPolicy::default());
            let mut form = TransferForm::new(to);
            form.amount = amount;
            let url = tab.submit_transfer(&mut form)?;
            println!("{url}");
        }
        Command::Decimals { token, network } => {
            let config = NetworkConfig::lookup(&network)
                .ok_or_else(|| anyhow!("Unknown network: {network}"))?;
            let lookup: DecimalsLookup = DecimalsLookup::default();
            let decimals = lookup.get_decimals_for(&token, config).await;
            println!("{decimals}");
        }
        Command::Logout => {
            let mut tab = open_tab(cli.origin.clone(), None, &CleanupPolicy::default());
            tab.logout();
            println!("Logged out");
        }
    }

    Ok(())
}
