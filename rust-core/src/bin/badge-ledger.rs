use anyhow::{bail, Context, Result};
use badge_core::catalog;
use badge_core::clock::SystemClock;
use badge_core::config::AppConfig;
use badge_core::render::LedgerView;
use badge_core::validation;
use badge_core::{BadgeLedger, FileStore, KvStore, Session, WalletEvent};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "badge-ledger", about = "Claim and list attendance badges by wallet")]
struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides `data_dir` from the config.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `badge_core=trace`. Falls back to RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the training sessions that can be claimed.
    Events,
    /// Show a wallet's badges.
    List {
        #[arg(long)]
        wallet: String,
        /// Print the stored records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Mock-scan an event and claim its badge.
    Claim {
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        event: String,
        /// Overrides `default_image` from the config.
        #[arg(long)]
        image: Option<String>,
        /// Organiser phrase, required when the config sets one.
        #[arg(long)]
        phrase: Option<String>,
        /// Skip the scan animation delay.
        #[arg(long)]
        no_delay: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.cmd {
        Command::Events => {
            for event in catalog::EVENTS {
                println!("{}", event);
            }
            Ok(())
        }
        Command::List { wallet, json } => {
            let wallet = require_wallet(&wallet)?;
            let ledger = BadgeLedger::new(open_store(&config)?);
            let badges = ledger.load(wallet);
            if json {
                println!("{}", serde_json::to_string_pretty(&badges)?);
            } else {
                print_view(&LedgerView::new(wallet, &badges));
            }
            Ok(())
        }
        Command::Claim {
            wallet,
            event,
            image,
            phrase,
            no_delay,
        } => {
            if let Some(image) = image {
                config.default_image = image;
            }
            let delay = if no_delay { 0 } else { config.scan_delay_ms };
            let store = open_store(&config)?;
            let mut session = Session::new(BadgeLedger::with_clock(store, SystemClock), config);
            run_claim(&mut session, &wallet, &event, phrase.as_deref(), delay)
        }
    }
}

fn run_claim<S: KvStore>(
    session: &mut Session<S>,
    wallet: &str,
    event: &str,
    phrase: Option<&str>,
    delay_ms: u64,
) -> Result<()> {
    let wallet = require_wallet(wallet)?;
    session.handle_wallet(WalletEvent::Connected(wallet.to_string()));

    let gated = session
        .open_scanner()
        .and_then(|_| session.select_event(event))
        .and_then(|_| match phrase {
            Some(p) => session.enter_phrase(p),
            None => Ok(()),
        })
        .and_then(|_| session.begin_scan());
    if let Err(notice) = gated {
        bail!("{}", notice);
    }

    if delay_ms > 0 {
        println!("Scanning...");
        thread::sleep(Duration::from_millis(delay_ms));
    }

    let notice = session.complete_scan();
    if !notice.is_success() {
        bail!("{}", notice);
    }
    println!("{}", notice);
    if let Some(view) = session.view() {
        print_view(&view);
    }
    Ok(())
}

fn require_wallet(raw: &str) -> Result<&str> {
    match validation::wallet(raw) {
        Ok(wallet) => Ok(wallet),
        Err(_) => bail!("wallet address must not be empty"),
    }
}

fn open_store(config: &AppConfig) -> Result<FileStore> {
    let store = FileStore::new(&config.data_dir, &config.origin)
        .with_context(|| format!("open store under {}", config.data_dir.display()))?;
    info!(dir = %store.dir().display(), "using badge store");
    Ok(store)
}

fn print_view(view: &LedgerView) {
    println!("Wallet {}", view.wallet_short);
    if let Some(msg) = view.empty_message {
        println!("{}", msg);
        return;
    }
    println!("{}", view.summary);
    for badge in &view.badges {
        println!("  {}  ({})", badge.event, badge.earned_on);
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(l) => EnvFilter::new(l),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
