use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing::info;

use wallet_ledger::{
    AssetFilter, CompositeEventHandler, ConsoleEventHandler, JsonEventHandler, LedgerError, LedgerTracker, Network,
    StaticTokenRegistry, TrackerConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Console,
    Json,
}

/// Build the transaction ledger and counterparty summary of a wallet
#[derive(Debug, Parser)]
#[command(name = "wallet-ledger", version, about)]
struct Cli {
    /// Wallet address, or a wallet name from the registry file
    address: String,

    /// eth or tron
    #[arg(long, env = "NETWORK", default_value = "eth", value_parser = parse_network)]
    network: Network,

    /// ALL, the native symbol, or a registered token symbol
    #[arg(long, env = "ASSET", default_value = "ALL")]
    asset: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    output: OutputFormat,

    /// Print full addresses in console output
    #[arg(long)]
    full_addresses: bool,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn parse_network(s: &str) -> Result<Network, String> {
    s.parse::<Network>().map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level: LevelFilter = cli
        .log_level
        .parse()
        .with_context(|| format!("invalid log level {:?}", cli.log_level))?;

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Runtime::new()?.block_on(async {
        let config = TrackerConfig::from_env().context("failed to read configuration")?;

        let registry = match &config.token_registry_path {
            Some(path) => StaticTokenRegistry::load(path).context("failed to load token registry")?,
            None => StaticTokenRegistry::with_defaults(),
        };
        let address = registry.resolve_wallet(cli.network, &cli.address);
        let filter = AssetFilter::parse(&cli.asset);

        info!("Initializing wallet ledger v{}...", wallet_ledger::VERSION);
        info!("Network: {}", cli.network);
        info!("Wallet Address: {}", address);

        let mut handlers = CompositeEventHandler::new();
        match cli.output {
            OutputFormat::Console => {
                handlers.add_handler(Arc::new(ConsoleEventHandler::new().with_full_addresses(cli.full_addresses)))
            }
            OutputFormat::Json => handlers.add_handler(Arc::new(JsonEventHandler::new())),
        }

        let tracker = LedgerTracker::from_config(&config, Arc::new(registry))
            .context("failed to create ledger tracker")?
            .with_event_handler(Arc::new(handlers));
        info!("Noise rule: {}", tracker.noise_rule());

        match tracker.get_ledger(&address, &filter, cli.network).await {
            Ok(report) => {
                info!(
                    "Done: {} entries, {} counterparties, {} skipped",
                    report.transaction_count(),
                    report.summary.len(),
                    report.skipped
                );
                Ok(ExitCode::SUCCESS)
            }
            // Already reported by the handlers
            Err(LedgerError::NoTransactionsFound { .. }) => Ok(ExitCode::from(2)),
            Err(_) => Ok(ExitCode::FAILURE),
        }
    })
}
