use bank_views::args::{Args, Command};
use bank_views::{commands, ApiKeys, Config, Mode, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();
    let api_keys = ApiKeys::new(
        common.currency_api_key().map(str::to_string),
        common.stock_api_key().map(str::to_string),
    );
    let config = Config::load(common.home().path(), common.input(), api_keys).await?;

    // When BANK_VIEWS_IN_TEST_MODE is set and non-empty, quotes come from fixed in-memory tables
    // instead of the rate services.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::MainPage(main_page_args) => {
            commands::main_page(config, mode, main_page_args.date())
                .await?
                .print()
        }

        Command::Cashback(cashback_args) => {
            commands::cashback(config, cashback_args.year(), cashback_args.month())
                .await?
                .print()
        }

        Command::Spending(spending_args) => commands::spending(
            config,
            spending_args.category(),
            spending_args.date(),
            spending_args.output(),
        )
        .await?
        .print(),

        Command::Demo => commands::demo(config, mode).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
