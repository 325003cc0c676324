//! These structs provide the CLI interface for the bank-views CLI.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

use crate::model::parse_anchor;
use crate::sink::DEFAULT_REPORT_FILE;

/// bank-views: Turns a bank operations export into JSON views of your spending.
///
/// The export (`operations.xlsx` by default) is read from the `data` directory of the bank-views
/// home. Reports are printed to stdout as JSON. The spending report is also saved to the `reports`
/// directory.
///
/// The main page looks up currency rates and stock prices for the codes listed in
/// `data/user_settings.json`. Set BANK_VIEWS_IN_TEST_MODE to use fixed quotes instead of the
/// network.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// The main page: a greeting, month-to-date spending per card, the largest expenses of the
    /// month and the quotes from your settings.
    MainPage(MainPageArgs),
    /// Cashback earned per category in one calendar month.
    Cashback(CashbackArgs),
    /// Expenses in one category over the last three months.
    Spending(SpendingArgs),
    /// Runs all three reports with fixed example parameters.
    Demo,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where bank-views data and reports are held. Defaults to ~/bank-views
    #[arg(long, env = "BANK_VIEWS_HOME", default_value_t = default_home())]
    home: DisplayPath,

    /// The operations export, relative to the data directory unless absolute. `.xlsx`, `.xls`,
    /// `.ods` and `.csv` files are supported.
    #[arg(long, default_value = crate::config::OPERATIONS_XLSX)]
    input: PathBuf,

    /// The key for the currency rates service.
    #[arg(long, env = "API_KEY_CURRENCY_RATE", hide_env_values = true)]
    currency_api_key: Option<String>,

    /// The key for the stock prices service.
    #[arg(long, env = "API_KEY_STOCK_PRICES", hide_env_values = true)]
    stock_api_key: Option<String>,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn currency_api_key(&self) -> Option<&str> {
        self.currency_api_key.as_deref()
    }

    pub fn stock_api_key(&self) -> Option<&str> {
        self.stock_api_key.as_deref()
    }
}

/// (Not shown): Args for the `bank-views main-page` command.
#[derive(Debug, Parser, Clone)]
pub struct MainPageArgs {
    /// The moment to build the page for, `DD.MM.YYYY` or `DD.MM.YYYY HH:MM:SS`. Defaults to now.
    #[arg(long, value_parser = parse_anchor)]
    date: Option<NaiveDateTime>,
}

impl MainPageArgs {
    pub fn date(&self) -> Option<NaiveDateTime> {
        self.date
    }
}

/// (Not shown): Args for the `bank-views cashback` command.
#[derive(Debug, Parser, Clone)]
pub struct CashbackArgs {
    /// The year, e.g. 2025
    #[arg(long)]
    year: i32,

    /// The month, 1 to 12
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: u32,
}

impl CashbackArgs {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

/// (Not shown): Args for the `bank-views spending` command.
#[derive(Debug, Parser, Clone)]
pub struct SpendingArgs {
    /// The category, matched exactly, e.g. "Супермаркеты"
    #[arg(long)]
    category: String,

    /// The end of the three month window, `DD.MM.YYYY` or `DD.MM.YYYY HH:MM:SS`. Defaults to now.
    #[arg(long, value_parser = parse_anchor)]
    date: Option<NaiveDateTime>,

    /// The file name the report is saved under in the reports directory.
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    output: String,
}

impl SpendingArgs {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.date
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("bank-views"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or BANK_VIEWS_HOME instead of relying on the default \
                bank-views home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("bank-views")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::dt;

    #[test]
    fn test_parse_spending() {
        let args = Args::try_parse_from([
            "bank-views",
            "--home",
            "/tmp/bv",
            "spending",
            "--category",
            "Супермаркеты",
            "--date",
            "18.04.2025",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/bv"));
        assert_eq!(args.common().input(), Path::new("operations.xlsx"));
        match args.command() {
            Command::Spending(s) => {
                assert_eq!(s.category(), "Супермаркеты");
                assert_eq!(s.date(), Some(dt("2025-04-18 00:00:00")));
                assert_eq!(s.output(), "report.json");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_main_page_with_time() {
        let args = Args::try_parse_from([
            "bank-views",
            "--log-level",
            "debug",
            "main-page",
            "--date",
            "20.12.2021 15:00:00",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        match args.command() {
            Command::MainPage(m) => assert_eq!(m.date(), Some(dt("2021-12-20 15:00:00"))),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_cashback() {
        let args =
            Args::try_parse_from(["bank-views", "cashback", "--year", "2025", "--month", "3"])
                .unwrap();
        match args.command() {
            Command::Cashback(c) => {
                assert_eq!(c.year(), 2025);
                assert_eq!(c.month(), 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_arguments() {
        assert!(
            Args::try_parse_from(["bank-views", "cashback", "--year", "2025", "--month", "13"])
                .is_err()
        );
        assert!(
            Args::try_parse_from(["bank-views", "main-page", "--date", "2021-13-45"]).is_err()
        );
    }
}
