//! External collaborators: the currency rate and stock price services behind the `Quotes` trait.

mod http_quotes;
mod test_quotes;

use crate::model::{CurrencyRate, Quote, StockPrice};
use crate::{Config, Result};
use std::fmt::{Display, Formatter};
use tracing::debug;

pub(crate) use http_quotes::HttpQuotes;
pub use test_quotes::TestQuotes;

/// When this environment variable is set to a non-empty value, quotes come from `TestQuotes`
/// instead of the network.
pub const TEST_MODE_ENV: &str = "BANK_VIEWS_IN_TEST_MODE";

/// Looks up currency rates and stock prices. A lookup never fails: when the service cannot be
/// reached or answers with an error, the result is `Quote::Unavailable`.
#[async_trait::async_trait]
pub trait Quotes: Send + Sync {
    /// The rate of one unit of `code` (e.g. `USD`) in roubles.
    async fn currency_rate(&self, code: &str) -> Quote<CurrencyRate>;

    /// The latest price of `symbol` (e.g. `AAPL`).
    async fn stock_price(&self, symbol: &str) -> Quote<StockPrice>;
}

/// Selects where quotes come from.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Query the real services over HTTP.
    #[default]
    Live,
    /// Use the fixed in-memory quotes from `TestQuotes`.
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(v) if !v.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Live => f.write_str("live"),
            Mode::Test => f.write_str("test"),
        }
    }
}

/// Creates the `Quotes` implementation for `mode`.
pub fn quotes(config: &Config, mode: Mode) -> Result<Box<dyn Quotes>> {
    debug!("Creating {mode} quotes");
    Ok(match mode {
        Mode::Live => Box::new(HttpQuotes::new(config)?),
        Mode::Test => Box::new(TestQuotes::default()),
    })
}
