//! Configuration handling for bank-views.
//!
//! The home directory, `$BANK_VIEWS_HOME`, holds a `data` directory with the operations export and
//! `user_settings.json`, and a `reports` directory where report files are written.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const DATA: &str = "data";
const REPORTS: &str = "reports";
const USER_SETTINGS_JSON: &str = "user_settings.json";

/// The name of the operations export looked up in the data directory unless told otherwise.
pub const OPERATIONS_XLSX: &str = "operations.xlsx";

pub const CURRENCY_URL_ENV: &str = "BANK_VIEWS_CURRENCY_URL";
pub const STOCK_URL_ENV: &str = "BANK_VIEWS_STOCK_URL";
const DEFAULT_CURRENCY_URL: &str = "https://api.apilayer.com/exchangerates_data/convert";
const DEFAULT_STOCK_URL: &str = "https://www.alphavantage.co/query";

/// Credentials for the rate and price services. Empty keys are treated as missing.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ApiKeys {
    currency: Option<String>,
    stock: Option<String>,
}

impl ApiKeys {
    pub fn new(currency: Option<String>, stock: Option<String>) -> Self {
        Self {
            currency: currency.filter(|k| !k.is_empty()),
            stock: stock.filter(|k| !k.is_empty()),
        }
    }
}

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BANK_VIEWS_HOME` and it resolves the paths of the input export, the settings file
/// and the reports directory, along with the service endpoints and their keys.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    data_dir: PathBuf,
    reports_dir: PathBuf,
    input_path: PathBuf,
    settings_path: PathBuf,
    currency_url: Url,
    stock_url: Url,
    api_keys: ApiKeys,
}

impl Config {
    /// This will
    /// - validate that the home directory and its `data` directory exist
    /// - resolve `input` against the `data` directory unless it is absolute
    /// - read the endpoint overrides from the environment
    ///
    /// The input and settings files are not opened here; a missing file is reported by the
    /// command that needs it.
    pub async fn load(
        home: impl Into<PathBuf>,
        input: impl AsRef<Path>,
        api_keys: ApiKeys,
    ) -> Result<Self> {
        let maybe_relative = home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The bank-views home directory is missing '{}'",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let data_dir = root.join(DATA);
        if !data_dir.is_dir() {
            bail!("The data directory is missing '{}'", data_dir.display())
        }

        let input = input.as_ref();
        let input_path = if input.is_absolute() {
            input.to_path_buf()
        } else {
            data_dir.join(input)
        };

        let config = Self {
            reports_dir: root.join(REPORTS),
            settings_path: data_dir.join(USER_SETTINGS_JSON),
            currency_url: endpoint(
                std::env::var(CURRENCY_URL_ENV).ok(),
                DEFAULT_CURRENCY_URL,
                CURRENCY_URL_ENV,
            )?,
            stock_url: endpoint(
                std::env::var(STOCK_URL_ENV).ok(),
                DEFAULT_STOCK_URL,
                STOCK_URL_ENV,
            )?,
            root,
            data_dir,
            input_path,
            api_keys,
        };
        debug!("{config:?}");
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn currency_url(&self) -> &Url {
        &self.currency_url
    }

    pub fn stock_url(&self) -> &Url {
        &self.stock_url
    }

    pub fn currency_api_key(&self) -> Option<&str> {
        self.api_keys.currency.as_deref()
    }

    pub fn stock_api_key(&self) -> Option<&str> {
        self.api_keys.stock.as_deref()
    }

    /// Reads `user_settings.json` from the data directory.
    pub async fn settings(&self) -> Result<Settings> {
        let settings: Settings = utils::deserialize(&self.settings_path)
            .await
            .context("Unable to load the user settings")?;
        debug!(
            "Loaded settings with {} currencies and {} stocks",
            settings.user_currencies.len(),
            settings.user_stocks.len()
        );
        Ok(settings)
    }
}

/// The user's choice of quotes for the main page, in the order they are displayed.
///
/// Example settings file:
/// ```json
/// {
///   "user_currencies": ["USD", "EUR"],
///   "user_stocks": ["AAPL", "AMZN", "GOOGL", "MSFT", "TSLA"]
/// }
/// ```
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub user_currencies: Vec<String>,
    pub user_stocks: Vec<String>,
}

/// Parses the override `value` if there is one, otherwise `default`.
fn endpoint(value: Option<String>, default: &str, env_name: &str) -> Result<Url> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => Url::parse(&v).with_context(|| format!("Invalid URL in {env_name}: '{v}'")),
        None => Url::parse(default).with_context(|| format!("Invalid default URL '{default}'")),
    }
}
