use crate::api::{self, Mode};
use crate::commands::Out;
use crate::reports::{self, MainPage};
use crate::source::load_transactions;
use crate::{Config, Result};
use chrono::{Local, NaiveDateTime};
use tracing::debug;

/// Builds the main page for `date`, or for the current local time when no date is given.
pub async fn main_page(
    config: Config,
    mode: Mode,
    date: Option<NaiveDateTime>,
) -> Result<Out<MainPage>> {
    let now = date.unwrap_or_else(|| Local::now().naive_local());
    debug!("Building the main page at {now} with {mode} quotes");

    let transactions = load_transactions(config.input_path()).await?;
    let settings = config.settings().await?;
    let quotes = api::quotes(&config, mode)?;

    let page = reports::main_page(&transactions, now, &settings, quotes.as_ref()).await;
    let message = format!(
        "Main page for {} with {} cards and {} top transactions",
        now.format("%d.%m.%Y %H:%M:%S"),
        page.cards.len(),
        page.top_transactions.len()
    );
    Ok(Out::new(message, page))
}
