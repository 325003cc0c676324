//! The three report views built from a `Transactions` table: the main page, profitable cashback
//! by category, and spending in one category.
//!
//! Every report returns a value. Writing a report to a file is a separate step, see
//! `crate::sink`.

mod cashback;
mod greeting;
mod main_page;
mod spending;

use crate::Result;
use anyhow::Context;
use serde::Serialize;

pub use cashback::{profitable_cashback, CategoryTotals};
pub use greeting::Greeting;
pub use main_page::{
    cards_spend, main_page, range_current_month, top_transactions, CardSpend, MainPage,
    TopTransaction, TOP_TRANSACTIONS,
};
pub use spending::{spending_by_category, CategorySpend, SPENDING_MONTHS};

/// Serializes a report the way reports are written to the console and to files: four-space
/// indentation, with non-ASCII text left as is.
pub fn to_json<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("Unable to serialize the report to JSON")?;
    String::from_utf8(buf).context("The serialized report is not valid UTF-8")
}
