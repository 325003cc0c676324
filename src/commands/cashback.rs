use crate::commands::Out;
use crate::reports::{profitable_cashback, CategoryTotals};
use crate::source::load_transactions;
use crate::{Config, Result};

/// Cashback per category for the calendar month `year`/`month`.
pub async fn cashback(config: Config, year: i32, month: u32) -> Result<Out<CategoryTotals>> {
    let transactions = load_transactions(config.input_path()).await?;
    let totals = profitable_cashback(&transactions, year, month)?;
    Ok(Out::new(
        format!(
            "Cashback for {month:02}.{year} in {} categories",
            totals.len()
        ),
        totals,
    ))
}
