use crate::model::{Amount, DateRange, Transactions};
use crate::Result;
use std::collections::BTreeMap;
use tracing::debug;

/// Summed values per category, ordered by category name. A category with no rows has no entry.
pub type CategoryTotals = BTreeMap<String, Amount>;

/// How much cashback each category earned from settled spending in the given month.
///
/// # Errors
/// Returns an error if `month` is not in `1..=12`.
pub fn profitable_cashback(
    transactions: &Transactions,
    year: i32,
    month: u32,
) -> Result<CategoryTotals> {
    let range = DateRange::calendar_month(year, month)?;
    debug!("Cashback window is {} to {}", range.start(), range.end());

    let settled = transactions.settled();
    let in_month = settled.within(&range);
    debug!(
        "{} settled transactions, {} in {month:02}.{year}",
        settled.len(),
        in_month.len()
    );

    let mut totals = CategoryTotals::new();
    for t in &in_month {
        let total = totals.entry(t.category().to_string()).or_default();
        *total = *total + t.cashback();
    }
    debug!("Cashback grouped into {} categories", totals.len());
    Ok(totals)
}
