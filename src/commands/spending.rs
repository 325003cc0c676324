use crate::commands::Out;
use crate::reports::{spending_by_category, to_json, CategorySpend, SPENDING_MONTHS};
use crate::source::load_transactions;
use crate::{sink, Config, Result};
use chrono::NaiveDateTime;

/// Spending in `category` over the months before `date`, written to `output` in the reports
/// directory as well as returned.
pub async fn spending(
    config: Config,
    category: &str,
    date: Option<NaiveDateTime>,
    output: &str,
) -> Result<Out<Vec<CategorySpend>>> {
    let transactions = load_transactions(config.input_path()).await?;
    let rows = spending_by_category(&transactions, category, date);
    let path = sink::write_report(config.reports_dir(), output, &to_json(&rows)?).await?;
    Ok(Out::new(
        format!(
            "{} '{category}' transactions in the last {SPENDING_MONTHS} months, saved to {}",
            rows.len(),
            path.display()
        ),
        rows,
    ))
}
