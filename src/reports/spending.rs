use crate::model::{Amount, DateRange, Transactions};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The length of the spending window, in calendar months back from the anchor date.
pub const SPENDING_MONTHS: u32 = 3;

/// One row of the spending report, keyed by the bank export's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    #[serde(rename = "Сумма платежа")]
    pub amount: Amount,
    #[serde(rename = "Категория")]
    pub category: String,
}

/// Settled spending in `category` over the three months ending at `anchor` (or now), in table
/// order.
pub fn spending_by_category(
    transactions: &Transactions,
    category: &str,
    anchor: Option<NaiveDateTime>,
) -> Vec<CategorySpend> {
    let end = anchor.unwrap_or_else(|| Local::now().naive_local());
    let range = DateRange::rolling_months(end, SPENDING_MONTHS);
    debug!(
        "Spending window for '{category}' is {} to {}",
        range.start(),
        range.end()
    );

    let settled = transactions.settled();
    debug!("{} settled transactions", settled.len());
    let in_range = settled.within(&range);
    debug!("{} transactions in the last {SPENDING_MONTHS} months", in_range.len());
    let in_category = in_range.in_category(category);
    debug!("{} transactions in category '{category}'", in_category.len());

    in_category
        .iter()
        .map(|t| CategorySpend {
            amount: t.amount(),
            category: t.category().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::to_json;
    use crate::test::{dt, transfers_transactions, tx};
    use std::str::FromStr;

    #[test]
    fn test_transfers_over_three_months() {
        let rows = spending_by_category(
            &transfers_transactions(),
            "Переводы",
            Some(dt("2021-11-30 00:00:00")),
        );
        assert_eq!(
            rows,
            vec![CategorySpend {
                amount: Amount::from_str("-118.12").unwrap(),
                category: "Переводы".to_string(),
            }]
        );
    }

    #[test]
    fn test_transfers_json() {
        let rows = spending_by_category(
            &transfers_transactions(),
            "Переводы",
            Some(dt("2021-11-30 00:00:00")),
        );
        let expected = r#"[
    {
        "Сумма платежа": -118.12,
        "Категория": "Переводы"
    }
]"#;
        assert_eq!(to_json(&rows).unwrap(), expected);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let rows = spending_by_category(
            &transfers_transactions(),
            "Такси",
            Some(dt("2021-11-30 00:00:00")),
        );
        assert!(rows.is_empty());
        assert_eq!(to_json(&rows).unwrap(), "[]");
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let table: Transactions = vec![
            tx("30.08.2021", "Переводы", "-1", "OK", "0"),
            tx("29.08.2021 23:59:59", "Переводы", "-2", "OK", "0"),
        ]
        .into();
        let rows = spending_by_category(&table, "Переводы", Some(dt("2021-11-30 00:00:00")));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Amount::from_str("-1").unwrap());
    }

    #[test]
    fn test_preserves_table_order() {
        let table: Transactions = vec![
            tx("10.04.2025", "Супермаркеты", "-3", "OK", "0"),
            tx("01.03.2025", "Супермаркеты", "-1", "OK", "0"),
            tx("05.04.2025", "Супермаркеты", "-2", "OK", "0"),
        ]
        .into();
        let rows = spending_by_category(&table, "Супермаркеты", Some(dt("2025-04-18 00:00:00")));
        let amounts: Vec<String> = rows.iter().map(|r| r.amount.to_string()).collect();
        assert_eq!(amounts, vec!["-3.00", "-1.00", "-2.00"]);
    }

    #[test]
    fn test_defaults_to_now() {
        let recent = Local::now().naive_local() - chrono::Duration::days(1);
        let table: Transactions = vec![tx(
            &recent.format("%d.%m.%Y %H:%M:%S").to_string(),
            "Кафе",
            "-10",
            "OK",
            "0",
        )]
        .into();
        assert_eq!(spending_by_category(&table, "Кафе", None).len(), 1);
    }
}
