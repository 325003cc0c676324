use crate::api::Quotes;
use crate::model::{
    Amount, CurrencyRate, DateRange, Quote, StockPrice, Transactions, REPORT_DATE_FORMAT,
};
use crate::reports::Greeting;
use crate::Settings;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// How many of the largest expenses the main page lists.
pub const TOP_TRANSACTIONS: usize = 5;

/// The main page view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainPage {
    pub greeting: Greeting,
    pub cards: Vec<CardSpend>,
    pub top_transactions: Vec<TopTransaction>,
    pub currency_rates: Vec<Quote<CurrencyRate>>,
    pub stock_prices: Vec<Quote<StockPrice>>,
}

/// Spending and cashback on one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSpend {
    pub last_digits: String,
    pub total_spent: Amount,
    pub cashback: Amount,
}

/// One of the largest expenses of the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTransaction {
    /// The payment date as `DD.MM.YYYY`, or null if the export had no valid payment date.
    pub date: Option<String>,
    pub amount: Amount,
    pub category: String,
    pub description: String,
}

/// Settled transactions from the start of `date`'s month up to and including `date`.
pub fn range_current_month(transactions: &Transactions, date: NaiveDateTime) -> Transactions {
    let settled = transactions.settled();
    let month = settled.within(&DateRange::month_to_date(date));
    debug!(
        "{} settled transactions, {} since the start of the month",
        settled.len(),
        month.len()
    );
    month
}

/// Totals per card, ordered by the full card identifier. Rows without a card are not counted.
pub fn cards_spend(transactions: &Transactions) -> Vec<CardSpend> {
    let mut by_card: BTreeMap<&str, (Amount, Amount)> = BTreeMap::new();
    for t in transactions {
        if t.card_number().is_empty() {
            continue;
        }
        let (spent, cashback) = by_card.entry(t.card_number()).or_default();
        *spent = *spent + t.amount();
        *cashback = *cashback + t.cashback();
    }
    debug!("Spending grouped into {} cards", by_card.len());

    by_card
        .into_iter()
        .map(|(card, (total_spent, cashback))| CardSpend {
            last_digits: last_digits(card),
            total_spent,
            cashback,
        })
        .collect()
}

/// The `limit` largest expenses, most negative amount first. Equal amounts keep table order.
pub fn top_transactions(transactions: &Transactions, limit: usize) -> Vec<TopTransaction> {
    let mut sorted: Vec<_> = transactions.iter().collect();
    // sort_by_key is stable
    sorted.sort_by_key(|t| t.amount());
    sorted
        .into_iter()
        .take(limit)
        .map(|t| TopTransaction {
            date: t
                .payment_date()
                .map(|d| d.format(REPORT_DATE_FORMAT).to_string()),
            amount: t.amount(),
            category: t.category().to_string(),
            description: t.description().to_string(),
        })
        .collect()
}

/// Builds the main page for the moment `now`: greeting, month-to-date card totals and top
/// expenses, then one quote per currency and stock listed in `settings`, in listed order.
pub async fn main_page(
    transactions: &Transactions,
    now: NaiveDateTime,
    settings: &Settings,
    quotes: &dyn Quotes,
) -> MainPage {
    let month = range_current_month(transactions, now);
    let mut page = MainPage {
        greeting: Greeting::at(now),
        cards: cards_spend(&month),
        top_transactions: top_transactions(&month, TOP_TRANSACTIONS),
        currency_rates: Vec::with_capacity(settings.user_currencies.len()),
        stock_prices: Vec::with_capacity(settings.user_stocks.len()),
    };

    for code in &settings.user_currencies {
        page.currency_rates.push(quotes.currency_rate(code).await);
    }
    for symbol in &settings.user_stocks {
        page.stock_prices.push(quotes.stock_price(symbol).await);
    }
    debug!(
        "Main page has {} currency rates and {} stock prices",
        page.currency_rates.len(),
        page.stock_prices.len()
    );
    page
}

/// The last four characters of a card identifier, or the whole identifier if it is shorter.
fn last_digits(card: &str) -> String {
    let count = card.chars().count();
    card.chars().skip(count.saturating_sub(4)).collect()
}
