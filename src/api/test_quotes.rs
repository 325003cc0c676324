//! Implements the `Quotes` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without calling the rate services.

use crate::api::Quotes;
use crate::model::{Amount, CurrencyRate, Quote, StockPrice};
use std::collections::HashMap;
use std::str::FromStr;

/// An implementation of the `Quotes` trait that answers from fixed tables. Codes missing from the
/// tables are unavailable, the same as a failed request.
pub struct TestQuotes {
    rates: HashMap<String, Amount>,
    prices: HashMap<String, Amount>,
}

impl TestQuotes {
    pub fn new(rates: HashMap<String, Amount>, prices: HashMap<String, Amount>) -> Self {
        Self { rates, prices }
    }
}

#[async_trait::async_trait]
impl Quotes for TestQuotes {
    async fn currency_rate(&self, code: &str) -> Quote<CurrencyRate> {
        match self.rates.get(code) {
            Some(rate) => Quote::Found(CurrencyRate {
                currency: code.to_string(),
                rate: Some(*rate),
            }),
            None => Quote::unavailable(),
        }
    }

    async fn stock_price(&self, symbol: &str) -> Quote<StockPrice> {
        match self.prices.get(symbol) {
            Some(price) => Quote::Found(StockPrice {
                stock: symbol.to_string(),
                price: Some(*price),
            }),
            None => Quote::unavailable(),
        }
    }
}

impl Default for TestQuotes {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(seed(RATE_DATA), seed(PRICE_DATA))
    }
}

fn seed(data: &[(&str, &str)]) -> HashMap<String, Amount> {
    data.iter()
        .filter_map(|(code, value)| Amount::from_str(value).ok().map(|a| (code.to_string(), a)))
        .collect()
}

/// Seed currency rates, roubles per unit.
const RATE_DATA: &[(&str, &str)] = &[("USD", "81.25"), ("EUR", "92.57"), ("CNY", "11.32")];

/// Seed stock prices.
const PRICE_DATA: &[(&str, &str)] = &[
    ("AAPL", "196.98"),
    ("AMZN", "184.87"),
    ("GOOGL", "154.33"),
    ("MSFT", "388.45"),
    ("TSLA", "241.37"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_and_unknown_codes() {
        let quotes = TestQuotes::default();
        let usd = quotes.currency_rate("USD").await;
        assert_eq!(usd.found().unwrap().rate, Some(Amount::from_str("81.25").unwrap()));
        assert!(!quotes.currency_rate("ZZZ").await.is_found());
        assert!(quotes.stock_price("TSLA").await.is_found());
        assert!(!quotes.stock_price("NOPE").await.is_found());
    }
}
