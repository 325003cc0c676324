use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// The result of one external rate or price lookup. A lookup that failed serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quote<T> {
    Found(T),
    Unavailable(Unavailable),
}

/// An empty JSON object standing in for a failed lookup.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Unavailable {}

impl<T> Quote<T> {
    pub fn unavailable() -> Self {
        Quote::Unavailable(Unavailable {})
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Quote::Found(t) => Some(t),
            Quote::Unavailable(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.found().is_some()
    }
}

/// The rate of one unit of `currency` in roubles. `rate` is null when the service answered
/// without a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub currency: String,
    pub rate: Option<Amount>,
}

/// The latest price of one share of `stock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub stock: String,
    pub price: Option<Amount>,
}
