//! Types that represent the core data model, such as `Transaction`, `Amount` and `DateRange`.
mod amount;
mod date;
mod quote;
mod transaction;

pub use amount::{Amount, AmountError};
pub use date::{
    excel_serial_to_date_time, parse_anchor, parse_day_first, DateRange, REPORT_DATE_FORMAT,
};
pub use quote::{CurrencyRate, Quote, StockPrice, Unavailable};
pub use transaction::{Status, Transaction, TransactionColumn, Transactions};
