mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod reports;
mod sink;
mod source;
mod utils;


pub use api::{Mode, Quotes, TestQuotes};
pub use config::{ApiKeys, Config, Settings};
pub use error::Error;
pub use error::Result;
pub use sink::{write_report, DEFAULT_REPORT_FILE};
pub use source::{load_transactions, CsvSource, ExcelSource, TransactionSource};
