use crate::model::date::parse_day_first;
use crate::model::{Amount, DateRange};
use crate::Result;
use anyhow::bail;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::{trace, warn};

/// An ordered table of transactions read from a bank export.
///
/// A table is never changed once loaded: every filter returns a new `Transactions` holding the
/// matching rows in their original order.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transactions {
    data: Vec<Transaction>,
}

impl Transactions {
    /// Builds a table from spreadsheet rows. The first row holds the column headers.
    pub fn new<S, R>(sheet_data: impl IntoIterator<Item = R>) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut rows = sheet_data.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.into_iter().map(|s| s.into()).collect(),
            None => bail!("An empty data set cannot be parsed into a Transactions object"),
        };

        let mut transactions = Vec::new();
        for (row_ix, row) in rows.enumerate() {
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                trace!("Skipping blank row {}", row_ix + 2);
                continue;
            }
            if values.len() > headers.len() {
                warn!(
                    "Row {} has {} cells but there are only {} headers, extra cells are ignored",
                    row_ix + 2,
                    values.len(),
                    headers.len()
                );
            }
            transactions.push(Transaction::new_with_sheet_headers(headers.as_slice(), values));
        }
        Ok(Self { data: transactions })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.data.iter()
    }

    /// Returns a new table holding the rows for which `predicate` is true.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Transaction) -> bool,
    {
        Self {
            data: self.data.iter().filter(|t| predicate(t)).cloned().collect(),
        }
    }

    /// Completed outgoing payments: amount below zero and status `OK`.
    pub fn settled(&self) -> Self {
        self.filter(Transaction::is_settled)
    }

    /// Rows whose operation date falls inside `range`. Rows with no valid operation date never
    /// match.
    pub fn within(&self, range: &DateRange) -> Self {
        self.filter(|t| t.operation_date.is_some_and(|d| range.contains(d)))
    }

    /// Rows whose category is exactly `category`. The comparison is case-sensitive.
    pub fn in_category(&self, category: &str) -> Self {
        self.filter(|t| t.category == category)
    }
}

impl From<Vec<Transaction>> for Transactions {
    fn from(data: Vec<Transaction>) -> Self {
        Self { data }
    }
}

impl FromIterator<Transaction> for Transactions {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// The processing status of a transaction. Only `Ok` transactions are settled.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Ok,
    Cancelled,
    /// Any other status, e.g. `FAILED`, kept verbatim.
    Other(String),
}

/// A row without a status cell is never settled.
impl Default for Status {
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl FromStr for Status {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            OK_STR => Status::Ok,
            CANCELLED_STR => Status::Cancelled,
            other => Status::Other(other.to_string()),
        })
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => f.write_str(OK_STR),
            Status::Cancelled => f.write_str(CANCELLED_STR),
            Status::Other(s) => f.write_str(s),
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match Status::from_str(&value) {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.to_string()
    }
}

const OK_STR: &str = "OK";
const CANCELLED_STR: &str = "CANCELLED";

/// Represents a single row from the bank export.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) operation_date: Option<NaiveDateTime>,
    pub(crate) payment_date: Option<NaiveDateTime>,
    pub(crate) card_number: String,
    pub(crate) status: Status,
    pub(crate) amount: Amount,
    pub(crate) cashback: Amount,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) other_fields: BTreeMap<String, String>,
}

impl Transaction {
    /// Builds a transaction from a row of cells and the sheet's headers. Cells past the last
    /// header are dropped, and columns missing from the row keep their defaults.
    pub fn new_with_sheet_headers<S1, S2, I>(headers: &[S1], values: I) -> Self
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut transaction = Transaction::default();
        for (header, value) in headers.iter().zip(values) {
            transaction.set_with_header(header, value);
        }
        transaction
    }

    pub fn set_with_header<S1, S2>(&mut self, header: S1, value: S2)
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let header = header.as_ref();
        let value = value.into();

        match TransactionColumn::from_header(header) {
            Ok(col) => match col {
                TransactionColumn::OperationDate => self.operation_date = parse_day_first(&value),
                TransactionColumn::PaymentDate => self.payment_date = parse_day_first(&value),
                TransactionColumn::CardNumber => self.card_number = value.trim().to_string(),
                TransactionColumn::Status => self.status = Status::from(value),
                TransactionColumn::Amount => self.amount = parse_amount(header, &value),
                TransactionColumn::Cashback => self.cashback = parse_amount(header, &value),
                TransactionColumn::Category => self.category = value,
                TransactionColumn::Description => self.description = value,
            },
            Err(_) => {
                let _ = self.other_fields.insert(header.to_string(), value);
            }
        }
    }

    pub fn operation_date(&self) -> Option<NaiveDateTime> {
        self.operation_date
    }

    pub fn payment_date(&self) -> Option<NaiveDateTime> {
        self.payment_date
    }

    /// The full card identifier as exported, e.g. `*7197`.
    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn cashback(&self) -> Amount {
        self.cashback
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn other_field(&self, header: &str) -> Option<&str> {
        self.other_fields.get(header).map(String::as_str)
    }

    /// A settled transaction is an expense (negative amount) with status `OK`.
    pub fn is_settled(&self) -> bool {
        self.amount.is_negative() && self.status == Status::Ok
    }
}

/// Parses an amount cell. A bad value is logged and read as zero, which keeps the row out of
/// every settled view.
fn parse_amount(header: &str, value: &str) -> Amount {
    match Amount::from_str(value) {
        Ok(amount) => amount,
        Err(e) => {
            warn!("Unable to parse '{value}' in column '{header}' as an amount: {e}");
            Amount::ZERO
        }
    }
}

/// Represents the known columns of the bank export.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionColumn {
    OperationDate,
    PaymentDate,
    CardNumber,
    Status,
    Amount,
    Cashback,
    Category,
    Description,
}

serde_plain::derive_display_from_serialize!(TransactionColumn);
serde_plain::derive_fromstr_from_deserialize!(TransactionColumn);

impl TransactionColumn {
    pub fn from_header(header: impl AsRef<str>) -> Result<TransactionColumn> {
        let header_str = header.as_ref().trim();
        match header_str {
            OPERATION_DATE_STR => Ok(TransactionColumn::OperationDate),
            PAYMENT_DATE_STR => Ok(TransactionColumn::PaymentDate),
            CARD_NUMBER_STR => Ok(TransactionColumn::CardNumber),
            STATUS_STR => Ok(TransactionColumn::Status),
            AMOUNT_STR => Ok(TransactionColumn::Amount),
            CASHBACK_STR => Ok(TransactionColumn::Cashback),
            CATEGORY_STR => Ok(TransactionColumn::Category),
            DESCRIPTION_STR => Ok(TransactionColumn::Description),
            bad => bail!("Invalid transaction column name '{bad}'"),
        }
    }

    /// The header of this column in the bank export.
    pub fn as_header_str(&self) -> &'static str {
        match self {
            TransactionColumn::OperationDate => OPERATION_DATE_STR,
            TransactionColumn::PaymentDate => PAYMENT_DATE_STR,
            TransactionColumn::CardNumber => CARD_NUMBER_STR,
            TransactionColumn::Status => STATUS_STR,
            TransactionColumn::Amount => AMOUNT_STR,
            TransactionColumn::Cashback => CASHBACK_STR,
            TransactionColumn::Category => CATEGORY_STR,
            TransactionColumn::Description => DESCRIPTION_STR,
        }
    }
}

pub(crate) const OPERATION_DATE_STR: &str = "Дата операции";
pub(crate) const PAYMENT_DATE_STR: &str = "Дата платежа";
pub(crate) const CARD_NUMBER_STR: &str = "Номер карты";
pub(crate) const STATUS_STR: &str = "Статус";
pub(crate) const AMOUNT_STR: &str = "Сумма платежа";
pub(crate) const CASHBACK_STR: &str = "Кэшбэк";
pub(crate) const CATEGORY_STR: &str = "Категория";
pub(crate) const DESCRIPTION_STR: &str = "Описание";
