//! Reads a bank operations export into a `Transactions` table.
//!
//! Excel workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read with `calamine` from their first
//! sheet. CSV files are read with `csv`, with the delimiter guessed from the header line.

use crate::model::{excel_serial_to_date_time, Transactions};
use crate::Result;
use anyhow::{anyhow, bail, Context};
use calamine::{Data, Reader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How date cells from a workbook are rendered before being parsed as day-first dates.
const CELL_DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Something that produces a table of transactions.
pub trait TransactionSource {
    fn load(&self) -> Result<Transactions>;
}

/// The first sheet of an Excel or OpenDocument workbook.
#[derive(Debug, Clone)]
pub struct ExcelSource {
    path: PathBuf,
}

impl ExcelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionSource for ExcelSource {
    fn load(&self) -> Result<Transactions> {
        let mut workbook = calamine::open_workbook_auto(&self.path).map_err(|e| {
            anyhow!("Failed to open the workbook {}: {e}", self.path.display())
        })?;
        let sheet = match workbook.sheet_names().first() {
            Some(name) => name.clone(),
            None => bail!("The workbook {} has no sheets", self.path.display()),
        };
        debug!("Reading sheet '{sheet}' of {}", self.path.display());
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| anyhow!("Failed to read the sheet '{sheet}': {e}"))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
        Transactions::new(rows)
    }
}

/// A comma or semicolon separated file with a header line.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TransactionSource for CsvSource {
    fn load(&self) -> Result<Transactions> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read file at {}", self.path.display()))?;
        parse_csv(&content)
            .with_context(|| format!("Failed to parse CSV file at {}", self.path.display()))
    }
}

/// Picks the source for `path` from its extension.
pub fn source_for(path: &Path) -> Result<Box<dyn TransactionSource + Send>> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    Ok(match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Box::new(ExcelSource::new(path)),
        "csv" => Box::new(CsvSource::new(path)),
        _ => bail!(
            "Unsupported operations file '{}', expected an Excel workbook or a CSV file",
            path.display()
        ),
    })
}

/// Loads the operations export at `path` on a blocking thread.
pub async fn load_transactions(path: &Path) -> Result<Transactions> {
    if !path.is_file() {
        bail!("The operations file is missing '{}'", path.display())
    }
    let source = source_for(path)?;
    let transactions = tokio::task::spawn_blocking(move || source.load())
        .await
        .context("The file reading task failed")??;
    info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

fn parse_csv(content: &str) -> Result<Transactions> {
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(content);
    debug!("Using CSV delimiter '{}'", delimiter as char);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.context("Malformed CSV record")?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    Transactions::new(rows)
}

/// Semicolons win when the header line has more of them than commas.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => match excel_serial_to_date_time(d.as_f64()) {
            Some(t) => t.format(CELL_DATE_TIME_FORMAT).to_string(),
            None => {
                warn!("Unable to convert the date cell {d:?} to a date");
                String::new()
            }
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => {
            warn!("Cell error {e:?} read as an empty value");
            String::new()
        }
    }
}
