//! Day-first date parsing and the inclusive `DateRange` used to window transactions.

use anyhow::{bail, ensure};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::Result;

/// Formats tried, in order, when reading a date cell. Day comes before month.
const DATE_TIME_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// The format of dates written into reports and accepted from the command line.
pub const REPORT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses a date or date-time written day-first, e.g. `31.12.2021 16:44:00` or `30/03/2025`.
/// Dates without a time are placed at midnight. Returns `None` for anything unparseable; a bad
/// date never fails a load.
pub fn parse_day_first(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Converts an Excel serial date (days since 1899-12-30, fraction is time of day).
pub fn excel_serial_to_date_time(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let days = TimeDelta::try_days(serial.trunc() as i64)?;
    let seconds = TimeDelta::try_seconds(((serial - serial.trunc()) * 86_400.0).round() as i64)?;
    base.checked_add_signed(days.checked_add(&seconds)?)
}

/// Parses a report anchor date given on the command line or in a report request. Unlike
/// `parse_day_first`, a bad value here is an error.
pub fn parse_anchor(s: &str) -> Result<NaiveDateTime> {
    match parse_day_first(s) {
        Some(d) => Ok(d),
        None => bail!("Unable to parse the date '{s}', expected DD.MM.YYYY"),
    }
}

/// An inclusive range of date-times: `start <= t <= end`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The rolling window `[anchor - months, anchor]`. Month subtraction keeps the day of month
    /// and clamps it to the end of shorter months, so 31 May minus 3 months is 28 (or 29)
    /// February.
    pub fn rolling_months(anchor: NaiveDateTime, months: u32) -> Self {
        let start = anchor
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDateTime::MIN);
        Self { start, end: anchor }
    }

    /// The window covering one calendar month, from the first day at midnight through the whole
    /// of the last day.
    ///
    /// February ends on the 28th unless the `leap-february` feature is enabled.
    pub fn calendar_month(year: i32, month: u32) -> Result<Self> {
        ensure!(
            (1..=12).contains(&month),
            "Invalid month {month}, expected a value from 1 to 12"
        );
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            bail!("Invalid year {year}");
        };
        let last_day = last_day_of_month(year, month);
        let Some(last) = NaiveDate::from_ymd_opt(year, month, last_day) else {
            bail!("Unable to compute the last day of {month:02}.{year}");
        };
        Ok(Self {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(end_of_day()),
        })
    }

    /// The window from midnight on the first of `date`'s month through `date` itself.
    pub fn month_to_date(date: NaiveDateTime) -> Self {
        let first = date.date().with_day(1).unwrap_or(date.date());
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

#[cfg(not(feature = "leap-february"))]
fn last_day_of_month(_year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        2 => 28,
        _ => 30,
    }
}

#[cfg(feature = "leap-february")]
fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (y, m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_day_first_formats() {
        assert_eq!(
            parse_day_first("31.12.2021 16:44:00"),
            Some(dt("2021-12-31 16:44:00"))
        );
        assert_eq!(parse_day_first("30/03/2025"), Some(dt("2025-03-30 00:00:00")));
        assert_eq!(parse_day_first("01.04.2025"), Some(dt("2025-04-01 00:00:00")));
        assert_eq!(parse_day_first("2025-04-01"), Some(dt("2025-04-01 00:00:00")));
    }

    #[test]
    fn test_parse_day_first_is_not_month_first() {
        // 03.04 is the 3rd of April, never the 4th of March
        assert_eq!(parse_day_first("03.04.2025"), Some(dt("2025-04-03 00:00:00")));
        assert_eq!(parse_day_first("12/31/2025"), None);
    }

    #[test]
    fn test_parse_day_first_invalid() {
        assert_eq!(parse_day_first(""), None);
        assert_eq!(parse_day_first("not a date"), None);
        assert_eq!(parse_day_first("32.01.2025"), None);
    }

    #[test]
    fn test_excel_serial() {
        assert_eq!(
            excel_serial_to_date_time(45_000.5),
            Some(dt("2023-03-15 12:00:00"))
        );
        assert_eq!(excel_serial_to_date_time(f64::NAN), None);
    }

    #[test]
    fn test_excel_serial_out_of_range() {
        assert_eq!(excel_serial_to_date_time(1e300), None);
        assert_eq!(excel_serial_to_date_time(1e15), None);
        assert_eq!(excel_serial_to_date_time(f64::INFINITY), None);
        assert_eq!(excel_serial_to_date_time(-1.0), None);
        assert_eq!(
            excel_serial_to_date_time(2_958_465.0),
            Some(dt("9999-12-31 00:00:00"))
        );
    }

    #[test]
    fn test_parse_anchor_error() {
        assert!(parse_anchor("18.04.2025").is_ok());
        assert!(parse_anchor("April 18").is_err());
    }

    #[test]
    fn test_rolling_months() {
        let r = DateRange::rolling_months(dt("2021-11-30 00:00:00"), 3);
        assert_eq!(r.start(), dt("2021-08-30 00:00:00"));
        assert_eq!(r.end(), dt("2021-11-30 00:00:00"));
    }

    #[test]
    fn test_rolling_months_clamps_day() {
        let r = DateRange::rolling_months(dt("2025-05-31 10:00:00"), 3);
        assert_eq!(r.start(), dt("2025-02-28 10:00:00"));
    }

    #[test]
    fn test_calendar_month_31() {
        let r = DateRange::calendar_month(2025, 3).unwrap();
        assert_eq!(r.start(), dt("2025-03-01 00:00:00"));
        assert!(r.contains(dt("2025-03-31 23:59:59")));
        assert!(!r.contains(dt("2025-04-01 00:00:00")));
        assert!(!r.contains(dt("2025-02-28 23:59:59")));
    }

    #[test]
    fn test_calendar_month_30() {
        let r = DateRange::calendar_month(2023, 4).unwrap();
        assert!(r.contains(dt("2023-04-30 12:00:00")));
        assert!(!r.contains(dt("2023-05-01 00:00:00")));
    }

    #[cfg(not(feature = "leap-february"))]
    #[test]
    fn test_calendar_month_february_is_28_days() {
        let r = DateRange::calendar_month(2024, 2).unwrap();
        assert!(r.contains(dt("2024-02-28 18:00:00")));
        assert!(!r.contains(dt("2024-02-29 09:00:00")));
    }

    #[cfg(feature = "leap-february")]
    #[test]
    fn test_calendar_month_february_leap_year() {
        let r = DateRange::calendar_month(2024, 2).unwrap();
        assert!(r.contains(dt("2024-02-29 09:00:00")));
        let r = DateRange::calendar_month(2023, 2).unwrap();
        assert!(!r.contains(dt("2023-03-01 00:00:00")));
        assert_eq!(r.end().date(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_calendar_month_invalid() {
        assert!(DateRange::calendar_month(2025, 0).is_err());
        assert!(DateRange::calendar_month(2025, 13).is_err());
    }

    #[test]
    fn test_month_to_date() {
        let r = DateRange::month_to_date(dt("2021-12-20 15:30:00"));
        assert_eq!(r.start(), dt("2021-12-01 00:00:00"));
        assert!(r.contains(dt("2021-12-20 15:30:00")));
        assert!(!r.contains(dt("2021-12-20 15:30:01")));
        assert!(!r.contains(dt("2021-11-30 23:59:59")));
    }
}
