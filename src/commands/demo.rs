use crate::api::{self, Mode};
use crate::commands::Out;
use crate::model::parse_anchor;
use crate::reports::{
    self, profitable_cashback, spending_by_category, to_json, CategorySpend, CategoryTotals,
    MainPage,
};
use crate::sink::{self, DEFAULT_REPORT_FILE};
use crate::source::load_transactions;
use crate::{Config, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

const DEMO_YEAR: i32 = 2025;
const DEMO_MONTH: u32 = 3;
const DEMO_CATEGORY: &str = "Супермаркеты";
const DEMO_DATE: &str = "18.04.2025";

/// Everything the demo run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReports {
    pub main_page: MainPage,
    pub cashback: CategoryTotals,
    pub spending: Vec<CategorySpend>,
}

/// Runs all three reports with fixed example parameters. The spending report is also written to
/// `report.json` in the reports directory.
pub async fn demo(config: Config, mode: Mode) -> Result<Out<DemoReports>> {
    demo_at(config, mode, Local::now().naive_local()).await
}

pub(crate) async fn demo_at(
    config: Config,
    mode: Mode,
    now: NaiveDateTime,
) -> Result<Out<DemoReports>> {
    let transactions = load_transactions(config.input_path()).await?;
    let settings = config.settings().await?;
    let quotes = api::quotes(&config, mode)?;

    info!("Main page at {now}");
    let main_page = reports::main_page(&transactions, now, &settings, quotes.as_ref()).await;

    info!("Cashback for {DEMO_MONTH:02}.{DEMO_YEAR}");
    let cashback = profitable_cashback(&transactions, DEMO_YEAR, DEMO_MONTH)?;

    info!("Spending on '{DEMO_CATEGORY}' up to {DEMO_DATE}");
    let spending = spending_by_category(
        &transactions,
        DEMO_CATEGORY,
        Some(parse_anchor(DEMO_DATE)?),
    );
    let path =
        sink::write_report(config.reports_dir(), DEFAULT_REPORT_FILE, &to_json(&spending)?).await?;

    Ok(Out::new(
        format!("Demo reports complete, spending saved to {}", path.display()),
        DemoReports {
            main_page,
            cashback,
            spending,
        },
    ))
}
