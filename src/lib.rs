//! Daily OMC order report pipeline.
//!
//! Fetches the daily order export from the NPA reporting API, cleans and
//! filters it down to BOST-KUMASI depot records, and renders the result as
//! CSV bytes or a paginated landscape PDF. Each run is independent:
//! fetch, then normalize, then render, with no state shared between runs
//! beyond the [`ReportConfig`] value the caller passes in.
//!
//! A serving layer is expected to call [`daily_report_csv`] /
//! [`daily_report_pdf`] (or compose the stages itself via [`fetch`],
//! [`process`] and [`render`]) and map [`ReportError`] onto its own
//! response statuses — see [`ReportError::is_no_data`].

pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod render;

pub use config::{DepotMatch, ReportConfig};
pub use error::{FetchError, ProcessError, RenderError, ReportError};
pub use fetch::{DateWindow, RawTable};
pub use process::NormalizedTable;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{info, instrument};

/// Fetch the report window ending at `today` and normalize it.
#[instrument(level = "info", skip(client, cfg))]
pub async fn normalized_report(
    client: &Client,
    cfg: &ReportConfig,
    today: NaiveDate,
) -> Result<NormalizedTable, ReportError> {
    let window = DateWindow::ending(today, cfg.window_days);
    let raw = fetch::fetch_report(client, cfg, window).await?;
    let table = process::normalize(&raw, cfg)?;
    info!(
        records = table.rows.len(),
        columns = table.columns.len(),
        "report normalized"
    );
    Ok(table)
}

/// Fetch, normalize, and render the report as CSV bytes.
pub async fn daily_report_csv(
    client: &Client,
    cfg: &ReportConfig,
    today: NaiveDate,
) -> Result<Vec<u8>, ReportError> {
    let table = normalized_report(client, cfg, today).await?;
    Ok(render::csv::render(&table)?)
}

/// Fetch, normalize, and render the report as a paginated PDF.
pub async fn daily_report_pdf(
    client: &Client,
    cfg: &ReportConfig,
    today: NaiveDate,
    title: &str,
) -> Result<Vec<u8>, ReportError> {
    let table = normalized_report(client, cfg, today).await?;
    Ok(render::pdf::render(&table, title)?)
}
