//! Single-shot fetch of the daily order report.
//!
//! One GET against the reporting API per invocation, bounded by the
//! configured timeout and never retried; a transient failure surfaces
//! immediately to the caller.

use crate::config::{ReportConfig, DATE_FORMAT};
use crate::error::FetchError;
use chrono::{Duration, NaiveDate};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

pub mod decode;

pub use decode::{decode_workbook, RawTable};

/// The reporting endpoint sniffs for browser traffic; plain library
/// user-agents get an empty export back.
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36";

/// Inclusive date window the report covers. Built from an injected "today"
/// so tests and replays are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// Window of `width_days` ending at `to` (yesterday..today by default).
    pub fn ending(to: NaiveDate, width_days: i64) -> Self {
        DateWindow {
            from: to - Duration::days(width_days),
            to,
        }
    }
}

/// Build the HTTP client used for report fetches.
pub fn build_client(cfg: &ReportConfig) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(cfg.timeout)
        .build()
        .map_err(|e| FetchError::Transport(format!("building client: {e}")))
}

fn query_params(cfg: &ReportConfig, window: DateWindow) -> Vec<(&'static str, String)> {
    vec![
        ("lngCompanyId", cfg.company_id.to_string()),
        ("szITSfromPersol", "persol".to_string()),
        ("strGroupBy", "OMC".to_string()),
        ("strGroupBy1", cfg.company_name.clone()),
        ("strQuery1", String::new()),
        ("strQuery2", window.from.format(DATE_FORMAT).to_string()),
        ("strQuery3", window.to.format(DATE_FORMAT).to_string()),
        ("strQuery4", String::new()),
        ("strPicHeight", "1".to_string()),
        ("strPicWeight", "1".to_string()),
        ("intPeriodID", "-1".to_string()),
        ("iUserId", cfg.user_id.to_string()),
        ("iAppId", cfg.app_id.to_string()),
    ]
}

/// Fetch the daily order report for `window` and decode it.
///
/// Any transport failure (connect error, timeout, non-2xx status) yields
/// [`FetchError::Transport`]; a well-formed but rowless workbook yields
/// [`FetchError::Empty`].
#[instrument(level = "info", skip(client, cfg), fields(from = %window.from, to = %window.to))]
pub async fn fetch_report(
    client: &Client,
    cfg: &ReportConfig,
    window: DateWindow,
) -> Result<RawTable, FetchError> {
    let url = Url::parse(&cfg.endpoint)
        .map_err(|e| FetchError::Transport(format!("parsing endpoint {}: {e}", cfg.endpoint)))?;

    debug!(%url, "requesting report export");
    let resp = client
        .get(url.clone())
        .query(&query_params(cfg, window))
        .header(ACCEPT, BROWSER_ACCEPT)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await
        .map_err(|e| FetchError::Transport(format!("GET {url}: {e}")))?
        .error_for_status()
        .map_err(|e| FetchError::Transport(format!("GET {url}: {e}")))?;

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(format!("reading body from {url}: {e}")))?;

    let raw = decode_workbook(&bytes)?;
    info!(rows = raw.rows.len(), "report fetched");
    Ok(raw)
}
