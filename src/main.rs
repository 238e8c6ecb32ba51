use anyhow::{Context, Result};
use chrono::Utc;
use omcreport::{config::PDF_TITLE, fetch, process, render, DateWindow, ReportConfig};
use std::{env, fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,omcreport=info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) config, client, output dir ───────────────────────────────
    let cfg = ReportConfig::default();
    let client = fetch::build_client(&cfg).context("building HTTP client")?;
    let out_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output dir {}", out_dir.display()))?;

    // ─── 3) fetch + normalize once ───────────────────────────────────
    let today = Utc::now().date_naive();
    let window = DateWindow::ending(today, cfg.window_days);
    let raw = fetch::fetch_report(&client, &cfg, window)
        .await
        .context("fetching daily order report")?;
    let table = process::normalize(&raw, &cfg).context("normalizing report")?;
    info!(records = table.rows.len(), "depot records ready");

    // ─── 4) render both artifacts ────────────────────────────────────
    let csv_path = out_dir.join(render::CSV_FILENAME);
    let csv_bytes = render::csv::render(&table).context("rendering CSV")?;
    fs::write(&csv_path, &csv_bytes)
        .with_context(|| format!("writing {}", csv_path.display()))?;
    info!(path = %csv_path.display(), bytes = csv_bytes.len(), "wrote CSV");

    let pdf_path = out_dir.join(render::PDF_FILENAME);
    let pdf_bytes = render::pdf::render(&table, PDF_TITLE).context("rendering PDF")?;
    fs::write(&pdf_path, &pdf_bytes)
        .with_context(|| format!("writing {}", pdf_path.display()))?;
    info!(path = %pdf_path.display(), bytes = pdf_bytes.len(), "wrote PDF");

    info!("all done");
    Ok(())
}
