//! Utility to score a local transaction CSV without running the server.
//!
//! Usage: `score_csv <path/to/transactions.csv>`
//!
//! Prints the same JSON payload `POST /upload` would return.

use anyhow::Context;
use cibil_advisor::errors::AppError;
use cibil_advisor::ingest::{is_supported_filename, parse_transactions};
use cibil_advisor::metrics::{analyze, compute_metrics, ScoreBand};
use cibil_advisor::models::UploadResponse;
use std::env;
use std::path::Path;

/// Main entry point for the scoring utility.
fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: score_csv <path/to/transactions.csv>")?;

    let filename = Path::new(&path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    if !is_supported_filename(filename) {
        return Err(AppError::UnsupportedFileType.into());
    }

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?;
    let transactions = parse_transactions(&bytes)?;
    let analysis = analyze(&transactions);
    let metrics = compute_metrics(&transactions);

    eprintln!(
        "{} rows, outstanding credit {:.2} of limit {:.2}, band: {}",
        transactions.len(),
        analysis.outstanding_credit,
        analysis.total_limit,
        ScoreBand::from_score(metrics.score)
    );

    let response = UploadResponse::ok(transactions.len(), metrics);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
