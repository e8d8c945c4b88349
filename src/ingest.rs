//! Turns an uploaded byte stream into a [`TransactionSet`].
//!
//! The whole file is read before the header is checked against the
//! required columns, so a malformed row is reported ahead of a missing column.

use crate::errors::AppError;
use crate::models::{TransactionRecord, TransactionSet};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;

/// Columns every upload must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Type", "Amount", "Loan/CC Name", "Paid On Time"];

pub const CREDIT_LIMIT_COLUMN: &str = "Credit Limit";

const ACCEPTED_EXTENSIONS: [&str; 2] = [".csv", ".txt"];

/// Accepts `.csv` and `.txt` names, ignoring case.
pub fn is_supported_filename(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Column positions resolved from the header row.
struct ColumnIndex {
    date: usize,
    transaction_type: usize,
    amount: usize,
    account_name: usize,
    paid_on_time: usize,
    credit_limit: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, AppError> {
        // First occurrence wins for duplicated header names.
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            positions.entry(name).or_insert(idx);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !positions.contains_key(**col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingColumns { missing });
        }

        Ok(Self {
            date: positions["Date"],
            transaction_type: positions["Type"],
            amount: positions["Amount"],
            account_name: positions["Loan/CC Name"],
            paid_on_time: positions["Paid On Time"],
            credit_limit: positions.get(CREDIT_LIMIT_COLUMN).copied(),
        })
    }
}

/// Parses CSV bytes with a header row into a transaction set.
///
/// # Errors
///
/// * `AppError::Parse` - empty input, rows longer than the header, or a non-numeric `Amount`.
/// * `AppError::MissingColumns` - any required column absent from the header.
pub fn parse_transactions(bytes: &[u8]) -> Result<TransactionSet, AppError> {
    // Short rows are padded with missing cells; only over-long rows are rejected.
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Parse(e.to_string()))?
        .clone();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::Parse("No columns to parse from file".to_string()));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result.map_err(|e| AppError::Parse(e.to_string()))?;
        if row.len() > headers.len() {
            return Err(AppError::Parse(format!(
                "line {}: expected {} fields, saw {}",
                line_of(&row, idx),
                headers.len(),
                row.len()
            )));
        }
        rows.push(row);
    }

    let columns = ColumnIndex::from_headers(&headers)?;

    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| to_record(row, &columns, line_of(row, idx)))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        "Parsed {} transaction rows (credit limit column: {})",
        records.len(),
        columns.credit_limit.is_some()
    );

    Ok(TransactionSet::new(records, columns.credit_limit.is_some()))
}

fn to_record(
    row: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
) -> Result<TransactionRecord, AppError> {
    let amount = match cell(row, columns.amount) {
        None => None,
        Some(raw) => Some(parse_amount(&raw).ok_or_else(|| {
            AppError::Parse(format!("line {}: invalid Amount {:?}", line, raw))
        })?),
    };

    Ok(TransactionRecord {
        date: cell(row, columns.date),
        transaction_type: cell(row, columns.transaction_type),
        amount,
        account_name: cell(row, columns.account_name),
        paid_on_time: cell(row, columns.paid_on_time),
        credit_limit: columns.credit_limit.and_then(|idx| cell(row, idx)),
    })
}

/// Source line of a record, accounting for blank lines and quoted newlines.
fn line_of(row: &StringRecord, idx: usize) -> u64 {
    row.position()
        .map(|pos| pos.line())
        // +2: 1-based lines, plus the header line
        .unwrap_or(idx as u64 + 2)
}

/// Non-blank cell text. `None` for blank cells and for cells past the end of a short row.
fn cell(row: &StringRecord, idx: usize) -> Option<String> {
    row.get(idx)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}
