//! CSV parsing for SWIFT code upload files
//!
//! Turns raw file bytes into a sequence of [`RawRow`]s. Only structural
//! problems are file-level failures here: an unreadable file, a missing
//! required header column, or a file with zero data rows. A row with blank
//! values parses fine and is rejected later by validation, so one bad row
//! never sinks the batch.

use crate::models::RawRow;

/// Required header columns, matched case-insensitively after trimming.
const COLUMN_SWIFT_CODE: &str = "SWIFT CODE";
const COLUMN_COUNTRY_ISO2: &str = "COUNTRY ISO2 CODE";
const COLUMN_COUNTRY_NAME: &str = "COUNTRY NAME";
const COLUMN_BANK_NAME: &str = "NAME";
const COLUMN_ADDRESS: &str = "ADDRESS";
/// Optional explicit headquarters flag column.
const COLUMN_HEADQUARTER: &str = "IS HEADQUARTER";

/// File-level parsing failure. Any of these fails the whole job.
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("failed to read CSV: {0}")]
    Unreadable(String),

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("file contains no data rows")]
    NoRows,
}

struct ColumnIndexes {
    swift_code: usize,
    country_iso2: usize,
    country_name: usize,
    bank_name: usize,
    address: usize,
    headquarter: Option<usize>,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndexes, CsvError> {
    let find = |name: &'static str| -> Result<usize, CsvError> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or(CsvError::MissingColumn(name))
    };

    Ok(ColumnIndexes {
        swift_code: find(COLUMN_SWIFT_CODE)?,
        country_iso2: find(COLUMN_COUNTRY_ISO2)?,
        country_name: find(COLUMN_COUNTRY_NAME)?,
        bank_name: find(COLUMN_BANK_NAME)?,
        address: find(COLUMN_ADDRESS)?,
        headquarter: headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(COLUMN_HEADQUARTER)),
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse the upload file into raw rows, preserving row order.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| CsvError::Unreadable(e.to_string()))?
        .clone();
    let columns = resolve_columns(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CsvError::Unreadable(e.to_string()))?;
        // Short rows yield empty strings for the missing cells; validation
        // turns those into per-row rejections.
        let cell = |i: usize| record.get(i).unwrap_or("").to_string();
        rows.push(RawRow {
            swift_code: cell(columns.swift_code),
            country_iso2: cell(columns.country_iso2),
            country_name: cell(columns.country_name),
            bank_name: cell(columns.bank_name),
            address: cell(columns.address),
            headquarter_flag: columns
                .headquarter
                .and_then(|i| record.get(i))
                .and_then(parse_flag),
        });
    }

    if rows.is_empty() {
        return Err(CsvError::NoRows);
    }

    Ok(rows)
}
