//! Tabular recording reader
//!
//! Reads delimited text exports (header row of column names, one row per
//! time point), resolves which device produced them from the column
//! signature, and hands back a device-agnostic [`Dataset`] with the
//! bookkeeping columns removed.

use crate::error::{EegError, Result};
use crate::sanitize::{drop_columns, drop_zero_columns};
use crate::types::{Channel, Dataset};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recording device inferred from the column names of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceProfile {
    /// Reference test recordings with a `Time (s)` column
    Reference,
    /// Emotiv EPOC exports with `TIME_STAMP_ms` / `COUNTER` columns
    Epoc,
    /// Anything else: no time column
    Generic,
}

impl DeviceProfile {
    pub fn detect<S: AsRef<str>>(columns: &[S]) -> Self {
        let has = |name: &str| columns.iter().any(|c| c.as_ref() == name);
        if has("Time (s)") {
            DeviceProfile::Reference
        } else if has("TIME_STAMP_ms") {
            DeviceProfile::Epoc
        } else {
            DeviceProfile::Generic
        }
    }

    /// Column holding the time base, if the device writes one
    pub fn time_column(self) -> Option<&'static str> {
        match self {
            DeviceProfile::Reference => Some("Time (s)"),
            DeviceProfile::Epoc => Some("TIME_STAMP_ms"),
            DeviceProfile::Generic => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceProfile::Reference => "reference",
            DeviceProfile::Epoc => "epoc",
            DeviceProfile::Generic => "generic",
        }
    }
}

/// Non-signal columns written by any supported device. All of them are
/// removed regardless of the detected profile.
pub const BOOKKEEPING_COLUMNS: &[&str] = &[
    "Time (s)",
    "Sampling Rate",
    "Reference",
    "TIME_STAMP_ms",
    "TIME_STAMP_s",
    "COUNTER",
];

/// A sanitized recording ready for normalization
#[derive(Debug, Clone)]
pub struct Recording {
    pub dataset: Dataset,
    pub profile: DeviceProfile,
    /// Column names as they appeared in the source, before sanitation
    pub source_columns: Vec<String>,
}

/// `;` if the text contains any semicolon, `,` otherwise
pub fn detect_delimiter(text: &str) -> u8 {
    if text.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Parse delimited text into a dataset with one channel per column
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let delimiter = detect_delimiter(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(EegError::InvalidInput("Table has no columns".to_string()));
    }

    // a delimiter at the end of every line leaves an unnamed last column
    let trailing_delimiter = headers.last().map_or(false, String::is_empty);
    if trailing_delimiter {
        headers.pop();
    }
    if let Some(pos) = headers.iter().position(String::is_empty) {
        return Err(EegError::ParseError(format!(
            "Column {} has an empty name in the header row",
            pos + 1
        )));
    }
    let expected_cells = headers.len() + usize::from(trailing_delimiter);

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        // header occupies line 1
        let line = row_idx + 2;
        if record.len() != expected_cells {
            return Err(EegError::ParseError(format!(
                "Line {} has {} values, expected {} columns",
                line,
                record.len(),
                expected_cells
            )));
        }
        if trailing_delimiter && record.get(headers.len()).map_or(false, |c| !c.is_empty()) {
            return Err(EegError::ParseError(format!(
                "Line {} has a value in the unnamed last column",
                line
            )));
        }
        for (col_idx, cell) in record.iter().take(headers.len()).enumerate() {
            let value = cell.parse::<f64>().map_err(|_| {
                EegError::ParseError(format!(
                    "Invalid numeric value '{}' at line {}, column '{}'",
                    cell, line, headers[col_idx]
                ))
            })?;
            columns[col_idx].push(value);
        }
    }

    if columns[0].is_empty() {
        return Err(EegError::InvalidInput("No data rows found".to_string()));
    }

    log::debug!(
        "Parsed {} columns x {} rows (delimiter '{}')",
        headers.len(),
        columns[0].len(),
        delimiter as char
    );

    Dataset::from_columns(headers.into_iter().zip(columns))
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_csv(&text)
}

/// Split the time column out and remove bookkeeping and all-zero columns
pub fn prepare_recording(table: Dataset) -> Result<Recording> {
    let source_columns: Vec<String> = table.channel_names().iter().map(|s| s.to_string()).collect();
    let profile = DeviceProfile::detect(&source_columns[..]);

    let time = profile
        .time_column()
        .and_then(|name| table.channel(name))
        .map(|c| c.samples.clone())
        .or_else(|| table.time.clone());

    let table = drop_zero_columns(drop_columns(table, BOOKKEEPING_COLUMNS));
    let channels: Vec<Channel> = table.into_channels();
    let dataset = Dataset::new(channels, time)?;

    log::info!(
        "Resolved {} profile: {} of {} columns retained",
        profile.name(),
        dataset.num_channels(),
        source_columns.len()
    );

    Ok(Recording {
        dataset,
        profile,
        source_columns,
    })
}

/// Read a recording from disk and sanitize it
pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<Recording> {
    let path = path.as_ref();
    log::debug!("Loading recording {}", path.display());
    prepare_recording(read_csv(path)?)
}
