//! Prospect table loading.
//!
//! Turns CSV or JSON bytes into `RawRecord`s plus a `SourceKey` that
//! identifies the input for memoization. The only structural requirement
//! is the company field; everything else may be missing or blank.

use std::fs;
use std::io::Read;
use std::path::Path;

use clap::ValueEnum;
use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{
    COMPANY_HEADERS, CONTACT_NAME_HEADERS, EMAIL_HEADERS, PHONE_PRIMARY_HEADERS,
    PHONE_SECONDARY_HEADERS,
};
use crate::error::{EnricherError, Result};
use crate::pipeline::ingestion::source_key::SourceKey;
use crate::types::RawRecord;

/// Input encoding of a prospect table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Pick by file extension, then by content
    #[default]
    Auto,
    Csv,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub format: InputFormat,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: InputFormat::Auto,
            delimiter: b',',
        }
    }
}

/// A loaded input: its identity plus the rows in file order
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub key: SourceKey,
    pub format: InputFormat,
    pub records: Vec<RawRecord>,
}

impl LoadedSource {
    /// Wrap records that were produced in memory by some other collaborator.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        Self {
            key: SourceKey::from_records(&records),
            format: InputFormat::Auto,
            records,
        }
    }
}

/// Column positions of the known fields within a CSV header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    company: usize,
    contact_name: Option<usize>,
    email: Option<usize>,
    phone_primary: Option<usize>,
    phone_secondary: Option<usize>,
}

/// Read a file from disk and load it according to `options`.
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<LoadedSource> {
    let bytes = fs::read(path).map_err(|e| {
        EnricherError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read '{}': {e}", path.display()),
        ))
    })?;

    let format = match options.format {
        InputFormat::Auto => detect_format(Some(path), &bytes),
        explicit => explicit,
    };

    info!(path = %path.display(), bytes = bytes.len(), ?format, "Loading prospect table");
    load_bytes(&bytes, &LoadOptions { format, ..options.clone() })
}

/// Load an already-buffered source.
pub fn load_bytes(bytes: &[u8], options: &LoadOptions) -> Result<LoadedSource> {
    let format = match options.format {
        InputFormat::Auto => detect_format(None, bytes),
        explicit => explicit,
    };

    let records = match format {
        InputFormat::Json => parse_json(bytes)?,
        InputFormat::Csv | InputFormat::Auto => parse_csv(bytes, options.delimiter)?,
    };

    let key = SourceKey::from_bytes_with(bytes, format, options.delimiter);
    debug!(key = key.short(), records = records.len(), "Prospect table loaded");

    Ok(LoadedSource { key, format, records })
}

/// Load from any reader (stdin, network body, ...).
pub fn load_reader<R: Read>(mut reader: R, options: &LoadOptions) -> Result<LoadedSource> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_bytes(&bytes, options)
}

fn detect_format(path: Option<&Path>, bytes: &[u8]) -> InputFormat {
    let by_extension = path
        .and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match by_extension.as_deref() {
        Some("json") => InputFormat::Json,
        Some("csv") | Some("tsv") | Some("txt") => InputFormat::Csv,
        _ => match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'[') => InputFormat::Json,
            _ => InputFormat::Csv,
        },
    }
}

fn parse_json(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    serde_json::from_slice::<Vec<RawRecord>>(bytes).map_err(|e| {
        if e.is_data() {
            EnricherError::Validation {
                line: Some(e.line()),
                message: e.to_string(),
            }
        } else {
            EnricherError::Json(e)
        }
    })
}

fn parse_csv(bytes: &[u8], delimiter: u8) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.byte_headers()?.clone();
    let columns = build_column_map(&headers)?;

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut row) {
            Ok(true) => records.push(record_from_row(&row, &columns)),
            Ok(false) => break,
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize);
                return Err(EnricherError::Validation {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
            }
        }
    }

    Ok(records)
}

fn build_column_map(headers: &ByteRecord) -> Result<ColumnMap> {
    let names: Vec<String> = headers
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().trim_start_matches('\u{feff}').to_lowercase())
        .collect();

    let find = |aliases: &[&str]| names.iter().position(|n| aliases.contains(&n.as_str()));

    let company = find(COMPANY_HEADERS).ok_or_else(|| {
        EnricherError::MissingColumn(format!(
            "company (accepted headers: {})",
            COMPANY_HEADERS.join(", ")
        ))
    })?;

    let columns = ColumnMap {
        company,
        contact_name: find(CONTACT_NAME_HEADERS),
        email: find(EMAIL_HEADERS),
        phone_primary: find(PHONE_PRIMARY_HEADERS),
        phone_secondary: find(PHONE_SECONDARY_HEADERS),
    };

    for (field, position) in [
        ("contact_name", columns.contact_name),
        ("email", columns.email),
        ("phone_primary", columns.phone_primary),
        ("phone_secondary", columns.phone_secondary),
    ] {
        if position.is_none() {
            warn!(field, "Column not present in input; values will be empty");
        }
    }

    Ok(columns)
}

fn record_from_row(row: &ByteRecord, columns: &ColumnMap) -> RawRecord {
    let cell = |index: Option<usize>| -> Option<String> {
        let value = String::from_utf8_lossy(row.get(index?)?);
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    RawRecord {
        company: cell(Some(columns.company)),
        contact_name: cell(columns.contact_name),
        email: cell(columns.email),
        phone_primary: cell(columns.phone_primary),
        phone_secondary: cell(columns.phone_secondary),
    }
}
