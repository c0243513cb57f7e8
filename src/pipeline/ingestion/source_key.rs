use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::pipeline::ingestion::loader::InputFormat;
use crate::types::RawRecord;

/// Content identity of an input source, used as the memoization key for
/// enriched tables.
///
/// Sources loaded through the ingestion layer are keyed by their bytes plus
/// the parse settings that produced the records, so one file read with two
/// delimiters yields two keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceKey(String);

impl SourceKey {
    /// Hash raw source bytes (a CSV or JSON file as read from disk).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Hash source bytes together with the settings they were parsed with.
    ///
    /// The delimiter only takes part for CSV; it has no effect on JSON.
    pub fn from_bytes_with(bytes: &[u8], format: InputFormat, delimiter: u8) -> Self {
        let mut hasher = Sha256::new();
        match format {
            InputFormat::Json => hasher.update(b"json\0"),
            InputFormat::Csv | InputFormat::Auto => {
                hasher.update(b"csv\0");
                hasher.update([delimiter]);
            }
        }
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Hash an in-memory record set.
    ///
    /// Each field is written with a presence tag and a length prefix so that
    /// `None`, `Some("")` and shifted boundaries never collide.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((records.len() as u64).to_le_bytes());
        for record in records {
            for field in [
                &record.company,
                &record.contact_name,
                &record.email,
                &record.phone_primary,
                &record.phone_secondary,
            ] {
                match field {
                    Some(value) => {
                        hasher.update([1u8]);
                        hasher.update((value.len() as u64).to_le_bytes());
                        hasher.update(value.as_bytes());
                    }
                    None => hasher.update([0u8]),
                }
            }
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
