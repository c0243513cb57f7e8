//! Read-only views over an enriched table.
//!
//! Filters never mutate the table; they return the matching records in
//! their original order. Company detail lookups always read the full table,
//! even when the company was picked from a filtered view.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EnricherError, Result};
use crate::pipeline::processing::{EnrichedRecord, EnrichedTable, Summary};

/// Area-code selector: everything, or one exact DDD
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AreaCodeFilter {
    #[default]
    All,
    Code(String),
}

impl AreaCodeFilter {
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        match self {
            AreaCodeFilter::All => true,
            AreaCodeFilter::Code(code) => record.area_code.as_deref() == Some(code.as_str()),
        }
    }
}

impl FromStr for AreaCodeFilter {
    type Err = EnricherError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if is_all(s) {
            return Ok(AreaCodeFilter::All);
        }
        if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(AreaCodeFilter::Code(s.to_string()))
        } else {
            Err(EnricherError::InvalidSelector(format!(
                "area code must be two digits or 'all', got '{s}'"
            )))
        }
    }
}

impl fmt::Display for AreaCodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaCodeFilter::All => f.write_str("all"),
            AreaCodeFilter::Code(code) => f.write_str(code),
        }
    }
}

/// Tri-state email selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailKindFilter {
    #[default]
    All,
    Corporate,
    Free,
}

impl EmailKindFilter {
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        match self {
            EmailKindFilter::All => true,
            EmailKindFilter::Corporate => record.is_corporate,
            EmailKindFilter::Free => !record.is_corporate,
        }
    }
}

impl FromStr for EmailKindFilter {
    type Err = EnricherError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if is_all(s) {
            return Ok(EmailKindFilter::All);
        }
        match s.to_lowercase().as_str() {
            "corporate" | "corporativo" => Ok(EmailKindFilter::Corporate),
            "free" | "gratuito" => Ok(EmailKindFilter::Free),
            other => Err(EnricherError::InvalidSelector(format!(
                "email kind must be all, corporate or free, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for EmailKindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmailKindFilter::All => "all",
            EmailKindFilter::Corporate => "corporate",
            EmailKindFilter::Free => "free",
        };
        f.write_str(label)
    }
}

fn is_all(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todos")
}

/// Both selectors, combined with AND
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    pub area_code: AreaCodeFilter,
    pub email_kind: EmailKindFilter,
}

impl RecordFilter {
    pub fn new(area_code: AreaCodeFilter, email_kind: EmailKindFilter) -> Self {
        Self { area_code, email_kind }
    }

    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        self.area_code.matches(record) && self.email_kind.matches(record)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.area_code == AreaCodeFilter::All && self.email_kind == EmailKindFilter::All
    }
}

/// Borrowed subset of an enriched table, in original order
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a EnrichedRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn records(&self) -> &[&'a EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-null company names, in first-appearance order
    pub fn companies(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .copied()
            .filter_map(EnrichedRecord::company)
            .filter(|company| seen.insert(*company))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(self.records.iter().copied())
    }
}

impl EnrichedTable {
    /// Apply both selectors and keep matches in original order.
    pub fn filter(&self, filter: &RecordFilter) -> FilteredView<'_> {
        FilteredView {
            records: self.iter().filter(|r| filter.matches(r)).collect(),
        }
    }

    /// Distinct non-null area codes, ascending; the options of the DDD selector.
    pub fn area_code_options(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|r| r.area_code.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First record in original order whose company equals `company`.
    pub fn detail(&self, company: &str) -> Option<&EnrichedRecord> {
        self.iter().find(|r| r.company() == Some(company))
    }

    /// Pick a company from the filtered view and return its detail record.
    ///
    /// The company must be offered by the filtered view, but the record
    /// returned is the first match in the unfiltered table.
    pub fn select_company(&self, filter: &RecordFilter, company: &str) -> Result<&EnrichedRecord> {
        let view = self.filter(filter);
        if !view.companies().contains(&company) {
            return Err(EnricherError::UnknownCompany(company.to_string()));
        }
        self.detail(company)
            .ok_or_else(|| EnricherError::UnknownCompany(company.to_string()))
    }

    pub fn summary(&self) -> Summary {
        Summary::from_records(self.iter())
    }
}
