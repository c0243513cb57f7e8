use serde::{Deserialize, Serialize};

use crate::pipeline::processing::normalize::{DefaultNormalizer, NormalizedContact, Normalizer};
use crate::pipeline::processing::quality_gate::{DefaultQualityGate, LeadAssessment, QualityGate};
use crate::types::RawRecord;

/// A prospect row together with every derived segmentation field.
///
/// Enrichment is a pure function of the raw row: no timestamps or generated
/// ids are attached, so enriching the same input twice compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// The original row, unchanged
    #[serde(flatten)]
    pub raw: RawRecord,
    /// Chosen phone: mobile, else landline, else empty
    pub phone_raw: String,
    /// `phone_raw` reduced to ASCII digits
    pub phone_digits: String,
    /// Two-digit DDD
    pub area_code: Option<String>,
    /// Lower-cased email domain
    pub domain: Option<String>,
    pub is_corporate: bool,
    pub phone_valid: bool,
    /// Lead score in `0..=2`
    pub score: u8,
}

impl EnrichedRecord {
    /// Assemble a record from the two pipeline stages. This is the only place
    /// the derived fields are combined.
    pub fn from_stages(
        raw: RawRecord,
        contact: NormalizedContact,
        assessment: LeadAssessment,
    ) -> Self {
        Self {
            raw,
            phone_raw: contact.phone_raw,
            phone_digits: contact.phone_digits,
            area_code: contact.area_code,
            domain: contact.domain,
            is_corporate: assessment.is_corporate,
            phone_valid: assessment.phone_valid,
            score: assessment.score,
        }
    }

    pub fn company(&self) -> Option<&str> {
        self.raw.company.as_deref()
    }
}

/// Ordered, read-only result of enriching a whole prospect table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedTable {
    records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    pub fn new(records: Vec<EnrichedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a EnrichedTable {
    type Item = &'a EnrichedRecord;
    type IntoIter = std::slice::Iter<'a, EnrichedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Trait for deriving the enriched form of a single prospect row
pub trait Enricher {
    fn enrich(&self, record: &RawRecord) -> EnrichedRecord;
}

/// Normalizer followed by the quality gate
pub struct DefaultEnricher {
    normalizer: Box<dyn Normalizer + Send + Sync>,
    quality_gate: Box<dyn QualityGate + Send + Sync>,
}

impl Default for DefaultEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultEnricher {
    pub fn new() -> Self {
        Self {
            normalizer: Box::new(DefaultNormalizer::new()),
            quality_gate: Box::new(DefaultQualityGate::new()),
        }
    }

    pub fn with_stages(
        normalizer: Box<dyn Normalizer + Send + Sync>,
        quality_gate: Box<dyn QualityGate + Send + Sync>,
    ) -> Self {
        Self {
            normalizer,
            quality_gate,
        }
    }
}

impl Enricher for DefaultEnricher {
    fn enrich(&self, record: &RawRecord) -> EnrichedRecord {
        let contact = self.normalizer.normalize(record);
        let assessment = self.quality_gate.assess(&contact);
        EnrichedRecord::from_stages(record.clone(), contact, assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrich_corporate_lead() {
        let enricher = DefaultEnricher::new();
        let record = RawRecord::new("Empresa X")
            .with_contact_name("Ana")
            .with_email("Ana@EMPRESA.com.br")
            .with_phone_primary("+55 (11) 98765-4321");

        let enriched = enricher.enrich(&record);

        assert_eq!(enriched.raw, record);
        assert_eq!(enriched.phone_digits, "5511987654321");
        assert_eq!(enriched.area_code.as_deref(), Some("11"));
        assert_eq!(enriched.domain.as_deref(), Some("empresa.com.br"));
        assert!(enriched.is_corporate);
        assert!(enriched.phone_valid);
        assert_eq!(enriched.score, 2);
    }

    #[test]
    fn test_enrich_free_email_lead() {
        let enricher = DefaultEnricher::new();
        let record = RawRecord::new("Joao ME")
            .with_email("joao@gmail.com")
            .with_phone_primary("(31) 99999-0000");

        let enriched = enricher.enrich(&record);
        assert_eq!(enriched.domain.as_deref(), Some("gmail.com"));
        assert!(!enriched.is_corporate);
        assert!(enriched.phone_valid);
        assert_eq!(enriched.score, 1);
    }

    #[test]
    fn test_enrich_empty_record_degrades() {
        let enricher = DefaultEnricher::new();
        let enriched = enricher.enrich(&RawRecord::default());

        assert_eq!(enriched.phone_raw, "");
        assert_eq!(enriched.phone_digits, "");
        assert_eq!(enriched.area_code, None);
        assert_eq!(enriched.domain, None);
        assert!(!enriched.is_corporate);
        assert!(!enriched.phone_valid);
        assert_eq!(enriched.score, 0);
    }

    #[test]
    fn test_enriched_record_serializes_flat() {
        let record = RawRecord::new("ACME").with_email("x@acme.io");
        let enriched = DefaultEnricher::new().enrich(&record);
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["company"], "ACME");
        assert_eq!(value["domain"], "acme.io");
        assert_eq!(value["score"], 1);
    }
}
