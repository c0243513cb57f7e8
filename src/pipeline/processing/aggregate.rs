use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SCORE;
use crate::pipeline::processing::enrich::EnrichedRecord;

/// Aggregate lead metrics over a set of enriched records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub corporate_count: usize,
    pub valid_phone_count: usize,
    /// Mean score; `None` when there are no records to average
    pub average_score: Option<f64>,
    /// Record count per score, with every score from 0 to 2 present
    pub score_distribution: BTreeMap<u8, usize>,
}

impl Summary {
    /// Reduce any view (full table or filtered subset) to its metrics.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EnrichedRecord>,
    {
        let mut score_distribution: BTreeMap<u8, usize> = (0..=MAX_SCORE).map(|s| (s, 0)).collect();
        let mut total = 0usize;
        let mut corporate_count = 0usize;
        let mut valid_phone_count = 0usize;
        let mut score_sum = 0u64;

        for record in records {
            total += 1;
            if record.is_corporate {
                corporate_count += 1;
            }
            if record.phone_valid {
                valid_phone_count += 1;
            }
            score_sum += u64::from(record.score);
            *score_distribution.entry(record.score).or_insert(0) += 1;
        }

        let average_score = (total > 0).then(|| score_sum as f64 / total as f64);

        Self {
            total,
            corporate_count,
            valid_phone_count,
            average_score,
            score_distribution,
        }
    }

    pub fn is_available(&self) -> bool {
        self.average_score.is_some()
    }
}
