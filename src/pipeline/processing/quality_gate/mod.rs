use serde::{Deserialize, Serialize};

use crate::constants::{is_free_provider, MIN_PHONE_DIGITS};
use crate::pipeline::processing::normalize::NormalizedContact;

/// Lead-quality signals derived from a normalized contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadAssessment {
    /// The email domain is known and is not a free webmail provider
    pub is_corporate: bool,
    /// The phone has enough digits to be dialable (DDD + subscriber)
    pub phone_valid: bool,
    /// `is_corporate + phone_valid`, in `0..=2`
    pub score: u8,
}

/// Trait for scoring normalized contacts
pub trait QualityGate {
    fn assess(&self, contact: &NormalizedContact) -> LeadAssessment;
}

/// Additive two-signal scoring: one point for a corporate domain, one for a
/// valid phone. No weighting.
#[derive(Debug, Clone, Default)]
pub struct DefaultQualityGate;

impl DefaultQualityGate {
    pub fn new() -> Self {
        Self
    }
}

impl QualityGate for DefaultQualityGate {
    fn assess(&self, contact: &NormalizedContact) -> LeadAssessment {
        let is_corporate = is_corporate(contact.domain.as_deref());
        let phone_valid = is_phone_valid(&contact.phone_digits);

        LeadAssessment {
            is_corporate,
            phone_valid,
            score: score(is_corporate, phone_valid),
        }
    }
}

/// A missing domain is never corporate.
pub fn is_corporate(domain: Option<&str>) -> bool {
    domain.is_some_and(|d| !is_free_provider(d))
}

pub fn is_phone_valid(digits: &str) -> bool {
    digits.len() >= MIN_PHONE_DIGITS
}

pub fn score(is_corporate: bool, phone_valid: bool) -> u8 {
    u8::from(is_corporate) + u8::from(phone_valid)
}
