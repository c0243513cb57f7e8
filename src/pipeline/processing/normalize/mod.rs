use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{AREA_CODE_LEN, COUNTRY_CODE, MIN_INTERNATIONAL_DIGITS, MIN_PHONE_DIGITS};
use crate::types::RawRecord;

/// Anything that is not an ASCII digit. `\D` would keep non-ASCII digits.
static NON_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]+").expect("static non-digit pattern is valid"));

/// Contact fields reduced to their canonical forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContact {
    /// The phone string that was chosen, formatting preserved
    pub phone_raw: String,
    /// `phone_raw` with every non-digit removed
    pub phone_digits: String,
    /// Two-digit DDD, when the number is long enough to carry one
    pub area_code: Option<String>,
    /// Lower-cased email domain
    pub domain: Option<String>,
}

/// Trait for reducing a raw prospect row to canonical contact fields.
///
/// Implementations must be total: malformed input degrades to empty/`None`
/// values instead of failing.
pub trait Normalizer {
    fn normalize(&self, record: &RawRecord) -> NormalizedContact;
}

/// Phone/email normalization for Brazilian prospect lists
#[derive(Debug, Clone, Default)]
pub struct DefaultNormalizer;

impl DefaultNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, record: &RawRecord) -> NormalizedContact {
        let phone_raw = resolve_phone(
            record.phone_primary.as_deref(),
            record.phone_secondary.as_deref(),
        );
        let phone_digits = extract_digits(&phone_raw);
        let area_code = extract_area_code(&phone_digits);
        let domain = extract_domain(record.email.as_deref());

        NormalizedContact {
            phone_raw,
            phone_digits,
            area_code,
            domain,
        }
    }
}

/// Pick the mobile number, falling back to the landline, else an empty string.
///
/// Only a missing mobile falls back; an empty or formatting-only mobile is
/// kept and simply yields no digits.
pub fn resolve_phone(primary: Option<&str>, secondary: Option<&str>) -> String {
    primary.or(secondary).unwrap_or_default().to_string()
}

/// Strip every character outside `0`-`9`, keeping digit order.
pub fn extract_digits(phone: &str) -> String {
    NON_DIGITS.replace_all(phone, "").into_owned()
}

/// Derive the DDD from a digits-only phone number.
///
/// Numbers shorter than 10 digits carry no reliable area code. A leading
/// `55` is only read as the country code when the number has at least 12
/// digits, so a 10/11 digit number starting with `55` keeps `55` as its DDD.
pub fn extract_area_code(digits: &str) -> Option<String> {
    if digits.len() < MIN_PHONE_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let start = if digits.len() >= MIN_INTERNATIONAL_DIGITS && digits.starts_with(COUNTRY_CODE) {
        COUNTRY_CODE.len()
    } else {
        0
    };

    Some(digits[start..start + AREA_CODE_LEN].to_string())
}

/// Lower-case the email and keep whatever follows the last `@`.
///
/// An address without `@` yields the whole lower-cased string, blank
/// addresses included. Only a missing email has no domain.
pub fn extract_domain(email: Option<&str>) -> Option<String> {
    let email = email?.to_lowercase();
    email.rsplit('@').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_phone_prefers_primary() {
        assert_eq!(
            resolve_phone(Some("(11) 98765-4321"), Some("(11) 3333-4444")),
            "(11) 98765-4321"
        );
        assert_eq!(resolve_phone(None, Some("(21) 3333-4444")), "(21) 3333-4444");
        assert_eq!(resolve_phone(Some("   "), Some("(21) 3333-4444")), "   ");
        assert_eq!(resolve_phone(Some(""), Some("(21) 3333-4444")), "");
        assert_eq!(resolve_phone(None, None), "");
    }

    #[test]
    fn test_extract_digits() {
        assert_eq!(extract_digits("+55 (11) 98765-4321"), "5511987654321");
        assert_eq!(extract_digits("ramal: n/a"), "");
        assert_eq!(extract_digits(""), "");
        // Full-width and Arabic-Indic digits are not ASCII digits
        assert_eq!(extract_digits("１２3٤5"), "35");
    }

    #[test]
    fn test_area_code_with_country_code() {
        assert_eq!(extract_area_code("5511987654321").as_deref(), Some("11"));
        assert_eq!(extract_area_code("552133334444").as_deref(), Some("21"));
    }

    #[test]
    fn test_area_code_local_numbers() {
        assert_eq!(extract_area_code("1198765432").as_deref(), Some("11"));
        assert_eq!(extract_area_code("21987654321").as_deref(), Some("21"));
        // Shorter than 12: a leading 55 is the DDD itself
        assert_eq!(extract_area_code("5533334444").as_deref(), Some("55"));
        assert_eq!(extract_area_code("55987654321").as_deref(), Some("55"));
    }

    #[test]
    fn test_area_code_too_short() {
        assert_eq!(extract_area_code(""), None);
        assert_eq!(extract_area_code("987654321"), None);
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain(Some("Ana@EMPRESA.com.br")).as_deref(), Some("empresa.com.br"));
        assert_eq!(extract_domain(Some("odd@name@Host.io")).as_deref(), Some("host.io"));
        assert_eq!(extract_domain(Some("NoAtSign.com")).as_deref(), Some("noatsign.com"));
        assert_eq!(extract_domain(Some("trailing@")).as_deref(), Some(""));
        assert_eq!(extract_domain(Some("")).as_deref(), Some(""));
        assert_eq!(extract_domain(Some("  ")).as_deref(), Some("  "));
        assert_eq!(extract_domain(None), None);
    }

    #[test]
    fn test_default_normalizer() {
        let record = RawRecord::new("Padaria Central")
            .with_email("contato@padariacentral.com.br")
            .with_phone_secondary("(21) 3333-4444");

        let contact = DefaultNormalizer::new().normalize(&record);
        assert_eq!(contact.phone_raw, "(21) 3333-4444");
        assert_eq!(contact.phone_digits, "2133334444");
        assert_eq!(contact.area_code.as_deref(), Some("21"));
        assert_eq!(contact.domain.as_deref(), Some("padariacentral.com.br"));
    }
}
