/// Scoring and normalization constants shared across the pipeline.
/// These mirror the fixed business rules used by the segmentation views.

/// Consumer webmail domains; an address on one of these is not a corporate lead.
pub const FREE_EMAIL_PROVIDERS: [&str; 8] = [
    "gmail.com",
    "hotmail.com",
    "outlook.com",
    "yahoo.com",
    "yahoo.com.br",
    "uol.com.br",
    "globo.com",
    "bol.com.br",
];

/// Brazilian country calling code, optionally prefixed to phone numbers
pub const COUNTRY_CODE: &str = "55";

/// Minimum digit count for a phone number to carry an area code and be dialable
pub const MIN_PHONE_DIGITS: usize = 10;

/// Minimum digit count for a number to be read as country code + area code + subscriber
pub const MIN_INTERNATIONAL_DIGITS: usize = 12;

/// Width of a DDD (area code)
pub const AREA_CODE_LEN: usize = 2;

/// Highest possible lead score (corporate domain + valid phone)
pub const MAX_SCORE: u8 = 2;

// Accepted input headers per field (canonical name first, then the
// spreadsheet export names). Matching is case-insensitive.
pub const COMPANY_HEADERS: &[&str] = &["company", "empresa"];
pub const CONTACT_NAME_HEADERS: &[&str] = &["contact_name", "nome", "name"];
pub const EMAIL_HEADERS: &[&str] = &["email", "e-mail"];
pub const PHONE_PRIMARY_HEADERS: &[&str] = &["phone_primary", "celular", "mobile"];
pub const PHONE_SECONDARY_HEADERS: &[&str] = &["phone_secondary", "telefone", "phone"];

/// Returns true when `domain` belongs to the free webmail list
pub fn is_free_provider(domain: &str) -> bool {
    FREE_EMAIL_PROVIDERS.contains(&domain)
}
