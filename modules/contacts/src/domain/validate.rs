//! Pure field validation and phone-number canonicalization.
//!
//! Phone numbers are parsed with region-aware libphonenumber metadata and
//! rendered as E.164. `is_valid_phone_number` only checks the canonical
//! shape; the writer uses it to guard the normalizer's output before the
//! value reaches the 16-character column.

use once_cell::sync::Lazy;
use phonenumber::{country, Mode};
use regex::Regex;

pub const MAX_EMAIL_LEN: usize = 255;
pub const MIN_EMAIL_LEN: usize = 3;
/// Full names must be strictly shorter than this.
pub const MAX_FULL_NAME_LEN: usize = 255;
pub const MAX_PHONE_NUMBER_LEN: usize = 15;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

static CANONICAL_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("phone pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    (MIN_EMAIL_LEN..=MAX_EMAIL_LEN).contains(&email.len()) && EMAIL_RE.is_match(email)
}

pub fn is_valid_full_name(full_name: &str) -> bool {
    full_name.len() < MAX_FULL_NAME_LEN
}

/// Canonical-form check: `^\+?[1-9]\d{1,14}$`, at most 15 characters.
pub fn is_valid_phone_number(number: &str) -> bool {
    (1..=MAX_PHONE_NUMBER_LEN).contains(&number.len()) && CANONICAL_PHONE_RE.is_match(number)
}

/// Parse a two-letter region code such as `"AU"`.
pub fn parse_region(code: &str) -> Option<country::Id> {
    code.trim().to_ascii_uppercase().parse::<country::Id>().ok()
}

/// Trim, parse assuming `region` when no country code is present, and render as E.164.
///
/// Returns `None` when the input is not a number for the region or for its
/// explicit country code.
pub fn normalize_phone_number(raw: &str, region: country::Id) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = phonenumber::parse(Some(region), trimmed).ok()?;
    Some(parsed.format().mode(Mode::E164).to_string())
}
