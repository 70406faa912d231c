use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::otp::errors::ValidationError;

lazy_static! {
    // E.164-like: optional '+', leading digit 1-9, 2 to 15 digits total.
    // ASCII classes only; `\d` would also accept non-Latin digits.
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[1-9][0-9]{1,14}$").unwrap();
}

/// Remove all whitespace from a phone number.
pub fn strip_whitespace(phone_number: &str) -> String {
    phone_number.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate a phone number and return the form used as the store key.
///
/// An empty input is "missing"; anything else that fails the pattern after
/// whitespace removal is "invalid".
pub fn normalize_phone_number(phone_number: &str) -> Result<String, ValidationError> {
    if phone_number.is_empty() {
        return Err(ValidationError::PhoneRequired);
    }

    let phone = strip_whitespace(phone_number);
    if !PHONE_REGEX.is_match(&phone) {
        return Err(ValidationError::InvalidPhoneFormat);
    }

    Ok(phone)
}

/// Mask a phone number for logs, keeping only the last four characters.
pub fn mask_phone_number(phone_number: &str) -> String {
    let chars: Vec<char> = phone_number.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
