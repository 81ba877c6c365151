//! Field checks and formatting applied on the client before anything is sent.
//!
//! The backend repeats most of these checks, but catching them here means a
//! user filling in a long form finds out immediately rather than after a
//! round trip.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use time::macros::format_description;
use time::Date;

use crate::constants::{
    HEADSHOT_MAX_BYTES, PASSWORD_MIN_LENGTH, STORY_MAX_WORDS, VALID_HEADSHOT_EXTENSIONS,
};

lazy_static! {
    static ref EMAIL_RE: Regex = {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
    };
    static ref STATE_RE: Regex = {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[A-Z]{2}$").expect("Invalid state regex")
    };
    static ref ZIP_RE: Regex = {
        #[allow(clippy::expect_used)]
        Regex::new(r"^[0-9]{5}$").expect("Invalid zip regex")
    };
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Please fill in all address fields")]
    MissingAddressFields,
    #[error("Your story must be {max} words or less (currently {words})")]
    StoryTooLong { words: usize, max: usize },
    #[error("State must be a two letter abbreviation, got '{0}'")]
    InvalidState(String),
    #[error("Zip code must be exactly five digits, got '{0}'")]
    InvalidZip(String),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("Birthday must be a date in the form YYYY-MM-DD, got '{0}'")]
    InvalidBirthday(String),
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Donation amount must be zero or more")]
    NegativeDonation,
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),
    #[error("Please upload a valid image file (PNG, JPG, JPEG, or GIF)")]
    UnsupportedImage,
    #[error("Image is {0} bytes, the limit is {} bytes", HEADSHOT_MAX_BYTES)]
    ImageTooLarge(u64),
}

/// Reformat whatever the user typed into `(XXX) XXX-XXXX`.
///
/// Every non digit is dropped first. Partial input gets partial grouping so
/// the value can be reformatted on every keystroke, and digits past the tenth
/// are discarded.
pub fn format_phone_number(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).take(10).collect();
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn validate_story(story: &str) -> Result<(), ValidationError> {
    let words = word_count(story);
    if words > STORY_MAX_WORDS {
        Err(ValidationError::StoryTooLong {
            words,
            max: STORY_MAX_WORDS,
        })
    } else {
        Ok(())
    }
}

/// Returns the upper-cased two letter state code.
pub fn normalise_state(state: &str) -> Result<String, ValidationError> {
    let upper = state.trim().to_uppercase();
    if STATE_RE.is_match(&upper) {
        Ok(upper)
    } else {
        Err(ValidationError::InvalidState(state.to_string()))
    }
}

pub fn validate_zip(zip: &str) -> Result<(), ValidationError> {
    if ZIP_RE.is_match(zip.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidZip(zip.to_string()))
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

pub fn parse_birthday(birthday: &str) -> Result<Date, ValidationError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(birthday.trim(), &format)
        .map_err(|_| ValidationError::InvalidBirthday(birthday.to_string()))
}

/// Checks the parts of a registration that never reach the backend.
pub fn validate_registration(
    password: &str,
    confirm_password: &str,
    donation_amount: f64,
) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort(PASSWORD_MIN_LENGTH));
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if donation_amount.is_nan() || donation_amount < 0.0 {
        return Err(ValidationError::NegativeDonation);
    }
    Ok(())
}

pub fn validate_month(month: u8) -> Result<(), ValidationError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ValidationError::InvalidMonth(month))
    }
}

/// Every named field that is empty once trimmed.
pub fn missing_fields<'a, I>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect()
}

pub fn require_fields<'a, I>(fields: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Checks a headshot's extension and size, returning the content type to
/// upload it with.
pub fn headshot_content_type(path: &Path, len: u64) -> Result<&'static str, ValidationError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or(ValidationError::UnsupportedImage)?;

    let content_type = VALID_HEADSHOT_EXTENSIONS
        .iter()
        .find(|(valid, _)| *valid == ext)
        .map(|(_, ct)| *ct)
        .ok_or(ValidationError::UnsupportedImage)?;

    if len > HEADSHOT_MAX_BYTES {
        return Err(ValidationError::ImageTooLarge(len));
    }
    Ok(content_type)
}
