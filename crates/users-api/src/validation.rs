use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use entity::user;

pub const MAX_NAME_LEN: usize = 255;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email regex is valid")
});

/// Problems with a record's field values, independent of how they arrived.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("Full name cannot be blank.")]
    BlankFullName,

    #[error("`{field}` must be at most {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error("`{0}` is not a valid email address.")]
    InvalidEmail(String),

    #[error("`{field}` must be a month between 1 and 12.")]
    InvalidMonth { field: &'static str },

    #[error("`{field}` needs a matching year.")]
    MonthWithoutYear { field: &'static str },

    #[error("End date must not be before the start date.")]
    EndBeforeStart,

    #[error("`{0}` cannot be blank.")]
    Blank(&'static str),
}

/// Trims and lowercases an email. Blank input means "no email".
pub fn normalize_email(raw: &str) -> Result<Option<String>, UserValidationError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Ok(None);
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(UserValidationError::InvalidEmail(raw.trim().to_string()));
    }
    Ok(Some(email))
}

fn check_len(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.chars().count() > MAX_NAME_LEN {
        return Err(UserValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

pub fn validate_user(user: &user::Model) -> Result<(), UserValidationError> {
    if user.fullname.trim().is_empty() {
        return Err(UserValidationError::BlankFullName);
    }
    for (field, value) in [
        ("full_name", &user.fullname),
        ("given_name", &user.given_name),
        ("middle_names", &user.middle_names),
        ("family_name", &user.family_name),
        ("suffix", &user.suffix),
        ("timezone", &user.timezone),
        ("locale", &user.locale),
    ] {
        check_len(field, value)?;
    }
    Ok(())
}

/// Start/end dates of an education or employment entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_month: Option<i32>,
    pub start_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_year: Option<i32>,
    pub ongoing: bool,
}

impl DateRange {
    pub fn validate(&self) -> Result<(), UserValidationError> {
        for (field, month, year) in [
            ("start_month", self.start_month, self.start_year),
            ("end_month", self.end_month, self.end_year),
        ] {
            let Some(month) = month else { continue };
            if !(1..=12).contains(&month) {
                return Err(UserValidationError::InvalidMonth { field });
            }
            if year.is_none() {
                return Err(UserValidationError::MonthWithoutYear { field });
            }
        }

        if self.ongoing {
            return Ok(());
        }
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            let start = (start, self.start_month.unwrap_or(1));
            let end = (end, self.end_month.unwrap_or(12));
            if end < start {
                return Err(UserValidationError::EndBeforeStart);
            }
        }
        Ok(())
    }

    /// Ongoing entries have no end date.
    pub fn normalized(mut self) -> Self {
        if self.ongoing {
            self.end_month = None;
            self.end_year = None;
        }
        self
    }
}

pub fn require_text(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::Blank(field));
    }
    check_len(field, value)
}
