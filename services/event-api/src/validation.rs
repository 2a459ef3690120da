//! Input validation for account and event payloads.
//!
//! Messages returned here are shown to API clients verbatim.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::model::{Event, EventInput, LoginInput, RegistrationInput, Role};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid time regex")
});

/// A rejected field, carrying the client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Registration input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Login input that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Event fields required at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Fields provided for a partial update. `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

pub fn validate_registration(input: &RegistrationInput) -> Result<NewAccount, ValidationError> {
    let (Some(name), Some(email), Some(password)) = (
        present(&input.name),
        present(&input.email),
        present(&input.password),
    ) else {
        return Err(ValidationError::new(
            "Name, email, and password are required",
        ));
    };

    if !validate_email(email) {
        return Err(ValidationError::new("Invalid email format"));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    let role = match present(&input.role) {
        None => Role::default(),
        Some(raw) => Role::parse(raw).ok_or_else(|| {
            ValidationError::new("Role must be either 'attendee' or 'organizer'")
        })?,
    };

    Ok(NewAccount {
        name: name.trim().to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
    })
}

pub fn validate_login(input: &LoginInput) -> Result<Credentials<'_>, ValidationError> {
    let (Some(email), Some(password)) = (present(&input.email), present(&input.password)) else {
        return Err(ValidationError::new("Email and password are required"));
    };

    if !validate_email(email) {
        return Err(ValidationError::new("Invalid email format"));
    }

    Ok(Credentials { email, password })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    if !DATE_RE.is_match(raw) {
        return Err(ValidationError::new("Date must be in YYYY-MM-DD format"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::new("Date must be a valid calendar date"))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::new("Time must be in HH:MM format");
    let caps = TIME_RE.captures(raw).ok_or_else(invalid)?;
    let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

pub fn ensure_not_past(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), ValidationError> {
    if NaiveDateTime::new(date, time) < now {
        return Err(ValidationError::new(
            "Event date and time cannot be in the past",
        ));
    }
    Ok(())
}

/// Validates a creation payload against local wall-clock `now`.
pub fn validate_new_event(
    input: &EventInput,
    now: NaiveDateTime,
) -> Result<EventFields, ValidationError> {
    let (Some(title), Some(description), Some(date), Some(time)) = (
        present(&input.title),
        present(&input.description),
        present(&input.date),
        present(&input.time),
    ) else {
        return Err(ValidationError::new(
            "Title, description, date, and time are required",
        ));
    };

    let date = parse_date(date)?;
    let time = parse_time(time)?;
    ensure_not_past(date, time, now)?;

    Ok(EventFields {
        title: title.to_string(),
        description: description.to_string(),
        date,
        time,
    })
}

/// Validates an update payload. Only provided fields are checked; when the
/// schedule changes, the merged date and time must still be in the future.
pub fn validate_event_patch(
    input: &EventInput,
    current: &Event,
    now: NaiveDateTime,
) -> Result<EventPatch, ValidationError> {
    let text = |value: &Option<String>, field: &str| match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => {
            Err(ValidationError::new(format!("{field} cannot be empty")))
        }
        Some(v) => Ok(Some(v.clone())),
    };

    let title = text(&input.title, "Title")?;
    let description = text(&input.description, "Description")?;
    let date = input.date.as_deref().map(parse_date).transpose()?;
    let time = input.time.as_deref().map(parse_time).transpose()?;

    if date.is_some() || time.is_some() {
        ensure_not_past(
            date.unwrap_or(current.date),
            time.unwrap_or(current.time),
            now,
        )?;
    }

    Ok(EventPatch {
        title,
        description,
        date,
        time,
    })
}
