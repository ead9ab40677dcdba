//! Shared validation helpers for inbound HTTP adapters.
//!
//! DTOs carry raw strings; these helpers turn them into domain values and
//! report failures as `invalid_request` with the offending field in
//! `details`.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{DayRange, DisplayTimezone, EmailAddress, Error, parse_timestamp};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidEmail,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidEmail => "invalid_email",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_value(self, code: &str, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code,
        }))
    }

    fn with_index(self, code: &str, index: usize, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value,
            "code": code,
        }))
    }
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        ValidationError::new(field, format!("{} must be a valid UUID", field.as_str()))
            .with_value(ErrorCode::InvalidUuid.as_str(), value)
    })
}

/// Read a timestamp in the active display timezone.
pub(crate) fn parse_timestamp_field(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    parse_timestamp(value).map_err(|err| {
        ValidationError::new(field, format!("{}: {err}", field.as_str()))
            .with_value(err.code(), value)
    })
}

pub(crate) fn parse_optional_timestamp_field(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_timestamp_field(raw, field))
        .transpose()
}

/// Interpret `YYYY-MM-DD` as a calendar day in the active display timezone.
pub(crate) fn parse_day(value: &str, field: FieldName) -> Result<DayRange, Error> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::new(field, format!("{} must be a YYYY-MM-DD date", field.as_str()))
            .with_value(ErrorCode::InvalidDate.as_str(), value)
    })?;
    Ok(DayRange::for_local_date(date, DisplayTimezone::current()))
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(value).map_err(|_| {
        ValidationError::new(field, format!("{} must be an e-mail address", field.as_str()))
            .with_value(ErrorCode::InvalidEmail.as_str(), value)
    })
}

pub(crate) fn parse_email_list(
    values: &[String],
    field: FieldName,
) -> Result<Vec<EmailAddress>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            EmailAddress::new(value).map_err(|_| {
                ValidationError::new(
                    field,
                    format!("{} must contain e-mail addresses", field.as_str()),
                )
                .with_index(ErrorCode::InvalidEmail.as_str(), index, value)
            })
        })
        .collect()
}
