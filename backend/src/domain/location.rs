//! Bookable rooms ("locations") and their managers.

use std::fmt;

use super::identifier::uuid_identifier;
use super::{UserId, UserRef};

uuid_identifier! {
    /// Stable room identifier.
    LocationId
}

/// Validation errors for room attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationValidationError {
    EmptyName,
    EmptyAddress,
}

impl fmt::Display for LocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "room name must not be empty"),
            Self::EmptyAddress => write!(f, "room address must not be empty"),
        }
    }
}

impl std::error::Error for LocationValidationError {}

impl LocationValidationError {
    /// Payload field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyAddress => "address",
        }
    }
}

/// Room name and street address, both non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDetails {
    name: String,
    address: String,
}

impl LocationDetails {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, LocationValidationError> {
        let name = name.into();
        let address = address.into();
        if name.trim().is_empty() {
            return Err(LocationValidationError::EmptyName);
        }
        if address.trim().is_empty() {
            return Err(LocationValidationError::EmptyAddress);
        }
        Ok(Self { name, address })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// A bookable room managed by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub manager: UserRef,
    pub details: LocationDetails,
}

impl Location {
    pub fn name(&self) -> &str {
        self.details.name()
    }

    pub fn address(&self) -> &str {
        self.details.address()
    }
}

/// Flat room row handed to repositories for insert or replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRecord {
    pub id: LocationId,
    pub manager_id: UserId,
    pub details: LocationDetails,
}
