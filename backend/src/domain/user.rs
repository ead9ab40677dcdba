//! User identity, tenant affiliation and display preferences.

use std::fmt;
use std::sync::OnceLock;

use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::identifier::uuid_identifier;

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyEmail,
    InvalidEmail,
    UnknownTimezone { name: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits and @/./+/-/_ characters",
            ),
            Self::EmptyEmail => write!(f, "email address must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::UnknownTimezone { name } => write!(f, "unknown timezone: {name}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

uuid_identifier! {
    /// Stable user identifier.
    UserId
}

uuid_identifier! {
    /// Identifier of the company (tenant) a user belongs to.
    CompanyId
}

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is checked separately; this only constrains the alphabet.
        Regex::new(r"^[\w.@+\-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Login name, unique across all tenants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a username.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if value.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&value) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// E-mail address used to reference users in meeting and room payloads.
///
/// Surrounding whitespace is trimmed and the domain part is lower-cased, so
/// `Ada@Example.COM` and `Ada@example.com` compare equal.
///
/// # Examples
/// ```
/// use roombook::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "Ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an e-mail address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        let (local, domain) = trimmed
            .rsplit_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Parse an IANA timezone name such as `Europe/Warsaw`.
pub fn parse_timezone(name: &str) -> Result<Tz, UserValidationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| UserValidationError::UnknownTimezone {
            name: name.to_owned(),
        })
}

/// Lightweight reference to a user as embedded in meetings and rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub email: EmailAddress,
    pub company_id: CompanyId,
}

/// Application user.
///
/// ## Invariants
/// - Every user belongs to exactly one company.
/// - `timezone` is a valid IANA zone used to read and render timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    company_id: CompanyId,
    timezone: Tz,
}

impl User {
    /// Build a user from validated parts.
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        company_id: CompanyId,
        timezone: Tz,
    ) -> Self {
        Self {
            id,
            username,
            email,
            company_id,
            timezone,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    /// Preferred display timezone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Reference form used inside meetings and rooms.
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            email: self.email.clone(),
            company_id: self.company_id,
        }
    }
}
