//! Domain model, visibility rules, ports and use-case services.
//!
//! Purpose: keep booking semantics independent of transport and storage.
//! Entities are immutable once validated; services coordinate driven ports
//! and speak [`Error`] to inbound adapters.
//!
//! Public surface:
//! - Entities: [`User`], [`Location`], [`Meeting`] and their identifiers.
//! - Rules: [`TenantScope`], [`MeetingFilter`], [`validate_meeting_length`].
//! - Time: [`DisplayTimezone`] and timestamp parsing/formatting helpers.
//! - Services: [`MeetingService`], [`RoomService`], [`PasswordLoginService`],
//!   [`UserDirectory`].

pub mod auth;
pub mod error;
mod identifier;
pub mod location;
pub mod login_service;
pub mod meeting;
pub mod meeting_service;
pub mod ports;
pub mod room_service;
mod service_support;
pub mod tenancy;
pub mod timezone;
pub mod trace_id;
pub mod user;
pub mod user_directory;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::auth::{LoginCredentials, LoginValidationError, PasswordHash};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identifier::IdentifierError;
pub use self::location::{
    Location, LocationDetails, LocationId, LocationRecord, LocationValidationError,
};
pub use self::login_service::PasswordLoginService;
pub use self::meeting::{
    MAX_MEETING_HOURS, Meeting, MeetingDetails, MeetingId, MeetingLengthError, MeetingRecord,
    MeetingValidationError, MeetingWindow, validate_meeting_length,
};
pub use self::meeting_service::MeetingService;
pub use self::room_service::RoomService;
pub use self::tenancy::{MeetingFilter, SearchText, TenantScope};
pub use self::timezone::{
    DayRange, DisplayTimezone, TimestampError, format_timestamp, format_timestamp_in,
    parse_timestamp, parse_timestamp_in,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    CompanyId, EmailAddress, USERNAME_MAX, User, UserId, UserRef, UserValidationError, Username,
    parse_timezone,
};
pub use self::user_directory::UserDirectory;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use roombook::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("sign in first"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
