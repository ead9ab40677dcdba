//! Meetings, their time windows and the length rule.
//!
//! A meeting occupies the half-open range `[start, end)`. The window must be
//! non-empty and at most [`MAX_MEETING_HOURS`] long; exactly eight hours is
//! accepted, anything longer (even by a microsecond) is not.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use super::identifier::uuid_identifier;
use super::{Location, LocationId, UserId, UserRef};

uuid_identifier! {
    /// Stable meeting identifier.
    MeetingId
}

/// Upper bound on meeting duration.
pub const MAX_MEETING_HOURS: i64 = 8;

/// Reasons a meeting window was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingLengthError {
    /// `end` is not strictly after `start`.
    EndBeforeStart,
    /// The meeting lasts longer than the permitted maximum.
    TooLong { max_hours: i64 },
}

impl fmt::Display for MeetingLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart => write!(f, "Meetings must end after they start."),
            Self::TooLong { max_hours } => {
                write!(f, "Meetings shouldn't be longer than {max_hours} hours.")
            }
        }
    }
}

impl std::error::Error for MeetingLengthError {}

impl MeetingLengthError {
    /// Stable code reported to clients in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EndBeforeStart => "end_before_start",
            Self::TooLong { .. } => "meeting_too_long",
        }
    }
}

/// Check the duration rule for a proposed `[start, end)` window.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use roombook::domain::{validate_meeting_length, MeetingLengthError};
///
/// let start = Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap();
/// assert!(validate_meeting_length(start, start + TimeDelta::hours(8)).is_ok());
/// assert_eq!(
///     validate_meeting_length(start, start + TimeDelta::hours(9)),
///     Err(MeetingLengthError::TooLong { max_hours: 8 }),
/// );
/// ```
pub fn validate_meeting_length(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), MeetingLengthError> {
    if end <= start {
        return Err(MeetingLengthError::EndBeforeStart);
    }
    if end - start > TimeDelta::hours(MAX_MEETING_HOURS) {
        return Err(MeetingLengthError::TooLong {
            max_hours: MAX_MEETING_HOURS,
        });
    }
    Ok(())
}

/// Validated meeting time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl MeetingWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, MeetingLengthError> {
        validate_meeting_length(start, end)?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Validation errors for meeting text attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingValidationError {
    EmptyEventName,
}

impl fmt::Display for MeetingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEventName => write!(f, "event name must not be empty"),
        }
    }
}

impl std::error::Error for MeetingValidationError {}

/// Event name (non-blank) and free-form agenda (may be empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDetails {
    event_name: String,
    meeting_agenda: String,
}

impl MeetingDetails {
    pub fn new(
        event_name: impl Into<String>,
        meeting_agenda: impl Into<String>,
    ) -> Result<Self, MeetingValidationError> {
        let event_name = event_name.into();
        if event_name.trim().is_empty() {
            return Err(MeetingValidationError::EmptyEventName);
        }
        Ok(Self {
            event_name,
            meeting_agenda: meeting_agenda.into(),
        })
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn meeting_agenda(&self) -> &str {
        &self.meeting_agenda
    }
}

/// A scheduled meeting with its resolved references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meeting {
    pub id: MeetingId,
    pub owner: UserRef,
    pub details: MeetingDetails,
    pub window: MeetingWindow,
    pub participants: Vec<UserRef>,
    pub location: Option<Location>,
}

impl Meeting {
    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participants.iter().any(|p| &p.id == user)
    }

    /// True when `user` manages the room this meeting is held in.
    pub fn is_location_manager(&self, user: &UserId) -> bool {
        self.location
            .as_ref()
            .is_some_and(|location| &location.manager.id == user)
    }

    /// Flatten into the row shape persisted by repositories.
    pub fn to_record(&self) -> MeetingRecord {
        MeetingRecord {
            id: self.id,
            owner_id: self.owner.id,
            details: self.details.clone(),
            window: self.window,
            participant_ids: self.participants.iter().map(|p| p.id).collect(),
            location_id: self.location.as_ref().map(|l| l.id),
        }
    }
}

/// Flat meeting row handed to repositories for insert or replace.
///
/// `participant_ids` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRecord {
    pub id: MeetingId,
    pub owner_id: UserId,
    pub details: MeetingDetails,
    pub window: MeetingWindow,
    pub participant_ids: Vec<UserId>,
    pub location_id: Option<LocationId>,
}
