//! Driving port for creating and changing meetings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, Error, LocationId, Meeting, MeetingId, TenantScope};

/// Complete meeting payload; the owner is always the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDraft {
    pub event_name: String,
    pub meeting_agenda: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub participants: Vec<EmailAddress>,
    pub location: Option<LocationId>,
}

/// Partial update; `None` leaves the stored value untouched.
///
/// `location: Some(None)` detaches the meeting from its room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingChanges {
    pub event_name: Option<String>,
    pub meeting_agenda: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub participants: Option<Vec<EmailAddress>>,
    pub location: Option<Option<LocationId>>,
}

impl From<MeetingDraft> for MeetingChanges {
    fn from(draft: MeetingDraft) -> Self {
        Self {
            event_name: Some(draft.event_name),
            meeting_agenda: Some(draft.meeting_agenda),
            start: Some(draft.start),
            end: Some(draft.end),
            participants: Some(draft.participants),
            location: Some(draft.location),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingsCommand: Send + Sync {
    /// Create a meeting owned by the scope's viewer.
    async fn create(&self, scope: &TenantScope, draft: MeetingDraft) -> Result<Meeting, Error>;

    /// Apply `changes` to a visible meeting and re-validate the result.
    async fn update(
        &self,
        scope: &TenantScope,
        id: &MeetingId,
        changes: MeetingChanges,
    ) -> Result<Meeting, Error>;

    /// Delete a visible meeting.
    async fn delete(&self, scope: &TenantScope, id: &MeetingId) -> Result<(), Error>;
}
