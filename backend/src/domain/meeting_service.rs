//! Meeting use-cases.
//!
//! Every operation works inside the caller's [`TenantScope`]: reads only see
//! visible meetings, and writes resolve participants and rooms within the
//! caller's company. Meetings outside the visible set are reported as
//! missing rather than forbidden.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::ports::{
    LocationRepository, MeetingChanges, MeetingDraft, MeetingRepository, MeetingsCommand,
    MeetingsQuery, UserRepository,
};
use crate::domain::service_support::{
    field_error, map_location_error, map_meeting_error, resolve_members,
};
use crate::domain::{
    EmailAddress, Error, LocationId, Meeting, MeetingDetails, MeetingFilter, MeetingId,
    MeetingLengthError, MeetingRecord, MeetingValidationError, MeetingWindow, TenantScope, UserId,
};

/// Payload field carrying participant e-mails.
const PARTICIPANTS_FIELD: &str = "participantList";

/// Meeting service implementing [`MeetingsQuery`] and [`MeetingsCommand`].
#[derive(Clone)]
pub struct MeetingService<M, L, U> {
    meetings: Arc<M>,
    locations: Arc<L>,
    users: Arc<U>,
}

impl<M, L, U> MeetingService<M, L, U> {
    pub fn new(meetings: Arc<M>, locations: Arc<L>, users: Arc<U>) -> Self {
        Self {
            meetings,
            locations,
            users,
        }
    }
}

fn length_error(error: MeetingLengthError) -> Error {
    let details = match error {
        MeetingLengthError::TooLong { max_hours } => {
            json!({ "code": error.code(), "maxHours": max_hours })
        }
        MeetingLengthError::EndBeforeStart => json!({ "code": error.code() }),
    };
    Error::invalid_request(error.to_string()).with_details(details)
}

fn details_error(error: MeetingValidationError) -> Error {
    match error {
        MeetingValidationError::EmptyEventName => {
            field_error("eventName", "empty", error.to_string())
        }
    }
}

fn not_found(id: &MeetingId) -> Error {
    Error::not_found(format!("meeting {id} not found"))
}

impl<M, L, U> MeetingService<M, L, U>
where
    M: MeetingRepository,
    L: LocationRepository,
    U: UserRepository,
{
    async fn find(&self, scope: &TenantScope, id: &MeetingId) -> Result<Meeting, Error> {
        self.meetings
            .find_visible(scope, id)
            .await
            .map_err(map_meeting_error)?
            .ok_or_else(|| not_found(id))
    }

    /// A meeting may only be placed in a room the caller can see.
    async fn resolve_location(
        &self,
        scope: &TenantScope,
        location: Option<LocationId>,
    ) -> Result<Option<LocationId>, Error> {
        let Some(id) = location else {
            return Ok(None);
        };
        let visible = self
            .locations
            .find_visible(scope, &id)
            .await
            .map_err(map_location_error)?;
        match visible {
            Some(room) => Ok(Some(room.id)),
            None => Err(Error::invalid_request(format!("room {id} does not exist"))
                .with_details(json!({
                    "field": "location",
                    "code": "unknown_location",
                    "value": id,
                }))),
        }
    }

    async fn resolve_participants(
        &self,
        scope: &TenantScope,
        emails: &[EmailAddress],
    ) -> Result<Vec<UserId>, Error> {
        let members =
            resolve_members(&*self.users, &scope.company, emails, PARTICIPANTS_FIELD).await?;
        Ok(members.into_iter().map(|member| member.id).collect())
    }

    fn build_parts(
        event_name: String,
        meeting_agenda: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(MeetingDetails, MeetingWindow), Error> {
        let details = MeetingDetails::new(event_name, meeting_agenda).map_err(details_error)?;
        let window = MeetingWindow::new(start, end).map_err(length_error)?;
        Ok((details, window))
    }
}

#[async_trait]
impl<M, L, U> MeetingsQuery for MeetingService<M, L, U>
where
    M: MeetingRepository,
    L: LocationRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        scope: &TenantScope,
        filter: &MeetingFilter,
    ) -> Result<Vec<Meeting>, Error> {
        self.meetings
            .list_visible(scope, filter)
            .await
            .map_err(map_meeting_error)
    }

    async fn get(&self, scope: &TenantScope, id: &MeetingId) -> Result<Meeting, Error> {
        self.find(scope, id).await
    }
}

#[async_trait]
impl<M, L, U> MeetingsCommand for MeetingService<M, L, U>
where
    M: MeetingRepository,
    L: LocationRepository,
    U: UserRepository,
{
    async fn create(&self, scope: &TenantScope, draft: MeetingDraft) -> Result<Meeting, Error> {
        let MeetingDraft {
            event_name,
            meeting_agenda,
            start,
            end,
            participants,
            location,
        } = draft;
        let (details, window) = Self::build_parts(event_name, meeting_agenda, start, end)?;
        let participant_ids = self.resolve_participants(scope, &participants).await?;
        let location_id = self.resolve_location(scope, location).await?;

        let record = MeetingRecord {
            id: MeetingId::random(),
            owner_id: scope.viewer,
            details,
            window,
            participant_ids,
            location_id,
        };
        self.meetings
            .save(&record)
            .await
            .map_err(map_meeting_error)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: &MeetingId,
        changes: MeetingChanges,
    ) -> Result<Meeting, Error> {
        let existing = self.find(scope, id).await?;
        let mut record = existing.to_record();

        let event_name = changes
            .event_name
            .unwrap_or_else(|| existing.details.event_name().to_owned());
        let meeting_agenda = changes
            .meeting_agenda
            .unwrap_or_else(|| existing.details.meeting_agenda().to_owned());
        let start = changes.start.unwrap_or(existing.window.start());
        let end = changes.end.unwrap_or(existing.window.end());
        (record.details, record.window) =
            Self::build_parts(event_name, meeting_agenda, start, end)?;

        if let Some(participants) = changes.participants {
            record.participant_ids = self.resolve_participants(scope, &participants).await?;
        }
        if let Some(location) = changes.location {
            record.location_id = self.resolve_location(scope, location).await?;
        }

        self.meetings
            .save(&record)
            .await
            .map_err(map_meeting_error)
    }

    async fn delete(&self, scope: &TenantScope, id: &MeetingId) -> Result<(), Error> {
        let existing = self.find(scope, id).await?;
        let removed = self
            .meetings
            .delete(&existing.id)
            .await
            .map_err(map_meeting_error)?;
        if removed { Ok(()) } else { Err(not_found(id)) }
    }
}

#[cfg(test)]
#[path = "meeting_service_tests.rs"]
mod tests;
