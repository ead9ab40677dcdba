//! Meeting (event) handlers.
//!
//! ```text
//! GET    /api/v1/events?day=2222-12-12&locationId=<uuid>&query=standup
//! POST   /api/v1/events
//! GET    /api/v1/events/{id}
//! PUT    /api/v1/events/{id}
//! PATCH  /api/v1/events/{id} {"location":null}
//! DELETE /api/v1/events/{id}
//! ```
//!
//! Timestamps are read and rendered in the display timezone activated by
//! the timezone middleware. The owner always comes from the session; an
//! `owner` field in a payload is ignored.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{MeetingChanges, MeetingDraft};
use crate::domain::{
    Error, LocationId, Meeting, MeetingFilter, MeetingId, SearchText, format_timestamp,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::current_user::CurrentUser;
use crate::inbound::http::rooms::RoomResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_day, parse_email_list, parse_optional_timestamp_field,
    parse_timestamp_field, parse_uuid,
};

const START: FieldName = FieldName::new("start");
const END: FieldName = FieldName::new("end");
const PARTICIPANTS: FieldName = FieldName::new("participantList");
const LOCATION: FieldName = FieldName::new("location");

/// Meeting as rendered to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    #[schema(example = "5c1d7f0e-2a44-4f7b-8f0b-91e6c3a8d2b1")]
    pub id: String,
    /// E-mail of the user who created the meeting.
    #[schema(example = "alice@acme.test")]
    pub owner: String,
    #[schema(example = "Quarterly planning")]
    pub event_name: String,
    pub meeting_agenda: String,
    /// RFC 3339 in the caller's timezone.
    #[schema(example = "2222-12-12T06:00:00+01:00")]
    pub start: String,
    #[schema(example = "2222-12-12T07:30:00+01:00")]
    pub end: String,
    /// Participant e-mails ordered alphabetically.
    pub participant_list: Vec<String>,
    pub location: Option<RoomResponse>,
}

impl From<&Meeting> for MeetingResponse {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: meeting.id.to_string(),
            owner: meeting.owner.email.to_string(),
            event_name: meeting.details.event_name().to_owned(),
            meeting_agenda: meeting.details.meeting_agenda().to_owned(),
            start: format_timestamp(meeting.window.start()),
            end: format_timestamp(meeting.window.end()),
            participant_list: meeting
                .participants
                .iter()
                .map(|participant| participant.email.to_string())
                .collect(),
            location: meeting.location.as_ref().map(RoomResponse::from),
        }
    }
}

/// Complete meeting payload for `POST` and `PUT`.
///
/// Naive timestamps such as `2222-12-12T06:00:00` are read in the caller's
/// timezone.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRequest {
    pub event_name: String,
    #[serde(default)]
    pub meeting_agenda: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub participant_list: Vec<String>,
    /// Room identifier, or `null` for no room.
    #[serde(default)]
    pub location: Option<String>,
}

fn parse_location(raw: Option<&str>) -> Result<Option<LocationId>, Error> {
    raw.map(|value| parse_uuid(value, LOCATION).map(LocationId::from_uuid))
        .transpose()
}

impl TryFrom<MeetingRequest> for MeetingDraft {
    type Error = Error;

    fn try_from(value: MeetingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            start: parse_timestamp_field(&value.start, START)?,
            end: parse_timestamp_field(&value.end, END)?,
            participants: parse_email_list(&value.participant_list, PARTICIPANTS)?,
            location: parse_location(value.location.as_deref())?,
            event_name: value.event_name,
            meeting_agenda: value.meeting_agenda,
        })
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial meeting payload for `PATCH`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPatchRequest {
    pub event_name: Option<String>,
    pub meeting_agenda: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub participant_list: Option<Vec<String>>,
    /// Room identifier; `null` detaches the meeting from its room.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
}

impl TryFrom<MeetingPatchRequest> for MeetingChanges {
    type Error = Error;

    fn try_from(value: MeetingPatchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            start: parse_optional_timestamp_field(value.start.as_deref(), START)?,
            end: parse_optional_timestamp_field(value.end.as_deref(), END)?,
            participants: value
                .participant_list
                .as_deref()
                .map(|emails| parse_email_list(emails, PARTICIPANTS))
                .transpose()?,
            location: value
                .location
                .map(|room| parse_location(room.as_deref()))
                .transpose()?,
            event_name: value.event_name,
            meeting_agenda: value.meeting_agenda,
        })
    }
}

/// Optional list filters, combined with AND.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListMeetingsQuery {
    /// Calendar day (`YYYY-MM-DD`) in the caller's timezone.
    pub day: Option<String>,
    /// Only meetings held in this room.
    pub location_id: Option<String>,
    /// Case-insensitive text searched in event name and agenda.
    pub query: Option<String>,
}

impl TryFrom<ListMeetingsQuery> for MeetingFilter {
    type Error = Error;

    fn try_from(value: ListMeetingsQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            day: value
                .day
                .as_deref()
                .map(|raw| parse_day(raw, FieldName::new("day")))
                .transpose()?,
            location: value
                .location_id
                .as_deref()
                .map(|raw| {
                    parse_uuid(raw, FieldName::new("locationId")).map(LocationId::from_uuid)
                })
                .transpose()?,
            text: value.query.as_deref().and_then(SearchText::new),
        })
    }
}

fn meeting_id(raw: &str) -> Result<MeetingId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(MeetingId::from_uuid)
}

/// List meetings visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(ListMeetingsQuery),
    responses(
        (status = 200, description = "Visible meetings ordered by start", body = [MeetingResponse]),
        (status = 400, description = "Malformed filter", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_meetings(
    user: CurrentUser,
    state: web::Data<HttpState>,
    query: web::Query<ListMeetingsQuery>,
) -> ApiResult<web::Json<Vec<MeetingResponse>>> {
    let filter = MeetingFilter::try_from(query.into_inner())?;
    let meetings = state.meetings_query.list(&user.scope(), &filter).await?;
    Ok(web::Json(meetings.iter().map(MeetingResponse::from).collect()))
}

/// Schedule a meeting owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = MeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = MeetingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_meeting(
    user: CurrentUser,
    state: web::Data<HttpState>,
    payload: web::Json<MeetingRequest>,
) -> ApiResult<HttpResponse> {
    let draft = MeetingDraft::try_from(payload.into_inner())?;
    let meeting = state.meetings.create(&user.scope(), draft).await?;
    Ok(HttpResponse::Created().json(MeetingResponse::from(&meeting)))
}

/// Fetch one visible meeting.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Meeting identifier")),
    responses(
        (status = 200, description = "Meeting", body = MeetingResponse),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent"
)]
#[get("/events/{id}")]
pub async fn get_meeting(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MeetingResponse>> {
    let id = meeting_id(&path)?;
    let meeting = state.meetings_query.get(&user.scope(), &id).await?;
    Ok(web::Json(MeetingResponse::from(&meeting)))
}

/// Replace every attribute of a meeting except its owner.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Meeting identifier")),
    request_body = MeetingRequest,
    responses(
        (status = 200, description = "Meeting updated", body = MeetingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "replaceEvent"
)]
#[put("/events/{id}")]
pub async fn replace_meeting(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<MeetingRequest>,
) -> ApiResult<web::Json<MeetingResponse>> {
    let id = meeting_id(&path)?;
    let changes = MeetingChanges::from(MeetingDraft::try_from(payload.into_inner())?);
    let meeting = state.meetings.update(&user.scope(), &id, changes).await?;
    Ok(web::Json(MeetingResponse::from(&meeting)))
}

/// Change selected attributes of a meeting.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Meeting identifier")),
    request_body = MeetingPatchRequest,
    responses(
        (status = 200, description = "Meeting updated", body = MeetingResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[patch("/events/{id}")]
pub async fn update_meeting(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<MeetingPatchRequest>,
) -> ApiResult<web::Json<MeetingResponse>> {
    let id = meeting_id(&path)?;
    let changes = MeetingChanges::try_from(payload.into_inner())?;
    let meeting = state.meetings.update(&user.scope(), &id, changes).await?;
    Ok(web::Json(MeetingResponse::from(&meeting)))
}

/// Cancel a meeting.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "Meeting identifier")),
    responses(
        (status = 204, description = "Meeting deleted"),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/events/{id}")]
pub async fn delete_meeting(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = meeting_id(&path)?;
    state.meetings.delete(&user.scope(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "meetings_tests.rs"]
mod tests;
