//! Internal Diesel row structs.
//!
//! These never leave the persistence module; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{locations, meeting_participants, meetings, users};

/// Full user row as needed to rebuild a [`crate::domain::User`].
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub company_id: Uuid,
    pub timezone: String,
}

/// Columns needed to embed a user reference in meetings and rooms.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRefRow {
    pub id: Uuid,
    pub email: String,
    pub company_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub company_id: Uuid,
    pub timezone: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocationRow {
    pub id: Uuid,
    pub manager_id: Uuid,
    pub name: String,
    pub address: String,
}

/// Insert row doubling as the upsert changeset.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = locations)]
pub(crate) struct LocationWrite<'a> {
    pub id: Uuid,
    pub manager_id: Uuid,
    pub name: &'a str,
    pub address: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meetings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MeetingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub event_name: String,
    pub meeting_agenda: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meetings)]
pub(crate) struct NewMeetingRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub event_name: &'a str,
    pub meeting_agenda: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location_id: Option<Uuid>,
}

/// Upsert changeset; the owner is immutable after creation.
///
/// `treat_none_as_null` so detaching a room clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = meetings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MeetingChangeset<'a> {
    pub event_name: &'a str,
    pub meeting_agenda: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = meeting_participants)]
pub(crate) struct ParticipantLink {
    pub meeting_id: Uuid,
    pub user_id: Uuid,
}
