//! PostgreSQL-backed [`MeetingRepository`].
//!
//! Visibility is expressed with subqueries on the meetings table so each
//! meeting appears once no matter how many ways the viewer qualifies.
//! Owners, rooms and participants are fetched in three follow-up queries
//! and stitched together in memory.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{MeetingPersistenceError, MeetingRepository};
use crate::domain::{
    Location, Meeting, MeetingDetails, MeetingFilter, MeetingId, MeetingRecord, MeetingWindow,
    TenantScope, UserRef,
};

use super::diesel_error_mapping::{
    DbFailure, classify_diesel_error, classify_pool_error, like_pattern,
};
use super::diesel_location_repository::rows_to_location;
use super::diesel_user_repository::row_to_user_ref;
use super::models::{
    LocationRow, MeetingChangeset, MeetingRow, NewMeetingRow, ParticipantLink, UserRefRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{locations, meeting_participants, meetings, users};

/// Diesel implementation of [`MeetingRepository`].
#[derive(Clone)]
pub struct DieselMeetingRepository {
    pool: DbPool,
}

impl DieselMeetingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for MeetingPersistenceError {
    fn from(failure: DbFailure) -> Self {
        match failure {
            DbFailure::Connection(message) => Self::connection(message),
            DbFailure::MissingReference(message) => Self::missing_reference(message),
            DbFailure::UniqueViolation(message) | DbFailure::Query(message) => {
                Self::query(message)
            }
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MeetingPersistenceError {
    classify_diesel_error(error).into()
}

fn map_pool_error(error: PoolError) -> MeetingPersistenceError {
    classify_pool_error(error).into()
}

/// Meetings visible in `scope`, narrowed by `filter` and optionally by id.
fn visible_meetings<'a>(
    scope: &TenantScope,
    filter: &MeetingFilter,
    id: Option<&MeetingId>,
) -> meetings::BoxedQuery<'a, Pg> {
    let viewer = *scope.viewer.as_uuid();
    let colleagues = users::table
        .filter(users::company_id.eq(*scope.company.as_uuid()))
        .select(users::id);
    let attending = meeting_participants::table
        .filter(meeting_participants::user_id.eq(viewer))
        .select(meeting_participants::meeting_id);
    let managed_rooms = locations::table
        .filter(locations::manager_id.eq(viewer))
        .select(locations::id.nullable());

    let mut query = meetings::table
        .filter(meetings::owner_id.eq_any(colleagues))
        .filter(
            meetings::id
                .eq_any(attending)
                .or(meetings::location_id.eq_any(managed_rooms)),
        )
        .into_boxed();

    if let Some(id) = id {
        query = query.filter(meetings::id.eq(*id.as_uuid()));
    }
    if let Some(day) = filter.day {
        query = query
            .filter(meetings::starts_at.ge(day.start))
            .filter(meetings::starts_at.lt(day.end));
    }
    if let Some(location) = filter.location {
        query = query.filter(meetings::location_id.eq(*location.as_uuid()));
    }
    if let Some(text) = &filter.text {
        let pattern = like_pattern(text.as_str());
        query = query.filter(
            meetings::event_name
                .ilike(pattern.clone())
                .or(meetings::meeting_agenda.ilike(pattern)),
        );
    }
    query
}

/// Load owners, rooms and participants for `rows` and build meetings.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<MeetingRow>,
) -> Result<Vec<Meeting>, MeetingPersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let meeting_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let owner_ids: Vec<Uuid> = rows
        .iter()
        .map(|row| row.owner_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let location_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|row| row.location_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let owner_rows: Vec<UserRefRow> = users::table
        .filter(users::id.eq_any(&owner_ids))
        .select(UserRefRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut owners = HashMap::with_capacity(owner_rows.len());
    for row in owner_rows {
        let id = row.id;
        owners.insert(
            id,
            row_to_user_ref(row).map_err(MeetingPersistenceError::query)?,
        );
    }

    let mut rooms: HashMap<Uuid, Location> = HashMap::new();
    if !location_ids.is_empty() {
        let room_rows: Vec<(LocationRow, UserRefRow)> = locations::table
            .inner_join(users::table)
            .filter(locations::id.eq_any(&location_ids))
            .select((LocationRow::as_select(), UserRefRow::as_select()))
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        for (location, manager) in room_rows {
            let id = location.id;
            rooms.insert(
                id,
                rows_to_location(location, manager).map_err(MeetingPersistenceError::query)?,
            );
        }
    }

    let participant_rows: Vec<(Uuid, UserRefRow)> = meeting_participants::table
        .inner_join(users::table.on(users::id.eq(meeting_participants::user_id)))
        .filter(meeting_participants::meeting_id.eq_any(&meeting_ids))
        .select((meeting_participants::meeting_id, UserRefRow::as_select()))
        .order_by((users::email.asc(), users::id.asc()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut participants: HashMap<Uuid, Vec<UserRef>> = HashMap::new();
    for (meeting_id, row) in participant_rows {
        let participant = row_to_user_ref(row).map_err(MeetingPersistenceError::query)?;
        participants.entry(meeting_id).or_default().push(participant);
    }

    rows.into_iter()
        .map(|row| {
            let owner = owners.get(&row.owner_id).cloned().ok_or_else(|| {
                MeetingPersistenceError::query(format!("owner of meeting {} not found", row.id))
            })?;
            build_meeting(row, owner, &mut participants, &rooms)
        })
        .collect()
}

fn build_meeting(
    row: MeetingRow,
    owner: UserRef,
    participants: &mut HashMap<Uuid, Vec<UserRef>>,
    rooms: &HashMap<Uuid, Location>,
) -> Result<Meeting, MeetingPersistenceError> {
    let invalid = |err: &dyn std::fmt::Display| {
        MeetingPersistenceError::query(format!("stored meeting {} is invalid: {err}", row.id))
    };
    let details = MeetingDetails::new(row.event_name.as_str(), row.meeting_agenda.as_str())
        .map_err(|err| invalid(&err))?;
    let window = MeetingWindow::new(row.starts_at, row.ends_at).map_err(|err| invalid(&err))?;
    Ok(Meeting {
        id: MeetingId::from_uuid(row.id),
        owner,
        details,
        window,
        participants: participants.remove(&row.id).unwrap_or_default(),
        location: row.location_id.and_then(|id| rooms.get(&id).cloned()),
    })
}

#[async_trait]
impl MeetingRepository for DieselMeetingRepository {
    async fn list_visible(
        &self,
        scope: &TenantScope,
        filter: &MeetingFilter,
    ) -> Result<Vec<Meeting>, MeetingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MeetingRow> = visible_meetings(scope, filter, None)
            .select(MeetingRow::as_select())
            .order_by((meetings::starts_at.asc(), meetings::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn find_visible(
        &self,
        scope: &TenantScope,
        id: &MeetingId,
    ) -> Result<Option<Meeting>, MeetingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MeetingRow> = visible_meetings(scope, &MeetingFilter::default(), Some(id))
            .select(MeetingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(hydrate(&mut conn, rows).await?.into_iter().next())
    }

    async fn save(&self, record: &MeetingRecord) -> Result<Meeting, MeetingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let meeting_id = *record.id.as_uuid();
        let location_id = record.location_id.map(|id| *id.as_uuid());
        let new_row = NewMeetingRow {
            id: meeting_id,
            owner_id: *record.owner_id.as_uuid(),
            event_name: record.details.event_name(),
            meeting_agenda: record.details.meeting_agenda(),
            starts_at: record.window.start(),
            ends_at: record.window.end(),
            location_id,
        };
        let changes = MeetingChangeset {
            event_name: record.details.event_name(),
            meeting_agenda: record.details.meeting_agenda(),
            starts_at: record.window.start(),
            ends_at: record.window.end(),
            location_id,
        };
        let links: Vec<ParticipantLink> = record
            .participant_ids
            .iter()
            .map(|user| ParticipantLink {
                meeting_id,
                user_id: *user.as_uuid(),
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(meetings::table)
                    .values(&new_row)
                    .on_conflict(meetings::id)
                    .do_update()
                    .set(&changes)
                    .execute(conn)
                    .await?;
                diesel::delete(
                    meeting_participants::table
                        .filter(meeting_participants::meeting_id.eq(meeting_id)),
                )
                .execute(conn)
                .await?;
                if !links.is_empty() {
                    diesel::insert_into(meeting_participants::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        let row: MeetingRow = meetings::table
            .filter(meetings::id.eq(meeting_id))
            .select(MeetingRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MeetingPersistenceError::query("saved meeting vanished"))
    }

    async fn delete(&self, id: &MeetingId) -> Result<bool, MeetingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(meetings::table.filter(meetings::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
