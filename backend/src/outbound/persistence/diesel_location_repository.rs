//! PostgreSQL-backed [`LocationRepository`].
//!
//! Visibility is a single `manager_id IN (company members)` predicate so a
//! room and its manager are always fetched with one join.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LocationPersistenceError, LocationRepository};
use crate::domain::{Location, LocationDetails, LocationId, LocationRecord, TenantScope};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error, classify_pool_error};
use super::diesel_user_repository::row_to_user_ref;
use super::models::{LocationRow, LocationWrite, UserRefRow};
use super::pool::{DbPool, PoolError};
use super::schema::{locations, users};

/// Diesel implementation of [`LocationRepository`].
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for LocationPersistenceError {
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

fn map_diesel_error(error: diesel::result::Error) -> LocationPersistenceError {
    classify_diesel_error(error).into()
}

fn map_pool_error(error: PoolError) -> LocationPersistenceError {
    classify_pool_error(error).into()
}

/// Combine a room row with its manager; shared with the meeting adapter.
pub(crate) fn rows_to_location(
    location: LocationRow,
    manager: UserRefRow,
) -> Result<Location, String> {
    if location.manager_id != manager.id {
        return Err(format!(
            "room {} joined to user {} instead of its manager {}",
            location.id, manager.id, location.manager_id
        ));
    }
    let details = LocationDetails::new(location.name, location.address)
        .map_err(|err| format!("stored room {} is invalid: {err}", location.id))?;
    Ok(Location {
        id: LocationId::from_uuid(location.id),
        manager: row_to_user_ref(manager)?,
        details,
    })
}

fn hydrate(
    rows: Vec<(LocationRow, UserRefRow)>,
) -> Result<Vec<Location>, LocationPersistenceError> {
    rows.into_iter()
        .map(|(location, manager)| {
            rows_to_location(location, manager).map_err(LocationPersistenceError::query)
        })
        .collect()
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn list_visible(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<Location>, LocationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = locations::table
            .inner_join(users::table)
            .filter(users::company_id.eq(scope.company.as_uuid()))
            .select((LocationRow::as_select(), UserRefRow::as_select()))
            .order_by((locations::name.asc(), locations::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(rows)
    }

    async fn find_visible(
        &self,
        scope: &TenantScope,
        id: &LocationId,
    ) -> Result<Option<Location>, LocationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = locations::table
            .inner_join(users::table)
            .filter(locations::id.eq(id.as_uuid()))
            .filter(users::company_id.eq(scope.company.as_uuid()))
            .select((LocationRow::as_select(), UserRefRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(hydrate(rows)?.into_iter().next())
    }

    async fn save(&self, record: &LocationRecord) -> Result<Location, LocationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let write = LocationWrite {
            id: *record.id.as_uuid(),
            manager_id: *record.manager_id.as_uuid(),
            name: record.details.name(),
            address: record.details.address(),
        };
        diesel::insert_into(locations::table)
            .values(&write)
            .on_conflict(locations::id)
            .do_update()
            .set(&write)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let (location, manager) = locations::table
            .inner_join(users::table)
            .filter(locations::id.eq(record.id.as_uuid()))
            .select((LocationRow::as_select(), UserRefRow::as_select()))
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_location(location, manager).map_err(LocationPersistenceError::query)
    }

    async fn delete(&self, id: &LocationId) -> Result<bool, LocationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(locations::table.filter(locations::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
