//! Room use-cases.
//!
//! Rooms are shared across a company: anyone whose company matches the
//! manager's may list, edit or remove them. The manager must always be a
//! colleague of the caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    LocationRepository, RoomChanges, RoomDraft, RoomsCommand, RoomsQuery, UserRepository,
};
use crate::domain::service_support::{field_error, map_location_error, resolve_members};
use crate::domain::{
    EmailAddress, Error, Location, LocationDetails, LocationId, LocationRecord,
    LocationValidationError, TenantScope, UserId,
};

/// Room service implementing [`RoomsQuery`] and [`RoomsCommand`].
#[derive(Clone)]
pub struct RoomService<L, U> {
    locations: Arc<L>,
    users: Arc<U>,
}

impl<L, U> RoomService<L, U> {
    pub fn new(locations: Arc<L>, users: Arc<U>) -> Self {
        Self { locations, users }
    }
}

fn details_error(error: LocationValidationError) -> Error {
    field_error(error.field(), "empty", error.to_string())
}

fn not_found(id: &LocationId) -> Error {
    Error::not_found(format!("room {id} not found"))
}

impl<L, U> RoomService<L, U>
where
    L: LocationRepository,
    U: UserRepository,
{
    async fn find(&self, scope: &TenantScope, id: &LocationId) -> Result<Location, Error> {
        self.locations
            .find_visible(scope, id)
            .await
            .map_err(map_location_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn resolve_manager(
        &self,
        scope: &TenantScope,
        email: &EmailAddress,
    ) -> Result<UserId, Error> {
        let members = resolve_members(
            &*self.users,
            &scope.company,
            std::slice::from_ref(email),
            "manager",
        )
        .await?;
        members
            .first()
            .map(|member| member.id)
            .ok_or_else(|| field_error("manager", "unknown_user", "manager not found"))
    }
}

#[async_trait]
impl<L, U> RoomsQuery for RoomService<L, U>
where
    L: LocationRepository,
    U: UserRepository,
{
    async fn list(&self, scope: &TenantScope) -> Result<Vec<Location>, Error> {
        self.locations
            .list_visible(scope)
            .await
            .map_err(map_location_error)
    }

    async fn get(&self, scope: &TenantScope, id: &LocationId) -> Result<Location, Error> {
        self.find(scope, id).await
    }
}

#[async_trait]
impl<L, U> RoomsCommand for RoomService<L, U>
where
    L: LocationRepository,
    U: UserRepository,
{
    async fn create(&self, scope: &TenantScope, draft: RoomDraft) -> Result<Location, Error> {
        let details = LocationDetails::new(draft.name, draft.address).map_err(details_error)?;
        let manager_id = self.resolve_manager(scope, &draft.manager).await?;
        let record = LocationRecord {
            id: LocationId::random(),
            manager_id,
            details,
        };
        self.locations
            .save(&record)
            .await
            .map_err(map_location_error)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: &LocationId,
        changes: RoomChanges,
    ) -> Result<Location, Error> {
        let existing = self.find(scope, id).await?;
        let name = changes
            .name
            .unwrap_or_else(|| existing.name().to_owned());
        let address = changes
            .address
            .unwrap_or_else(|| existing.address().to_owned());
        let details = LocationDetails::new(name, address).map_err(details_error)?;
        let manager_id = match changes.manager {
            Some(email) => self.resolve_manager(scope, &email).await?,
            None => existing.manager.id,
        };
        let record = LocationRecord {
            id: existing.id,
            manager_id,
            details,
        };
        self.locations
            .save(&record)
            .await
            .map_err(map_location_error)
    }

    async fn delete(&self, scope: &TenantScope, id: &LocationId) -> Result<(), Error> {
        let existing = self.find(scope, id).await?;
        let removed = self
            .locations
            .delete(&existing.id)
            .await
            .map_err(map_location_error)?;
        if removed { Ok(()) } else { Err(not_found(id)) }
    }
}
