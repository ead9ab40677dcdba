//! Driving port for creating and changing rooms.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, Location, LocationId, TenantScope};

/// Complete room payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    pub manager: EmailAddress,
    pub name: String,
    pub address: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomChanges {
    pub manager: Option<EmailAddress>,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl From<RoomDraft> for RoomChanges {
    fn from(draft: RoomDraft) -> Self {
        Self {
            manager: Some(draft.manager),
            name: Some(draft.name),
            address: Some(draft.address),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomsCommand: Send + Sync {
    /// Create a room managed by a member of the viewer's company.
    async fn create(&self, scope: &TenantScope, draft: RoomDraft) -> Result<Location, Error>;

    /// Apply `changes` to a visible room.
    async fn update(
        &self,
        scope: &TenantScope,
        id: &LocationId,
        changes: RoomChanges,
    ) -> Result<Location, Error>;

    /// Delete a visible room; its meetings keep running without a location.
    async fn delete(&self, scope: &TenantScope, id: &LocationId) -> Result<(), Error>;
}
