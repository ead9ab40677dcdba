//! Driving port for reading rooms.

use async_trait::async_trait;

use crate::domain::{Error, Location, LocationId, TenantScope};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomsQuery: Send + Sync {
    /// Rooms whose manager shares the viewer's company.
    async fn list(&self, scope: &TenantScope) -> Result<Vec<Location>, Error>;

    /// One visible room; `not_found` otherwise.
    async fn get(&self, scope: &TenantScope, id: &LocationId) -> Result<Location, Error>;
}
