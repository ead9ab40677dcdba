//! Driven port for room storage.
//!
//! Reads are always tenant scoped; adapters must apply the same rule as
//! [`TenantScope::can_view_location`].
use async_trait::async_trait;

use crate::domain::{Location, LocationId, LocationRecord, TenantScope};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by room repository adapters.
    pub enum LocationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "room repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "room repository query failed: {message}",
        /// A referenced row vanished while the write was in flight.
        MissingReference { message: String } => "room references a missing record: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Rooms visible in `scope`, ordered by name then id.
    async fn list_visible(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<Location>, LocationPersistenceError>;

    /// A single room, provided it is visible in `scope`.
    async fn find_visible(
        &self,
        scope: &TenantScope,
        id: &LocationId,
    ) -> Result<Option<Location>, LocationPersistenceError>;

    /// Insert or replace a room and return it with resolved references.
    async fn save(&self, record: &LocationRecord) -> Result<Location, LocationPersistenceError>;

    /// Remove a room; meetings held there lose their location.
    ///
    /// Returns `false` when no such room exists.
    async fn delete(&self, id: &LocationId) -> Result<bool, LocationPersistenceError>;
}
