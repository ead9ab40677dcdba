//! Driven port for meeting storage.
//!
//! Reads are always tenant scoped; adapters must apply the same rule as
//! [`TenantScope::can_view_meeting`] and return each meeting at most once.
use async_trait::async_trait;

use crate::domain::{Meeting, MeetingFilter, MeetingId, MeetingRecord, TenantScope};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by meeting repository adapters.
    pub enum MeetingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "meeting repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "meeting repository query failed: {message}",
        /// A referenced user or room vanished while the write was in flight.
        MissingReference { message: String } =>
            "meeting references a missing record: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Visible meetings matching `filter`, ordered by start then id.
    async fn list_visible(
        &self,
        scope: &TenantScope,
        filter: &MeetingFilter,
    ) -> Result<Vec<Meeting>, MeetingPersistenceError>;

    /// A single meeting, provided it is visible in `scope`.
    async fn find_visible(
        &self,
        scope: &TenantScope,
        id: &MeetingId,
    ) -> Result<Option<Meeting>, MeetingPersistenceError>;

    /// Insert or replace a meeting together with its participant links.
    async fn save(&self, record: &MeetingRecord) -> Result<Meeting, MeetingPersistenceError>;

    /// Remove a meeting and its participant links.
    ///
    /// Returns `false` when no such meeting exists.
    async fn delete(&self, id: &MeetingId) -> Result<bool, MeetingPersistenceError>;
}
