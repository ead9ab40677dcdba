//! Driving port for reading meetings.

use async_trait::async_trait;

use crate::domain::{Error, Meeting, MeetingFilter, MeetingId, TenantScope};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingsQuery: Send + Sync {
    /// Meetings visible in `scope` that match `filter`.
    async fn list(&self, scope: &TenantScope, filter: &MeetingFilter)
    -> Result<Vec<Meeting>, Error>;

    /// One visible meeting; `not_found` otherwise.
    async fn get(&self, scope: &TenantScope, id: &MeetingId) -> Result<Meeting, Error>;
}
