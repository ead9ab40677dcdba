//! Driving port for user lookups.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user by id; `None` when the account no longer exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
