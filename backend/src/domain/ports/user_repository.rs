//! Driven port for user storage.
use async_trait::async_trait;

use crate::domain::{CompanyId, EmailAddress, PasswordHash, User, UserId, UserRef};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column (username) already holds this value.
        Duplicate { field: String } => "a user with this {field} already exists",
    }
}

/// Password hash and owner id fetched for a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the stored hash for `username`, matched exactly.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Users of `company` whose e-mail is one of `emails`.
    ///
    /// Addresses with no match are simply absent from the result.
    async fn find_company_members(
        &self,
        company: &CompanyId,
        emails: &[EmailAddress],
    ) -> Result<Vec<UserRef>, UserPersistenceError>;

    /// Store a new user.
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;
}
