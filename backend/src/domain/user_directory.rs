//! User lookup and provisioning.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{NewUser, PasswordHasher, UserRepository, UsersCommand, UsersQuery};
use crate::domain::service_support::map_user_error;
use crate::domain::{Error, User, UserId};

/// Implements [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct UserDirectory<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserDirectory<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<U, H> UsersQuery for UserDirectory<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(map_user_error)
    }
}

#[async_trait]
impl<U, H> UsersCommand for UserDirectory<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, new_user: NewUser) -> Result<User, Error> {
        if new_user.password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let hash = self
            .hasher
            .hash(&new_user.password)
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User::new(
            UserId::random(),
            new_user.username,
            new_user.email,
            new_user.company_id,
            new_user.timezone,
        );
        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_user_error)?;
        Ok(user)
    }
}
