//! Password login over the user repository and a hashing port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{LoginService, PasswordHasher, UserRepository};
use crate::domain::service_support::map_user_error;
use crate::domain::{Error, LoginCredentials, UserId};

/// [`LoginService`] backed by stored password hashes.
#[derive(Clone)]
pub struct PasswordLoginService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> PasswordLoginService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn rejected() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<U, H> LoginService for PasswordLoginService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?
            .ok_or_else(rejected)?;
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(|err| Error::internal(err.to_string()))?;
        if matches {
            Ok(stored.user_id)
        } else {
            Err(rejected())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        FixturePasswordHasher, MockUserRepository, StoredCredentials, UserPersistenceError,
    };
    use crate::domain::{ErrorCode, PasswordHash};
    use rstest::rstest;

    fn service_with(
        users: MockUserRepository,
    ) -> PasswordLoginService<MockUserRepository, FixturePasswordHasher> {
        PasswordLoginService::new(Arc::new(users), Arc::new(FixturePasswordHasher))
    }

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("credentials shape")
    }

    #[rstest]
    #[case("s3cret", true)]
    #[case("wrong", false)]
    #[tokio::test]
    async fn verifies_the_stored_hash(#[case] password: &str, #[case] should_succeed: bool) {
        let user_id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials()
            .withf(|username| username == "alice")
            .return_once(move |_| {
                Ok(Some(StoredCredentials {
                    user_id,
                    password_hash: PasswordHash::new("fixture$s3cret"),
                }))
            });

        let result = service_with(users)
            .authenticate(&credentials("alice", password))
            .await;
        match (should_succeed, result) {
            (true, Ok(id)) => assert_eq!(id, user_id),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got {err:?}"),
            (false, Ok(id)) => panic!("expected rejection, got {id}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_users_are_unauthorised() {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().return_once(|_| Ok(None));
        let err = service_with(users)
            .authenticate(&credentials("ghost", "pw"))
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_outages_are_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials()
            .return_once(|_| Err(UserPersistenceError::connection("refused")));
        let err = service_with(users)
            .authenticate(&credentials("alice", "pw"))
            .await
            .expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
