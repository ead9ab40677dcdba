//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{
    CompanyId, EmailAddress, PasswordHash, User, UserId, UserRef, Username, parse_timezone,
};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error, classify_pool_error};
use super::models::{CredentialsRow, NewUserRow, UserRefRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<DbFailure> for UserPersistenceError {
    fn from(failure: DbFailure) -> Self {
        match failure {
            DbFailure::Connection(message) => Self::connection(message),
            DbFailure::UniqueViolation(_) => Self::duplicate("username"),
            DbFailure::MissingReference(message) | DbFailure::Query(message) => {
                Self::query(message)
            }
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    classify_diesel_error(error).into()
}

fn map_pool_error(error: super::pool::PoolError) -> UserPersistenceError {
    classify_pool_error(error).into()
}

/// Rebuild a domain user; rows written outside the API may not validate.
pub(crate) fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |field: &'static str, err: &dyn std::fmt::Display| {
        warn!(user_id = %row.id, field, error = %err, "stored user failed validation");
        UserPersistenceError::query(format!("stored user has an invalid {field}"))
    };
    let username = Username::new(row.username.as_str()).map_err(|err| invalid("username", &err))?;
    let email = EmailAddress::new(&row.email).map_err(|err| invalid("email", &err))?;
    let timezone = parse_timezone(&row.timezone).map_err(|err| invalid("timezone", &err))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        username,
        email,
        CompanyId::from_uuid(row.company_id),
        timezone,
    ))
}

/// Rebuild a user reference; shared with the room and meeting adapters.
pub(crate) fn row_to_user_ref(row: UserRefRow) -> Result<UserRef, String> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        warn!(user_id = %row.id, error = %err, "stored e-mail failed validation");
        format!("stored user {} has an invalid email", row.id)
    })?;
    Ok(UserRef {
        id: UserId::from_uuid(row.id),
        email,
        company_id: CompanyId::from_uuid(row.company_id),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| StoredCredentials {
            user_id: UserId::from_uuid(row.id),
            password_hash: PasswordHash::new(row.password_hash),
        }))
    }

    async fn find_company_members(
        &self,
        company: &CompanyId,
        emails: &[EmailAddress],
    ) -> Result<Vec<UserRef>, UserPersistenceError> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let wanted: Vec<&str> = emails.iter().map(AsRef::as_ref).collect();
        let rows: Vec<UserRefRow> = users::table
            .filter(users::company_id.eq(company.as_uuid()))
            .filter(users::email.eq_any(wanted))
            .select(UserRefRow::as_select())
            .order_by(users::email.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row_to_user_ref(row).map_err(UserPersistenceError::query))
            .collect()
    }

    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let timezone = user.timezone();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            company_id: *user.company_id().as_uuid(),
            timezone: timezone.name(),
            password_hash: password_hash.as_str(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(email: &str, timezone: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: "alice".to_owned(),
            email: email.to_owned(),
            company_id: Uuid::new_v4(),
            timezone: timezone.to_owned(),
        }
    }

    #[rstest]
    fn valid_rows_become_users() {
        let user = row_to_user(row("alice@Acme.test", "Europe/Warsaw")).expect("valid row");
        assert_eq!(user.email().as_ref(), "alice@acme.test");
        assert_eq!(user.timezone(), chrono_tz::Europe::Warsaw);
    }

    #[rstest]
    #[case("not-an-email", "UTC", "email")]
    #[case("alice@acme.test", "Mars/Olympus", "timezone")]
    fn invalid_rows_are_query_failures(
        #[case] email: &str,
        #[case] timezone: &str,
        #[case] field: &str,
    ) {
        let err = row_to_user(row(email, timezone)).expect_err("invalid row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
        assert!(err.to_string().contains(field));
    }

    #[rstest]
    fn unique_violations_become_duplicates() {
        let err = UserPersistenceError::from(DbFailure::UniqueViolation(
            "users_username_key".to_owned(),
        ));
        assert_eq!(err, UserPersistenceError::duplicate("username"));
    }
}
