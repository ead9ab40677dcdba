//! Driving port for provisioning user accounts.

use async_trait::async_trait;
use chrono_tz::Tz;
use zeroize::Zeroizing;

use crate::domain::{CompanyId, EmailAddress, Error, User, Username};

/// Account details supplied by an operator.
#[derive(Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub company_id: CompanyId,
    pub timezone: Tz,
    pub password: Zeroizing<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Hash the password and store the account.
    ///
    /// A taken username yields
    /// [`ErrorCode::Conflict`](crate::domain::ErrorCode::Conflict).
    async fn register(&self, new_user: NewUser) -> Result<User, Error>;
}
