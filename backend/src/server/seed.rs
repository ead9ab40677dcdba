//! Startup account seeding from a JSON file.
//!
//! The file holds an array of accounts:
//!
//! ```json
//! [{"username": "ada", "email": "ada@example.com",
//!   "companyId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!   "timezone": "Europe/Warsaw", "password": "correct horse"}]
//! ```
//!
//! `timezone` may be omitted; such accounts get the server's default display
//! timezone. Accounts whose username is taken are skipped, so the same file
//! can be applied on every start.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{NewUser, UsersCommand};
use crate::domain::{CompanyId, EmailAddress, ErrorCode, Username, parse_timezone};

/// Errors returned while applying a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("seed file at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("seed account #{index} is invalid: {message}")]
    Invalid { index: usize, message: String },
    #[error("failed to register seed account '{username}': {message}")]
    Register { username: String, message: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SeedAccount {
    username: String,
    email: String,
    company_id: String,
    timezone: Option<String>,
    password: String,
}

impl SeedAccount {
    fn into_new_user(self, index: usize, default_timezone: Tz) -> Result<NewUser, SeedError> {
        let invalid = |message: String| SeedError::Invalid { index, message };
        let timezone = match self.timezone.as_deref() {
            Some(raw) => parse_timezone(raw).map_err(|err| invalid(err.to_string()))?,
            None => default_timezone,
        };
        Ok(NewUser {
            username: Username::new(self.username).map_err(|err| invalid(err.to_string()))?,
            email: EmailAddress::new(&self.email).map_err(|err| invalid(err.to_string()))?,
            company_id: CompanyId::new(&self.company_id)
                .map_err(|err| invalid(format!("companyId: {err}")))?,
            timezone,
            password: Zeroizing::new(self.password),
        })
    }
}

/// Register every account listed in `path`, returning how many were new.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use std::sync::Arc;
///
/// use roombook::domain::UserDirectory;
/// use roombook::outbound::memory::InMemoryStore;
/// use roombook::outbound::security::Argon2PasswordHasher;
/// use roombook::server::seed_users;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let users = UserDirectory::new(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(Argon2PasswordHasher::new()),
/// );
/// let created = seed_users(Path::new("users.json"), &users, chrono_tz::UTC).await?;
/// println!("{created} accounts created");
/// # Ok(())
/// # }
/// ```
pub async fn seed_users(
    path: &Path,
    users: &dyn UsersCommand,
    default_timezone: Tz,
) -> Result<usize, SeedError> {
    let accounts = load_accounts(path)?;
    let mut created = 0;
    for (index, account) in accounts.into_iter().enumerate() {
        let new_user = account.into_new_user(index, default_timezone)?;
        let username = new_user.username.to_string();
        match users.register(new_user).await {
            Ok(user) => {
                info!(user_id = %user.id(), %username, "seed account registered");
                created += 1;
            }
            Err(error) if error.code() == ErrorCode::Conflict => {
                info!(%username, "seed account already exists; skipping");
            }
            Err(error) => {
                return Err(SeedError::Register {
                    username,
                    message: error.message().to_owned(),
                });
            }
        }
    }
    Ok(created)
}

fn load_accounts(path: &Path) -> Result<Vec<SeedAccount>, SeedError> {
    let read_error = |source: std::io::Error| SeedError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    serde_json::from_str(&contents).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
