//! Driven port for password hashing.
use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by hashing adapters.
    pub enum PasswordHashError {
        /// The hash could not be produced or the stored hash is unreadable.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// `Ok(false)` for a wrong password; `Err` only for unreadable hashes.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

/// Reversible stand-in for tests that exercise login without paying for a
/// real key-derivation function.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("{FIXTURE_PREFIX}{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let stored = hash
            .as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| PasswordHashError::hashing("not a fixture hash"))?;
        Ok(stored == password)
    }
}
