//! Provision a user account in the configured database.
//!
//! Reads `ROOMBOOK_DATABASE_URL` like the server, applies pending migrations
//! and registers the account with an Argon2 password hash. The password is
//! read from the first line of standard input unless `--password` is given.

use std::ffi::OsString;
use std::io::{BufRead as _, Write as _};
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig as _;
use zeroize::Zeroizing;

use roombook::domain::ports::{NewUser, UsersCommand as _};
use chrono_tz::Tz;
use roombook::domain::{CompanyId, EmailAddress, UserDirectory, Username, parse_timezone};
use roombook::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use roombook::outbound::security::Argon2PasswordHasher;
use roombook::server::AppSettings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Register a Roombook user.
#[derive(Debug, Parser)]
#[command(name = "create-user", version)]
struct Cli {
    /// Login name (letters, digits and `@.+-_`).
    #[arg(long)]
    username: String,
    /// E-mail address other users reference in meetings and rooms.
    #[arg(long)]
    email: String,
    /// Company (tenant) identifier; a new company is created when omitted.
    #[arg(long)]
    company_id: Option<String>,
    /// IANA timezone used to read and render the user's timestamps;
    /// `ROOMBOOK_DEFAULT_TIMEZONE` applies when omitted.
    #[arg(long)]
    timezone: Option<String>,
    /// Password; prefer standard input to keep it out of shell history.
    #[arg(long)]
    password: Option<String>,
}

impl Cli {
    fn into_new_user(self, default_timezone: Tz) -> Result<NewUser, BoxError> {
        let company_id = match self.company_id.as_deref() {
            Some(raw) => CompanyId::new(raw)?,
            None => CompanyId::random(),
        };
        let password = match self.password {
            Some(password) => Zeroizing::new(password),
            None => read_password()?,
        };
        Ok(NewUser {
            username: Username::new(self.username)?,
            email: EmailAddress::new(&self.email)?,
            company_id,
            timezone: match self.timezone.as_deref() {
                Some(raw) => parse_timezone(raw)?,
                None => default_timezone,
            },
            password,
        })
    }
}

fn read_password() -> Result<Zeroizing<String>, BoxError> {
    let mut line = Zeroizing::new(String::new());
    std::io::stdin().lock().read_line(&mut line)?;
    let password = Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_owned());
    if password.is_empty() {
        return Err("password must not be empty".into());
    }
    Ok(password)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let settings = AppSettings::load_from_iter([OsString::from("create-user")])
        .map_err(|e| format!("failed to load settings: {e}"))?;
    let new_user = cli.into_new_user(settings.default_timezone()?)?;
    let url = settings
        .database_url
        .clone()
        .ok_or("ROOMBOOK_DATABASE_URL must be set")?;

    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url)).await??;

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(1))
        .await
        .map_err(|e| e.into_message())?;
    let directory = UserDirectory::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::new()),
    );
    let user = directory
        .register(new_user)
        .await
        .map_err(|e| e.message().to_owned())?;

    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "created user {} ({}) in company {}",
        user.username(),
        user.id(),
        user.company_id()
    )?;
    Ok(())
}
