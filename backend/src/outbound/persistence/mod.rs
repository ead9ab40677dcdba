//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories implement the domain's driven ports over a `bb8` pool of
//! `diesel-async` connections. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) stay private to this module; database error
//! detail is logged and reduced to the port error categories.
//!
//! # Example
//!
//! ```ignore
//! use roombook::outbound::persistence::{DbPool, DieselMeetingRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/roombook")).await?;
//! let meetings = DieselMeetingRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_location_repository;
mod diesel_meeting_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_meeting_repository::DieselMeetingRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
