//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local store for development and tests
//! - **security**: Argon2 password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
