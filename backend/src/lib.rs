//! Multi-tenant meeting-room booking service.
//!
//! Hexagonal layout: [`domain`] holds entities, visibility rules and
//! use-case services behind ports; [`inbound`] adapts HTTP onto the driving
//! ports; [`outbound`] implements the driven ports over PostgreSQL, memory
//! and Argon2; [`middleware`] and [`server`] wire the actix-web app.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
