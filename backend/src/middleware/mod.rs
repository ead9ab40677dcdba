//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and resolving the signed-in user's display timezone.

pub mod timezone;
pub mod trace;

pub use timezone::UserTimezone;
pub use trace::Trace;
