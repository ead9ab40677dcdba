//! Ports at the edge of the hexagon.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters and return typed persistence errors. Driving ports
//! (`*Query`, `*Command`, [`LoginService`]) are implemented by domain
//! services and consumed by inbound adapters; they speak
//! [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod location_repository;
mod login_service;
mod meeting_repository;
mod meetings_command;
mod meetings_query;
mod password_hasher;
mod rooms_command;
mod rooms_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{LocationPersistenceError, LocationRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use meeting_repository::MockMeetingRepository;
pub use meeting_repository::{MeetingPersistenceError, MeetingRepository};
#[cfg(test)]
pub use meetings_command::MockMeetingsCommand;
pub use meetings_command::{MeetingChanges, MeetingDraft, MeetingsCommand};
#[cfg(test)]
pub use meetings_query::MockMeetingsQuery;
pub use meetings_query::MeetingsQuery;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use rooms_command::MockRoomsCommand;
pub use rooms_command::{RoomChanges, RoomDraft, RoomsCommand};
#[cfg(test)]
pub use rooms_query::MockRoomsQuery;
pub use rooms_query::RoomsQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{NewUser, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
