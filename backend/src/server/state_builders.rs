//! Builders wiring repositories into the HTTP state ports.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{
    LocationRepository, MeetingRepository, PasswordHasher, UserRepository, UsersCommand,
};
use crate::domain::{MeetingService, PasswordLoginService, RoomService, UserDirectory};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselLocationRepository, DieselMeetingRepository, DieselUserRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Driving ports plus the provisioning port used by startup seeding.
pub struct ServiceBundle {
    pub http_state: HttpState,
    pub users: Arc<dyn UsersCommand>,
}

/// Compose every domain service over one set of driven ports.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use roombook::domain::ports::FixturePasswordHasher;
/// use roombook::outbound::memory::InMemoryStore;
/// use roombook::server::services_over;
///
/// let store = Arc::new(InMemoryStore::new());
/// let hasher = Arc::new(FixturePasswordHasher);
/// let bundle = services_over(store.clone(), store.clone(), store, hasher);
/// let _state = bundle.http_state;
/// ```
pub fn services_over<M, L, U, H>(
    meetings: Arc<M>,
    locations: Arc<L>,
    users: Arc<U>,
    hasher: Arc<H>,
) -> ServiceBundle
where
    M: MeetingRepository + 'static,
    L: LocationRepository + 'static,
    U: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    let meeting_service = Arc::new(MeetingService::new(
        meetings,
        Arc::clone(&locations),
        Arc::clone(&users),
    ));
    let room_service = Arc::new(RoomService::new(locations, Arc::clone(&users)));
    let directory = Arc::new(UserDirectory::new(Arc::clone(&users), Arc::clone(&hasher)));
    let http_state = HttpState::new(HttpStatePorts {
        login: Arc::new(PasswordLoginService::new(users, hasher)),
        users: directory.clone(),
        meetings: meeting_service.clone(),
        meetings_query: meeting_service,
        rooms: room_service.clone(),
        rooms_query: room_service,
    });
    ServiceBundle {
        http_state,
        users: directory,
    }
}

fn diesel_services(pool: &DbPool, hasher: Arc<Argon2PasswordHasher>) -> ServiceBundle {
    services_over(
        Arc::new(DieselMeetingRepository::new(pool.clone())),
        Arc::new(DieselLocationRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool.clone())),
        hasher,
    )
}

/// Build services over PostgreSQL when a pool is configured, otherwise over
/// a fresh in-memory store.
pub fn build_services(config: &ServerConfig) -> ServiceBundle {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    match &config.db_pool {
        Some(pool) => diesel_services(pool, hasher),
        None => {
            warn!("no database configured; bookings live in memory and vanish on shutdown");
            let store = Arc::new(InMemoryStore::new());
            services_over(Arc::clone(&store), Arc::clone(&store), store, hasher)
        }
    }
}
