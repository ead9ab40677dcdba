//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, MeetingsCommand, MeetingsQuery, RoomsCommand, RoomsQuery, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub meetings: Arc<dyn MeetingsCommand>,
    pub meetings_query: Arc<dyn MeetingsQuery>,
    pub rooms: Arc<dyn RoomsCommand>,
    pub rooms_query: Arc<dyn RoomsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub meetings: Arc<dyn MeetingsCommand>,
    pub meetings_query: Arc<dyn MeetingsQuery>,
    pub rooms: Arc<dyn RoomsCommand>,
    pub rooms_query: Arc<dyn RoomsQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use roombook::domain::ports::FixturePasswordHasher;
    /// use roombook::domain::{MeetingService, PasswordLoginService, RoomService, UserDirectory};
    /// use roombook::inbound::http::state::{HttpState, HttpStatePorts};
    /// use roombook::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let hasher = Arc::new(FixturePasswordHasher);
    /// let meetings = Arc::new(MeetingService::new(store.clone(), store.clone(), store.clone()));
    /// let rooms = Arc::new(RoomService::new(store.clone(), store.clone()));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(PasswordLoginService::new(store.clone(), hasher.clone())),
    ///     users: Arc::new(UserDirectory::new(store, hasher)),
    ///     meetings: meetings.clone(),
    ///     meetings_query: meetings,
    ///     rooms: rooms.clone(),
    ///     rooms_query: rooms,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            users,
            meetings,
            meetings_query,
            rooms,
            rooms_query,
        } = ports;
        Self {
            login,
            users,
            meetings,
            meetings_query,
            rooms,
            rooms_query,
        }
    }
}
