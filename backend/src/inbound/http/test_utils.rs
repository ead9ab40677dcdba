//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::Service as _;
use actix_web::{App, HttpMessage as _, web};

use crate::domain::{DisplayTimezone, User};
use crate::domain::ports::{
    MockLoginService, MockMeetingsCommand, MockMeetingsQuery, MockRoomsCommand, MockRoomsQuery,
    MockUsersQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{configure_api, json_config, path_config, query_config};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Driving-port mocks; unconfigured mocks panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub users: MockUsersQuery,
    pub meetings: MockMeetingsCommand,
    pub meetings_query: MockMeetingsQuery,
    pub rooms: MockRoomsCommand,
    pub rooms_query: MockRoomsQuery,
}

impl From<MockPorts> for HttpState {
    fn from(mocks: MockPorts) -> Self {
        HttpState::new(HttpStatePorts {
            login: Arc::new(mocks.login),
            users: Arc::new(mocks.users),
            meetings: Arc::new(mocks.meetings),
            meetings_query: Arc::new(mocks.meetings_query),
            rooms: Arc::new(mocks.rooms),
            rooms_query: Arc::new(mocks.rooms_query),
        })
    }
}

/// The full `/api/v1` surface over mocked ports.
///
/// `user` stands in for the timezone middleware: when present it is placed
/// in the request extensions exactly as a resolved session user would be,
/// and its timezone becomes the display timezone.
pub fn test_app(
    mocks: MockPorts,
    user: Option<User>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::from(mocks)))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(
            web::scope("/api/v1")
                .wrap_fn(move |req, srv| {
                    let tz = user.as_ref().map_or(chrono_tz::UTC, User::timezone);
                    if let Some(user) = &user {
                        req.extensions_mut().insert(user.clone());
                    }
                    DisplayTimezone::scope(tz, srv.call(req))
                })
                .wrap(test_session_middleware())
                .configure(configure_api),
        )
}
