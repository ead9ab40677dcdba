//! Shared harness running the real application over the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::StatusCode;
use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceResponse},
    test as actix_test, web,
};
use chrono_tz::Tz;
use roombook::domain::ports::{FixturePasswordHasher, NewUser, UsersCommand as _};
use roombook::domain::{CompanyId, EmailAddress, User, Username};
use roombook::inbound::http::health::HealthState;
use roombook::outbound::memory::InMemoryStore;
use roombook::server::{AppDependencies, build_app, services_over};
use serde_json::{Value, json};
use zeroize::Zeroizing;

pub const PASSWORD: &str = "correct horse battery staple";

/// Account registered before the app starts.
pub struct Account {
    pub username: &'static str,
    pub company: CompanyId,
    pub timezone: Tz,
}

impl Account {
    pub fn new(username: &'static str, company: CompanyId, timezone: Tz) -> Self {
        Self {
            username,
            company,
            timezone,
        }
    }
}

/// E-mail address registered for `username`.
pub fn email_of(username: &str) -> String {
    format!("{username}@example.test")
}

/// Register `accounts` and start the full app with a UTC default zone.
pub async fn start(
    accounts: &[Account],
) -> (
    impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> + use<>,
    Vec<User>,
) {
    let store = Arc::new(InMemoryStore::new());
    let services = services_over(
        Arc::clone(&store),
        Arc::clone(&store),
        store,
        Arc::new(FixturePasswordHasher),
    );
    let mut users = Vec::with_capacity(accounts.len());
    for account in accounts {
        let user = services
            .users
            .register(NewUser {
                username: Username::new(account.username).expect("username"),
                email: EmailAddress::new(email_of(account.username)).expect("email"),
                company_id: account.company,
                timezone: account.timezone,
                password: Zeroizing::new(PASSWORD.to_owned()),
            })
            .await
            .expect("register account");
        users.push(user);
    }
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    let app = actix_test::init_service(build_app(AppDependencies {
        health_state,
        http_state: web::Data::new(services.http_state),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        default_timezone: chrono_tz::UTC,
    }))
    .await;
    (app, users)
}

/// Status and JSON body (`Null` when empty).
pub async fn send<S>(app: &S, request: actix_test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

/// Sign in and return the session cookie.
pub async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": username, "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Send `request` with the given session.
pub async fn send_as<S>(
    app: &S,
    session: &Cookie<'static>,
    request: actix_test::TestRequest,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(app, request.cookie(session.clone())).await
}

/// Create a room as `session` and return its id.
pub async fn create_room<S>(app: &S, session: &Cookie<'static>, manager: &str, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send_as(
        app,
        session,
        actix_test::TestRequest::post().uri("/api/v1/rooms").set_json(json!({
            "manager": email_of(manager),
            "name": name,
            "address": "1 Main Street",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create room {name}: {body}");
    body["id"].as_str().expect("room id").to_owned()
}

/// Create a meeting as `session` and return the response body.
pub async fn create_meeting<S>(app: &S, session: &Cookie<'static>, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send_as(
        app,
        session,
        actix_test::TestRequest::post()
            .uri("/api/v1/events")
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create meeting: {body}");
    body
}

/// Event names of a meeting list, in response order.
pub fn event_names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("meeting list")
        .iter()
        .map(|meeting| meeting["eventName"].as_str().expect("eventName").to_owned())
        .collect()
}
