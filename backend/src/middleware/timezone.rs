//! Per-request user resolution and display timezone activation.
//!
//! Runs inside the session middleware. For each request it reads the user
//! id from the session, loads the user once, stores it in the request
//! extensions for [`CurrentUser`](crate::inbound::http::current_user::CurrentUser)
//! and runs the rest of the chain inside [`DisplayTimezone::scope`] with the
//! user's zone, or the configured default for anonymous requests. The scope
//! ends with the response future, so the next request starts clean.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_session::SessionExt as _;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage as _};
use chrono_tz::Tz;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::UsersQuery;
use crate::domain::{DisplayTimezone, User};
use crate::inbound::http::session::SessionContext;

/// Middleware factory resolving the session user and display timezone.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use roombook::domain::UserDirectory;
/// use roombook::domain::ports::FixturePasswordHasher;
/// use roombook::middleware::UserTimezone;
/// use roombook::outbound::memory::InMemoryStore;
///
/// let users = Arc::new(UserDirectory::new(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(FixturePasswordHasher),
/// ));
/// let app = App::new().service(
///     web::scope("/api/v1").wrap(UserTimezone::new(users, chrono_tz::UTC)),
/// );
/// ```
#[derive(Clone)]
pub struct UserTimezone {
    users: Arc<dyn UsersQuery>,
    default_timezone: Tz,
}

impl UserTimezone {
    pub fn new(users: Arc<dyn UsersQuery>, default_timezone: Tz) -> Self {
        Self {
            users,
            default_timezone,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for UserTimezone
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = UserTimezoneMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserTimezoneMiddleware {
            service: Rc::new(service),
            users: Arc::clone(&self.users),
            default_timezone: self.default_timezone,
        }))
    }
}

/// Service wrapper produced by [`UserTimezone`].
pub struct UserTimezoneMiddleware<S> {
    service: Rc<S>,
    users: Arc<dyn UsersQuery>,
    default_timezone: Tz,
}

async fn resolve_user(
    req: &ServiceRequest,
    users: &dyn UsersQuery,
) -> Result<Option<User>, Error> {
    let session = SessionContext::new(req.get_session());
    let Some(id) = session.user_id()? else {
        return Ok(None);
    };
    let user = users.find_user(&id).await?;
    if user.is_none() {
        debug!(user_id = %id, "session refers to a removed user");
        session.clear();
    }
    Ok(user)
}

impl<S, B> Service<ServiceRequest> for UserTimezoneMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let users = Arc::clone(&self.users);
        let default_timezone = self.default_timezone;
        Box::pin(async move {
            let user = resolve_user(&req, users.as_ref()).await?;
            let tz = user.as_ref().map_or(default_timezone, User::timezone);
            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            DisplayTimezone::scope(tz, service.call(req)).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::user_in_zone;
    use crate::domain::ports::MockUsersQuery;
    use crate::domain::{CompanyId, Error as DomainError, UserId};
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};

    async fn report(req: HttpRequest, session: SessionContext) -> HttpResponse {
        let user = req
            .extensions()
            .get::<User>()
            .map(|user| user.username().to_string())
            .unwrap_or_default();
        if req.path() == "/login" {
            let id = UserId::new(req.query_string()).expect("user id query");
            session.persist_user(&id).expect("persist");
        }
        HttpResponse::Ok().body(format!("{}|{user}", DisplayTimezone::current().name()))
    }

    fn app(
        users: MockUsersQuery,
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
            .wrap(UserTimezone::new(Arc::new(users), chrono_tz::America::New_York))
            .wrap(test_session_middleware())
            .route("/login", web::get().to(report))
            .route("/whoami", web::get().to(report))
    }

    async fn body_of(res: ServiceResponse) -> String {
        String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8")
    }

    #[actix_web::test]
    async fn anonymous_requests_use_the_default_zone() {
        let mut users = MockUsersQuery::new();
        users.expect_find_user().never();
        let app = test::init_service(app(users)).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(body_of(res).await, "America/New_York|");
    }

    #[actix_web::test]
    async fn signed_in_requests_use_the_users_zone_without_leaking() {
        let alice = user_in_zone(CompanyId::random(), "alice", chrono_tz::Europe::Warsaw);
        let alice_id = *alice.id();
        let mut users = MockUsersQuery::new();
        users
            .expect_find_user()
            .withf(move |id| *id == alice_id)
            .returning(move |_| Ok(Some(alice.clone())));
        let app = test::init_service(app(users)).await;

        let login = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/login?{alice_id}"))
                .to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(|cookie| cookie.into_owned())
            .expect("session cookie");

        let signed_in = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(body_of(signed_in).await, "Europe/Warsaw|alice");

        let anonymous =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(body_of(anonymous).await, "America/New_York|");
    }

    #[actix_web::test]
    async fn lookup_failures_surface_as_errors() {
        let id = UserId::random();
        let mut users = MockUsersQuery::new();
        users
            .expect_find_user()
            .returning(|_| Err(DomainError::service_unavailable("database down")));
        let app = test::init_service(app(users)).await;

        let login = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/login?{id}"))
                .to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(|cookie| cookie.into_owned())
            .expect("session cookie");
        let err = test::try_call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await
        .expect_err("lookup failure");
        assert_eq!(err.error_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
