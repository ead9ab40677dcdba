//! Extractor for the signed-in user.
//!
//! The timezone middleware resolves the session user once per request and
//! parks it in the request extensions. Handlers that need an authenticated
//! caller take [`CurrentUser`]; anonymous requests are rejected with
//! `403 Forbidden` before the handler body runs.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};

use crate::domain::{Error, TenantScope, User};

/// The authenticated user behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Visibility scope for this user.
    pub fn scope(&self) -> TenantScope {
        TenantScope::for_user(&self.0)
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<User>().cloned();
        ready(
            user.map(CurrentUser)
                .ok_or_else(|| Error::forbidden("login required")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompanyId;
    use crate::domain::fixtures::user_in;
    use actix_web::dev::Service as _;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    async fn whoami(user: CurrentUser) -> HttpResponse {
        HttpResponse::Ok().body(user.into_inner().username().to_string())
    }

    #[actix_web::test]
    async fn anonymous_requests_are_forbidden() {
        let app = test::init_service(App::new().route("/me", web::get().to(whoami))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn resolved_users_are_extracted() {
        let user = user_in(CompanyId::random(), "alice");
        let app = test::init_service(
            App::new()
                .wrap_fn(move |req, srv| {
                    req.extensions_mut().insert(user.clone());
                    srv.call(req)
                })
                .route("/me", web::get().to(whoami)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "alice");
    }
}
