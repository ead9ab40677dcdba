//! Current-user handler.
//!
//! ```text
//! GET /api/v1/users/me
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::User;
use crate::inbound::http::current_user::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;

/// Signed-in user as returned by `GET /api/v1/users/me`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@acme.test")]
    pub email: String,
    pub company_id: String,
    /// IANA timezone used to read and render timestamps.
    #[schema(example = "Europe/Warsaw")]
    pub timezone: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            company_id: user.company_id().to_string(),
            timezone: user.timezone().name().to_owned(),
        }
    }
}

/// Return the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 403, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(user: CurrentUser) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(&user.0))
}
