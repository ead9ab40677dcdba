//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every handler of the inbound layer (auth, users, rooms,
//!   events, health)
//! - **Schemas**: request/response DTOs plus the domain wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that describe domain types
//!   without coupling them to utoipa
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::meetings::{MeetingPatchRequest, MeetingRequest, MeetingResponse};
use crate::inbound::http::rooms::{RoomPatchRequest, RoomRequest, RoomResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::UserResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Roombook API",
        description = "Multi-tenant meeting-room booking. Timestamps without an offset are \
                       read in the caller's timezone and responses are rendered in it."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::meetings::list_meetings,
        crate::inbound::http::meetings::create_meeting,
        crate::inbound::http::meetings::get_meeting,
        crate::inbound::http::meetings::replace_meeting,
        crate::inbound::http::meetings::update_meeting,
        crate::inbound::http::meetings::delete_meeting,
        crate::inbound::http::rooms::list_rooms,
        crate::inbound::http::rooms::create_room,
        crate::inbound::http::rooms::get_room,
        crate::inbound::http::rooms::replace_room,
        crate::inbound::http::rooms::update_room,
        crate::inbound::http::rooms::delete_room,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        UserResponse,
        RoomRequest,
        RoomPatchRequest,
        RoomResponse,
        MeetingRequest,
        MeetingPatchRequest,
        MeetingResponse,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "users", description = "The signed-in user"),
        (name = "events", description = "Meetings visible to the signed-in user"),
        (name = "rooms", description = "Rooms managed within the signed-in user's company"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
