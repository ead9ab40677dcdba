//! Room (location) handlers.
//!
//! ```text
//! GET    /api/v1/rooms
//! POST   /api/v1/rooms {"manager":"bob@acme.test","name":"Attic","address":"1 Main St"}
//! GET    /api/v1/rooms/{id}
//! PUT    /api/v1/rooms/{id}
//! PATCH  /api/v1/rooms/{id} {"name":"Loft"}
//! DELETE /api/v1/rooms/{id}
//! ```
//!
//! Every route requires a signed-in user and only sees rooms managed within
//! that user's company.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RoomChanges, RoomDraft};
use crate::domain::{Error, Location, LocationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::current_user::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email, parse_uuid};

const MANAGER: FieldName = FieldName::new("manager");

/// Room as rendered to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    #[schema(example = "0b8e9a43-6b0c-4c1e-9d8e-3b9f0f1c2a7d")]
    pub id: String,
    /// E-mail of the managing user.
    #[schema(example = "bob@acme.test")]
    pub manager: String,
    #[schema(example = "Attic")]
    pub name: String,
    #[schema(example = "1 Main Street")]
    pub address: String,
}

impl From<&Location> for RoomResponse {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id.to_string(),
            manager: location.manager.email.to_string(),
            name: location.name().to_owned(),
            address: location.address().to_owned(),
        }
    }
}

/// Complete room payload for `POST` and `PUT`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    pub manager: String,
    pub name: String,
    pub address: String,
}

impl TryFrom<RoomRequest> for RoomDraft {
    type Error = Error;

    fn try_from(value: RoomRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            manager: parse_email(&value.manager, MANAGER)?,
            name: value.name,
            address: value.address,
        })
    }
}

/// Partial room payload for `PATCH`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatchRequest {
    pub manager: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl TryFrom<RoomPatchRequest> for RoomChanges {
    type Error = Error;

    fn try_from(value: RoomPatchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            manager: value
                .manager
                .as_deref()
                .map(|raw| parse_email(raw, MANAGER))
                .transpose()?,
            name: value.name,
            address: value.address,
        })
    }
}

fn room_id(raw: &str) -> Result<LocationId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(LocationId::from_uuid)
}

/// List rooms managed within the caller's company.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    responses(
        (status = 200, description = "Visible rooms", body = [RoomResponse]),
        (status = 403, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "listRooms"
)]
#[get("/rooms")]
pub async fn list_rooms(
    user: CurrentUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<RoomResponse>>> {
    let rooms = state.rooms_query.list(&user.scope()).await?;
    Ok(web::Json(rooms.iter().map(RoomResponse::from).collect()))
}

/// Create a room.
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    request_body = RoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "createRoom"
)]
#[post("/rooms")]
pub async fn create_room(
    user: CurrentUser,
    state: web::Data<HttpState>,
    payload: web::Json<RoomRequest>,
) -> ApiResult<HttpResponse> {
    let draft = RoomDraft::try_from(payload.into_inner())?;
    let room = state.rooms.create(&user.scope(), draft).await?;
    Ok(HttpResponse::Created().json(RoomResponse::from(&room)))
}

/// Fetch one visible room.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Room", body = RoomResponse),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "getRoom"
)]
#[get("/rooms/{id}")]
pub async fn get_room(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RoomResponse>> {
    let id = room_id(&path)?;
    let room = state.rooms_query.get(&user.scope(), &id).await?;
    Ok(web::Json(RoomResponse::from(&room)))
}

/// Replace every attribute of a room.
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room identifier")),
    request_body = RoomRequest,
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "replaceRoom"
)]
#[put("/rooms/{id}")]
pub async fn replace_room(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RoomRequest>,
) -> ApiResult<web::Json<RoomResponse>> {
    let id = room_id(&path)?;
    let changes = RoomChanges::from(RoomDraft::try_from(payload.into_inner())?);
    let room = state.rooms.update(&user.scope(), &id, changes).await?;
    Ok(web::Json(RoomResponse::from(&room)))
}

/// Change selected attributes of a room.
#[utoipa::path(
    patch,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room identifier")),
    request_body = RoomPatchRequest,
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "updateRoom"
)]
#[patch("/rooms/{id}")]
pub async fn update_room(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RoomPatchRequest>,
) -> ApiResult<web::Json<RoomResponse>> {
    let id = room_id(&path)?;
    let changes = RoomChanges::try_from(payload.into_inner())?;
    let room = state.rooms.update(&user.scope(), &id, changes).await?;
    Ok(web::Json(RoomResponse::from(&room)))
}

/// Delete a room; meetings held there lose their location.
#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}",
    params(("id" = String, Path, description = "Room identifier")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 403, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not visible or missing", body = ErrorSchema)
    ),
    tags = ["rooms"],
    operation_id = "deleteRoom"
)]
#[delete("/rooms/{id}")]
pub async fn delete_room(
    user: CurrentUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = room_id(&path)?;
    state.rooms.delete(&user.scope(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "rooms_tests.rs"]
mod tests;
