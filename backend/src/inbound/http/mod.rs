//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON payloads into domain drafts, call the driving
//! ports held in [`state::HttpState`] and render domain values back as DTOs.

use actix_web::web;

pub mod auth;
pub mod current_user;
pub mod error;
pub mod health;
pub mod meetings;
pub mod rooms;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

pub use error::{ApiResult, json_config, path_config, query_config};

/// Register every `/api/v1` handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use roombook::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(users::current_user)
        .service(meetings::list_meetings)
        .service(meetings::create_meeting)
        .service(meetings::get_meeting)
        .service(meetings::replace_meeting)
        .service(meetings::update_meeting)
        .service(meetings::delete_meeting)
        .service(rooms::list_rooms)
        .service(rooms::create_room)
        .service(rooms::get_room)
        .service(rooms::replace_room)
        .service(rooms::update_room)
        .service(rooms::delete_room);
}
