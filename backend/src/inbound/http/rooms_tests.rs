//! Tests for room HTTP handlers.

use super::*;
use crate::domain::fixtures::{room, user_in};
use crate::domain::{CompanyId, EmailAddress, TenantScope, User};
use crate::inbound::http::test_utils::{MockPorts, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn alice() -> User {
    user_in(CompanyId::random(), "alice")
}

#[rstest]
#[actix_web::test]
async fn list_renders_manager_emails(alice: User) {
    let mut mocks = MockPorts::default();
    let listed = vec![room(&alice, "Attic")];
    let expected_scope = TenantScope::for_user(&alice);
    mocks
        .rooms_query
        .expect_list()
        .withf(move |scope| *scope == expected_scope)
        .return_once(move |_| Ok(listed));
    let app = actix_test::init_service(test_app(mocks, Some(alice))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/rooms").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Vec<RoomResponse> = actix_test::read_body_json(response).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].manager, "alice@example.test");
    assert_eq!(body[0].name, "Attic");
}

#[rstest]
#[case::list(actix_test::TestRequest::get().uri("/api/v1/rooms"))]
#[case::create(
    actix_test::TestRequest::post()
        .uri("/api/v1/rooms")
        .set_json(json!({"manager": "a@b.test", "name": "x", "address": "y"}))
)]
#[case::delete(
    actix_test::TestRequest::delete().uri("/api/v1/rooms/0b8e9a43-6b0c-4c1e-9d8e-3b9f0f1c2a7d")
)]
#[actix_web::test]
async fn anonymous_callers_are_forbidden(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(MockPorts::default(), None)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn create_returns_created(alice: User) {
    let mut mocks = MockPorts::default();
    let created = room(&alice, "Attic");
    mocks
        .rooms
        .expect_create()
        .withf(|_, draft| {
            draft.manager == EmailAddress::new("alice@example.test").expect("email")
                && draft.name == "Attic"
        })
        .return_once(move |_, _| Ok(created));
    let app = actix_test::init_service(test_app(mocks, Some(alice))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/rooms")
            .set_json(json!({
                "manager": "alice@example.test",
                "name": "Attic",
                "address": "1 Main Street"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[rstest]
#[actix_web::test]
async fn malformed_manager_emails_are_rejected(alice: User) {
    let mut mocks = MockPorts::default();
    mocks.rooms.expect_create().never();
    let app = actix_test::init_service(test_app(mocks, Some(alice))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/rooms")
            .set_json(json!({"manager": "nobody", "name": "Attic", "address": "1 Main"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "manager");
}

#[rstest]
#[actix_web::test]
async fn missing_fields_are_malformed_bodies(alice: User) {
    let app = actix_test::init_service(test_app(MockPorts::default(), Some(alice))).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/rooms")
            .set_json(json!({"name": "Attic"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "malformed");
}

#[rstest]
#[actix_web::test]
async fn patch_only_sends_supplied_fields(alice: User) {
    let mut mocks = MockPorts::default();
    let stored = room(&alice, "Loft");
    let id = stored.id;
    mocks
        .rooms
        .expect_update()
        .withf(move |_, candidate, changes| {
            *candidate == id
                && changes.name.as_deref() == Some("Loft")
                && changes.manager.is_none()
                && changes.address.is_none()
        })
        .return_once(move |_, _, _| Ok(stored));
    let app = actix_test::init_service(test_app(mocks, Some(alice))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/rooms/{id}"))
            .set_json(json!({"name": "Loft"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn invisible_rooms_are_not_found(alice: User) {
    let mut mocks = MockPorts::default();
    mocks
        .rooms_query
        .expect_get()
        .return_once(|_, _| Err(Error::not_found("room not found")));
    let app = actix_test::init_service(test_app(mocks, Some(alice))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/rooms/{}", LocationId::random()))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn malformed_ids_are_bad_requests(alice: User) {
    let app = actix_test::init_service(test_app(MockPorts::default(), Some(alice))).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/rooms/not-a-uuid")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "id");
}

#[rstest]
#[actix_web::test]
async fn delete_returns_no_content(alice: User) {
    let mut mocks = MockPorts::default();
    mocks.rooms.expect_delete().return_once(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(mocks, Some(alice))).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/rooms/{}", LocationId::random()))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
