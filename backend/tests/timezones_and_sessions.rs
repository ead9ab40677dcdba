//! Sessions, per-user display timezones and meeting validation end to end.

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use roombook::domain::{CompanyId, TRACE_ID_HEADER};
use rstest::rstest;
use serde_json::{Value, json};

mod support;

use support::{
    Account, PASSWORD, create_meeting, create_room, email_of, event_names, login, send, send_as,
    start,
};

fn team() -> Vec<Account> {
    let acme = CompanyId::random();
    vec![
        Account::new("wanda", acme, chrono_tz::Europe::Warsaw),
        Account::new("ursula", acme, chrono_tz::UTC),
    ]
}

fn planning(start: &str, end: &str) -> Value {
    json!({
        "eventName": "Planning",
        "meetingAgenda": "Roadmap review",
        "start": start,
        "end": end,
        "participantList": [email_of("wanda"), email_of("ursula")],
        "owner": email_of("ursula"),
    })
}

#[actix_web::test]
async fn naive_times_are_read_and_rendered_in_each_users_zone() {
    let (app, _) = start(&team()).await;
    let wanda = login(&app, "wanda").await;
    let ursula = login(&app, "ursula").await;

    let created = create_meeting(
        &app,
        &wanda,
        planning("2222-12-12T06:00:00", "2222-12-12T07:00:00"),
    )
    .await;
    assert_eq!(created["start"], "2222-12-12T06:00:00+01:00");
    assert_eq!(created["owner"], email_of("wanda"));

    let (_, for_ursula) = send_as(&app, &ursula, TestRequest::get().uri("/api/v1/events")).await;
    assert_eq!(for_ursula[0]["start"], "2222-12-12T05:00:00Z");
    assert_eq!(for_ursula[0]["end"], "2222-12-12T06:00:00Z");
}

#[actix_web::test]
async fn display_timezone_does_not_leak_between_requests() {
    let (app, _) = start(&team()).await;
    let wanda = login(&app, "wanda").await;
    let ursula = login(&app, "ursula").await;
    create_meeting(
        &app,
        &wanda,
        planning("2222-12-12T05:00:00Z", "2222-12-12T06:00:00Z"),
    )
    .await;

    for _ in 0..2 {
        let (_, for_wanda) =
            send_as(&app, &wanda, TestRequest::get().uri("/api/v1/events")).await;
        assert_eq!(for_wanda[0]["start"], "2222-12-12T06:00:00+01:00");
        let (_, for_ursula) =
            send_as(&app, &ursula, TestRequest::get().uri("/api/v1/events")).await;
        assert_eq!(for_ursula[0]["start"], "2222-12-12T05:00:00Z");
    }
}

#[rstest]
#[case("ursula", "2222-12-12", true)]
#[case("wanda", "2222-12-12", false)]
#[case("wanda", "2222-12-13", true)]
#[actix_web::test]
async fn day_filter_follows_the_viewers_calendar(
    #[case] viewer: &str,
    #[case] day: &str,
    #[case] listed: bool,
) {
    let (app, _) = start(&team()).await;
    let wanda = login(&app, "wanda").await;
    create_meeting(
        &app,
        &wanda,
        planning("2222-12-12T23:30:00Z", "2222-12-13T00:30:00Z"),
    )
    .await;

    let session = login(&app, viewer).await;
    let (status, body) = send_as(
        &app,
        &session,
        TestRequest::get().uri(&format!("/api/v1/events?day={day}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(!event_names(&body).is_empty(), listed);
}

#[actix_web::test]
async fn search_and_location_filters_combine() {
    let (app, _) = start(&team()).await;
    let ursula = login(&app, "ursula").await;
    let attic = create_room(&app, &ursula, "ursula", "Attic").await;
    let mut in_attic = planning("2222-12-12T09:00:00Z", "2222-12-12T10:00:00Z");
    in_attic["location"] = json!(attic);
    create_meeting(&app, &ursula, in_attic).await;
    let mut elsewhere = planning("2222-12-12T11:00:00Z", "2222-12-12T12:00:00Z");
    elsewhere["eventName"] = json!("Retro");
    elsewhere["meetingAgenda"] = json!("What went well");
    create_meeting(&app, &ursula, elsewhere).await;

    let query = |uri: String| send_as(&app, &ursula, TestRequest::get().uri(&uri));
    let (_, by_agenda) = query("/api/v1/events?query=ROADMAP".to_owned()).await;
    assert_eq!(event_names(&by_agenda), ["Planning"]);
    let (_, by_name) = query("/api/v1/events?query=retr".to_owned()).await;
    assert_eq!(event_names(&by_name), ["Retro"]);
    let (_, by_room) = query(format!("/api/v1/events?locationId={attic}")).await;
    assert_eq!(event_names(&by_room), ["Planning"]);
    assert_eq!(by_room[0]["location"]["name"], "Attic");
    let (_, none) = query(format!("/api/v1/events?locationId={attic}&query=retro")).await;
    assert!(event_names(&none).is_empty());
}

#[rstest]
#[case("2222-12-12T17:00:00Z", StatusCode::CREATED)]
#[case("2222-12-12T17:00:01Z", StatusCode::BAD_REQUEST)]
#[case("2222-12-12T09:00:00Z", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn meetings_are_capped_at_eight_hours(#[case] end: &str, #[case] expected: StatusCode) {
    let (app, _) = start(&team()).await;
    let ursula = login(&app, "ursula").await;
    let (status, body) = send_as(
        &app,
        &ursula,
        TestRequest::post()
            .uri("/api/v1/events")
            .set_json(planning("2222-12-12T09:00:00Z", end)),
    )
    .await;
    assert_eq!(status, expected, "{body}");
    if end == "2222-12-12T17:00:01Z" {
        assert_eq!(body["message"], "Meetings shouldn't be longer than 8 hours.");
        assert_eq!(body["details"]["maxHours"], 8);
    }
}

#[actix_web::test]
async fn users_me_reports_the_stored_timezone() {
    let (app, users) = start(&team()).await;
    let wanda = login(&app, "wanda").await;
    let (status, body) = send_as(&app, &wanda, TestRequest::get().uri("/api/v1/users/me")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "wanda");
    assert_eq!(body["timezone"], "Europe/Warsaw");
    assert_eq!(body["id"], users[0].id().to_string());
    assert_eq!(body["companyId"], users[0].company_id().to_string());
}

#[rstest]
#[case(json!({"username": "wanda", "password": "wrong"}), StatusCode::UNAUTHORIZED)]
#[case(json!({"username": "nobody", "password": PASSWORD}), StatusCode::UNAUTHORIZED)]
#[case(json!({"username": "  ", "password": PASSWORD}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn failed_logins_issue_no_session(#[case] payload: Value, #[case] expected: StatusCode) {
    let (app, _) = start(&team()).await;
    let (status, body) = send(
        &app,
        TestRequest::post().uri("/api/v1/login").set_json(payload),
    )
    .await;
    assert_eq!(status, expected);
    assert!(body["traceId"].is_string());
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let (app, _) = start(&team()).await;
    let wanda = login(&app, "wanda").await;
    let response = actix_web::test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(wanda.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let cleared = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}
