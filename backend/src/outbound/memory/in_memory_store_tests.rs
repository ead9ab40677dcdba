//! Tests for the in-memory store.

use super::*;
use crate::domain::fixtures::{at, meeting, room, user_in};
use crate::domain::{DayRange, SearchText};
use rstest::{fixture, rstest};

struct World {
    store: InMemoryStore,
    alice: User,
    bob: User,
    carol: User,
    mallory: User,
}

async fn register(store: &InMemoryStore, user: &User) {
    store
        .insert(user, &PasswordHash::new("fixture$pw"))
        .await
        .expect("insert user");
}

#[fixture]
async fn world() -> World {
    let acme = CompanyId::random();
    let world = World {
        store: InMemoryStore::new(),
        alice: user_in(acme, "alice"),
        bob: user_in(acme, "bob"),
        carol: user_in(acme, "carol"),
        mallory: user_in(CompanyId::random(), "mallory"),
    };
    for user in [&world.alice, &world.bob, &world.carol, &world.mallory] {
        register(&world.store, user).await;
    }
    world
}

async fn store_room(store: &InMemoryStore, manager: &User, name: &str) -> Location {
    let location = room(manager, name);
    LocationRepository::save(
        store,
        &LocationRecord {
            id: location.id,
            manager_id: location.manager.id,
            details: location.details.clone(),
        },
    )
    .await
    .expect("save room")
}

async fn store_meeting(store: &InMemoryStore, meeting: &Meeting) -> Meeting {
    MeetingRepository::save(store, &meeting.to_record())
        .await
        .expect("save meeting")
}

#[rstest]
#[tokio::test]
async fn rooms_are_visible_within_the_managers_company(#[future] world: World) {
    let w = world.await;
    store_room(&w.store, &w.bob, "Boardroom").await;
    store_room(&w.store, &w.mallory, "Elsewhere").await;

    let rooms = LocationRepository::list_visible(&w.store, &TenantScope::for_user(&w.alice))
        .await
        .expect("list");
    let names: Vec<&str> = rooms.iter().map(Location::name).collect();
    assert_eq!(names, vec!["Boardroom"]);
}

#[rstest]
#[tokio::test]
async fn rooms_list_in_name_order(#[future] world: World) {
    let w = world.await;
    store_room(&w.store, &w.bob, "Zen garden").await;
    store_room(&w.store, &w.alice, "Attic").await;
    let rooms = LocationRepository::list_visible(&w.store, &TenantScope::for_user(&w.carol))
        .await
        .expect("list");
    let names: Vec<&str> = rooms.iter().map(Location::name).collect();
    assert_eq!(names, vec!["Attic", "Zen garden"]);
}

#[rstest]
#[tokio::test]
async fn meetings_follow_participation_and_room_management(#[future] world: World) {
    let w = world.await;
    let boardroom = store_room(&w.store, &w.carol, "Boardroom").await;
    let sync = meeting(&w.alice, "Sync", at(2222, 12, 12, 9), &[&w.bob], Some(&boardroom));
    store_meeting(&w.store, &sync).await;

    let sees = |user: &User| {
        let scope = TenantScope::for_user(user);
        let store = &w.store;
        async move {
            MeetingRepository::list_visible(store, &scope, &MeetingFilter::default())
                .await
                .expect("list")
                .len()
        }
    };
    assert_eq!(sees(&w.bob).await, 1, "participant");
    assert_eq!(sees(&w.carol).await, 1, "room manager");
    assert_eq!(sees(&w.alice).await, 0, "owner alone");
    assert_eq!(sees(&w.mallory).await, 0, "other company");
}

#[rstest]
#[tokio::test]
async fn qualifying_twice_lists_a_meeting_once(#[future] world: World) {
    let w = world.await;
    let boardroom = store_room(&w.store, &w.bob, "Boardroom").await;
    let sync = meeting(&w.alice, "Sync", at(2222, 12, 12, 9), &[&w.bob], Some(&boardroom));
    store_meeting(&w.store, &sync).await;

    let listed = MeetingRepository::list_visible(
        &w.store,
        &TenantScope::for_user(&w.bob),
        &MeetingFilter::default(),
    )
    .await
    .expect("list");
    assert_eq!(listed.len(), 1);
}

#[rstest]
#[tokio::test]
async fn filters_narrow_the_visible_set(#[future] world: World) {
    let w = world.await;
    let boardroom = store_room(&w.store, &w.bob, "Boardroom").await;
    let early = meeting(&w.alice, "Planning", at(2222, 12, 12, 9), &[&w.bob], None);
    let late = meeting(&w.alice, "Retro", at(2222, 12, 13, 9), &[&w.bob], Some(&boardroom));
    store_meeting(&w.store, &early).await;
    store_meeting(&w.store, &late).await;
    let scope = TenantScope::for_user(&w.bob);

    let by_day = MeetingFilter {
        day: Some(DayRange::for_local_date(
            at(2222, 12, 12, 0).date_naive(),
            chrono_tz::UTC,
        )),
        ..MeetingFilter::default()
    };
    let by_room = MeetingFilter {
        location: Some(boardroom.id),
        ..MeetingFilter::default()
    };
    let by_text = MeetingFilter {
        text: SearchText::new("PLAN"),
        ..MeetingFilter::default()
    };
    for (filter, expected) in [(by_day, early.id), (by_room, late.id), (by_text, early.id)] {
        let listed = MeetingRepository::list_visible(&w.store, &scope, &filter)
            .await
            .expect("list");
        let ids: Vec<MeetingId> = listed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![expected]);
    }
}

#[rstest]
#[tokio::test]
async fn participants_are_sorted_by_email(#[future] world: World) {
    let w = world.await;
    let sync = meeting(
        &w.alice,
        "Sync",
        at(2222, 12, 12, 9),
        &[&w.carol, &w.alice, &w.bob],
        None,
    );
    let stored = store_meeting(&w.store, &sync).await;
    let emails: Vec<&str> = stored.participants.iter().map(|p| p.email.as_ref()).collect();
    assert_eq!(
        emails,
        vec!["alice@example.test", "bob@example.test", "carol@example.test"]
    );
}

#[rstest]
#[tokio::test]
async fn deleting_a_room_detaches_its_meetings(#[future] world: World) {
    let w = world.await;
    let boardroom = store_room(&w.store, &w.carol, "Boardroom").await;
    let sync = meeting(&w.alice, "Sync", at(2222, 12, 12, 9), &[&w.bob], Some(&boardroom));
    store_meeting(&w.store, &sync).await;

    assert!(
        LocationRepository::delete(&w.store, &boardroom.id)
            .await
            .expect("delete")
    );
    let kept = MeetingRepository::find_visible(&w.store, &TenantScope::for_user(&w.bob), &sync.id)
        .await
        .expect("find")
        .expect("still visible to the participant");
    assert!(kept.location.is_none());
}

#[rstest]
#[tokio::test]
async fn resaving_keeps_the_original_owner(#[future] world: World) {
    let w = world.await;
    let sync = meeting(&w.alice, "Sync", at(2222, 12, 12, 9), &[&w.bob], None);
    store_meeting(&w.store, &sync).await;

    let mut record = sync.to_record();
    record.owner_id = *w.carol.id();
    let saved = MeetingRepository::save(&w.store, &record)
        .await
        .expect("resave");
    assert_eq!(saved.owner.id, *w.alice.id());
}

#[rstest]
#[tokio::test]
async fn unknown_participants_are_missing_references(#[future] world: World) {
    let w = world.await;
    let stranger = user_in(*w.alice.company_id(), "stranger");
    let sync = meeting(&w.alice, "Sync", at(2222, 12, 12, 9), &[&stranger], None);
    let err = MeetingRepository::save(&w.store, &sync.to_record())
        .await
        .expect_err("dangling participant");
    assert!(matches!(err, MeetingPersistenceError::MissingReference { .. }));
}

#[rstest]
#[tokio::test]
async fn usernames_are_unique(#[future] world: World) {
    let w = world.await;
    let twin = user_in(CompanyId::random(), "alice");
    let err = w
        .store
        .insert(&twin, &PasswordHash::new("fixture$pw"))
        .await
        .expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate("username"));
}

#[rstest]
#[tokio::test]
async fn company_members_are_matched_by_email_within_the_company(#[future] world: World) {
    let w = world.await;
    let emails = vec![
        w.bob.email().clone(),
        w.mallory.email().clone(),
        EmailAddress::new("ghost@example.test").expect("email"),
    ];
    let members = w
        .store
        .find_company_members(w.alice.company_id(), &emails)
        .await
        .expect("lookup");
    let ids: Vec<UserId> = members.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![*w.bob.id()]);
}
