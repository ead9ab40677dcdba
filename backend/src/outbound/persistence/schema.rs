//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts, each belonging to one company.
    users (id) {
        id -> Uuid,
        /// Unique login name.
        username -> Text,
        /// Normalised address; domain part lower-cased.
        email -> Text,
        company_id -> Uuid,
        /// IANA timezone name.
        timezone -> Text,
        /// PHC-encoded password hash.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookable rooms.
    locations (id) {
        id -> Uuid,
        /// `RESTRICT`: a manager cannot be deleted while managing rooms.
        manager_id -> Uuid,
        name -> Text,
        address -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Meetings; the window is guarded by a check constraint.
    meetings (id) {
        id -> Uuid,
        owner_id -> Uuid,
        event_name -> Text,
        meeting_agenda -> Text,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        /// `SET NULL` when the room is deleted.
        location_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Meeting/participant links; removed with their meeting.
    meeting_participants (meeting_id, user_id) {
        meeting_id -> Uuid,
        user_id -> Uuid,
    }
}

diesel::joinable!(locations -> users (manager_id));
diesel::joinable!(meetings -> locations (location_id));
diesel::joinable!(meeting_participants -> meetings (meeting_id));

diesel::allow_tables_to_appear_in_same_query!(users, locations, meetings, meeting_participants);
