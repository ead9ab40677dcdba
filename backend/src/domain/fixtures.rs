//! Builders shared by domain and adapter unit tests.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::{
    CompanyId, EmailAddress, Location, LocationDetails, LocationId, Meeting, MeetingDetails,
    MeetingId, MeetingWindow, User, UserId, UserRef, Username,
};

pub(crate) fn user_in(company: CompanyId, name: &str) -> User {
    user_in_zone(company, name, chrono_tz::UTC)
}

pub(crate) fn user_in_zone(company: CompanyId, name: &str, tz: Tz) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("fixture username"),
        EmailAddress::new(format!("{name}@example.test")).expect("fixture email"),
        company,
        tz,
    )
}

pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("fixture timestamp")
}

pub(crate) fn room(manager: &User, name: &str) -> Location {
    Location {
        id: LocationId::random(),
        manager: manager.to_ref(),
        details: LocationDetails::new(name, "1 Main Street").expect("fixture room"),
    }
}

/// One-hour meeting starting at `start`.
pub(crate) fn meeting(
    owner: &User,
    name: &str,
    start: DateTime<Utc>,
    participants: &[&User],
    location: Option<&Location>,
) -> Meeting {
    Meeting {
        id: MeetingId::random(),
        owner: owner.to_ref(),
        details: MeetingDetails::new(name, format!("{name} agenda")).expect("fixture details"),
        window: MeetingWindow::new(start, start + TimeDelta::hours(1)).expect("fixture window"),
        participants: participants.iter().map(|u| u.to_ref()).collect::<Vec<UserRef>>(),
        location: location.cloned(),
    }
}
