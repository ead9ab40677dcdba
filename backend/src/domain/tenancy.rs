//! Tenant-scoped visibility rules.
//!
//! A viewer sees a meeting when its owner belongs to the viewer's company
//! and the viewer either takes part in it or manages the room it is held
//! in. Owning a meeting does not by itself make it visible. A viewer sees a
//! room when its manager belongs to the viewer's company.
//!
//! The predicates here are the reference semantics; the database adapter
//! expresses the same rules as SQL.

use super::{CompanyId, DayRange, Location, LocationId, Meeting, User, UserId};

/// The `(viewer, company)` pair visibility is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    pub viewer: UserId,
    pub company: CompanyId,
}

impl TenantScope {
    pub fn new(viewer: UserId, company: CompanyId) -> Self {
        Self { viewer, company }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(*user.id(), *user.company_id())
    }

    /// Whether `meeting` falls inside this scope.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeDelta, Utc};
    /// use roombook::domain::*;
    ///
    /// let company = CompanyId::random();
    /// let member = |email: &str| UserRef {
    ///     id: UserId::random(),
    ///     email: EmailAddress::new(email).unwrap(),
    ///     company_id: company,
    /// };
    /// let (owner, guest) = (member("owner@acme.test"), member("guest@acme.test"));
    /// let start = Utc::now();
    /// let meeting = Meeting {
    ///     id: MeetingId::random(),
    ///     owner: owner.clone(),
    ///     details: MeetingDetails::new("Sync", "").unwrap(),
    ///     window: MeetingWindow::new(start, start + TimeDelta::hours(1)).unwrap(),
    ///     participants: vec![guest.clone()],
    ///     location: None,
    /// };
    /// assert!(TenantScope::new(guest.id, company).can_view_meeting(&meeting));
    /// assert!(!TenantScope::new(owner.id, company).can_view_meeting(&meeting));
    /// ```
    pub fn can_view_meeting(&self, meeting: &Meeting) -> bool {
        meeting.owner.company_id == self.company
            && (meeting.is_participant(&self.viewer) || meeting.is_location_manager(&self.viewer))
    }

    /// Whether `location` falls inside this scope.
    pub fn can_view_location(&self, location: &Location) -> bool {
        location.manager.company_id == self.company
    }
}

/// Case-insensitive search needle; never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText(String);

impl SearchText {
    /// `None` when `raw` is blank once trimmed.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring test ignoring case.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

/// Optional narrowing applied on top of the tenant scope; filters combine
/// with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingFilter {
    /// Meetings starting within this local day.
    pub day: Option<DayRange>,
    /// Meetings held in this room.
    pub location: Option<LocationId>,
    /// Meetings whose event name or agenda contains this text.
    pub text: Option<SearchText>,
}

impl MeetingFilter {
    pub fn matches(&self, meeting: &Meeting) -> bool {
        let day_ok = self
            .day
            .is_none_or(|range| range.contains(meeting.window.start()));
        let location_ok = self
            .location
            .is_none_or(|id| meeting.location.as_ref().is_some_and(|l| l.id == id));
        let text_ok = self.text.as_ref().is_none_or(|needle| {
            needle.matches(meeting.details.event_name())
                || needle.matches(meeting.details.meeting_agenda())
        });
        day_ok && location_ok && text_ok
    }
}
