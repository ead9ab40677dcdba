//! Process-local store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. Visibility goes through the domain predicates directly, so this
//! adapter doubles as the executable reference for the SQL in
//! `outbound::persistence`.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    LocationPersistenceError, LocationRepository, MeetingPersistenceError, MeetingRepository,
    StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CompanyId, EmailAddress, Location, LocationId, LocationRecord, Meeting, MeetingFilter,
    MeetingId, MeetingRecord, PasswordHash, TenantScope, User, UserId, UserRef,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, (User, PasswordHash)>,
    locations: HashMap<LocationId, LocationRecord>,
    meetings: HashMap<MeetingId, MeetingRecord>,
}

/// Lookup failures while assembling entities from stored records.
#[derive(Debug)]
enum Dangling {
    User(UserId),
    Location(LocationId),
}

impl std::fmt::Display for Dangling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user {id} does not exist"),
            Self::Location(id) => write!(f, "room {id} does not exist"),
        }
    }
}

impl State {
    fn user_ref(&self, id: &UserId) -> Result<UserRef, Dangling> {
        self.users
            .get(id)
            .map(|(user, _)| user.to_ref())
            .ok_or(Dangling::User(*id))
    }

    fn location(&self, record: &LocationRecord) -> Result<Location, Dangling> {
        Ok(Location {
            id: record.id,
            manager: self.user_ref(&record.manager_id)?,
            details: record.details.clone(),
        })
    }

    fn location_by_id(&self, id: &LocationId) -> Result<Location, Dangling> {
        let record = self.locations.get(id).ok_or(Dangling::Location(*id))?;
        self.location(record)
    }

    fn meeting(&self, record: &MeetingRecord) -> Result<Meeting, Dangling> {
        let mut participants = record
            .participant_ids
            .iter()
            .map(|id| self.user_ref(id))
            .collect::<Result<Vec<_>, _>>()?;
        participants.sort_by(|a, b| a.email.as_ref().cmp(b.email.as_ref()));
        Ok(Meeting {
            id: record.id,
            owner: self.user_ref(&record.owner_id)?,
            details: record.details.clone(),
            window: record.window,
            participants,
            location: record
                .location_id
                .map(|id| self.location_by_id(&id))
                .transpose()?,
        })
    }
}

/// `RwLock`-guarded maps of users, rooms and meetings.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, String> {
        self.state
            .read()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, String> {
        self.state
            .write()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.read().map_err(UserPersistenceError::connection)?;
        Ok(state.users.get(id).map(|(user, _)| user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.read().map_err(UserPersistenceError::connection)?;
        Ok(state
            .users
            .values()
            .find(|(user, _)| user.username().as_ref() == username)
            .map(|(user, hash)| StoredCredentials {
                user_id: *user.id(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_company_members(
        &self,
        company: &CompanyId,
        emails: &[EmailAddress],
    ) -> Result<Vec<UserRef>, UserPersistenceError> {
        let state = self.read().map_err(UserPersistenceError::connection)?;
        let mut members: Vec<UserRef> = state
            .users
            .values()
            .map(|(user, _)| user)
            .filter(|user| user.company_id() == company && emails.contains(user.email()))
            .map(User::to_ref)
            .collect();
        members.sort_by(|a, b| a.email.as_ref().cmp(b.email.as_ref()));
        Ok(members)
    }

    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.write().map_err(UserPersistenceError::connection)?;
        let taken = state
            .users
            .values()
            .any(|(existing, _)| existing.username() == user.username());
        if taken || state.users.contains_key(user.id()) {
            return Err(UserPersistenceError::duplicate("username"));
        }
        state
            .users
            .insert(*user.id(), (user.clone(), password_hash.clone()));
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn list_visible(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<Location>, LocationPersistenceError> {
        let state = self.read().map_err(LocationPersistenceError::connection)?;
        let mut visible = Vec::new();
        for record in state.locations.values() {
            let location = state
                .location(record)
                .map_err(|err| LocationPersistenceError::query(err.to_string()))?;
            if scope.can_view_location(&location) {
                visible.push(location);
            }
        }
        visible.sort_by(|a, b| a.name().cmp(b.name()).then(a.id.cmp(&b.id)));
        Ok(visible)
    }

    async fn find_visible(
        &self,
        scope: &TenantScope,
        id: &LocationId,
    ) -> Result<Option<Location>, LocationPersistenceError> {
        let state = self.read().map_err(LocationPersistenceError::connection)?;
        let Some(record) = state.locations.get(id) else {
            return Ok(None);
        };
        let location = state
            .location(record)
            .map_err(|err| LocationPersistenceError::query(err.to_string()))?;
        Ok(scope.can_view_location(&location).then_some(location))
    }

    async fn save(&self, record: &LocationRecord) -> Result<Location, LocationPersistenceError> {
        let mut state = self.write().map_err(LocationPersistenceError::connection)?;
        let location = state
            .location(record)
            .map_err(|err| LocationPersistenceError::missing_reference(err.to_string()))?;
        state.locations.insert(record.id, record.clone());
        Ok(location)
    }

    async fn delete(&self, id: &LocationId) -> Result<bool, LocationPersistenceError> {
        let mut state = self.write().map_err(LocationPersistenceError::connection)?;
        if state.locations.remove(id).is_none() {
            return Ok(false);
        }
        for meeting in state.meetings.values_mut() {
            if meeting.location_id.as_ref() == Some(id) {
                meeting.location_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl MeetingRepository for InMemoryStore {
    async fn list_visible(
        &self,
        scope: &TenantScope,
        filter: &MeetingFilter,
    ) -> Result<Vec<Meeting>, MeetingPersistenceError> {
        let state = self.read().map_err(MeetingPersistenceError::connection)?;
        let mut visible = Vec::new();
        for record in state.meetings.values() {
            let meeting = state
                .meeting(record)
                .map_err(|err| MeetingPersistenceError::query(err.to_string()))?;
            if scope.can_view_meeting(&meeting) && filter.matches(&meeting) {
                visible.push(meeting);
            }
        }
        visible.sort_by(|a, b| {
            a.window
                .start()
                .cmp(&b.window.start())
                .then(a.id.cmp(&b.id))
        });
        Ok(visible)
    }

    async fn find_visible(
        &self,
        scope: &TenantScope,
        id: &MeetingId,
    ) -> Result<Option<Meeting>, MeetingPersistenceError> {
        let state = self.read().map_err(MeetingPersistenceError::connection)?;
        let Some(record) = state.meetings.get(id) else {
            return Ok(None);
        };
        let meeting = state
            .meeting(record)
            .map_err(|err| MeetingPersistenceError::query(err.to_string()))?;
        Ok(scope.can_view_meeting(&meeting).then_some(meeting))
    }

    async fn save(&self, record: &MeetingRecord) -> Result<Meeting, MeetingPersistenceError> {
        let mut state = self.write().map_err(MeetingPersistenceError::connection)?;
        let mut stored = record.clone();
        // The owner is fixed by the first save.
        if let Some(existing) = state.meetings.get(&record.id) {
            stored.owner_id = existing.owner_id;
        }
        let meeting = state
            .meeting(&stored)
            .map_err(|err| MeetingPersistenceError::missing_reference(err.to_string()))?;
        state.meetings.insert(stored.id, stored);
        Ok(meeting)
    }

    async fn delete(&self, id: &MeetingId) -> Result<bool, MeetingPersistenceError> {
        let mut state = self.write().map_err(MeetingPersistenceError::connection)?;
        Ok(state.meetings.remove(id).is_some())
    }
}

#[cfg(test)]
#[path = "in_memory_store_tests.rs"]
mod tests;
