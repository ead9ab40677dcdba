//! Helpers shared by the meeting, room and user services: port error
//! mapping and tenant-scoped reference resolution.

use serde_json::json;

use crate::domain::ports::{
    LocationPersistenceError, MeetingPersistenceError, UserPersistenceError, UserRepository,
};
use crate::domain::{CompanyId, EmailAddress, Error, UserRef};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("a user with this {field} already exists"))
                .with_details(json!({ "field": field, "code": "duplicate" }))
        }
    }
}

pub(crate) fn map_location_error(error: LocationPersistenceError) -> Error {
    match error {
        LocationPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("room repository unavailable: {message}"))
        }
        LocationPersistenceError::Query { message } => {
            Error::internal(format!("room repository error: {message}"))
        }
        LocationPersistenceError::MissingReference { message } => {
            Error::conflict(format!("room references a missing record: {message}"))
        }
    }
}

pub(crate) fn map_meeting_error(error: MeetingPersistenceError) -> Error {
    match error {
        MeetingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("meeting repository unavailable: {message}"))
        }
        MeetingPersistenceError::Query { message } => {
            Error::internal(format!("meeting repository error: {message}"))
        }
        MeetingPersistenceError::MissingReference { message } => {
            Error::conflict(format!("meeting references a missing record: {message}"))
        }
    }
}

/// Validation failure on a single payload field.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

/// Resolve e-mail addresses to members of `company`.
///
/// Duplicates collapse to their first occurrence and input order is kept.
/// Any address without a matching colleague fails the whole call with the
/// unresolved addresses listed in the error details under `field`.
pub(crate) async fn resolve_members<U>(
    users: &U,
    company: &CompanyId,
    emails: &[EmailAddress],
    field: &str,
) -> Result<Vec<UserRef>, Error>
where
    U: UserRepository + ?Sized,
{
    let mut wanted: Vec<EmailAddress> = Vec::with_capacity(emails.len());
    for email in emails {
        if !wanted.contains(email) {
            wanted.push(email.clone());
        }
    }
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let found = users
        .find_company_members(company, &wanted)
        .await
        .map_err(map_user_error)?;

    let mut resolved = Vec::with_capacity(wanted.len());
    let mut missing = Vec::new();
    for email in wanted {
        match found.iter().find(|member| member.email == email) {
            Some(member) => resolved.push(member.clone()),
            None => missing.push(email),
        }
    }
    if !missing.is_empty() {
        return Err(Error::invalid_request("unknown users referenced").with_details(json!({
            "field": field,
            "code": "unknown_user",
            "value": missing,
        })));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, UserId};
    use rstest::rstest;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw).expect("fixture email")
    }

    fn member(company: CompanyId, raw: &str) -> UserRef {
        UserRef {
            id: UserId::random(),
            email: email(raw),
            company_id: company,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_in_input_order_without_duplicates() {
        let company = CompanyId::random();
        let (a, b) = (member(company, "a@acme.test"), member(company, "b@acme.test"));
        let found = vec![a.clone(), b.clone()];
        let mut users = MockUserRepository::new();
        users
            .expect_find_company_members()
            .withf(|_, emails| emails.len() == 2)
            .times(1)
            .return_once(move |_, _| Ok(found));

        let input = [email("b@acme.test"), email("a@acme.test"), email("b@acme.test")];
        let resolved = resolve_members(&users, &company, &input, "participantList")
            .await
            .expect("resolved");
        assert_eq!(resolved, vec![b, a]);
    }

    #[rstest]
    #[tokio::test]
    async fn reports_unknown_addresses() {
        let company = CompanyId::random();
        let known = member(company, "a@acme.test");
        let mut users = MockUserRepository::new();
        users
            .expect_find_company_members()
            .return_once(move |_, _| Ok(vec![known]));

        let input = [email("a@acme.test"), email("ghost@acme.test")];
        let err = resolve_members(&users, &company, &input, "participantList")
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "participantList");
        assert_eq!(details["value"], json!(["ghost@acme.test"]));
    }

    #[rstest]
    #[tokio::test]
    async fn skips_the_lookup_for_empty_input() {
        let users = MockUserRepository::new();
        let resolved = resolve_members(&users, &CompanyId::random(), &[], "participantList")
            .await
            .expect("empty");
        assert!(resolved.is_empty());
    }

    #[rstest]
    #[case(UserPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(UserPersistenceError::query("bad sql"), ErrorCode::InternalError)]
    #[case(UserPersistenceError::duplicate("username"), ErrorCode::Conflict)]
    fn maps_user_errors(#[case] error: UserPersistenceError, #[case] expected: ErrorCode) {
        assert_eq!(map_user_error(error).code(), expected);
    }

    #[rstest]
    #[case(MeetingPersistenceError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(MeetingPersistenceError::query("bad sql"), ErrorCode::InternalError)]
    #[case(MeetingPersistenceError::missing_reference("room"), ErrorCode::Conflict)]
    fn maps_meeting_errors(#[case] error: MeetingPersistenceError, #[case] expected: ErrorCode) {
        assert_eq!(map_meeting_error(error).code(), expected);
    }
}
