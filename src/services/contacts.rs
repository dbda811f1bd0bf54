//! Contact book operations, always scoped to the authenticated owner.

use chrono::NaiveDate;

use crate::domain::contact::{Contact, upcoming_birthdays as select_upcoming};
use crate::domain::types::ContactId;
use crate::domain::user::User;
use crate::forms::contact::{ContactForm, UpdateContactForm};
use crate::repository::errors::RepositoryError;
use crate::repository::{
    ContactConflictQuery, ContactListQuery, ContactReader, ContactWriter, SEARCH_RESULTS_LIMIT,
};
use crate::services::{ServiceError, ServiceResult};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 500;
pub const DEFAULT_BIRTHDAY_DAYS: u32 = 7;
pub const MAX_BIRTHDAY_DAYS: u32 = 30;
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Out-of-range path ids can never match a row.
fn parse_contact_id(raw: i32) -> ServiceResult<ContactId> {
    ContactId::new(raw).map_err(|_| ServiceError::NotFound)
}

/// Unique indexes still catch duplicates that slip past the explicit check.
fn conflict_on_constraint(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(_) => ServiceError::Conflict(
            "Another contact already uses this email or phone".to_string(),
        ),
        other => {
            log::error!("Contact repository failure: {other}");
            ServiceError::from(other)
        }
    }
}

/// Validates the form and stores a new contact for `user`.
pub fn create_contact<R>(
    repo: &R,
    user: &User,
    form: ContactForm,
    today: NaiveDate,
) -> ServiceResult<Contact>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    let new_contact = form.into_payload(today)?.into_domain(user.id);

    let conflict = repo.find_conflicting_contact(
        ContactConflictQuery::new(user.id)
            .email(Some(new_contact.email.clone()))
            .phone(Some(new_contact.phone.clone())),
    )?;
    if conflict.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Contact with email '{}' or phone '{}' already exists",
            new_contact.email, new_contact.phone
        )));
    }

    repo.create_contact(&new_contact)
        .map_err(conflict_on_constraint)
}

/// Returns a page of the owner's contacts ordered by id.
pub fn list_contacts<R>(
    repo: &R,
    user: &User,
    limit: Option<i64>,
    offset: Option<i64>,
) -> ServiceResult<Vec<Contact>>
where
    R: ContactReader + ?Sized,
{
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    let offset = offset.unwrap_or(0);

    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ServiceError::Form(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    if offset < 0 {
        return Err(ServiceError::Form("offset must not be negative".to_string()));
    }

    Ok(repo.list_contacts(ContactListQuery::new(user.id).paginate(limit, offset))?)
}

pub fn get_contact<R>(repo: &R, user: &User, contact_id: i32) -> ServiceResult<Contact>
where
    R: ContactReader + ?Sized,
{
    repo.get_contact_by_id(parse_contact_id(contact_id)?, user.id)?
        .ok_or(ServiceError::NotFound)
}

/// Applies a partial update, refusing email/phone values used by another contact.
pub fn update_contact<R>(
    repo: &R,
    user: &User,
    contact_id_raw: i32,
    form: UpdateContactForm,
    today: NaiveDate,
) -> ServiceResult<Contact>
where
    R: ContactReader + ContactWriter + ?Sized,
{
    let id = parse_contact_id(contact_id_raw)?;
    let updates = form.into_domain(today)?;

    if updates.email.is_some() || updates.phone.is_some() {
        let conflict = repo.find_conflicting_contact(
            ContactConflictQuery::new(user.id)
                .exclude(id)
                .email(updates.email.clone())
                .phone(updates.phone.clone()),
        )?;
        if conflict.is_some() {
            return Err(ServiceError::Conflict(
                "Another contact already uses this email or phone".to_string(),
            ));
        }
    }

    repo.update_contact(id, user.id, &updates)
        .map_err(conflict_on_constraint)?
        .ok_or(ServiceError::NotFound)
}

pub fn delete_contact<R>(repo: &R, user: &User, contact_id_raw: i32) -> ServiceResult<()>
where
    R: ContactWriter + ?Sized,
{
    if repo.delete_contact(parse_contact_id(contact_id_raw)?, user.id)? {
        Ok(())
    } else {
        Err(ServiceError::NotFound)
    }
}

/// Case-insensitive substring search over first name, last name and email.
pub fn search_contacts<R>(repo: &R, user: &User, query: &str) -> ServiceResult<Vec<Contact>>
where
    R: ContactReader + ?Sized,
{
    if query.is_empty() || query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ServiceError::Form(format!(
            "query must be between 1 and {MAX_SEARCH_LENGTH} characters"
        )));
    }

    Ok(repo.list_contacts(
        ContactListQuery::new(user.id)
            .search(query)
            .paginate(SEARCH_RESULTS_LIMIT, 0),
    )?)
}

/// Contacts whose birthday comes within the next `days` days, today included.
pub fn upcoming_birthdays<R>(
    repo: &R,
    user: &User,
    days: Option<u32>,
    today: NaiveDate,
) -> ServiceResult<Vec<Contact>>
where
    R: ContactReader + ?Sized,
{
    let days = days.unwrap_or(DEFAULT_BIRTHDAY_DAYS);
    if !(1..=MAX_BIRTHDAY_DAYS).contains(&days) {
        return Err(ServiceError::Form(format!(
            "days must be between 1 and {MAX_BIRTHDAY_DAYS}"
        )));
    }

    let contacts = repo.list_contacts(ContactListQuery::new(user.id))?;

    Ok(select_upcoming(contacts, today, days))
}
