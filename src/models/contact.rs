use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::contact::{
    Contact as DomainContact, NewContact as DomainNewContact,
    UpdateContact as DomainUpdateContact,
};
use crate::domain::types::{
    Birthday, ContactEmail, ContactId, ContactNote, PersonName, PhoneNumber, TypeConstraintError,
    UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contacts)]
/// Diesel model for [`crate::domain::contact::Contact`].
pub struct Contact {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub additional_info: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contacts)]
/// Insertable form of [`Contact`].
pub struct NewContact<'a> {
    pub user_id: i32,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub birthday: NaiveDate,
    pub additional_info: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contacts)]
/// Data used when updating a [`Contact`] record. `None` columns are skipped.
pub struct UpdateContact<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub birthday: Option<NaiveDate>,
    pub additional_info: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Contact> for DomainContact {
    type Error = TypeConstraintError;

    fn try_from(contact: Contact) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContactId::try_from(contact.id)?,
            user_id: UserId::try_from(contact.user_id)?,
            first_name: PersonName::new(contact.first_name)?,
            last_name: PersonName::new(contact.last_name)?,
            email: ContactEmail::new(contact.email)?,
            phone: PhoneNumber::new(contact.phone)?,
            birthday: Birthday::from_stored(contact.birthday),
            additional_info: contact
                .additional_info
                .filter(|info| !info.trim().is_empty())
                .map(ContactNote::from_stored),
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewContact> for NewContact<'a> {
    fn from(contact: &'a DomainNewContact) -> Self {
        Self {
            user_id: contact.user_id.get(),
            first_name: contact.first_name.as_str(),
            last_name: contact.last_name.as_str(),
            email: contact.email.as_str(),
            phone: contact.phone.as_str(),
            birthday: contact.birthday.get(),
            additional_info: contact.additional_info.as_ref().map(|info| info.as_str()),
        }
    }
}

impl<'a> UpdateContact<'a> {
    pub fn from_domain(updates: &'a DomainUpdateContact, updated_at: NaiveDateTime) -> Self {
        Self {
            first_name: updates.first_name.as_ref().map(|v| v.as_str()),
            last_name: updates.last_name.as_ref().map(|v| v.as_str()),
            email: updates.email.as_ref().map(|v| v.as_str()),
            phone: updates.phone.as_ref().map(|v| v.as_str()),
            birthday: updates.birthday.map(Birthday::get),
            additional_info: updates.additional_info.as_ref().map(|v| v.as_str()),
            updated_at,
        }
    }
}
