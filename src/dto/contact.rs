use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::contact::Contact;

/// Contact as exposed to its owner.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub additional_info: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.get(),
            first_name: contact.first_name.into_inner(),
            last_name: contact.last_name.into_inner(),
            email: contact.email.into_inner(),
            phone: contact.phone.into_inner(),
            birthday: contact.birthday.get(),
            additional_info: contact.additional_info.map(|info| info.into_inner()),
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// Returned by the birthdays endpoint when nobody celebrates soon.
#[derive(Debug, Serialize, PartialEq)]
pub struct NoUpcomingBirthdays {
    pub message: String,
    pub contacts: Vec<ContactResponse>,
}

impl NoUpcomingBirthdays {
    pub fn new(days: u32) -> Self {
        Self {
            message: format!("No contacts with birthdays in the next {days} days"),
            contacts: Vec::new(),
        }
    }
}
