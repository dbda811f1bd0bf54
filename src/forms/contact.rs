use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::{NewContact, UpdateContact};
use crate::domain::types::{
    Birthday, ContactEmail, ContactNote, PersonName, PhoneNumber, UserId,
};
use crate::forms::{FormError, invalid};

/// Treats blank notes as absent.
fn note(value: Option<String>) -> Result<Option<ContactNote>, FormError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(ContactNote::new)
        .transpose()
        .map_err(invalid("additional_info"))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
/// Body of `POST /api/contacts/`.
pub struct ContactForm {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 200))]
    pub email: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    pub birthday: NaiveDate,
    #[validate(length(max = 255))]
    pub additional_info: Option<String>,
}

/// Validated contents of a [`ContactForm`].
#[derive(Debug)]
pub struct ContactPayload {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: ContactEmail,
    pub phone: PhoneNumber,
    pub birthday: Birthday,
    pub additional_info: Option<ContactNote>,
}

impl ContactForm {
    pub fn into_payload(self, today: NaiveDate) -> Result<ContactPayload, FormError> {
        self.validate()?;

        Ok(ContactPayload {
            first_name: PersonName::new(self.first_name).map_err(invalid("first_name"))?,
            last_name: PersonName::new(self.last_name).map_err(invalid("last_name"))?,
            email: ContactEmail::new(self.email).map_err(invalid("email"))?,
            phone: PhoneNumber::new(self.phone).map_err(invalid("phone"))?,
            birthday: Birthday::new(self.birthday, today).map_err(invalid("birthday"))?,
            additional_info: note(self.additional_info)?,
        })
    }
}

impl ContactPayload {
    pub fn into_domain(self, user_id: UserId) -> NewContact {
        NewContact {
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            birthday: self.birthday,
            additional_info: self.additional_info,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
/// Body of `PUT /api/contacts/{id}`. Absent fields keep their stored values.
pub struct UpdateContactForm {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub additional_info: Option<String>,
}

impl UpdateContactForm {
    pub fn into_domain(self, today: NaiveDate) -> Result<UpdateContact, FormError> {
        self.validate()?;

        let updates = UpdateContact {
            first_name: self
                .first_name
                .map(PersonName::new)
                .transpose()
                .map_err(invalid("first_name"))?,
            last_name: self
                .last_name
                .map(PersonName::new)
                .transpose()
                .map_err(invalid("last_name"))?,
            email: self
                .email
                .map(ContactEmail::new)
                .transpose()
                .map_err(invalid("email"))?,
            phone: self
                .phone
                .map(PhoneNumber::new)
                .transpose()
                .map_err(invalid("phone"))?,
            birthday: self
                .birthday
                .map(|date| Birthday::new(date, today))
                .transpose()
                .map_err(invalid("birthday"))?,
            additional_info: note(self.additional_info)?,
        };

        if updates.is_empty() {
            return Err(FormError::NothingToUpdate);
        }

        Ok(updates)
    }
}
