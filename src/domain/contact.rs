use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    Birthday, ContactEmail, ContactId, ContactNote, PersonName, PhoneNumber, UserId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub user_id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: ContactEmail,
    pub phone: PhoneNumber,
    pub birthday: Birthday,
    pub additional_info: Option<ContactNote>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewContact {
    pub user_id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: ContactEmail,
    pub phone: PhoneNumber,
    pub birthday: Birthday,
    pub additional_info: Option<ContactNote>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateContact {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub birthday: Option<Birthday>,
    pub additional_info: Option<ContactNote>,
}

impl UpdateContact {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.birthday.is_none()
            && self.additional_info.is_none()
    }
}

/// Next anniversary of `birthday` on or after `today`.
///
/// February 29 is celebrated on February 28 in non-leap years.
pub fn next_birthday(birthday: NaiveDate, today: NaiveDate) -> NaiveDate {
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
            .unwrap_or(today)
    };

    let this_year = in_year(today.year());
    if this_year < today {
        in_year(today.year() + 1)
    } else {
        this_year
    }
}

/// Keeps the contacts whose next birthday falls within `[today, today + days]`,
/// ordered by that date, then last name, then first name.
pub fn upcoming_birthdays(contacts: Vec<Contact>, today: NaiveDate, days: u32) -> Vec<Contact> {
    let upper = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<(NaiveDate, Contact)> = contacts
        .into_iter()
        .map(|contact| (next_birthday(contact.birthday.get(), today), contact))
        .filter(|(date, _)| *date <= upper)
        .collect();

    upcoming.sort_by(|(a_date, a), (b_date, b)| {
        a_date
            .cmp(b_date)
            .then_with(|| a.last_name.cmp(&b.last_name))
            .then_with(|| a.first_name.cmp(&b.first_name))
    });

    upcoming.into_iter().map(|(_, contact)| contact).collect()
}
