use diesel::prelude::*;

use crate::domain::contact::{Contact, NewContact, UpdateContact};
use crate::domain::types::{ContactId, UserId};
use crate::models::contact::{
    Contact as DbContact, NewContact as DbNewContact, UpdateContact as DbUpdateContact,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ContactConflictQuery, ContactListQuery, ContactReader, ContactWriter, DieselRepository,
};
use crate::schema::contacts;

impl ContactReader for DieselRepository {
    fn get_contact_by_id(
        &self,
        id: ContactId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Contact>> {
        let mut conn = self.conn()?;
        let contact = contacts::table
            .filter(contacts::id.eq(id.get()))
            .filter(contacts::user_id.eq(user_id.get()))
            .first::<DbContact>(&mut conn)
            .optional()?;

        Ok(contact.map(Contact::try_from).transpose()?)
    }

    fn list_contacts(&self, query: ContactListQuery) -> RepositoryResult<Vec<Contact>> {
        let mut conn = self.conn()?;

        let mut items = contacts::table
            .filter(contacts::user_id.eq(query.user_id.get()))
            .into_boxed();

        if let Some(term) = &query.search {
            let pattern = format!("%{term}%");
            items = items.filter(
                contacts::first_name
                    .like(pattern.clone())
                    .or(contacts::last_name.like(pattern.clone()))
                    .or(contacts::email.like(pattern)),
            );
        }

        if let Some(pagination) = query.pagination {
            items = items.limit(pagination.limit).offset(pagination.offset);
        }

        let contacts = items
            .order(contacts::id.asc())
            .load::<DbContact>(&mut conn)?
            .into_iter()
            .map(Contact::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(contacts)
    }

    fn find_conflicting_contact(
        &self,
        query: ContactConflictQuery,
    ) -> RepositoryResult<Option<Contact>> {
        let mut conn = self.conn()?;

        let mut items = contacts::table
            .filter(contacts::user_id.eq(query.user_id.get()))
            .into_boxed();

        if let Some(exclude_id) = query.exclude_id {
            items = items.filter(contacts::id.ne(exclude_id.get()));
        }

        items = match (&query.email, &query.phone) {
            (Some(email), Some(phone)) => items.filter(
                contacts::email
                    .eq(email.as_str())
                    .or(contacts::phone.eq(phone.as_str())),
            ),
            (Some(email), None) => items.filter(contacts::email.eq(email.as_str())),
            (None, Some(phone)) => items.filter(contacts::phone.eq(phone.as_str())),
            (None, None) => return Ok(None),
        };

        let contact = items
            .order(contacts::id.asc())
            .first::<DbContact>(&mut conn)
            .optional()?;

        Ok(contact.map(Contact::try_from).transpose()?)
    }
}

impl ContactWriter for DieselRepository {
    fn create_contact(&self, new_contact: &NewContact) -> RepositoryResult<Contact> {
        let mut conn = self.conn()?;
        let insertable: DbNewContact = new_contact.into();

        let created = diesel::insert_into(contacts::table)
            .values(&insertable)
            .get_result::<DbContact>(&mut conn)?;

        Ok(Contact::try_from(created)?)
    }

    fn update_contact(
        &self,
        id: ContactId,
        user_id: UserId,
        updates: &UpdateContact,
    ) -> RepositoryResult<Option<Contact>> {
        let mut conn = self.conn()?;
        let changes = DbUpdateContact::from_domain(updates, chrono::Utc::now().naive_utc());

        let updated = diesel::update(
            contacts::table
                .filter(contacts::id.eq(id.get()))
                .filter(contacts::user_id.eq(user_id.get())),
        )
        .set(&changes)
        .get_result::<DbContact>(&mut conn)
        .optional()?;

        Ok(updated.map(Contact::try_from).transpose()?)
    }

    fn delete_contact(&self, id: ContactId, user_id: UserId) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(
            contacts::table
                .filter(contacts::id.eq(id.get()))
                .filter(contacts::user_id.eq(user_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected > 0)
    }
}
