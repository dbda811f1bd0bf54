use chrono::{Duration, NaiveDate, Utc};
use contacts_api::domain::contact::{NewContact, UpdateContact};
use contacts_api::domain::token::{NewRefreshToken, RevokedAccessToken};
use contacts_api::domain::types::{
    Birthday, ContactEmail, ContactNote, PersonName, PhoneNumber, UserEmail, UserId, Username,
};
use contacts_api::domain::user::{NewUser, User};
use contacts_api::repository::errors::RepositoryError;
use contacts_api::repository::{
    ContactConflictQuery, ContactListQuery, ContactReader, ContactWriter, DieselRepository,
    TokenReader, TokenWriter, UserReader, UserWriter,
};

mod common;

fn create_user(repo: &DieselRepository, name: &str) -> User {
    repo.create_user(&NewUser::new(
        Username::new(name).unwrap(),
        UserEmail::new(format!("{name}@example.com")).unwrap(),
        "$argon2id$placeholder".to_string(),
    ))
    .unwrap()
}

fn new_contact(user_id: UserId, first: &str, email: &str, phone: &str) -> NewContact {
    NewContact {
        user_id,
        first_name: PersonName::new(first).unwrap(),
        last_name: PersonName::new("Koval").unwrap(),
        email: ContactEmail::new(email).unwrap(),
        phone: PhoneNumber::new(phone).unwrap(),
        birthday: Birthday::from_stored(NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()),
        additional_info: None,
    }
}

#[test]
fn test_user_repository_lookups() {
    let test_db = common::TestDb::new("test_user_repository_lookups.db");
    let repo = DieselRepository::new(test_db.pool());

    let user = create_user(&repo, "oksana");

    assert_eq!(repo.get_user_by_id(user.id).unwrap().unwrap(), user);
    assert_eq!(
        repo.get_user_by_username("oksana").unwrap().unwrap().id,
        user.id
    );
    assert_eq!(
        repo.get_user_by_login("OKSANA@example.com")
            .unwrap()
            .unwrap()
            .id,
        user.id
    );
    assert!(repo.get_user_by_login("nobody").unwrap().is_none());

    let taken = repo
        .find_user_by_username_or_email(
            &Username::new("someone").unwrap(),
            &UserEmail::new("oksana@example.com").unwrap(),
        )
        .unwrap();
    assert!(taken.is_some());

    let duplicate = repo.create_user(&NewUser::new(
        Username::new("oksana").unwrap(),
        UserEmail::new("other@example.com").unwrap(),
        "hash".to_string(),
    ));
    assert!(matches!(
        duplicate,
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn test_contact_repository_crud() {
    let test_db = common::TestDb::new("test_contact_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "owner");

    let alice = repo
        .create_contact(&new_contact(
            owner.id,
            "Alice",
            "alice@example.com",
            "+380501112201",
        ))
        .unwrap();
    let bob = repo
        .create_contact(&new_contact(
            owner.id,
            "Bob",
            "bob@example.com",
            "+380501112202",
        ))
        .unwrap();

    let items = repo.list_contacts(ContactListQuery::new(owner.id)).unwrap();
    assert_eq!(
        items.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![alice.id, bob.id]
    );

    let page = repo
        .list_contacts(ContactListQuery::new(owner.id).paginate(1, 1))
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, bob.id);

    let updates = UpdateContact {
        first_name: Some(PersonName::new("Bobby").unwrap()),
        additional_info: Some(ContactNote::new("Met at the conference").unwrap()),
        ..UpdateContact::default()
    };
    let updated = repo
        .update_contact(bob.id, owner.id, &updates)
        .unwrap()
        .unwrap();
    assert_eq!(updated.first_name.as_str(), "Bobby");
    assert_eq!(updated.email, bob.email);
    assert_eq!(
        updated.additional_info.unwrap().as_str(),
        "Met at the conference"
    );
    assert!(updated.updated_at >= bob.updated_at);

    assert!(repo.delete_contact(alice.id, owner.id).unwrap());
    assert!(!repo.delete_contact(alice.id, owner.id).unwrap());
    assert!(repo.get_contact_by_id(alice.id, owner.id).unwrap().is_none());
}

#[test]
fn test_contacts_are_scoped_to_owner() {
    let test_db = common::TestDb::new("test_contacts_are_scoped_to_owner.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "owner");
    let stranger = create_user(&repo, "stranger");

    let contact = repo
        .create_contact(&new_contact(
            owner.id,
            "Alice",
            "alice@example.com",
            "+380501112201",
        ))
        .unwrap();

    assert!(
        repo.get_contact_by_id(contact.id, stranger.id)
            .unwrap()
            .is_none()
    );
    assert!(
        repo.list_contacts(ContactListQuery::new(stranger.id))
            .unwrap()
            .is_empty()
    );
    assert!(
        repo.update_contact(
            contact.id,
            stranger.id,
            &UpdateContact {
                first_name: Some(PersonName::new("Mallory").unwrap()),
                ..UpdateContact::default()
            },
        )
        .unwrap()
        .is_none()
    );
    assert!(!repo.delete_contact(contact.id, stranger.id).unwrap());

    // The same email may be used by contacts of different owners.
    assert!(
        repo.create_contact(&new_contact(
            stranger.id,
            "Alice",
            "alice@example.com",
            "+380501112201",
        ))
        .is_ok()
    );
}

#[test]
fn test_contact_conflicts_and_unique_indexes() {
    let test_db = common::TestDb::new("test_contact_conflicts_and_unique_indexes.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "owner");

    let alice = repo
        .create_contact(&new_contact(
            owner.id,
            "Alice",
            "alice@example.com",
            "+380501112201",
        ))
        .unwrap();

    let by_phone = repo
        .find_conflicting_contact(
            ContactConflictQuery::new(owner.id)
                .email(Some(ContactEmail::new("fresh@example.com").unwrap()))
                .phone(Some(PhoneNumber::new("+380501112201").unwrap())),
        )
        .unwrap();
    assert_eq!(by_phone.unwrap().id, alice.id);

    let excluded = repo
        .find_conflicting_contact(
            ContactConflictQuery::new(owner.id)
                .exclude(alice.id)
                .email(Some(alice.email.clone())),
        )
        .unwrap();
    assert!(excluded.is_none());

    let duplicate = repo.create_contact(&new_contact(
        owner.id,
        "Alicia",
        "alice@example.com",
        "+380501112299",
    ));
    assert!(matches!(
        duplicate,
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn test_contact_search_matches_names_and_email() {
    let test_db = common::TestDb::new("test_contact_search_matches_names_and_email.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "owner");

    repo.create_contact(&new_contact(
        owner.id,
        "Alice",
        "alice@example.com",
        "+380501112201",
    ))
    .unwrap();
    repo.create_contact(&new_contact(
        owner.id,
        "Bob",
        "bob@work.org",
        "+380501112202",
    ))
    .unwrap();

    let by_name = repo
        .list_contacts(ContactListQuery::new(owner.id).search("ALI"))
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].first_name.as_str(), "Alice");

    let by_email = repo
        .list_contacts(ContactListQuery::new(owner.id).search("work.org"))
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].first_name.as_str(), "Bob");

    let by_last_name = repo
        .list_contacts(ContactListQuery::new(owner.id).search("koval"))
        .unwrap();
    assert_eq!(by_last_name.len(), 2);
}

#[test]
fn test_token_repository_lifecycle() {
    let test_db = common::TestDb::new("test_token_repository_lifecycle.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "owner");
    let now = Utc::now().naive_utc();

    let stored = repo
        .create_refresh_token(&NewRefreshToken {
            user_id: owner.id,
            token_hash: "a".repeat(64),
            expired_at: now + Duration::days(7),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: Some("tests".to_string()),
        })
        .unwrap();
    assert!(stored.is_active(now));

    let loaded = repo
        .get_refresh_token_by_hash(&"a".repeat(64))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id, stored.id);
    assert_eq!(loaded.user_agent.as_deref(), Some("tests"));

    assert!(repo.revoke_refresh_token(&"a".repeat(64), now).unwrap());
    assert!(!repo.revoke_refresh_token(&"a".repeat(64), now).unwrap());
    let revoked = repo
        .get_refresh_token_by_hash(&"a".repeat(64))
        .unwrap()
        .unwrap();
    assert!(!revoked.is_active(now));

    let denied = RevokedAccessToken {
        jti: "jti-1".to_string(),
        expires_at: now + Duration::minutes(30),
    };
    repo.revoke_access_token(&denied).unwrap();
    repo.revoke_access_token(&denied).unwrap();
    assert!(repo.is_access_token_revoked("jti-1").unwrap());
    assert!(!repo.is_access_token_revoked("jti-2").unwrap());
}

#[test]
fn test_purge_expired_tokens() {
    let test_db = common::TestDb::new("test_purge_expired_tokens.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = create_user(&repo, "owner");
    let now = Utc::now().naive_utc();

    let token = |hash: &str, expired_at| NewRefreshToken {
        user_id: owner.id,
        token_hash: hash.to_string(),
        expired_at,
        ip_address: None,
        user_agent: None,
    };

    repo.create_refresh_token(&token("expired", now - Duration::hours(1)))
        .unwrap();
    repo.create_refresh_token(&token("revoked-long-ago", now + Duration::days(3)))
        .unwrap();
    repo.create_refresh_token(&token("revoked-recently", now + Duration::days(3)))
        .unwrap();
    repo.create_refresh_token(&token("active", now + Duration::days(3)))
        .unwrap();

    repo.revoke_refresh_token("revoked-long-ago", now - Duration::days(10))
        .unwrap();
    repo.revoke_refresh_token("revoked-recently", now - Duration::hours(1))
        .unwrap();

    repo.revoke_access_token(&RevokedAccessToken {
        jti: "stale".to_string(),
        expires_at: now - Duration::minutes(1),
    })
    .unwrap();
    repo.revoke_access_token(&RevokedAccessToken {
        jti: "fresh".to_string(),
        expires_at: now + Duration::minutes(10),
    })
    .unwrap();

    let purged = repo
        .purge_expired_tokens(now, now - Duration::days(7))
        .unwrap();
    assert_eq!(purged, 3);

    assert!(repo.get_refresh_token_by_hash("expired").unwrap().is_none());
    assert!(
        repo.get_refresh_token_by_hash("revoked-long-ago")
            .unwrap()
            .is_none()
    );
    assert!(
        repo.get_refresh_token_by_hash("revoked-recently")
            .unwrap()
            .is_some()
    );
    assert!(repo.get_refresh_token_by_hash("active").unwrap().is_some());
    assert!(!repo.is_access_token_revoked("stale").unwrap());
    assert!(repo.is_access_token_revoked("fresh").unwrap());
}
