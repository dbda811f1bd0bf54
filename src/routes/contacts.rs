use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::extractor::BearerToken;
use crate::auth::jwt::JwtService;
use crate::domain::contact::Contact;
use crate::dto::contact::{ContactResponse, NoUpcomingBirthdays};
use crate::forms::contact::{ContactForm, UpdateContactForm};
use crate::repository::DieselRepository;
use crate::routes::{authorize, detail, error_response};
use crate::services::{ServiceError, contacts as contacts_service};

#[derive(Deserialize)]
struct ListParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

#[derive(Deserialize)]
struct BirthdayParams {
    days: Option<u32>,
}

fn contact_error(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => detail(StatusCode::NOT_FOUND, "Contact not found"),
        other => error_response(other),
    }
}

fn contact_list(contacts: Vec<Contact>) -> HttpResponse {
    HttpResponse::Ok().json(
        contacts
            .into_iter()
            .map(ContactResponse::from)
            .collect::<Vec<_>>(),
    )
}

#[post("/")]
pub async fn create_contact(
    token: BearerToken,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
    web::Json(form): web::Json<ContactForm>,
) -> impl Responder {
    let user = match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let today = Utc::now().date_naive();
    match contacts_service::create_contact(repo.get_ref(), &user, form, today) {
        Ok(contact) => HttpResponse::Created().json(ContactResponse::from(contact)),
        Err(err) => contact_error(err),
    }
}

#[get("/")]
pub async fn list_contacts(
    token: BearerToken,
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
) -> impl Responder {
    let user = match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match contacts_service::list_contacts(repo.get_ref(), &user, params.limit, params.offset) {
        Ok(contacts) => contact_list(contacts),
        Err(err) => contact_error(err),
    }
}

#[get("/search/")]
pub async fn search_contacts(
    token: BearerToken,
    params: web::Query<SearchParams>,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
) -> impl Responder {
    let user = match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match contacts_service::search_contacts(repo.get_ref(), &user, &params.query) {
        Ok(contacts) => contact_list(contacts),
        Err(err) => contact_error(err),
    }
}

#[get("/upcoming_birthdays/")]
pub async fn upcoming_birthdays(
    token: BearerToken,
    params: web::Query<BirthdayParams>,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
) -> impl Responder {
    let user = match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let days = params
        .days
        .unwrap_or(contacts_service::DEFAULT_BIRTHDAY_DAYS);
    let today = Utc::now().date_naive();

    match contacts_service::upcoming_birthdays(repo.get_ref(), &user, Some(days), today) {
        Ok(contacts) if contacts.is_empty() => {
            HttpResponse::Ok().json(NoUpcomingBirthdays::new(days))
        }
        Ok(contacts) => contact_list(contacts),
        Err(err) => contact_error(err),
    }
}

#[get("/{contact_id}")]
pub async fn get_contact(
    contact_id: web::Path<i32>,
    token: BearerToken,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
) -> impl Responder {
    let user = match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match contacts_service::get_contact(repo.get_ref(), &user, contact_id.into_inner()) {
        Ok(contact) => HttpResponse::Ok().json(ContactResponse::from(contact)),
        Err(err) => contact_error(err),
    }
}

#[put("/{contact_id}")]
pub async fn update_contact(
    contact_id: web::Path<i32>,
    token: BearerToken,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
    web::Json(form): web::Json<UpdateContactForm>,
) -> impl Responder {
    let user = match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let today = Utc::now().date_naive();
    match contacts_service::update_contact(
        repo.get_ref(),
        &user,
        contact_id.into_inner(),
        form,
        today,
    ) {
        Ok(contact) => HttpResponse::Ok().json(ContactResponse::from(contact)),
        Err(err) => contact_error(err),
    }
}

#[delete("/{contact_id}")]
pub async fn delete_contact(
    contact_id: web::Path<i32>,
    token: BearerToken,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
) -> impl Responder {
    let user = match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match contacts_service::delete_contact(repo.get_ref(), &user, contact_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => contact_error(err),
    }
}
