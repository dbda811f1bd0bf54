//! HTTP handlers and the JSON error envelope shared by them.

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::auth::jwt::JwtService;
use crate::domain::user::User;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, auth as auth_service};

pub mod auth;
pub mod contacts;
pub mod users;
pub mod utils;

/// `{"detail": ...}` response with the given status.
pub fn detail(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "detail": message.into() }))
}

fn unauthorized(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
        .json(json!({ "detail": message }))
}

/// Maps a service failure onto the API's status codes.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => unauthorized("Could not validate credentials"),
        ServiceError::InvalidCredentials => unauthorized("Incorrect username or password"),
        ServiceError::NotFound => detail(StatusCode::NOT_FOUND, "Not found"),
        ServiceError::Conflict(message) => detail(StatusCode::CONFLICT, message),
        ServiceError::Form(message) => detail(StatusCode::UNPROCESSABLE_ENTITY, message),
        err @ (ServiceError::Internal(_) | ServiceError::Repository(_)) => {
            log::error!("Request failed: {err}");
            detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Resolves the bearer token to a user or produces the 401 response.
pub fn authorize(
    repo: &DieselRepository,
    jwt: &JwtService,
    token: &str,
) -> Result<User, HttpResponse> {
    auth_service::current_user(repo, jwt, token).map_err(error_response)
}

fn unprocessable<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = detail(StatusCode::UNPROCESSABLE_ENTITY, err.to_string());
    InternalError::from_response(err, response).into()
}

/// Registers every route together with the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(unprocessable))
        .app_data(web::QueryConfig::default().error_handler(unprocessable))
        .app_data(web::FormConfig::default().error_handler(unprocessable))
        .app_data(web::PathConfig::default().error_handler(unprocessable))
        .service(utils::root)
        .service(
            web::scope("/api")
                .service(utils::healthchecker)
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(auth::refresh)
                        .service(auth::logout),
                )
                .service(web::scope("/users").service(users::me))
                .service(
                    web::scope("/contacts")
                        .service(contacts::search_contacts)
                        .service(contacts::upcoming_birthdays)
                        .service(contacts::create_contact)
                        .service(contacts::list_contacts)
                        .service(contacts::get_contact)
                        .service(contacts::update_contact)
                        .service(contacts::delete_contact),
                ),
        );
}
