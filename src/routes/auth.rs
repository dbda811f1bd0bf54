use actix_web::{HttpRequest, HttpResponse, Responder, post, web};
use chrono::Utc;

use crate::auth::extractor::{BearerToken, ClientInfo};
use crate::auth::jwt::JwtService;
use crate::dto::user::UserResponse;
use crate::forms::auth::{LoginForm, RefreshTokenForm, RegisterForm};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::auth as auth_service;

#[post("/register")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterForm>,
) -> impl Responder {
    match auth_service::register(repo.get_ref(), form) {
        Ok(user) => HttpResponse::Created().json(UserResponse::from(user)),
        Err(err) => error_response(err),
    }
}

/// OAuth2 password grant posted as `application/x-www-form-urlencoded`.
#[post("/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let client = ClientInfo::from_request(&req);

    match auth_service::login(repo.get_ref(), jwt.get_ref(), form, &client, Utc::now()) {
        Ok(tokens) => HttpResponse::Created().json(tokens),
        Err(err) => error_response(err),
    }
}

#[post("/refresh")]
pub async fn refresh(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
    web::Json(form): web::Json<RefreshTokenForm>,
) -> impl Responder {
    let client = ClientInfo::from_request(&req);

    match auth_service::refresh(repo.get_ref(), jwt.get_ref(), form, &client, Utc::now()) {
        Ok(tokens) => HttpResponse::Created().json(tokens),
        Err(err) => error_response(err),
    }
}

#[post("/logout")]
pub async fn logout(
    token: BearerToken,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
    web::Json(form): web::Json<RefreshTokenForm>,
) -> impl Responder {
    match auth_service::logout(
        repo.get_ref(),
        jwt.get_ref(),
        token.as_str(),
        form,
        Utc::now(),
    ) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
