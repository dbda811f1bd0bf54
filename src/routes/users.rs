use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use serde_json::json;

use crate::auth::extractor::{BearerToken, ClientInfo};
use crate::auth::jwt::JwtService;
use crate::dto::user::UserResponse;
use crate::rate_limit::ClientRateLimiter;
use crate::repository::DieselRepository;
use crate::routes::authorize;

/// Profile of the authenticated user, throttled per client address.
#[get("/me")]
pub async fn me(
    req: HttpRequest,
    token: BearerToken,
    repo: web::Data<DieselRepository>,
    jwt: web::Data<JwtService>,
    limiter: web::Data<ClientRateLimiter>,
) -> impl Responder {
    let client = ClientInfo::from_request(&req)
        .ip_address
        .unwrap_or_else(|| "unknown".to_string());

    if let Err(err) = limiter.check(&client) {
        return HttpResponse::TooManyRequests().json(json!({ "error": err.to_string() }));
    }

    match authorize(repo.get_ref(), jwt.get_ref(), token.as_str()) {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(response) => response,
    }
}
