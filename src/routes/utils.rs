use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::MessageResponse;
use crate::repository::DieselRepository;
use crate::routes::detail;

pub const APP_BANNER: &str = "Contacts Application v1.1";

#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new(APP_BANNER))
}

/// Confirms the database answers a trivial query.
#[get("/healthchecker")]
pub async fn healthchecker(repo: web::Data<DieselRepository>) -> impl Responder {
    match repo.ping() {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Database connection is healthy")),
        Err(err) => {
            log::error!("Health check failed: {err}");
            detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error connecting to the database",
            )
        }
    }
}
