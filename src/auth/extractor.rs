//! Request extractors for bearer credentials and client metadata.

use std::future::{Ready, ready};

use actix_web::http::header::{self, HeaderValue};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use serde_json::json;

/// Raw access token taken from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_bearer(value: &HeaderValue) -> Option<String> {
    let value = value.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req.headers().get(header::AUTHORIZATION).and_then(parse_bearer);

        ready(match token {
            Some(token) => Ok(BearerToken(token)),
            None => {
                let response = HttpResponse::Unauthorized()
                    .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                    .json(json!({ "detail": "Not authenticated" }));
                Err(InternalError::from_response("missing bearer token", response).into())
            }
        })
    }
}

/// Peer address and user agent recorded alongside refresh tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self {
            ip_address: req.peer_addr().map(|addr| addr.ip().to_string()),
            user_agent: req
                .headers()
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn extracts_bearer_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        let token = BearerToken::extract(&req).await.unwrap();
        assert_eq!(token.as_str(), "abc.def.ghi");
    }

    #[actix_web::test]
    async fn rejects_other_schemes() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(BearerToken::extract(&req).await.is_err());

        let req = TestRequest::default().to_http_request();
        assert!(BearerToken::extract(&req).await.is_err());
    }

    #[test]
    fn client_info_reads_user_agent() {
        let req = TestRequest::default()
            .insert_header((header::USER_AGENT, "curl/8.0"))
            .peer_addr("10.0.0.7:5555".parse().unwrap())
            .to_http_request();
        let info = ClientInfo::from_request(&req);
        assert_eq!(info.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
    }
}
