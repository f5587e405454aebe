/// Request extractors for chirp-service
///
/// Callers identify themselves with a static api key sent in the `api-key`
/// header. The extractor only reads the header; resolving it to a user is
/// part of each service operation.
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::{codes, AppError};

/// Header carrying the caller's api key
pub const API_KEY_HEADER: &str = "api-key";

/// Raw api key taken from the request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(pub String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_headers(req: &HttpRequest) -> Result<Self, AppError> {
        let value = req
            .headers()
            .get(API_KEY_HEADER)
            .ok_or_else(|| {
                AppError::invalid_input(codes::BAD_REQUEST, "Missing api-key header")
            })?;

        let key = value
            .to_str()
            .map_err(|_| AppError::invalid_input(codes::BAD_REQUEST, "Malformed api-key header"))?
            .trim();

        if key.is_empty() {
            return Err(AppError::invalid_input(
                codes::BAD_REQUEST,
                "Missing api-key header",
            ));
        }

        Ok(ApiKey(key.to_string()))
    }
}

impl FromRequest for ApiKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
