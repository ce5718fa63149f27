use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::{
    cache::CacheError, config::ConfigError, images::ImageError, places::error::PlacesError,
    stations::error::StationsError,
};

#[derive(thiserror::Error, Debug)]
pub enum GatsuError {
    #[error("Places error: {0}")]
    Places(#[from] PlacesError),

    #[error("Stations error: {0}")]
    Stations(#[from] StationsError),

    #[error("Image error: {0}")]
    Images(#[from] ImageError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<GatsuError> for std::io::Error {
    fn from(e: GatsuError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, e)
    }
}

impl ResponseError for GatsuError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            GatsuError::BadRequest(message) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": message }))
            }
            GatsuError::Places(PlacesError::Quota(_)) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": "API Limit Reached" }))
            }
            GatsuError::Stations(StationsError::NotFound(message)) => {
                HttpResponse::build(self.status_code()).json(json!({ "error": message }))
            }
            other => {
                log::error!("{}", other);
                HttpResponse::build(self.status_code()).json(json!({ "error": "Internal Server Error" }))
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatsuError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatsuError::Places(PlacesError::Quota(status)) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::TOO_MANY_REQUESTS)
            }
            GatsuError::Stations(StationsError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type GatsuResult<T> = Result<T, GatsuError>;
