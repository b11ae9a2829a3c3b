//! REST error mapping
//!
//! Catalog failures become `{"error": kind, "message": ..., "field": ...}` bodies with:
//! - ValidationError → 400
//! - NotFound → 404
//! - ReferentialError → 422
//! - InternalError → 500

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use streamcat_common::{CatalogError, ErrorKind};

/// API error type
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError(err)
    }
}

/// An undecodable JSON body is a validation failure of the body itself
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(CatalogError::validation("body", rejection.body_text()))
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Referential => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let body = Json(json!({
            "error": kind.as_str(),
            "message": self.0.to_string(),
            "field": self.0.field(),
        }));

        (status_for(kind), body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
