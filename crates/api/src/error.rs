//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, FormOptions};
use queries::QueryError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client (unparseable parameter).
    BadRequest(String),
    /// Domain rule violation or store failure.
    Domain(DomainError),
    /// A receipt submission was refused; carries the selection lists needed
    /// to redisplay the submitted form.
    Rejected {
        error: DomainError,
        options: FormOptions,
    },
    /// Listing query failure.
    Query(QueryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, msg, None),
            ApiError::Domain(err) => {
                let status = domain_status(&err);
                json_error(status, err.to_string(), None)
            }
            ApiError::Rejected { error, options } => {
                let status = domain_status(&error);
                let options = serde_json::to_value(options).ok();
                json_error(status, error.to_string(), options)
            }
            ApiError::Query(err) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                None,
            ),
        }
    }
}

fn json_error(status: StatusCode, message: String, options: Option<serde_json::Value>) -> Response {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %message, "internal server error");
    }

    let body = match options {
        Some(options) => serde_json::json!({ "error": message, "options": options }),
        None => serde_json::json!({ "error": message }),
    };
    (status, axum::Json(body)).into_response()
}

/// Maps a domain error to its HTTP status.
pub fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation { .. } | DomainError::IncompleteLine { .. } => {
            StatusCode::BAD_REQUEST
        }
        DomainError::DuplicateName { .. }
        | DomainError::DuplicateNumber { .. }
        | DomainError::InUse { .. } => StatusCode::CONFLICT,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Query(err)
    }
}
