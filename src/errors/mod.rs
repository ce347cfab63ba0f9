use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;

use crate::db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad Request: {}", .0.join("; "))]
    BadRequest(Vec<String>),
    #[error("Unprocessable Entity: {0:?}")]
    UnprocessableEntity(BTreeMap<String, Vec<String>>),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("Employee {} not found", id)),
            StoreError::Conflict(id) => AppError::Conflict(format!("Employee {} already exists", id)),
            StoreError::Unavailable(msg) => AppError::ServiceUnavailable(msg),
            StoreError::Invalid(msg) => AppError::BadRequest(vec![msg]),
            StoreError::Backend(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            AppError::BadRequest(messages) => response.json(json!({ "errors": messages })),
            AppError::UnprocessableEntity(fields) => response.json(json!({ "errors": fields })),
            AppError::NotFound(msg) | AppError::Conflict(msg) => {
                response.json(ErrorResponse { error: msg.clone() })
            }
            // store internals stay in the log, not the body
            AppError::ServiceUnavailable(_) => response.json(ErrorResponse {
                error: "Employee store unavailable".to_string(),
            }),
            AppError::InternalServerError(_) => response.json(ErrorResponse {
                error: "Internal server error".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_distinct_statuses() {
        let cases = [
            (StoreError::NotFound("e-1".into()), StatusCode::NOT_FOUND),
            (StoreError::Conflict("e-1".into()), StatusCode::CONFLICT),
            (StoreError::Unavailable("pool timed out".into()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Invalid("bad filter".into()), StatusCode::BAD_REQUEST),
            (StoreError::Backend("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (store_err, status) in cases {
            assert_eq!(AppError::from(store_err).status_code(), status);
        }
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = AppError::from(StoreError::NotFound("e-42".into()));
        assert_eq!(err.to_string(), "Not Found: Employee e-42 not found");
    }
}
