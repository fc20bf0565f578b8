use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mealtally_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub status: u16,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "E_BAD_REQUEST",
            ApiError::Conflict(_) => "E_CONFLICT",
            ApiError::BadGateway(_) => "E_UPSTREAM",
            ApiError::InternalServerError(_) => "E_INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Invalid => ApiError::BadRequest("Invalid input".to_string()),
            CoreError::ProfileMismatch { .. } => ApiError::Conflict(error.to_string()),
            CoreError::ExternalServiceError(message) => {
                ApiError::BadGateway(format!("Food classification failed: {}", message))
            }
            CoreError::InvalidConfiguration(_) | CoreError::InternalServerError => {
                ApiError::InternalServerError(error.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest(format!("Validation failed: {}", errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        }

        let body = ApiErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_http_statuses() {
        assert_eq!(
            ApiError::from(CoreError::Invalid).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CoreError::ExternalServiceError("timeout".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(CoreError::ProfileMismatch {
                expected: "water-sugar".to_string(),
                actual: "fiber-sodium".to_string(),
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(CoreError::InternalServerError).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
