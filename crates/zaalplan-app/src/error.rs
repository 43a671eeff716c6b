use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::Response;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use zaalplan_core::error::CoreError;
use zaalplan_service::error::{ConflictDetails, ServiceError};
use zaalplan_service::store::StoreError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => match err {
                ServiceError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::InvariantViolation(_) => StatusCode::BAD_REQUEST,
                ServiceError::PersistenceError(StoreError::Unavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ServiceError::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CoreError(err) => match err {
                CoreError::ValidationError(_) | CoreError::InvalidInput(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CoreError::ConfigError(_) | CoreError::InvariantViolation(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable error class, stable across messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ServiceError(err) => err.kind(),
            Self::CoreError(err) => match err {
                CoreError::ValidationError(_) | CoreError::InvalidInput(_) => "validation",
                CoreError::ConfigError(_) | CoreError::InvariantViolation(_) => "internal",
            },
            Self::BadRequest(_) => "bad_request",
        }
    }
}

/// ## Summary
/// Error response payload
///
/// `conflict` names the booking in the way so clients can tell a clash from
/// a validation failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ConflictDetails>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let conflict = match err {
            AppError::ServiceError(ServiceError::Conflict(details)) => Some((**details).clone()),
            _ => None,
        };
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
            conflict,
        }
    }
}

/// ## Summary
/// Writes `err` as a JSON error response.
pub fn render_error(res: &mut Response, err: &AppError) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    } else {
        tracing::debug!(error = %err, status = %status, "Request rejected");
    }
    res.status_code(status);
    res.render(Json(ErrorResponse::from(err)));
}

/// ## Summary
/// Writes `result` as JSON with `status`, or the error response.
pub fn render_result<T>(res: &mut Response, status: StatusCode, result: AppResult<T>)
where
    T: Serialize + Send,
{
    match result {
        Ok(body) => {
            res.status_code(status);
            res.render(Json(body));
        }
        Err(err) => render_error(res, &err),
    }
}
