use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::crypto::CryptoError;
use crate::types::{InvalidParam, ProblemDetails};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Missing mandatory field: {0}")]
    MissingMandatoryField(String),
    #[error("Subscriber not found: {0}")]
    SubscriberNotFound(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Not implemented: {0}")]
    NotImplemented(String),
    #[error("Missing authentication credentials: {0}")]
    MissingCredentials(String),
    #[error("Update failed: {0}")]
    UpdateFailed(String),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        match err {
            // A bad AUTS comes from the caller, not from provisioning.
            CryptoError::MacMismatch => {
                AppError::InvalidParameter("AUTS verification failed".to_string())
            }
            // Malformed stored key material is a data-integrity condition.
            CryptoError::InvalidLength { .. } | CryptoError::MalformedHex { .. } => {
                AppError::MissingCredentials(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, title, cause, detail) = match self {
            AppError::InvalidParameter(ref msg) => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                "INVALID_PARAMETER",
                msg.clone(),
            ),
            AppError::MissingMandatoryField(ref field) => {
                let problem = ProblemDetails::new(
                    StatusCode::BAD_REQUEST.as_u16(),
                    "Bad Request",
                    &format!("Missing mandatory field: {}", field),
                )
                .with_cause("MANDATORY_IE_MISSING")
                .with_invalid_params(vec![InvalidParam {
                    param: field.clone(),
                    reason: Some("mandatory field absent".to_string()),
                }]);
                return (StatusCode::BAD_REQUEST, Json(problem)).into_response();
            }
            AppError::SubscriberNotFound(ref msg) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "USER_NOT_FOUND",
                msg.clone(),
            ),
            AppError::NotFound(ref msg) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "DATA_NOT_FOUND",
                msg.clone(),
            ),
            AppError::NotImplemented(ref msg) => (
                StatusCode::NOT_IMPLEMENTED,
                "Not Implemented",
                "UNSUPPORTED_DECONCEALMENT",
                msg.clone(),
            ),
            AppError::MissingCredentials(ref msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "AUTHENTICATION_DATA_MISSING",
                msg.clone(),
            ),
            AppError::UpdateFailed(ref msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "UPDATE_FAILED",
                msg.clone(),
            ),
            AppError::InternalError(ref msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "SYSTEM_FAILURE",
                msg.clone(),
            ),
        };

        let problem = ProblemDetails::new(status.as_u16(), title, &detail).with_cause(cause);

        (status, Json(problem)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_mac_mismatch_maps_to_client_error() {
        let err: AppError = CryptoError::MacMismatch.into();
        assert!(matches!(err, AppError::InvalidParameter(_)));
    }

    #[test]
    fn crypto_length_error_maps_to_missing_credentials() {
        let err: AppError = CryptoError::InvalidLength {
            field: "K",
            expected: 16,
            actual: 3,
        }
        .into();
        assert!(matches!(err, AppError::MissingCredentials(_)));
    }
}
