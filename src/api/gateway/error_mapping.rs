//! Error mapping helpers for the HTTP gateway.

use http::StatusCode;

use crate::api::error::ApiError;

/// Checks if a status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> ApiError {
    if error.is_decode() {
        return ApiError::Decode {
            message: format!("{operation} failed: {error}"),
        };
    }

    ApiError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ApiError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        ApiError::Authentication {
            message: format!("{operation} failed: API returned {status} {message}"),
        }
    } else {
        ApiError::Api {
            status: status.as_u16(),
            message: format!("{operation} failed: {message}"),
        }
    }
}
