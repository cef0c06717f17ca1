//! Error categorization.

use super::types::ErrorType;

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Status codes are checked first (a `reqwest::Error` produced by
/// `error_for_status` carries one), then the error kind.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        if status.as_u16() == 429 {
            return ErrorType::HttpRequestTooManyRequests;
        }
        if status.is_client_error() || status.is_server_error() {
            return ErrorType::HttpRequestStatusError;
        }
    }

    if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else if error.is_status() {
        ErrorType::HttpRequestStatusError
    } else {
        ErrorType::HttpRequestOtherError
    }
}
