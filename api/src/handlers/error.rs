//! Domain error to HTTP response mapping

use actix_web::HttpResponse;
use validator::ValidationErrors;

use tx_core::errors::OtpError;
use tx_shared::types::response::ApiResponse;

/// Map a domain error onto an HTTP response with the standard envelope.
///
/// The unverified caller only ever learns one of three things: the code
/// was wrong (with the attempts left), the session is gone, or the
/// ceiling was hit. Missing and expired sessions share a status so the
/// token space cannot be probed.
pub fn error_response(error: &OtpError, request_id: &str) -> HttpResponse {
    let body =
        ApiResponse::<()>::error(error.code(), error.to_string()).with_request_id(request_id);

    match error {
        OtpError::Persistence { .. } => HttpResponse::InternalServerError().json(body),
        OtpError::InvalidOrExpiredSession => HttpResponse::BadRequest().json(body),
        OtpError::AttemptsExceeded => HttpResponse::TooManyRequests().json(body),
        OtpError::InvalidCode { remaining_attempts } => {
            HttpResponse::BadRequest().json(body.with_remaining_attempts(*remaining_attempts))
        }
        OtpError::InvalidSession => HttpResponse::NotFound().json(body),
        OtpError::Validation { .. } => HttpResponse::BadRequest().json(body),
    }
}

/// 400 response for request-body validation failures
pub fn validation_error_response(errors: &ValidationErrors, request_id: &str) -> HttpResponse {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect::<Vec<_>>()
        .join("; ");

    let message = if message.is_empty() {
        "Invalid request data".to_string()
    } else {
        message
    };

    HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error("VALIDATION_ERROR", message).with_request_id(request_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn attempts_exceeded_maps_to_429() {
        let response = error_response(&OtpError::AttemptsExceeded, "req-1");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn invalid_code_maps_to_400() {
        let response = error_response(
            &OtpError::InvalidCode {
                remaining_attempts: 2,
            },
            "req-1",
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_session_maps_to_404() {
        let response = error_response(&OtpError::InvalidSession, "req-1");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
