use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use tx_core::repositories::OtpSessionRepository;
use tx_core::services::otp::NotificationDispatcher;
use tx_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::otp::{VerifyRequest, VerifyResponse};
use crate::handlers::{error_response, validation_error_response};

/// Handler for POST /api/v1/otp/sessions/verify
///
/// Submits a one-time code against a session. On a match the staged
/// payload is released to the caller; on a mismatch the error body
/// carries the attempts left.
pub async fn verify_code<R, N>(
    state: web::Data<AppState<R, N>>,
    request: web::Json<VerifyRequest>,
) -> HttpResponse
where
    R: OtpSessionRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    if let Err(errors) = request.0.validate() {
        log::warn!("[{}] Invalid verify request", request_id);
        return validation_error_response(&errors, &request_id);
    }

    match state
        .otp_service
        .verify(&request.session_token, &request.code)
        .await
    {
        Ok(verified) => {
            log::info!(
                "[{}] Verification succeeded for user: {}",
                request_id,
                verified.user_id
            );
            HttpResponse::Ok().json(
                ApiResponse::success(VerifyResponse {
                    user_id: verified.user_id,
                    staged_payload: verified.staged_payload,
                })
                .with_request_id(request_id),
            )
        }
        Err(error) => {
            log::warn!("[{}] Verification failed: {}", request_id, error);
            error_response(&error, &request_id)
        }
    }
}
