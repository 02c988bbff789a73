use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use tx_core::repositories::OtpSessionRepository;
use tx_core::services::otp::NotificationDispatcher;
use tx_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::otp::{ResendRequest, ResendResponse};
use crate::handlers::{error_response, validation_error_response};

/// Handler for POST /api/v1/otp/sessions/resend
///
/// Replaces the code on an unverified session, resets the attempt
/// counter, and re-arms the deadline. A lapsed session comes back to
/// life here; only verified or deleted sessions refuse.
pub async fn resend_code<R, N>(
    state: web::Data<AppState<R, N>>,
    request: web::Json<ResendRequest>,
) -> HttpResponse
where
    R: OtpSessionRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    if let Err(errors) = request.0.validate() {
        log::warn!("[{}] Invalid resend request", request_id);
        return validation_error_response(&errors, &request_id);
    }

    match state.otp_service.resend(&request.session_token).await {
        Ok(result) => {
            log::info!("[{}] Replacement code issued", request_id);
            HttpResponse::Ok().json(
                ApiResponse::success(ResendResponse {
                    expires_at: result.expires_at,
                })
                .with_request_id(request_id),
            )
        }
        Err(error) => {
            log::warn!("[{}] Resend failed: {}", request_id, error);
            error_response(&error, &request_id)
        }
    }
}
