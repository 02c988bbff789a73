use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use tx_core::repositories::OtpSessionRepository;
use tx_core::services::otp::{mask_contact, NotificationDispatcher};
use tx_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::otp::{CreateSessionRequest, CreateSessionResponse};
use crate::handlers::{error_response, validation_error_response};

/// Handler for POST /api/v1/otp/sessions
///
/// Stages a transaction payload behind a fresh one-time-code session.
/// Any prior session for the same user is replaced in the same storage
/// step. The response carries the token and deadline only; the code is
/// dispatched out-of-band.
pub async fn create_session<R, N>(
    state: web::Data<AppState<R, N>>,
    request: web::Json<CreateSessionRequest>,
) -> HttpResponse
where
    R: OtpSessionRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    if let Err(errors) = request.0.validate() {
        log::warn!("[{}] Invalid create_session request", request_id);
        return validation_error_response(&errors, &request_id);
    }

    log::info!(
        "[{}] Staging transaction for user: {}, contact: {}",
        request_id,
        request.user_id,
        mask_contact(&request.user_contact)
    );

    match state
        .otp_service
        .create(
            &request.user_id,
            &request.user_contact,
            request.staged_payload.clone(),
        )
        .await
    {
        Ok(result) => HttpResponse::Created().json(
            ApiResponse::success(CreateSessionResponse {
                session_token: result.session_token,
                expires_at: result.expires_at,
            })
            .with_request_id(request_id),
        ),
        Err(error) => {
            log::error!(
                "[{}] Failed to stage transaction for user {}: {}",
                request_id,
                request.user_id,
                error
            );
            error_response(&error, &request_id)
        }
    }
}
