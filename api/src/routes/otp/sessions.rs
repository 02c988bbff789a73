//! Administrative session listing and removal

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use tx_core::repositories::OtpSessionRepository;
use tx_core::services::otp::NotificationDispatcher;
use tx_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::otp::SessionSummary;
use crate::handlers::error_response;

/// Handler for GET /api/v1/otp/sessions
///
/// Lists all unverified, unexpired sessions. Codes and payloads stay
/// out of the listing; contacts come back masked.
pub async fn list_sessions<R, N>(state: web::Data<AppState<R, N>>) -> HttpResponse
where
    R: OtpSessionRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    match state.otp_service.list_active().await {
        Ok(sessions) => {
            let summaries: Vec<SessionSummary> =
                sessions.iter().map(SessionSummary::from).collect();
            HttpResponse::Ok().json(ApiResponse::success(summaries).with_request_id(request_id))
        }
        Err(error) => {
            log::error!("[{}] Failed to list sessions: {}", request_id, error);
            error_response(&error, &request_id)
        }
    }
}

/// Handler for DELETE /api/v1/otp/sessions/{session_token}
///
/// Removes a session outright, whatever its state.
pub async fn delete_session<R, N>(
    state: web::Data<AppState<R, N>>,
    path: web::Path<String>,
) -> HttpResponse
where
    R: OtpSessionRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let session_token = path.into_inner();

    match state.otp_service.delete(&session_token).await {
        Ok(()) => {
            log::info!("[{}] Session deleted by admin", request_id);
            HttpResponse::Ok().json(
                ApiResponse::success(serde_json::json!({"deleted": true}))
                    .with_request_id(request_id),
            )
        }
        Err(error) => {
            log::warn!("[{}] Session delete failed: {}", request_id, error);
            error_response(&error, &request_id)
        }
    }
}
