//! Privileged delivery read path

use actix_web::{web, HttpRequest, HttpResponse};
use constant_time_eq::constant_time_eq;
use uuid::Uuid;

use tx_core::repositories::OtpSessionRepository;
use tx_core::services::otp::NotificationDispatcher;
use tx_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::otp::DeliveryResponse;
use crate::handlers::error_response;

const INTERNAL_TOKEN_HEADER: &str = "X-Internal-Token";

/// Handler for GET /api/v1/internal/sessions/{session_token}/delivery
///
/// Hands the plaintext code and contact details to the delivery
/// subsystem or support tooling. Callers authenticate with the shared
/// internal token; this route must never be reachable from the end
/// user's own channel.
pub async fn read_delivery<R, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, N>>,
    path: web::Path<String>,
) -> HttpResponse
where
    R: OtpSessionRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let request_id = Uuid::new_v4().to_string();

    if !caller_is_internal(&req, &state.internal_api_token) {
        log::warn!("[{}] Rejected privileged read: bad internal token", request_id);
        return HttpResponse::Unauthorized().json(
            ApiResponse::<()>::error("UNAUTHORIZED", "Invalid internal caller credentials")
                .with_request_id(request_id),
        );
    }

    let session_token = path.into_inner();

    match state.otp_service.fetch_for_delivery(&session_token).await {
        Ok(view) => HttpResponse::Ok().json(
            ApiResponse::success(DeliveryResponse {
                code: view.code,
                user_id: view.user_id,
                user_contact: view.user_contact,
            })
            .with_request_id(request_id),
        ),
        Err(error) => {
            log::warn!("[{}] Privileged read failed: {}", request_id, error);
            error_response(&error, &request_id)
        }
    }
}

/// Constant-time check of the internal caller token. An unset token
/// disables the route rather than opening it.
fn caller_is_internal(req: &HttpRequest, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    req.headers()
        .get(INTERNAL_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|presented| constant_time_eq(presented.as_bytes(), expected.as_bytes()))
        .unwrap_or(false)
}
