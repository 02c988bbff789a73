//! Application state and factory

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use tx_core::repositories::OtpSessionRepository;
use tx_core::services::otp::{NotificationDispatcher, OtpAuthorizationService};

use crate::routes::otp::{
    create::create_session, delivery::read_delivery, resend::resend_code,
    sessions::delete_session, sessions::list_sessions, verify::verify_code,
};

/// Shared services handed to every handler
pub struct AppState<R, N>
where
    R: OtpSessionRepository,
    N: NotificationDispatcher,
{
    pub otp_service: Arc<OtpAuthorizationService<R, N>>,
    /// Shared secret guarding the privileged delivery read path
    pub internal_api_token: String,
}

/// Create and configure the application with all dependencies
pub fn create_app<R, N>(
    app_state: web::Data<AppState<R, N>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: OtpSessionRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/otp")
                        .route("/sessions", web::post().to(create_session::<R, N>))
                        .route("/sessions", web::get().to(list_sessions::<R, N>))
                        .route("/sessions/verify", web::post().to(verify_code::<R, N>))
                        .route("/sessions/resend", web::post().to(resend_code::<R, N>))
                        .route(
                            "/sessions/{session_token}",
                            web::delete().to(delete_session::<R, N>),
                        ),
                )
                .service(web::scope("/internal").route(
                    "/sessions/{session_token}/delivery",
                    web::get().to(read_delivery::<R, N>),
                )),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "txgate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
