//! TxGate API server binary

use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;

use tx_api::app::{create_app, AppState};
use tx_core::services::otp::{
    OtpAuthorizationService, OtpServiceConfig, SessionCleanupConfig, SessionCleanupService,
};
use tx_infra::notify::HttpGatewayConfig;
use tx_infra::{create_pool, HttpNotificationGateway, MySqlOtpSessionRepository};
use tx_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();

    log::info!("Starting TxGate API server");

    let pool = create_pool(&config.database).await.map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            format!("database connection failed: {}", e),
        )
    })?;
    log::info!("Database connection pool established");

    let repository = Arc::new(MySqlOtpSessionRepository::new(pool));

    let gateway = HttpNotificationGateway::new(HttpGatewayConfig::from_env()).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("delivery gateway client failed: {}", e),
        )
    })?;
    let dispatcher = Arc::new(gateway);

    let otp_service = Arc::new(OtpAuthorizationService::new(
        Arc::clone(&repository),
        Arc::clone(&dispatcher),
        OtpServiceConfig::from(&config.otp),
    ));

    let cleanup = Arc::new(SessionCleanupService::new(
        Arc::clone(&repository),
        SessionCleanupConfig {
            interval_seconds: config.otp.cleanup_interval_seconds,
            enabled: true,
        },
    ));
    cleanup.start_background_task();

    if config.server.internal_api_token.is_empty() {
        log::warn!("INTERNAL_API_TOKEN is not set; the delivery read path is disabled");
    }

    let bind_address = config.server.bind_address();
    let internal_api_token = config.server.internal_api_token.clone();

    log::info!("Listening on {}", bind_address);

    HttpServer::new(move || {
        let state = web::Data::new(AppState {
            otp_service: Arc::clone(&otp_service),
            internal_api_token: internal_api_token.clone(),
        });
        create_app(state)
    })
    .bind(&bind_address)?
    .run()
    .await
}
