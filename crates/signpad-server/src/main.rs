//! Signpad Delivery Server
//!
//! Receives confirmed deliveries from the driver form, emails the active
//! administrators, and stores uploaded signature images.
//!
//! ## Endpoints
//!
//! ```text
//! GET  /health                  -> "ok"
//! POST /api/send-notification   { "deliveryId": "...", "palletCount": 12, ... }
//! POST /api/signatures          { "deliveryId": "...", "signature": "data:image/png;base64,..." }
//! ```

mod config;
mod email;
mod error;
mod routes;

use config::ServerConfig;
use routes::{AppState, router};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signpad_server=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let addr = config.bind;
    info!(
        "{} active admin(s), uploads in {}",
        config.active_admins().count(),
        config.upload_dir.display()
    );

    let app = router(Arc::new(AppState::new(config)));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Signpad server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
