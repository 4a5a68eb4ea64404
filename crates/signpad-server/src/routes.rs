//! HTTP handlers.

use crate::config::{AdminUser, ServerConfig};
use crate::email::{DeliveryNotification, EmailMessage};
use crate::error::{ServerError, ServerResult};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use signpad_core::{SignatureArtifact, signature_object_path};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Outbound email delivery.
pub trait Mailer: Send + Sync {
    /// Deliver `email` to `to`.
    fn send(&self, to: &AdminUser, email: &EmailMessage) -> Result<(), String>;
}

/// Mailer that only logs, standing in for an email provider.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &AdminUser, email: &EmailMessage) -> Result<(), String> {
        info!("Sending email to {} <{}>", to.name, to.email);
        info!("Subject: {}", email.subject);
        tracing::debug!("Content: {}", email.text);
        Ok(())
    }
}

/// Shared application state.
pub struct AppState {
    pub config: ServerConfig,
    pub mailer: Box<dyn Mailer>,
}

impl AppState {
    /// Create state with the logging mailer.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_mailer(config, Box::new(LogMailer))
    }

    /// Create state with a custom mailer.
    pub fn with_mailer(config: ServerConfig, mailer: Box<dyn Mailer>) -> Self {
        Self { config, mailer }
    }
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/send-notification", post(send_notification))
        .route("/api/signatures", post(upload_signature))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check
pub async fn health() -> &'static str {
    "ok"
}

/// Per-recipient delivery result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of the notification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReport {
    pub message: String,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<SendResult>,
}

/// Email every active administrator about a confirmed delivery.
pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeliveryNotification>, JsonRejection>,
) -> ServerResult<Json<NotificationReport>> {
    let Json(delivery) = payload?;
    let admins: Vec<&AdminUser> = state.config.active_admins().collect();
    if admins.is_empty() {
        warn!("No active admin users found for email notifications");
        return Ok(Json(NotificationReport {
            message: "No active admin users to notify".to_string(),
            successful: 0,
            failed: 0,
            results: Vec::new(),
        }));
    }

    let email = EmailMessage::for_delivery(&delivery);
    let results: Vec<SendResult> = admins
        .into_iter()
        .map(|admin| match state.mailer.send(admin, &email) {
            Ok(()) => SendResult {
                success: true,
                email: admin.email.clone(),
                error: None,
            },
            Err(e) => {
                warn!("Failed to send email to {}: {}", admin.email, e);
                SendResult {
                    success: false,
                    email: admin.email.clone(),
                    error: Some(e),
                }
            }
        })
        .collect();

    let successful = results.iter().filter(|r| r.success).count();
    let failed = results.len() - successful;
    info!(
        "Email notifications for {}: {} sent, {} failed",
        delivery.delivery_id, successful, failed
    );

    Ok(Json(NotificationReport {
        message: "Email notifications processed".to_string(),
        successful,
        failed,
        results,
    }))
}

/// Signature upload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureUpload {
    pub delivery_id: String,
    /// PNG data URI as produced by the signature pad.
    pub signature: String,
}

/// Where an uploaded signature was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSignature {
    /// Path relative to the upload directory.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Decode a signature data URI and store the PNG.
pub async fn upload_signature(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignatureUpload>, JsonRejection>,
) -> ServerResult<Json<StoredSignature>> {
    let Json(upload) = payload?;
    let artifact = SignatureArtifact::from_data_uri(&upload.signature)?;

    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let path = store_signature(
        &state.config.upload_dir,
        &upload.delivery_id,
        timestamp_ms,
        artifact.png(),
    )
    .await?;

    info!(
        "Stored signature for {} at {} ({}x{})",
        upload.delivery_id,
        path,
        artifact.width(),
        artifact.height()
    );
    Ok(Json(StoredSignature {
        path,
        width: artifact.width(),
        height: artifact.height(),
    }))
}

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: u32 = 16;

/// Write `png` under a fresh object path, never replacing an existing file.
///
/// Returns the path relative to `upload_dir`.
async fn store_signature(
    upload_dir: &Path,
    delivery_id: &str,
    timestamp_ms: u128,
    png: &[u8],
) -> ServerResult<String> {
    let base = signature_object_path(delivery_id, timestamp_ms);

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = match (attempt, base.strip_suffix(".png")) {
            (0, _) => base.clone(),
            (n, Some(stem)) => format!("{}-{}.png", stem, n),
            (n, None) => format!("{}-{}", base, n),
        };
        let full_path = upload_dir.join(&path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ServerError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(ServerError::Storage(format!(
                    "Failed to create {}: {}",
                    full_path.display(),
                    e
                )));
            }
        };
        let write_err =
            |e: std::io::Error| ServerError::Storage(format!("Failed to write {}: {}", full_path.display(), e));
        file.write_all(png).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        return Ok(path);
    }

    Err(ServerError::Storage(format!(
        "No free name for {} after {} attempts",
        base, MAX_NAME_ATTEMPTS
    )))
}
