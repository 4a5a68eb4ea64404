//! Server configuration.

use crate::error::{ServerError, ServerResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV: &str = "SIGNPAD_SERVER_CONFIG";

/// An administrator who receives delivery notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub email: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: SocketAddr,
    /// Root directory for uploaded signature images.
    pub upload_dir: PathBuf,
    /// Notification recipients.
    pub admins: Vec<AdminUser>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3030)),
            upload_dir: PathBuf::from("uploads"),
            admins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json)
            .map_err(|e| ServerError::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Load from the file named by [`CONFIG_ENV`], or fall back to defaults.
    pub fn from_env() -> ServerResult<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Administrators that should be notified.
    pub fn active_admins(&self) -> impl Iterator<Item = &AdminUser> {
        self.admins.iter().filter(|admin| admin.active)
    }
}
