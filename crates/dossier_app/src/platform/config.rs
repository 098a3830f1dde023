use std::fs;
use std::path::Path;

use dossier_core::TaskCreationPolicy;
use dossier_logging::{client_error, client_info, client_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:7777";

/// Persisted client configuration (`.dossier.ron` by default). Unknown or
/// unreadable files fall back to defaults rather than failing the command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub bearer: Option<String>,
    pub auto_create_task: bool,
    pub max_download_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer: None,
            auto_create_task: true,
            max_download_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                client_warn!("Failed to read client config from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                client_warn!("Failed to parse client config from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) {
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(self, pretty) {
            Ok(text) => text,
            Err(err) => {
                client_error!("Failed to serialize client config: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(path, content) {
            client_error!("Failed to write client config to {:?}: {}", path, err);
        } else {
            client_info!("Saved client config to {:?}", path);
        }
    }

    pub fn task_policy(&self) -> TaskCreationPolicy {
        if self.auto_create_task {
            TaskCreationPolicy::AutoCreate
        } else {
            TaskCreationPolicy::Manual
        }
    }
}
