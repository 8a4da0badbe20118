//! Application configuration

use std::path::PathBuf;

use solidview_config::SessionConfig;

/// Configuration the binary starts with, plus where it came from.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub path: PathBuf,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Resolve the config path (`SOLIDVIEW_CONFIG` or next to the binary)
    /// and load it, falling back to defaults.
    pub fn load() -> Self {
        let path = SessionConfig::config_path();
        let session = SessionConfig::load_from_file(&path);
        Self { path, session }
    }
}
