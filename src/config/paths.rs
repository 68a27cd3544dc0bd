//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\quick-translate\
//!   macOS:   ~/Library/Application Support/quick-translate/
//!   Linux:   ~/.config/quick-translate/
//!
//! Data dir (Whisper models for voice input):
//!   Windows: %LOCALAPPDATA%\quick-translate\models\
//!   macOS:   ~/Library/Application Support/quick-translate/models/
//!   Linux:   ~/.local/share/quick-translate/models/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory holding GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "quick-translate";

    /// Resolves all paths, falling back to the current directory when the
    /// platform has no standard location.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            models_dir: data_dir.join("models"),
        }
    }

    /// Path of the model file for `stem` (`<models_dir>/<stem>.bin`).
    pub fn model_file(&self, stem: &str) -> PathBuf {
        self.models_dir.join(format!("{stem}.bin"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
