//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Missing keys fall back to their defaults (`#[serde(default)]`), so a
//! hand-written `settings.toml` only needs the values it overrides.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::language::Language;

/// Environment variable that overrides `translator.api_key`.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ---------------------------------------------------------------------------
// TranslatorConfig
// ---------------------------------------------------------------------------

/// Connection settings for the chat-completions translation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Base URL of the API (`/v1/chat/completions` is appended).
    ///
    /// - OpenAI: `https://api.openai.com`
    /// - Ollama: `http://localhost:11434`
    pub base_url: String,
    /// API key; `None` for local providers that need no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response.
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            temperature: 0.3,
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Behaviour of the translation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Target language selected at startup.
    pub default_target: Language,
    /// Quiet period after the last keystroke before a request is sent.
    pub debounce_ms: u64,
    /// Text shown in the result pane when translation fails.
    pub error_marker: String,
}

impl SessionConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_target: Language::En,
            debounce_ms: 300,
            error_marker: "Error".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Speech synthesis and voice input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Playback speed for synthesized speech (1.0 = normal).
    pub rate: f32,
    /// Whisper GGML model file stem, looked up in the models directory.
    pub stt_model: String,
    /// Hard cap on a single voice-input recording.
    pub max_recording_secs: f32,
    /// Trailing silence that ends a voice-input recording.
    pub silence_secs: f32,
    /// RMS threshold separating speech from silence.
    pub vad_threshold: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: 0.9,
            stt_model: "ggml-base".into(),
            max_recording_secs: 15.0,
            silence_secs: 1.2,
            vad_threshold: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub always_on_top: bool,
    /// Initial inner size `(width, height)` in logical pixels.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            always_on_top: false,
            window_size: (760.0, 360.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use quick_translate::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub translator: TranslatorConfig,
    pub session: SessionConfig,
    pub speech: SpeechConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`,
    /// then apply the `OPENAI_API_KEY` override.
    ///
    /// Returns defaults when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&AppPaths::new().settings_file)?;
        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the API key with `key` when it is present and non-blank.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.translator.api_key = Some(key.trim().to_string());
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
