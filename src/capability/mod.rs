//! Platform affordances around the translation session: speech output,
//! voice input and the clipboard.
//!
//! Each is a trait so the UI receives them as trait objects and tests can
//! substitute doubles.  Failures are reported as [`CapabilityError`]; the UI
//! logs them and carries on, and they never reach the session state.
//!
//! | Trait             | Implementation      | Backing crates                 |
//! |-------------------|---------------------|--------------------------------|
//! | [`Speaker`]       | [`GoogleTtsSpeaker`]| `reqwest`, `rodio`             |
//! | [`Transcriber`]   | [`MicTranscriber`]  | `cpal`, `whisper-rs`           |
//! | [`ClipboardWriter`]| [`ArboardClipboard`]| `arboard`                     |

pub mod clipboard;
pub mod microphone;
pub mod speaker;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::CaptureError;
use crate::language::SourceLanguage;
use crate::stt::SttError;

pub use clipboard::ArboardClipboard;
pub use microphone::{MicTranscriber, Microphone, UtteranceSource};
pub use speaker::{split_for_tts, GoogleTtsSpeaker};

// ---------------------------------------------------------------------------
// CapabilityError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("cannot access clipboard: {0}")]
    Clipboard(String),

    #[error("speech request failed: {0}")]
    SpeechRequest(String),

    #[error("speech service returned HTTP {0}")]
    SpeechStatus(u16),

    #[error("audio playback failed: {0}")]
    Playback(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Stt(#[from] SttError),

    #[error("no speech detected")]
    NoSpeech,

    #[error("background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for CapabilityError {
    fn from(e: tokio::task::JoinError) -> Self {
        CapabilityError::Task(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Reads text aloud.
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text` with the voice for `voice_tag` (BCP-47, e.g. `en-GB`).
    /// Blank text is a no-op.
    async fn speak(&self, text: &str, voice_tag: &str) -> Result<(), CapabilityError>;
}

/// Records one spoken phrase and returns it as text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// `language` is the session's source language; auto-detect lets the
    /// recogniser pick.
    async fn transcribe(&self, language: SourceLanguage) -> Result<String, CapabilityError>;
}

/// Places text on the system clipboard.
pub trait ClipboardWriter: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), CapabilityError>;
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// The set handed to the UI.  Voice input is optional because it needs a
/// local Whisper model.
#[derive(Clone)]
pub struct Capabilities {
    pub speaker: Arc<dyn Speaker>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub clipboard: Arc<dyn ClipboardWriter>,
}
