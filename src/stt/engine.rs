//! Speech-to-text engine trait and the Whisper implementation.
//!
//! [`SttEngine`] is object-safe and `Send + Sync` so the voice-input
//! capability can hold it as `Arc<dyn SttEngine>` and call it from a
//! blocking worker thread.  [`WhisperEngine`] wraps a loaded
//! `whisper_rs::WhisperContext`; [`MockSttEngine`] (tests only) returns a
//! canned reply and records the language hints it was given.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters};

use crate::stt::transcribe::{SamplingStrategy, TranscribeParams, TranscriptionResult};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum SttError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("whisper context initialisation failed: {0}")]
    ContextInit(String),

    #[error("transcription error: {0}")]
    Transcription(String),

    #[error("audio too short (minimum 0.5 s at 16 kHz)")]
    AudioTooShort,

    #[error("audio too long (maximum 60 s at 16 kHz)")]
    AudioTooLong,
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// Minimum accepted clip: 0.5 s at 16 kHz.
pub const MIN_AUDIO_SAMPLES: usize = 8_000;
/// Maximum accepted clip: 60 s at 16 kHz.
pub const MAX_AUDIO_SAMPLES: usize = 960_000;

/// Speech-to-text over 16 kHz mono `f32` PCM.
///
/// `language` is an ISO-639-1 hint such as `"es"`; `None` lets the engine
/// detect the language itself.  Clips outside
/// [`MIN_AUDIO_SAMPLES`]..=[`MAX_AUDIO_SAMPLES`] are rejected.
pub trait SttEngine: Send + Sync {
    fn transcribe(&self, audio: &[f32], language: Option<&str>) -> Result<String, SttError>;
}

fn check_length(audio: &[f32]) -> Result<(), SttError> {
    if audio.len() < MIN_AUDIO_SAMPLES {
        return Err(SttError::AudioTooShort);
    }
    if audio.len() > MAX_AUDIO_SAMPLES {
        return Err(SttError::AudioTooLong);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Whisper model held in memory.  Each call creates its own
/// `WhisperState`, so one engine serves concurrent callers without locks.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// SAFETY: whisper-rs declares WhisperContext Send + Sync; the weights are
// read-only after loading and every call works on a fresh state.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load a GGML model file.
    ///
    /// # Errors
    ///
    /// [`SttError::ModelNotFound`] when `model_path` is missing or not UTF-8,
    /// [`SttError::ContextInit`] when whisper-rs rejects the file.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }
        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!("non-UTF-8 model path: {}", path.display()))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        log::info!("stt: loaded model {}", path.display());
        Ok(Self { ctx, params })
    }

    fn full_params<'a>(&self, language: Option<&'a str>) -> FullParams<'a, 'static> {
        use whisper_rs::SamplingStrategy as WS;
        let strategy = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => WS::Greedy { best_of },
            SamplingStrategy::BeamSearch { beam_size, patience } => {
                WS::BeamSearch { beam_size, patience }
            }
        };

        let mut fp = FullParams::new(strategy);
        fp.set_language(language);
        fp.set_n_threads(self.params.n_threads);
        fp.set_suppress_blank(self.params.suppress_blank);
        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }
        fp
    }

    /// Transcribe with timing information.
    pub fn transcribe_full(
        &self,
        audio: &[f32],
        language: Option<&str>,
    ) -> Result<TranscriptionResult, SttError> {
        check_length(audio)?;

        let fp = self.full_params(language);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        let started = std::time::Instant::now();
        state
            .full(fp, audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
            text.push_str(&segment);
        }

        let result = TranscriptionResult {
            text: text.trim().to_string(),
            language: language.map(str::to_string),
            duration_ms: started.elapsed().as_millis(),
        };
        log::debug!(
            "stt: {} segments in {} ms (language {})",
            n_segments,
            result.duration_ms,
            language.unwrap_or("auto")
        );
        Ok(result)
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio: &[f32], language: Option<&str>) -> Result<String, SttError> {
        self.transcribe_full(audio, language).map(|r| r.text)
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// Canned-response engine for tests; enforces the clip-length contract.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<String, SttError>,
    hints: std::sync::Mutex<Vec<Option<String>>>,
}

#[cfg(test)]
impl MockSttEngine {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            hints: Default::default(),
        }
    }

    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
            hints: Default::default(),
        }
    }

    /// Language hints of every accepted call, in order.
    pub fn hints(&self) -> Vec<Option<String>> {
        self.hints.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, audio: &[f32], language: Option<&str>) -> Result<String, SttError> {
        check_length(audio)?;
        self.hints
            .lock()
            .unwrap()
            .push(language.map(str::to_string));
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
