//! Voice input: record one phrase from the microphone and run Whisper on it.

use std::sync::Arc;

use async_trait::async_trait;

use super::{CapabilityError, Transcriber};
use crate::audio::{AudioCapture, CaptureError, EnergyVad, UtteranceLimits};
use crate::language::SourceLanguage;
use crate::stt::{SttEngine, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES};

// ---------------------------------------------------------------------------
// UtteranceSource
// ---------------------------------------------------------------------------

/// Produces one recorded phrase as 16 kHz mono samples.  Blocking.
pub trait UtteranceSource: Send + Sync {
    fn record(&self) -> Result<Vec<f32>, CaptureError>;
}

/// The default input device.  The device is opened per recording so the
/// microphone is released between phrases.
#[derive(Debug, Clone, Default)]
pub struct Microphone {
    limits: UtteranceLimits,
}

impl Microphone {
    pub fn new(limits: UtteranceLimits) -> Self {
        Self { limits }
    }
}

impl UtteranceSource for Microphone {
    fn record(&self) -> Result<Vec<f32>, CaptureError> {
        AudioCapture::new()?.record_utterance(&self.limits)
    }
}

// ---------------------------------------------------------------------------
// MicTranscriber
// ---------------------------------------------------------------------------

pub struct MicTranscriber {
    source: Arc<dyn UtteranceSource>,
    engine: Arc<dyn SttEngine>,
    vad: EnergyVad,
}

impl MicTranscriber {
    pub fn new(source: Arc<dyn UtteranceSource>, engine: Arc<dyn SttEngine>, vad: EnergyVad) -> Self {
        Self { source, engine, vad }
    }
}

/// Trim, bound and recognise a finished recording.
fn recognise(
    engine: &dyn SttEngine,
    vad: EnergyVad,
    audio: &[f32],
    language: SourceLanguage,
) -> Result<String, CapabilityError> {
    let voiced = vad.trim_silence(audio);
    if voiced.is_empty() {
        return Err(CapabilityError::NoSpeech);
    }

    let mut clip = voiced[..voiced.len().min(MAX_AUDIO_SAMPLES)].to_vec();
    if clip.len() < MIN_AUDIO_SAMPLES {
        clip.resize(MIN_AUDIO_SAMPLES, 0.0);
    }

    let hint = language.language().map(|l| l.code());
    let text = engine.transcribe(&clip, hint)?;
    if text.is_empty() {
        return Err(CapabilityError::NoSpeech);
    }
    Ok(text)
}

#[async_trait]
impl Transcriber for MicTranscriber {
    async fn transcribe(&self, language: SourceLanguage) -> Result<String, CapabilityError> {
        let source = Arc::clone(&self.source);
        let audio = tokio::task::spawn_blocking(move || source.record()).await??;

        let engine = Arc::clone(&self.engine);
        let vad = self.vad;
        let text =
            tokio::task::spawn_blocking(move || recognise(engine.as_ref(), vad, &audio, language))
                .await??;

        log::info!("voice: transcribed {} chars", text.chars().count());
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
