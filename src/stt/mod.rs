//! Speech-to-text for voice input.
//!
//! ```text
//! 16 kHz mono f32 ──▶ SttEngine::transcribe(audio, language hint) ──▶ text
//!                        └─ WhisperEngine (GGML model via whisper-rs)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use quick_translate::config::AppPaths;
//! use quick_translate::stt::{SttEngine, TranscribeParams, WhisperEngine};
//!
//! let model = AppPaths::new().model_file("ggml-base");
//! let engine = WhisperEngine::load(model, TranscribeParams::default()).unwrap();
//!
//! let audio: Vec<f32> = vec![0.0; 16_000]; // 1 s of silence
//! let text = engine.transcribe(&audio, Some("es")).unwrap();
//! println!("{text}");
//! ```

pub mod engine;
pub mod transcribe;

pub use engine::{SttEngine, SttError, WhisperEngine, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES};
pub use transcribe::{SamplingStrategy, TranscribeParams, TranscriptionResult};

#[cfg(test)]
pub use engine::MockSttEngine;
