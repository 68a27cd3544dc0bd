//! Voice input audio: microphone capture, format conversion and endpointing.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → downmix → resample (16 kHz)
//!           → Endpointer (stop on trailing silence) → EnergyVad::trim_silence
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quick_translate::audio::{AudioCapture, UtteranceLimits};
//!
//! let capture = AudioCapture::new().unwrap();
//! let audio = capture.record_utterance(&UtteranceLimits::default()).unwrap();
//! println!("recorded {} samples @ 16 kHz", audio.len());
//! ```

pub mod capture;
pub mod resample;
pub mod vad;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle, UtteranceLimits};
pub use resample::{downmix, resample, WHISPER_SAMPLE_RATE};
pub use vad::{Endpointer, EnergyVad, FRAME_SAMPLES};
