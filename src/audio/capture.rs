//! Microphone capture via `cpal`.
//!
//! [`AudioCapture`] opens the default input device.  [`AudioCapture::start`]
//! streams raw [`AudioChunk`]s over a channel for as long as the returned
//! [`StreamHandle`] lives; [`AudioCapture::record_utterance`] builds on it to
//! record one spoken phrase, converted to 16 kHz mono and cut off by the
//! [`Endpointer`].

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::audio::resample::{downmix, resample, WHISPER_SAMPLE_RATE};
use crate::audio::vad::{EnergyVad, Endpointer};
use crate::config::SpeechConfig;

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One buffer from the cpal callback: interleaved `f32` in `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioChunk {
    /// Mono samples at the recogniser's 16 kHz rate.
    pub fn to_whisper_input(&self) -> Vec<f32> {
        let mono = downmix(&self.samples, self.channels);
        resample(&mono, self.sample_rate, WHISPER_SAMPLE_RATE)
    }
}

/// Keeps the cpal stream alive; dropping it stops capture.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("input stream stopped delivering audio")]
    StreamStalled,
}

// ---------------------------------------------------------------------------
// UtteranceLimits
// ---------------------------------------------------------------------------

/// When to stop recording a spoken phrase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtteranceLimits {
    /// Hard cap on the recording.
    pub max_duration: Duration,
    /// Quiet period after speech that ends the phrase.
    pub trailing_silence: Duration,
    /// RMS level separating speech from silence.
    pub vad_threshold: f32,
}

impl UtteranceLimits {
    pub fn from_config(config: &SpeechConfig) -> Self {
        let fallback = Self::default();
        Self {
            max_duration: Duration::try_from_secs_f32(config.max_recording_secs)
                .unwrap_or(fallback.max_duration),
            trailing_silence: Duration::try_from_secs_f32(config.silence_secs)
                .unwrap_or(fallback.trailing_silence),
            vad_threshold: config.vad_threshold,
        }
    }

    pub fn endpointer(&self) -> Endpointer {
        Endpointer::new(
            EnergyVad::new(self.vad_threshold),
            self.trailing_silence,
            self.max_duration,
        )
    }
}

impl Default for UtteranceLimits {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(15),
            trailing_silence: Duration::from_millis(1_200),
            vad_threshold: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Default input device plus its preferred stream configuration.
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl AudioCapture {
    /// Open the system default input device.
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] when there is no microphone, or
    /// [`CaptureError::DefaultConfig`] when it cannot report a configuration.
    pub fn new() -> Result<Self, CaptureError> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or(CaptureError::NoDevice)?;

        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();

        Ok(Self {
            device,
            config: supported.into(),
            sample_rate,
            channels,
        })
    }

    /// Start streaming chunks into `tx`.  Send errors are ignored so the
    /// audio thread never panics after the receiver goes away.
    pub fn start(&self, tx: mpsc::Sender<AudioChunk>) -> Result<StreamHandle, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = tx.send(AudioChunk {
                    samples: data.to_vec(),
                    sample_rate,
                    channels,
                });
            },
            |err: cpal::StreamError| log::error!("capture: stream error: {err}"),
            None,
        )?;

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    /// Record until the phrase ends or `limits.max_duration` passes.
    ///
    /// Blocks the calling thread; returns 16 kHz mono samples.
    pub fn record_utterance(&self, limits: &UtteranceLimits) -> Result<Vec<f32>, CaptureError> {
        let (tx, rx) = mpsc::channel();
        let _stream = self.start(tx)?;

        log::info!(
            "capture: listening ({} Hz, {} ch)",
            self.sample_rate,
            self.channels
        );

        let mut endpointer = limits.endpointer();
        let mut audio = Vec::new();
        let deadline = Instant::now() + limits.max_duration + Duration::from_secs(1);

        loop {
            match rx.recv_timeout(Duration::from_millis(250)) {
                Ok(chunk) => {
                    let samples = chunk.to_whisper_input();
                    let done = endpointer.feed(&samples);
                    audio.extend_from_slice(&samples);
                    if done {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) if Instant::now() < deadline => {}
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    if audio.is_empty() {
                        return Err(CaptureError::StreamStalled);
                    }
                    break;
                }
            }
        }

        log::debug!(
            "capture: recorded {:.1}s (voice heard: {})",
            audio.len() as f32 / WHISPER_SAMPLE_RATE as f32,
            endpointer.heard_voice()
        );
        Ok(audio)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_chunk_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioChunk>();
    }

    #[test]
    fn chunk_converts_to_16k_mono() {
        let chunk = AudioChunk {
            samples: vec![0.25; 960], // 10 ms of 48 kHz stereo
            sample_rate: 48_000,
            channels: 2,
        };
        let out = chunk.to_whisper_input();
        assert_eq!(out.len(), 160);
        assert!(out.iter().all(|&s| (s - 0.25).abs() < 1e-6));
    }

    #[test]
    fn limits_follow_speech_config() {
        let config = SpeechConfig {
            max_recording_secs: 8.0,
            silence_secs: 0.5,
            vad_threshold: 0.02,
            ..SpeechConfig::default()
        };
        let limits = UtteranceLimits::from_config(&config);
        assert_eq!(limits.max_duration, Duration::from_secs(8));
        assert_eq!(limits.trailing_silence, Duration::from_millis(500));
        assert!((limits.vad_threshold - 0.02).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_durations_fall_back_to_defaults() {
        let config = SpeechConfig {
            max_recording_secs: -1.0,
            silence_secs: f32::NAN,
            ..SpeechConfig::default()
        };
        let limits = UtteranceLimits::from_config(&config);
        assert_eq!(limits.max_duration, UtteranceLimits::default().max_duration);
        assert_eq!(
            limits.trailing_silence,
            UtteranceLimits::default().trailing_silence
        );
    }
}
