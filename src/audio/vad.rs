//! Energy-based voice activity detection.
//!
//! Audio is judged in 30 ms frames (480 samples at 16 kHz); a frame is voice
//! when its RMS amplitude exceeds the threshold.  Two users:
//!
//! * [`EnergyVad::trim_silence`] cuts leading and trailing silence from a
//!   finished recording so Whisper does not hallucinate over quiet audio.
//! * [`Endpointer`] watches a live stream and decides when the speaker has
//!   finished: some voice, then `trailing_silence` of quiet, or the hard cap.

use std::time::Duration;

use crate::audio::resample::WHISPER_SAMPLE_RATE;

/// 30 ms at 16 kHz.
pub const FRAME_SAMPLES: usize = 480;

// ---------------------------------------------------------------------------
// EnergyVad
// ---------------------------------------------------------------------------

/// Frame classifier and silence trimmer.
///
/// ```rust
/// use quick_translate::audio::EnergyVad;
///
/// let mut audio = vec![0.0_f32; 480];
/// audio.extend(vec![0.5_f32; 480]);
/// audio.extend(vec![0.0_f32; 960]);
///
/// assert_eq!(EnergyVad::new(0.01).trim_silence(&audio).len(), 480);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EnergyVad {
    threshold: f32,
}

impl EnergyVad {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// `true` when `frame` is loud enough to count as speech.
    pub fn is_voice(&self, frame: &[f32]) -> bool {
        if frame.is_empty() {
            return false;
        }
        let energy = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
        energy.sqrt() > self.threshold
    }

    /// Sub-slice from the first to the last voice frame; empty when the whole
    /// clip is silent.
    pub fn trim_silence<'a>(&self, audio: &'a [f32]) -> &'a [f32] {
        let voiced: Vec<bool> = audio
            .chunks(FRAME_SAMPLES)
            .map(|frame| self.is_voice(frame))
            .collect();

        let (Some(first), Some(last)) = (
            voiced.iter().position(|&v| v),
            voiced.iter().rposition(|&v| v),
        ) else {
            return &audio[..0];
        };

        let start = first * FRAME_SAMPLES;
        let end = ((last + 1) * FRAME_SAMPLES).min(audio.len());
        &audio[start..end]
    }
}

// ---------------------------------------------------------------------------
// Endpointer
// ---------------------------------------------------------------------------

/// Streaming end-of-utterance detector over 16 kHz mono audio.
#[derive(Debug)]
pub struct Endpointer {
    vad: EnergyVad,
    silence_frames_needed: usize,
    max_samples: usize,
    partial: Vec<f32>,
    seen: usize,
    heard_voice: bool,
    quiet_frames: usize,
    complete: bool,
}

impl Endpointer {
    pub fn new(vad: EnergyVad, trailing_silence: Duration, max_duration: Duration) -> Self {
        let silence_samples = samples_in(trailing_silence);
        Self {
            vad,
            silence_frames_needed: silence_samples.div_ceil(FRAME_SAMPLES).max(1),
            max_samples: samples_in(max_duration),
            partial: Vec::with_capacity(FRAME_SAMPLES),
            seen: 0,
            heard_voice: false,
            quiet_frames: 0,
            complete: false,
        }
    }

    /// Feed the next samples; returns `true` once the utterance is over.
    pub fn feed(&mut self, samples: &[f32]) -> bool {
        for &sample in samples {
            if self.complete {
                break;
            }
            self.partial.push(sample);
            self.seen += 1;

            if self.partial.len() == FRAME_SAMPLES {
                self.close_frame();
            }
            if self.seen >= self.max_samples {
                self.complete = true;
            }
        }
        self.complete
    }

    /// Whether any voice frame has been seen so far.
    pub fn heard_voice(&self) -> bool {
        self.heard_voice
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn close_frame(&mut self) {
        if self.vad.is_voice(&self.partial) {
            self.heard_voice = true;
            self.quiet_frames = 0;
        } else if self.heard_voice {
            self.quiet_frames += 1;
            if self.quiet_frames >= self.silence_frames_needed {
                self.complete = true;
            }
        }
        self.partial.clear();
    }
}

fn samples_in(duration: Duration) -> usize {
    (duration.as_millis() * u128::from(WHISPER_SAMPLE_RATE) / 1_000) as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(frames: usize) -> Vec<f32> {
        vec![0.5; frames * FRAME_SAMPLES]
    }

    fn silence(frames: usize) -> Vec<f32> {
        vec![0.0; frames * FRAME_SAMPLES]
    }

    fn endpointer(silence_ms: u64, max_ms: u64) -> Endpointer {
        Endpointer::new(
            EnergyVad::new(0.01),
            Duration::from_millis(silence_ms),
            Duration::from_millis(max_ms),
        )
    }

    #[test]
    fn is_voice_uses_rms() {
        let vad = EnergyVad::new(0.1);
        assert!(vad.is_voice(&[0.2, -0.2, 0.2]));
        assert!(!vad.is_voice(&[0.05, -0.05]));
        assert!(!vad.is_voice(&[]));
    }

    #[test]
    fn trim_keeps_voiced_span() {
        let audio = [silence(2), voice(3), silence(1), voice(1), silence(4)].concat();
        let trimmed = EnergyVad::new(0.01).trim_silence(&audio);
        assert_eq!(trimmed.len(), 5 * FRAME_SAMPLES);
        assert!(trimmed.iter().take(FRAME_SAMPLES).all(|&s| s > 0.0));
    }

    #[test]
    fn trim_silent_or_empty_clip_is_empty() {
        let vad = EnergyVad::new(0.01);
        assert!(vad.trim_silence(&silence(5)).is_empty());
        assert!(vad.trim_silence(&[]).is_empty());
    }

    #[test]
    fn trim_keeps_short_trailing_frame() {
        let mut audio = silence(1);
        audio.extend(vec![0.5; 100]);
        assert_eq!(EnergyVad::new(0.01).trim_silence(&audio).len(), 100);
    }

    #[test]
    fn endpoint_after_voice_then_silence() {
        // 90 ms of trailing silence = 3 frames.
        let mut ep = endpointer(90, 10_000);
        assert!(!ep.feed(&voice(4)));
        assert!(ep.heard_voice());
        assert!(!ep.feed(&silence(2)));
        assert!(ep.feed(&silence(1)));
    }

    #[test]
    fn voice_resets_silence_count() {
        let mut ep = endpointer(90, 10_000);
        ep.feed(&voice(1));
        ep.feed(&silence(2));
        ep.feed(&voice(1));
        assert!(!ep.feed(&silence(2)));
        assert!(ep.feed(&silence(1)));
    }

    #[test]
    fn leading_silence_never_ends_utterance() {
        let mut ep = endpointer(90, 10_000);
        assert!(!ep.feed(&silence(50)));
        assert!(!ep.heard_voice());
    }

    #[test]
    fn max_duration_caps_recording() {
        // 300 ms = 4800 samples = 10 frames.
        let mut ep = endpointer(1_000, 300);
        assert!(!ep.feed(&silence(9)));
        assert!(ep.feed(&silence(1)));
        assert!(ep.is_complete());
    }

    #[test]
    fn frames_may_straddle_feeds() {
        let mut ep = endpointer(30, 10_000);
        ep.feed(&voice(1));
        let quiet = silence(1);
        assert!(!ep.feed(&quiet[..200]));
        assert!(ep.feed(&quiet[200..]));
    }
}
