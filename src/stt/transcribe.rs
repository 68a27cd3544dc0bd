//! Whisper decoding parameters and the per-run result.

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Owned, `Clone` mirror of `whisper_rs::SamplingStrategy`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Single-pass decoding; lowest latency.
    Greedy { best_of: i32 },
    /// Beam search; more accurate, several times slower.
    BeamSearch { beam_size: i32, patience: f32 },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Greedy { best_of: 1 }
    }
}

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// Settings shared by every transcription run of one engine.
///
/// The spoken language is not part of this struct; it is passed with each
/// call because it follows the session's source-language selection.
///
/// ```
/// use quick_translate::stt::{SamplingStrategy, TranscribeParams};
///
/// let params = TranscribeParams {
///     strategy: SamplingStrategy::BeamSearch { beam_size: 5, patience: 1.0 },
///     ..TranscribeParams::default()
/// };
/// assert!(params.suppress_progress);
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    pub strategy: SamplingStrategy,
    /// CPU threads handed to Whisper.
    pub n_threads: i32,
    /// Keep Whisper quiet on stderr.
    pub suppress_progress: bool,
    /// Forbid blank output at the start of decoding.
    pub suppress_blank: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            strategy: SamplingStrategy::default(),
            n_threads: optimal_threads(),
            suppress_progress: true,
            suppress_blank: true,
        }
    }
}

/// Available parallelism capped at 8; Whisper gains little beyond that.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// TranscriptionResult
// ---------------------------------------------------------------------------

/// Output of one Whisper run.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Concatenated segment text, trimmed.
    pub text: String,
    /// Language hint the run used; `None` means Whisper auto-detected.
    pub language: Option<String>,
    /// Wall-clock inference time.
    pub duration_ms: u128,
}
