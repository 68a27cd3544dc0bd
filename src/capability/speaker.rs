//! Speech output through the Google Translate TTS endpoint.
//!
//! The endpoint only accepts short inputs, so text is cut into chunks of at
//! most [`MAX_CHUNK_CHARS`] characters (whole sentences where possible, then
//! whole words, then raw characters).  Every chunk is fetched as MP3 first;
//! playback then runs on a blocking thread through a single `rodio` sink so
//! the chunks play back to back.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStreamBuilder, Sink};

use super::{CapabilityError, Speaker};

const TTS_API_URL: &str = "https://translate.google.com/translate_tts";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Longest input the TTS endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// Chunking
// ---------------------------------------------------------------------------

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Sentences (ending in `.`, `!`, `?` or a newline) are packed together while
/// they fit; a longer sentence is split at word boundaries, and a single
/// word longer than `max_chars` is split between characters.
///
/// ```rust
/// use quick_translate::capability::split_for_tts;
///
/// let chunks = split_for_tts("Hola. ¿Qué tal?", 100);
/// assert_eq!(chunks, vec!["Hola. ¿Qué tal?"]);
/// ```
pub fn split_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    let sentences = text
        .split_inclusive(|c| matches!(c, '.' | '!' | '?' | '\n'))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    for sentence in sentences {
        if sentence.chars().count() <= max_chars {
            pack(&mut chunks, &mut current, sentence, max_chars);
            continue;
        }
        for word in sentence.split_whitespace() {
            for piece in split_chars(word, max_chars) {
                pack(&mut chunks, &mut current, piece, max_chars);
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Append `piece` to `current`, flushing first if it would overflow.
fn pack(chunks: &mut Vec<String>, current: &mut String, piece: &str, max_chars: usize) {
    if !current.is_empty() {
        let joined = current.chars().count() + 1 + piece.chars().count();
        if joined > max_chars {
            chunks.push(std::mem::take(current));
        } else {
            current.push(' ');
        }
    }
    current.push_str(piece);
}

fn split_chars(word: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = word;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(cut);
        pieces.push(head);
        rest = tail;
    }
    pieces
}

// ---------------------------------------------------------------------------
// GoogleTtsSpeaker
// ---------------------------------------------------------------------------

pub struct GoogleTtsSpeaker {
    client: reqwest::Client,
    rate: f32,
}

impl GoogleTtsSpeaker {
    /// `rate` is the playback speed sent to the service (1.0 = normal).
    pub fn new(rate: f32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, rate }
    }

    /// Request URL for one chunk.  The service keys voices on the primary
    /// language subtag, so `es-MX` is sent as `es`.
    fn chunk_url(&self, chunk: &str, voice_tag: &str) -> String {
        let lang = voice_tag
            .split('-')
            .next()
            .unwrap_or(voice_tag)
            .to_ascii_lowercase();
        format!(
            "{TTS_API_URL}?ie=UTF-8&client=tw-ob&tl={lang}&ttsspeed={}&q={}",
            self.rate,
            urlencoding::encode(chunk)
        )
    }

    async fn fetch(&self, chunk: &str, voice_tag: &str) -> Result<Vec<u8>, CapabilityError> {
        let response = self
            .client
            .get(self.chunk_url(chunk, voice_tag))
            .send()
            .await
            .map_err(|e| CapabilityError::SpeechRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CapabilityError::SpeechStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CapabilityError::SpeechRequest(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl Default for GoogleTtsSpeaker {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Play MP3 clips back to back on the default output device.  Blocks until
/// playback ends.
fn play_clips(clips: Vec<Vec<u8>>) -> Result<(), CapabilityError> {
    let stream = OutputStreamBuilder::from_default_device()
        .and_then(|builder| builder.open_stream())
        .map_err(|e| CapabilityError::Playback(e.to_string()))?;
    let sink = Sink::connect_new(stream.mixer());

    for clip in clips {
        let source = Decoder::new(Cursor::new(clip))
            .map_err(|e| CapabilityError::Playback(format!("cannot decode MP3: {e}")))?;
        sink.append(source);
    }

    sink.sleep_until_end();
    Ok(())
}

#[async_trait]
impl Speaker for GoogleTtsSpeaker {
    async fn speak(&self, text: &str, voice_tag: &str) -> Result<(), CapabilityError> {
        let chunks = split_for_tts(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Ok(());
        }

        log::debug!("speech: {} chunk(s) as {voice_tag}", chunks.len());
        let mut clips = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            clips.push(self.fetch(chunk, voice_tag).await?);
        }

        tokio::task::spawn_blocking(move || play_clips(clips)).await?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
