//! quick-translate: a desktop translation widget.
//!
//! Source text typed (or spoken) into the left pane is debounced and sent to
//! an OpenAI-compatible chat-completions endpoint; the translation appears in
//! the right pane, ready to be copied or read aloud.

pub mod app;
pub mod audio;
pub mod capability;
pub mod config;
pub mod language;
pub mod session;
pub mod stt;
pub mod translate;
