//! Translation gateway.
//!
//! This module provides:
//! * [`Translator`]: async trait implemented by every gateway backend.
//! * [`ApiTranslator`]: OpenAI-compatible chat-completions backend.
//! * [`Passthrough`]: wrapper that skips the backend for identical languages.
//! * [`PromptBuilder`]: few-shot translation prompt.
//! * [`TranslateError`]: failure variants of a translation request.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use quick_translate::config::AppConfig;
//! use quick_translate::language::{Language, SourceLanguage};
//! use quick_translate::translate::{ApiTranslator, Passthrough, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = Passthrough::new(ApiTranslator::from_config(&config.translator));
//!
//!     let text = translator
//!         .translate(SourceLanguage::Auto, Language::En, "Hola mundo")
//!         .await
//!         .unwrap();
//!     println!("{text}");
//! }
//! ```

pub mod gateway;
pub mod passthrough;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use gateway::{ApiTranslator, TranslateError, Translator};
pub use passthrough::Passthrough;
pub use prompt::{ChatMessage, PromptBuilder, Role};
