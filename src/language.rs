//! Supported languages and the auto-detect sentinel.
//!
//! [`Language`] is the closed set of concrete languages the widget offers.
//! [`SourceLanguage`] adds the auto-detect sentinel, which is only valid in
//! the source slot. The target slot is typed as [`Language`], so an
//! auto-detect target cannot be represented at all.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code used for the auto-detect sentinel in config files and prompts.
pub const AUTO_CODE: &str = "auto";

// ---------------------------------------------------------------------------
// LanguageError
// ---------------------------------------------------------------------------

/// Errors produced when parsing a language code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    /// The code is not one of the supported languages.
    #[error("unsupported language code: {0}")]
    Unsupported(String),

    /// `"auto"` was given where a concrete language is required.
    #[error("auto-detect is only valid as a source language")]
    AutoNotAllowed,
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A concrete, supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    De,
}

impl Language {
    /// Every supported language, in display order.
    pub const ALL: [Language; 3] = [Language::En, Language::Es, Language::De];

    /// ISO-639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::De => "de",
        }
    }

    /// Name shown in the selectors and sent to the model.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::De => "Deutsch",
        }
    }

    /// BCP-47 voice tag used for speech synthesis.
    pub fn voice_tag(self) -> &'static str {
        match self {
            Language::En => "en-GB",
            Language::Es => "es-MX",
            Language::De => "de-DE",
        }
    }

    /// Parse a language code (case-insensitive).
    ///
    /// ```
    /// use quick_translate::language::{Language, LanguageError};
    ///
    /// assert_eq!(Language::from_code("ES"), Ok(Language::Es));
    /// assert_eq!(Language::from_code("auto"), Err(LanguageError::AutoNotAllowed));
    /// ```
    pub fn from_code(code: &str) -> Result<Self, LanguageError> {
        let code = code.trim().to_ascii_lowercase();
        match code.as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "de" => Ok(Language::De),
            AUTO_CODE => Err(LanguageError::AutoNotAllowed),
            _ => Err(LanguageError::Unsupported(code)),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// SourceLanguage
// ---------------------------------------------------------------------------

/// The value of the source-language slot: a concrete language or auto-detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceLanguage {
    /// Infer the language from the text.
    #[default]
    Auto,
    Language(Language),
}

impl SourceLanguage {
    pub fn is_auto(self) -> bool {
        matches!(self, SourceLanguage::Auto)
    }

    /// The concrete language, or `None` for auto-detect.
    pub fn language(self) -> Option<Language> {
        match self {
            SourceLanguage::Auto => None,
            SourceLanguage::Language(lang) => Some(lang),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            SourceLanguage::Auto => AUTO_CODE,
            SourceLanguage::Language(lang) => lang.code(),
        }
    }

    /// Parse a source-language code; `"auto"` maps to [`SourceLanguage::Auto`].
    pub fn from_code(code: &str) -> Result<Self, LanguageError> {
        match Language::from_code(code) {
            Ok(lang) => Ok(SourceLanguage::Language(lang)),
            Err(LanguageError::AutoNotAllowed) => Ok(SourceLanguage::Auto),
            Err(e) => Err(e),
        }
    }

    /// Returns `true` when this source names exactly `target`.
    pub fn matches(self, target: Language) -> bool {
        self == SourceLanguage::Language(target)
    }
}

impl From<Language> for SourceLanguage {
    fn from(lang: Language) -> Self {
        SourceLanguage::Language(lang)
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::Auto => f.write_str("Detect language"),
            SourceLanguage::Language(lang) => lang.fmt(f),
        }
    }
}
