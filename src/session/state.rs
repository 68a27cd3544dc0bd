//! Session state and its transition function.
//!
//! [`SessionState`] is the five-field record the UI renders.  It is mutated
//! exclusively through [`SessionState::apply`], which takes one [`Action`]
//! and applies the matching transition rule:
//!
//! | Action              | Effect                                                        |
//! |---------------------|---------------------------------------------------------------|
//! | `SetSourceLanguage` | no-op if unchanged; else set, clear result, re-arm loading    |
//! | `SetTargetLanguage` | no-op if unchanged; else set, clear result, re-arm loading    |
//! | `SwapLanguages`     | no-op while source is auto-detect; else exchange, re-arm      |
//! | `SetSourceText`     | set text, clear result, `loading = !text.is_empty()`          |
//! | `SetResult`         | set result, `loading = false`                                 |
//! | `ClearText`         | empty text and result, `loading = false`                      |
//!
//! "Re-arm loading" means `loading = !source_text.is_empty()`.

use crate::language::{Language, SourceLanguage};

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The closed set of operations on [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetSourceLanguage(SourceLanguage),
    SetTargetLanguage(Language),
    SwapLanguages,
    SetSourceText(String),
    /// Translated text, or the error marker after a gateway failure.
    SetResult(String),
    ClearText,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What an [`Action`] did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Unchanged,
    /// Only output fields (`result_text`, `loading`) changed.
    OutputChanged,
    /// The source language, target language or source text changed, so any
    /// translation requested earlier no longer matches the state.
    InputsChanged,
}

impl Outcome {
    pub fn inputs_changed(self) -> bool {
        self == Outcome::InputsChanged
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Everything the translation widget shows at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub source_language: SourceLanguage,
    pub target_language: Language,
    pub source_text: String,
    /// Translation output, empty, or the error marker.
    pub result_text: String,
    /// `true` while a translation for the current inputs is outstanding.
    pub loading: bool,
}

impl SessionState {
    /// Fresh session: auto-detect source, `target` as target, no text.
    pub fn new(target: Language) -> Self {
        Self {
            source_language: SourceLanguage::Auto,
            target_language: target,
            source_text: String::new(),
            result_text: String::new(),
            loading: false,
        }
    }

    /// Apply one action.  Total: every action on every state is valid, and
    /// precondition violations are silent no-ops.
    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::SetSourceLanguage(lang) => {
                if self.source_language == lang {
                    return Outcome::Unchanged;
                }
                self.source_language = lang;
                self.invalidate_result();
                Outcome::InputsChanged
            }
            Action::SetTargetLanguage(lang) => {
                if self.target_language == lang {
                    return Outcome::Unchanged;
                }
                self.target_language = lang;
                self.invalidate_result();
                Outcome::InputsChanged
            }
            Action::SwapLanguages => {
                let SourceLanguage::Language(source) = self.source_language else {
                    return Outcome::Unchanged;
                };
                self.source_language = SourceLanguage::Language(self.target_language);
                self.target_language = source;
                self.invalidate_result();
                Outcome::InputsChanged
            }
            Action::SetSourceText(text) => {
                self.source_text = text;
                self.invalidate_result();
                Outcome::InputsChanged
            }
            Action::SetResult(text) => {
                self.result_text = text;
                self.loading = false;
                Outcome::OutputChanged
            }
            Action::ClearText => {
                let was_empty = self.source_text.is_empty()
                    && self.result_text.is_empty()
                    && !self.loading;
                self.source_text.clear();
                self.result_text.clear();
                self.loading = false;
                if was_empty {
                    Outcome::Unchanged
                } else {
                    Outcome::InputsChanged
                }
            }
        }
    }

    /// `true` when the swap control should be enabled.
    pub fn can_swap(&self) -> bool {
        !self.source_language.is_auto()
    }

    fn invalidate_result(&mut self) {
        self.result_text.clear();
        self.loading = !self.source_text.is_empty();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn es() -> SourceLanguage {
        SourceLanguage::Language(Language::Es)
    }

    /// A state with text, a result and a concrete source language.
    fn translated() -> SessionState {
        SessionState {
            source_language: es(),
            target_language: Language::En,
            source_text: "Hola".into(),
            result_text: "Hello".into(),
            loading: false,
        }
    }

    // ---- initial state ---

    #[test]
    fn new_state_has_defaults() {
        let st = SessionState::new(Language::En);
        assert_eq!(st.source_language, SourceLanguage::Auto);
        assert_eq!(st.target_language, Language::En);
        assert!(st.source_text.is_empty());
        assert!(st.result_text.is_empty());
        assert!(!st.loading);
    }

    // ---- SetSourceText ---

    #[test]
    fn set_source_text_arms_loading_and_clears_result() {
        let mut st = translated();
        let outcome = st.apply(Action::SetSourceText("Adiós".into()));
        assert_eq!(outcome, Outcome::InputsChanged);
        assert_eq!(st.source_text, "Adiós");
        assert!(st.result_text.is_empty());
        assert!(st.loading);
    }

    #[test]
    fn set_empty_source_text_disarms_loading() {
        let mut st = SessionState::default();
        st.apply(Action::SetSourceText("Hola".into()));
        assert!(st.loading);
        st.apply(Action::SetSourceText(String::new()));
        assert!(!st.loading);
        assert!(st.result_text.is_empty());
    }

    #[test]
    fn loading_tracks_latest_text_across_sequences() {
        let texts = ["a", "", "ab", "abc", "", "", "x"];
        let mut st = SessionState::default();
        for text in texts {
            st.apply(Action::SetSourceText(text.into()));
            assert_eq!(st.loading, !text.is_empty(), "after {text:?}");
        }
        st.apply(Action::SetResult("y".into()));
        assert!(!st.loading);
    }

    #[test]
    fn set_source_text_clears_result_even_when_text_equals_result() {
        let mut st = translated();
        st.apply(Action::SetSourceText("Hello".into()));
        assert!(st.result_text.is_empty());
    }

    #[test]
    fn set_same_source_text_still_clears_result() {
        let mut st = translated();
        st.apply(Action::SetSourceText("Hola".into()));
        assert!(st.result_text.is_empty());
        assert!(st.loading);
    }

    // ---- languages ---

    #[test]
    fn set_source_language_clears_result_and_rearms() {
        let mut st = translated();
        let outcome = st.apply(Action::SetSourceLanguage(SourceLanguage::Auto));
        assert_eq!(outcome, Outcome::InputsChanged);
        assert_eq!(st.source_language, SourceLanguage::Auto);
        assert!(st.result_text.is_empty());
        assert!(st.loading);
    }

    #[test]
    fn set_source_language_without_text_does_not_load() {
        let mut st = SessionState::default();
        st.apply(Action::SetSourceLanguage(es()));
        assert!(!st.loading);
    }

    #[test]
    fn set_same_source_language_is_full_noop() {
        let mut st = translated();
        let before = st.clone();
        let outcome = st.apply(Action::SetSourceLanguage(es()));
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(st, before);
    }

    #[test]
    fn set_target_language_clears_result_and_rearms() {
        let mut st = translated();
        st.apply(Action::SetTargetLanguage(Language::De));
        assert_eq!(st.target_language, Language::De);
        assert!(st.result_text.is_empty());
        assert!(st.loading);
    }

    #[test]
    fn set_same_target_language_is_full_noop() {
        let mut st = translated();
        let before = st.clone();
        assert_eq!(
            st.apply(Action::SetTargetLanguage(Language::En)),
            Outcome::Unchanged
        );
        assert_eq!(st, before);
    }

    // ---- SwapLanguages ---

    #[test]
    fn swap_with_auto_source_is_noop() {
        let mut st = translated();
        st.source_language = SourceLanguage::Auto;
        let before = st.clone();
        assert_eq!(st.apply(Action::SwapLanguages), Outcome::Unchanged);
        assert_eq!(st, before);
        assert!(!st.can_swap());
    }

    #[test]
    fn swap_exchanges_languages_only() {
        let mut st = translated();
        st.apply(Action::SwapLanguages);
        assert_eq!(st.source_language, SourceLanguage::Language(Language::En));
        assert_eq!(st.target_language, Language::Es);
        assert_eq!(st.source_text, "Hola");
        assert!(st.result_text.is_empty());
        assert!(st.loading);
    }

    #[test]
    fn swap_twice_restores_languages() {
        let mut st = translated();
        st.apply(Action::SwapLanguages);
        st.apply(Action::SwapLanguages);
        assert_eq!(st.source_language, es());
        assert_eq!(st.target_language, Language::En);
    }

    // ---- SetResult ---

    #[test]
    fn set_result_stores_text_and_stops_loading() {
        let mut st = SessionState::default();
        st.apply(Action::SetSourceText("Hola".into()));
        let outcome = st.apply(Action::SetResult("Hello".into()));
        assert_eq!(outcome, Outcome::OutputChanged);
        assert_eq!(st.result_text, "Hello");
        assert!(!st.loading);
        assert_eq!(st.source_text, "Hola");
    }

    // ---- ClearText ---

    #[test]
    fn clear_text_resets_text_fields() {
        for mut st in [translated(), SessionState::default(), {
            let mut s = translated();
            s.loading = true;
            s.result_text.clear();
            s
        }] {
            let languages = (st.source_language, st.target_language);
            st.apply(Action::ClearText);
            assert!(st.source_text.is_empty());
            assert!(st.result_text.is_empty());
            assert!(!st.loading);
            assert_eq!((st.source_language, st.target_language), languages);
        }
    }

    #[test]
    fn clear_on_empty_state_reports_unchanged() {
        let mut st = SessionState::default();
        assert_eq!(st.apply(Action::ClearText), Outcome::Unchanged);
    }

    #[test]
    fn outcome_inputs_changed_helper() {
        assert!(Outcome::InputsChanged.inputs_changed());
        assert!(!Outcome::OutputChanged.inputs_changed());
        assert!(!Outcome::Unchanged.inputs_changed());
    }
}
