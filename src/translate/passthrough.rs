//! Same-language short-circuit around any [`Translator`].
//!
//! When the source slot names exactly the target language there is nothing to
//! translate, so [`Passthrough`] hands the text straight back and the wrapped
//! gateway is never called.  Auto-detect always goes through, since the text
//! may or may not already be in the target language.

use async_trait::async_trait;

use crate::language::{Language, SourceLanguage};
use crate::translate::gateway::{TranslateError, Translator};

/// Wraps `inner`, skipping it for identical source/target languages.
///
/// ```
/// use quick_translate::config::TranslatorConfig;
/// use quick_translate::translate::{ApiTranslator, Passthrough};
///
/// let translator = Passthrough::new(ApiTranslator::from_config(&TranslatorConfig::default()));
/// ```
pub struct Passthrough<T: Translator> {
    inner: T,
}

impl<T: Translator> Passthrough<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Translator> Translator for Passthrough<T> {
    async fn translate(
        &self,
        source: SourceLanguage,
        target: Language,
        text: &str,
    ) -> Result<String, TranslateError> {
        if source.matches(target) {
            log::debug!("translate: {} -> {} is identity", source.code(), target.code());
            return Ok(text.to_string());
        }
        self.inner.translate(source, target, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and echoes an upper-cased copy of the input.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for Counting {
        async fn translate(
            &self,
            _source: SourceLanguage,
            _target: Language,
            text: &str,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn identical_languages_skip_inner() {
        let translator = Passthrough::new(Counting::default());
        let out = translator
            .translate(Language::Es.into(), Language::Es, "Hola")
            .await
            .unwrap();
        assert_eq!(out, "Hola");
        assert_eq!(translator.inner().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn different_languages_reach_inner() {
        let translator = Passthrough::new(Counting::default());
        let out = translator
            .translate(Language::Es.into(), Language::En, "hola")
            .await
            .unwrap();
        assert_eq!(out, "HOLA");
        assert_eq!(translator.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn auto_source_always_reaches_inner() {
        let translator = Passthrough::new(Counting::default());
        translator
            .translate(SourceLanguage::Auto, Language::En, "hello")
            .await
            .unwrap();
        assert_eq!(translator.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn passthrough_is_object_safe() {
        let _: Box<dyn Translator> = Box::new(Passthrough::new(Counting::default()));
    }
}
