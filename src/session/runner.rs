//! Session runner: the single owner of [`SessionState`].
//!
//! [`Session`] applies every [`Action`] in the order it is dispatched,
//! debounces source-text edits, and issues translation requests on the tokio
//! runtime.  Background work reports back as [`SessionEvent`]s over an
//! unbounded channel that the owner drains with [`Session::poll`] (once per
//! UI frame) or awaits with [`Session::next`].
//!
//! # Flow
//!
//! ```text
//! dispatch(SetSourceText)      ─▶ state: loading, result cleared
//!                               └▶ debouncer.push(text)
//! SessionEvent::Settled(text)  ─▶ request(text)          [tokio task]
//! SessionEvent::Translated     ─▶ Ok  → SetResult(text)
//!                                 Err → SetResult(error marker)
//! dispatch(language change)    ─▶ request(current text)  [unless a settle is pending]
//! ```
//!
//! # Staleness
//!
//! Every action that changes the translation inputs bumps a generation
//! counter, and each request carries the generation it was issued under.
//! Responses from an older generation are dropped, so a slow reply for
//! superseded input can never overwrite a newer result.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::config::SessionConfig;
use crate::language::{Language, SourceLanguage};
use crate::session::debounce::{Debouncer, Timer};
use crate::session::state::{Action, SessionState};
use crate::translate::{TranslateError, Translator};

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Completion of background work, delivered back to the owning thread.
#[derive(Debug)]
pub enum SessionEvent {
    /// The source text has been quiet for the debounce window.
    Settled(String),
    /// A translation request finished.
    Translated {
        generation: u64,
        result: Result<String, TranslateError>,
    },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owns the session state and drives translation requests.
pub struct Session {
    state: SessionState,
    translator: Arc<dyn Translator>,
    runtime: Handle,
    debouncer: Debouncer<String>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    error_marker: String,
    /// Bumped whenever languages or source text change.
    generation: u64,
    /// Generation of the most recent request, if any.
    requested: Option<u64>,
    in_flight: usize,
}

impl Session {
    /// Create a session with the configured default target language.
    ///
    /// `runtime` runs the debounce timers and gateway calls; the session
    /// itself may live on a thread outside the runtime.
    pub fn new(config: &SessionConfig, translator: Arc<dyn Translator>, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let settled_tx = events_tx.clone();
        let debouncer = Debouncer::new(
            Timer::new(runtime.clone()),
            config.debounce_window(),
            move |text: String| {
                let _ = settled_tx.send(SessionEvent::Settled(text));
            },
        );

        Self {
            state: SessionState::new(config.default_target),
            translator,
            runtime,
            debouncer,
            events_tx,
            events_rx,
            error_marker: config.error_marker.clone(),
            generation: 0,
            requested: None,
            in_flight: 0,
        }
    }

    /// Read-only snapshot for rendering.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// `true` while a settle or a translation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.state.loading || self.debouncer.is_pending() || self.in_flight > 0
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Apply `action` and schedule whatever follow-up work it implies.
    pub fn dispatch(&mut self, action: Action) {
        let follow_up = match &action {
            Action::SetSourceText(text) => FollowUp::Debounce(text.clone()),
            Action::SetSourceLanguage(_)
            | Action::SetTargetLanguage(_)
            | Action::SwapLanguages => FollowUp::Retranslate,
            Action::ClearText => FollowUp::CancelPending,
            Action::SetResult(_) => FollowUp::None,
        };

        let outcome = self.state.apply(action);
        if !outcome.inputs_changed() {
            return;
        }
        self.generation += 1;

        match follow_up {
            FollowUp::Debounce(text) => self.debouncer.push(text),
            FollowUp::Retranslate => {
                // A pending settle will pick up the new languages itself.
                if !self.debouncer.is_pending() {
                    let text = self.state.source_text.clone();
                    self.request(text);
                }
            }
            FollowUp::CancelPending => self.debouncer.cancel(),
            FollowUp::None => {}
        }
    }

    pub fn set_source_language(&mut self, lang: SourceLanguage) {
        self.dispatch(Action::SetSourceLanguage(lang));
    }

    pub fn set_target_language(&mut self, lang: Language) {
        self.dispatch(Action::SetTargetLanguage(lang));
    }

    pub fn swap_languages(&mut self) {
        self.dispatch(Action::SwapLanguages);
    }

    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SetSourceText(text.into()));
    }

    pub fn clear_text(&mut self) {
        self.dispatch(Action::ClearText);
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Handle every event that has already arrived.  Never blocks.
    ///
    /// Returns `true` when at least one event was processed.
    pub fn poll(&mut self) -> bool {
        let mut handled = false;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle(event);
            handled = true;
        }
        handled
    }

    /// Wait for the next event and handle it.
    pub async fn next(&mut self) {
        // The session holds a sender, so the channel never closes while
        // `self` is alive.
        if let Some(event) = self.events_rx.recv().await {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Settled(text) => {
                if text.is_empty() || text != self.state.source_text {
                    return;
                }
                if self.requested == Some(self.generation) {
                    log::debug!("session: generation {} already requested", self.generation);
                    return;
                }
                self.request(text);
            }
            SessionEvent::Translated { generation, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if generation != self.generation {
                    log::debug!(
                        "session: dropping stale response (generation {generation}, current {})",
                        self.generation
                    );
                    return;
                }
                let text = match result {
                    Ok(text) => text,
                    Err(e) => {
                        log::warn!("session: translation failed: {e}");
                        self.error_marker.clone()
                    }
                };
                self.state.apply(Action::SetResult(text));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Gateway
    // -----------------------------------------------------------------------

    /// Spawn a translation of `text` with the current languages.
    fn request(&mut self, text: String) {
        if text.is_empty() {
            return;
        }

        let generation = self.generation;
        let source = self.state.source_language;
        let target = self.state.target_language;
        let translator = Arc::clone(&self.translator);
        let tx = self.events_tx.clone();

        self.requested = Some(generation);
        self.in_flight += 1;
        log::debug!(
            "session: requesting {} -> {} (generation {generation})",
            source.code(),
            target.code()
        );

        self.runtime.spawn(async move {
            let result = translator.translate(source, target, &text).await;
            let _ = tx.send(SessionEvent::Translated { generation, result });
        });
    }
}

/// Work scheduled after an action changed the translation inputs.
enum FollowUp {
    Debounce(String),
    Retranslate,
    CancelPending,
    None,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::translate::Passthrough;

    type Call = (SourceLanguage, Language, String);

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Records every call; replies with a fixed text or upper-cases the input.
    /// Inputs listed in `slow` take 1 s, everything else 10 ms.
    #[derive(Default)]
    struct Recording {
        reply: Option<String>,
        slow: Vec<&'static str>,
        calls: Mutex<Vec<Call>>,
    }

    impl Recording {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Translator for Recording {
        async fn translate(
            &self,
            source: SourceLanguage,
            target: Language,
            text: &str,
        ) -> Result<String, TranslateError> {
            self.calls
                .lock()
                .unwrap()
                .push((source, target, text.to_string()));
            let delay = if self.slow.contains(&text) { 1_000 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(self.reply.clone().unwrap_or_else(|| text.to_uppercase()))
        }
    }

    struct Failing;

    #[async_trait]
    impl Translator for Failing {
        async fn translate(
            &self,
            _source: SourceLanguage,
            _target: Language,
            _text: &str,
        ) -> Result<String, TranslateError> {
            Err(TranslateError::Status(500))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn make_session(translator: Arc<dyn Translator>) -> Session {
        Session::new(&SessionConfig::default(), translator, Handle::current())
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn typing_then_settling_translates() {
        let translator = Arc::new(Recording::replying("Hello"));
        let mut session = make_session(translator.clone());
        let start = Instant::now();

        session.set_source_text("Hola");
        assert_eq!(session.state().source_text, "Hola");
        assert!(session.state().result_text.is_empty());
        assert!(session.state().loading);

        session.next().await; // settled
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert!(session.state().loading);

        session.next().await; // translated
        assert_eq!(
            translator.calls(),
            vec![(SourceLanguage::Auto, Language::En, "Hola".to_string())]
        );
        assert_eq!(session.state().result_text, "Hello");
        assert!(!session.state().loading);
        assert!(!session.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_issues_single_request() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());

        for text in ["H", "Ho", "Hol", "Hola"] {
            session.set_source_text(text);
            tokio::time::sleep(Duration::from_millis(50)).await;
            assert!(!session.poll());
        }

        session.next().await;
        session.next().await;

        assert_eq!(translator.calls().len(), 1);
        assert_eq!(translator.calls()[0].2, "Hola");
        assert_eq!(session.state().result_text, "HOLA");
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_failure_shows_error_marker() {
        let mut session = make_session(Arc::new(Failing));

        session.set_source_text("Hola");
        session.next().await;
        session.next().await;

        assert_eq!(session.state().result_text, "Error");
        assert!(!session.state().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn same_language_returns_text_without_provider_call() {
        let inner = Recording::replying("should not be used");
        let translator = Arc::new(Passthrough::new(inner));
        let mut session = make_session(translator.clone());

        session.set_source_language(Language::Es.into());
        session.set_target_language(Language::Es);
        session.set_source_text("Hola");
        session.next().await;
        session.next().await;

        assert_eq!(session.state().result_text, "Hola");
        assert!(translator.inner().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let translator = Arc::new(Recording {
            slow: vec!["uno"],
            ..Recording::default()
        });
        let mut session = make_session(translator.clone());

        session.set_source_text("uno");
        session.next().await; // settled "uno" -> slow request

        session.set_source_text("dos");
        session.next().await; // settled "dos" -> fast request
        session.next().await; // "DOS" arrives first
        assert_eq!(session.state().result_text, "DOS");

        session.next().await; // late "UNO"
        assert_eq!(session.state().result_text, "DOS");
        assert!(!session.state().loading);
        assert_eq!(translator.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_discards_in_flight_response() {
        let translator = Arc::new(Recording {
            slow: vec!["Hola"],
            ..Recording::default()
        });
        let mut session = make_session(translator);

        session.set_source_text("Hola");
        session.next().await; // request in flight
        session.clear_text();
        session.next().await; // late response

        let st = session.state();
        assert!(st.source_text.is_empty());
        assert!(st.result_text.is_empty());
        assert!(!st.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_pending_settle() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());

        session.set_source_text("Hola");
        session.clear_text();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!session.poll());
        assert!(translator.calls().is_empty());
        assert!(!session.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn language_change_retranslates_immediately() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());

        session.set_source_text("hola");
        session.next().await;
        session.next().await;
        assert_eq!(session.state().result_text, "HOLA");

        session.set_target_language(Language::De);
        assert!(session.state().loading);
        assert!(session.state().result_text.is_empty());

        session.next().await;
        assert_eq!(session.state().result_text, "HOLA");
        let calls = translator.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], (SourceLanguage::Auto, Language::De, "hola".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn language_change_during_debounce_uses_single_request() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());

        session.set_source_text("hola");
        session.set_target_language(Language::De);
        session.next().await;
        session.next().await;

        assert_eq!(
            translator.calls(),
            vec![(SourceLanguage::Auto, Language::De, "hola".to_string())]
        );
        assert_eq!(session.state().result_text, "HOLA");
    }

    #[tokio::test(start_paused = true)]
    async fn swap_retranslates_with_exchanged_languages() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());

        session.set_source_language(Language::Es.into());
        session.set_source_text("hola");
        session.next().await;
        session.next().await;

        session.swap_languages();
        session.next().await;

        let calls = translator.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, SourceLanguage::Language(Language::En));
        assert_eq!(calls[1].1, Language::Es);
        assert_eq!(session.state().source_text, "hola");
    }

    #[tokio::test(start_paused = true)]
    async fn swap_with_auto_source_does_nothing() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());
        let before = session.state().clone();

        session.swap_languages();

        assert_eq!(session.state(), &before);
        assert!(!session.is_busy());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(translator.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn emptied_text_never_requests() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());

        session.set_source_text("a");
        session.set_source_text("");
        session.next().await; // settled ""

        assert!(translator.calls().is_empty());
        assert!(!session.state().loading);
        assert!(!session.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn language_change_without_text_does_not_request() {
        let translator = Arc::new(Recording::default());
        let mut session = make_session(translator.clone());

        session.set_target_language(Language::Es);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!session.poll());
        assert!(translator.calls().is_empty());
        assert!(!session.state().loading);
    }
}
