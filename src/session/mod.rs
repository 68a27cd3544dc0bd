//! Translation session: state reducer, debouncer and the runner tying them
//! to the gateway.
//!
//! # Architecture
//!
//! ```text
//! TranslateApp (egui)
//!        │ dispatch(Action)
//!        ▼
//! Session  ── owns ──▶ SessionState  (apply(Action) → Outcome)
//!        │
//!        ├─ Debouncer<String> ── Settled(text) ──┐
//!        │                                       │ mpsc (unbounded)
//!        └─ tokio::spawn(Translator::translate) ─┤
//!                                                ▼
//!                                  Session::poll()  ← once per frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quick_translate::config::AppConfig;
//! use quick_translate::session::Session;
//! use quick_translate::translate::{ApiTranslator, Passthrough};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = Arc::new(Passthrough::new(ApiTranslator::from_config(&config.translator)));
//!     let mut session = Session::new(&config.session, translator, tokio::runtime::Handle::current());
//!
//!     session.set_source_text("Hola");
//!     session.next().await; // debounce settled, request sent
//!     session.next().await; // response applied
//!     println!("{}", session.state().result_text);
//! }
//! ```

pub mod debounce;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use debounce::{Debouncer, Timer, TimerHandle};
pub use runner::{Session, SessionEvent};
pub use state::{Action, Outcome, SessionState};
