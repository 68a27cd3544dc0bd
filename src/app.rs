//! Translation window: the egui/eframe application.
//!
//! # Layout
//!
//! ```text
//! ┌───────────────────────────┬─────┬───────────────────────────┐
//! │ [Detect language ▾]       │     │ [English ▾]               │
//! │ ┌───────────────────────┐ │  ⇄  │ ┌───────────────────────┐ │
//! │ │ Enter text            │ │     │ │ Translation           │ │
//! │ └───────────────────────┘ │  ✕  │ └───────────────────────┘ │
//! │ 🔊 🎤                     │     │ 📋 🔊                     │
//! └───────────────────────────┴─────┴───────────────────────────┘
//! ```
//!
//! [`TranslateApp`] owns the [`Session`] and is its only writer: every frame
//! it drains session events, drains finished capability tasks, renders the
//! current [`SessionState`] and turns widget interactions into actions.
//! Speech, voice input and clipboard calls are fire-and-forget; failures are
//! logged and never touch the session.

use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::capability::{Capabilities, CapabilityError};
use crate::language::{Language, SourceLanguage};
use crate::session::{Session, SessionState};

const MIDDLE_WIDTH: f32 = 40.0;
const PANE_ROWS: usize = 8;

// ---------------------------------------------------------------------------
// TaskEvent
// ---------------------------------------------------------------------------

/// Completion of a capability call started from the UI.
#[derive(Debug)]
pub enum TaskEvent {
    Transcribed(Result<String, CapabilityError>),
    Spoken(Result<(), CapabilityError>),
}

// ---------------------------------------------------------------------------
// TranslateApp
// ---------------------------------------------------------------------------

pub struct TranslateApp {
    session: Session,
    capabilities: Capabilities,
    runtime: Handle,

    task_tx: mpsc::UnboundedSender<TaskEvent>,
    task_rx: mpsc::UnboundedReceiver<TaskEvent>,

    /// A voice-input recording is in progress.
    listening: bool,
    /// Speech playbacks still running.
    speaking: usize,
}

impl TranslateApp {
    pub fn new(session: Session, capabilities: Capabilities, runtime: Handle) -> Self {
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        Self {
            session,
            capabilities,
            runtime,
            task_tx,
            task_rx,
            listening: false,
            speaking: 0,
        }
    }

    // ── Background tasks ─────────────────────────────────────────────────

    fn poll_tasks(&mut self) {
        while let Ok(event) = self.task_rx.try_recv() {
            match event {
                TaskEvent::Transcribed(result) => {
                    self.listening = false;
                    match result {
                        Ok(text) => self.session.set_source_text(text),
                        Err(e) => log::warn!("voice input failed: {e}"),
                    }
                }
                TaskEvent::Spoken(result) => {
                    self.speaking = self.speaking.saturating_sub(1);
                    if let Err(e) = result {
                        log::warn!("speech failed: {e}");
                    }
                }
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.session.is_busy() || self.listening || self.speaking > 0
    }

    fn speak(&mut self, text: String, voice_tag: &'static str) {
        let speaker = self.capabilities.speaker.clone();
        let tx = self.task_tx.clone();
        self.speaking += 1;
        self.runtime.spawn(async move {
            let result = speaker.speak(&text, voice_tag).await;
            let _ = tx.send(TaskEvent::Spoken(result));
        });
    }

    fn listen(&mut self) {
        let Some(transcriber) = self.capabilities.transcriber.clone() else {
            return;
        };
        let language = self.session.state().source_language;
        let tx = self.task_tx.clone();
        self.listening = true;
        self.runtime.spawn(async move {
            let result = transcriber.transcribe(language).await;
            let _ = tx.send(TaskEvent::Transcribed(result));
        });
    }

    fn copy(&self, text: &str) {
        if let Err(e) = self.capabilities.clipboard.copy(text) {
            log::warn!("copy failed: {e}");
        }
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_source(&mut self, ui: &mut egui::Ui) {
        let state = self.session.state();
        let mut language = state.source_language;
        let mut text = state.source_text.clone();

        egui::ComboBox::from_id_salt("source_language")
            .selected_text(language.to_string())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut language, SourceLanguage::Auto, "Detect language");
                for lang in Language::ALL {
                    ui.selectable_value(&mut language, lang.into(), lang.display_name());
                }
            });
        if language != state.source_language {
            self.session.set_source_language(language);
        }

        let editor = ui.add(
            egui::TextEdit::multiline(&mut text)
                .hint_text("Enter text")
                .desired_rows(PANE_ROWS)
                .desired_width(f32::INFINITY),
        );
        if editor.changed() {
            self.session.set_source_text(text);
        }

        ui.horizontal(|ui| {
            let state = self.session.state();
            let has_text = !state.source_text.trim().is_empty();
            if ui
                .add_enabled(has_text, egui::Button::new("🔊"))
                .on_hover_text("Listen")
                .clicked()
            {
                let text = state.source_text.clone();
                let voice = source_voice(state);
                self.speak(text, voice);
            }

            let can_listen = self.capabilities.transcriber.is_some() && !self.listening;
            let mic = ui
                .add_enabled(can_listen, egui::Button::new("🎤"))
                .on_hover_text("Speak")
                .on_disabled_hover_text(if self.listening {
                    "Listening..."
                } else {
                    "Voice input needs a Whisper model"
                });
            if mic.clicked() {
                self.listen();
            }
            if self.listening {
                ui.spinner();
            }
        });
    }

    fn draw_middle(&mut self, ui: &mut egui::Ui) {
        ui.add_space(28.0);
        let state = self.session.state();

        if ui
            .add_enabled(state.can_swap(), egui::Button::new("⇄"))
            .on_hover_text("Swap languages")
            .clicked()
        {
            self.session.swap_languages();
        }

        ui.add_space(8.0);
        if !self.session.state().source_text.is_empty()
            && ui
                .add(egui::Button::new("✕"))
                .on_hover_text("Clear")
                .clicked()
        {
            self.session.clear_text();
        }
    }

    fn draw_target(&mut self, ui: &mut egui::Ui) {
        let state = self.session.state();
        let mut language = state.target_language;

        egui::ComboBox::from_id_salt("target_language")
            .selected_text(language.display_name())
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for lang in Language::ALL {
                    ui.selectable_value(&mut language, lang, lang.display_name());
                }
            });
        if language != state.target_language {
            self.session.set_target_language(language);
        }

        let state = self.session.state();
        let mut shown = state.result_text.as_str();
        ui.add(
            egui::TextEdit::multiline(&mut shown)
                .hint_text(result_placeholder(state))
                .desired_rows(PANE_ROWS)
                .desired_width(f32::INFINITY),
        );

        let ready = !state.loading && !state.result_text.is_empty();
        let result = state.result_text.clone();
        let voice = state.target_language.voice_tag();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(ready, egui::Button::new("📋"))
                .on_hover_text("Copy")
                .clicked()
            {
                self.copy(&result);
            }
            if ui
                .add_enabled(ready, egui::Button::new("🔊"))
                .on_hover_text("Listen")
                .clicked()
            {
                self.speak(result.clone(), voice);
            }
            if self.session.state().loading {
                ui.spinner();
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Placeholder for the empty result pane.
fn result_placeholder(state: &SessionState) -> &'static str {
    if state.loading {
        "Loading..."
    } else {
        "Translation"
    }
}

/// Voice for reading the source text; auto-detect falls back to the
/// default language's voice.
fn source_voice(state: &SessionState) -> &'static str {
    state
        .source_language
        .language()
        .unwrap_or_default()
        .voice_tag()
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for TranslateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();
        self.poll_tasks();

        // Background work reports over channels, so keep polling while any
        // of it is outstanding.
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let spacing = ui.spacing().item_spacing.x;
            let side = ((ui.available_width() - MIDDLE_WIDTH - 2.0 * spacing) / 2.0).max(120.0);
            let height = ui.available_height();

            ui.horizontal_top(|ui| {
                ui.allocate_ui_with_layout(
                    egui::vec2(side, height),
                    egui::Layout::top_down(egui::Align::Min),
                    |ui| self.draw_source(ui),
                );
                ui.allocate_ui_with_layout(
                    egui::vec2(MIDDLE_WIDTH, height),
                    egui::Layout::top_down(egui::Align::Center),
                    |ui| self.draw_middle(ui),
                );
                ui.allocate_ui_with_layout(
                    egui::vec2(side, height),
                    egui::Layout::top_down(egui::Align::Min),
                    |ui| self.draw_target(ui),
                );
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("quick-translate closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
