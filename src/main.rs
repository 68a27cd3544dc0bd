//! Application entry point for quick-translate.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults on first run).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the translation gateway from config.
//! 5. Build the capabilities; voice input only when the Whisper model loads.
//! 6. Create the session and run [`eframe::run_native`], which blocks the
//!    main thread until the window closes.

use std::sync::Arc;

use eframe::egui;
use quick_translate::{
    app::TranslateApp,
    audio::{EnergyVad, UtteranceLimits},
    capability::{
        ArboardClipboard, Capabilities, GoogleTtsSpeaker, MicTranscriber, Microphone, Transcriber,
    },
    config::{AppConfig, AppPaths, SpeechConfig},
    session::Session,
    stt::{TranscribeParams, WhisperEngine},
    translate::{ApiTranslator, Passthrough, Translator},
};

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Voice input backed by the configured Whisper model, or `None` when the
/// model cannot be loaded.
fn build_transcriber(speech: &SpeechConfig) -> Option<Arc<dyn Transcriber>> {
    let model_path = AppPaths::new().model_file(&speech.stt_model);
    match WhisperEngine::load(&model_path, TranscribeParams::default()) {
        Ok(engine) => {
            let limits = UtteranceLimits::from_config(speech);
            Some(Arc::new(MicTranscriber::new(
                Arc::new(Microphone::new(limits)),
                Arc::new(engine),
                EnergyVad::new(limits.vad_threshold),
            )))
        }
        Err(e) => {
            log::warn!(
                "voice input disabled; could not load Whisper model ({}): {e}",
                model_path.display()
            );
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Quick Translate")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 240.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("quick-translate starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if config.translator.api_key.is_none() {
        log::info!(
            "no API key configured; requests to {} go unauthenticated",
            config.translator.base_url
        );
    }

    // 3. Tokio runtime (debounce timers, gateway calls, speech and voice input)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 4. Translation gateway
    let translator: Arc<dyn Translator> =
        Arc::new(Passthrough::new(ApiTranslator::from_config(&config.translator)));

    // 5. Capabilities
    let capabilities = Capabilities {
        speaker: Arc::new(GoogleTtsSpeaker::new(config.speech.rate)),
        transcriber: build_transcriber(&config.speech),
        clipboard: Arc::new(ArboardClipboard::new()),
    };

    // 6. Session + window
    let session = Session::new(&config.session, translator, rt.handle().clone());
    let app = TranslateApp::new(session, capabilities, rt.handle().clone());

    eframe::run_native(
        "Quick Translate",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    log::info!("quick-translate stopped");
    Ok(())
}
