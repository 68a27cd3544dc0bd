//! `Translator` trait and the chat-completions backed `ApiTranslator`.
//!
//! `ApiTranslator` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint (OpenAI, Groq, Ollama in OpenAI mode, LM Studio, ...).  All
//! connection details come from [`TranslatorConfig`].

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslatorConfig;
use crate::language::{Language, SourceLanguage};
use crate::translate::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur during a translation request.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The response body was not the expected JSON.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The response carried no usable text.
    #[error("provider returned an empty translation")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Translation gateway.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn Translator>` between the UI thread and runtime tasks.  When
/// `source` names exactly `target`, implementations should return `text`
/// unchanged without contacting a provider.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        source: SourceLanguage,
        target: Language,
        text: &str,
    ) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// ApiTranslator
// ---------------------------------------------------------------------------

/// Translates through an OpenAI-compatible chat-completions endpoint.
pub struct ApiTranslator {
    client: reqwest::Client,
    config: TranslatorConfig,
    prompt_builder: PromptBuilder,
}

impl ApiTranslator {
    /// Build a translator from config.  The HTTP client carries the
    /// per-request timeout from `config.timeout_secs`.
    pub fn from_config(config: &TranslatorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, source: SourceLanguage, target: Language, text: &str) -> serde_json::Value {
        serde_json::json!({
            "model":       self.config.model,
            "messages":    self.prompt_builder.build(source, target, text),
            "stream":      false,
            "temperature": self.config.temperature,
        })
    }
}

/// Pull the first choice's message content out of a completion response.
pub(crate) fn parse_completion(json: &serde_json::Value) -> Result<String, TranslateError> {
    if !json.is_object() {
        return Err(TranslateError::Parse("response is not a JSON object".into()));
    }

    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(TranslateError::EmptyResponse)?
        .trim();

    if text.is_empty() {
        return Err(TranslateError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[async_trait]
impl Translator for ApiTranslator {
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn translate(
        &self,
        source: SourceLanguage,
        target: Language,
        text: &str,
    ) -> Result<String, TranslateError> {
        if source.matches(target) {
            return Ok(text.to_string());
        }

        let mut req = self
            .client
            .post(self.endpoint())
            .json(&self.request_body(source, target, text));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        log::debug!(
            "translate: {} -> {} ({} chars) via {}",
            source.code(),
            target.code(),
            text.chars().count(),
            self.config.model
        );

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        parse_completion(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> TranslatorConfig {
        TranslatorConfig {
            // Port 9 (discard) on localhost: nothing should ever be sent here.
            base_url: "http://127.0.0.1:9/".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "gpt-4o-mini".into(),
            temperature: 0.3,
            timeout_secs: 1,
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let translator = ApiTranslator::from_config(&make_config(None));
        assert_eq!(translator.endpoint(), "http://127.0.0.1:9/v1/chat/completions");
    }

    #[test]
    fn request_body_carries_model_and_prompt() {
        let translator = ApiTranslator::from_config(&make_config(Some("sk-test")));
        let body = translator.request_body(SourceLanguage::Auto, Language::En, "Hola");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], false);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(
            messages.last().unwrap()["content"],
            "Hola {{auto}} [[English]]"
        );
    }

    #[test]
    fn parse_completion_extracts_trimmed_content() {
        let json = serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": "  Hello \n" } } ]
        });
        assert_eq!(parse_completion(&json).unwrap(), "Hello");
    }

    #[test]
    fn parse_completion_missing_content_is_empty_response() {
        let json = serde_json::json!({ "choices": [] });
        assert!(matches!(
            parse_completion(&json),
            Err(TranslateError::EmptyResponse)
        ));

        let json = serde_json::json!({ "choices": [ { "message": { "content": "   " } } ] });
        assert!(matches!(
            parse_completion(&json),
            Err(TranslateError::EmptyResponse)
        ));
    }

    #[test]
    fn parse_completion_rejects_non_object() {
        let json = serde_json::json!(["not", "an", "object"]);
        assert!(matches!(parse_completion(&json), Err(TranslateError::Parse(_))));
    }

    #[tokio::test]
    async fn same_language_short_circuits_without_network() {
        let translator = ApiTranslator::from_config(&make_config(None));
        let out = translator
            .translate(Language::Es.into(), Language::Es, "Hola")
            .await
            .unwrap();
        assert_eq!(out, "Hola");
    }

    #[test]
    fn translator_is_object_safe() {
        let translator: Box<dyn Translator> =
            Box::new(ApiTranslator::from_config(&make_config(None)));
        drop(translator);
    }

    #[test]
    fn error_messages_are_descriptive() {
        assert!(TranslateError::Status(401).to_string().contains("401"));
        assert!(TranslateError::Timeout.to_string().contains("timed out"));
    }
}
