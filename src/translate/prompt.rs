//! Chat prompt for LLM-backed translation.
//!
//! The model receives a fixed system instruction, three few-shot
//! user/assistant pairs, and finally the text to translate.  Languages are
//! passed inline: the source between `{{` and `}}` (or `{{auto}}` for
//! detection), the target between `[[` and `]]`.

use serde::Serialize;

use crate::language::{Language, SourceLanguage, AUTO_CODE};

const SYSTEM_INSTRUCTION: &str = "\
You are an AI that translates text. You receive a text from the user. \
Do not answer, just translate the text. \
The original language is surrounded by `{{` and `}}`. \
You can also receive `{{auto}}`, which means you have to detect the language. \
The target language is surrounded by `[[` and `]]`.";

/// `(user, assistant)` pairs shown to the model before the real request.
const FEW_SHOT_EXAMPLES: [(&str, &str); 3] = [
    ("Hola mundo {{Español}} [[English]]", "Hello world"),
    ("How are you? {{auto}} [[Deutsch]]", "Wie geht es dir?"),
    (
        "Bon dia, com estas? {{auto}} [[Español]]",
        "Buenos días, ¿cómo estás?",
    ),
];

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the `messages` array of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the message list for one translation request.
///
/// ```
/// use quick_translate::language::{Language, SourceLanguage};
/// use quick_translate::translate::PromptBuilder;
///
/// let messages = PromptBuilder::new().build(SourceLanguage::Auto, Language::En, "Hola");
/// assert_eq!(messages.last().unwrap().content, "Hola {{auto}} [[English]]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// System message, few-shot examples, then the request itself.
    pub fn build(&self, source: SourceLanguage, target: Language, text: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2 + FEW_SHOT_EXAMPLES.len() * 2);
        messages.push(ChatMessage::new(Role::System, SYSTEM_INSTRUCTION));
        for (user, assistant) in FEW_SHOT_EXAMPLES {
            messages.push(ChatMessage::new(Role::User, user));
            messages.push(ChatMessage::new(Role::Assistant, assistant));
        }
        messages.push(ChatMessage::new(
            Role::User,
            Self::request_line(source, target, text),
        ));
        messages
    }

    /// `"{text} {{source}} [[target]]"`.
    pub fn request_line(source: SourceLanguage, target: Language, text: &str) -> String {
        let source_name = match source {
            SourceLanguage::Auto => AUTO_CODE,
            SourceLanguage::Language(lang) => lang.display_name(),
        };
        format!(
            "{text} {{{{{source_name}}}}} [[{}]]",
            target.display_name()
        )
    }
}
