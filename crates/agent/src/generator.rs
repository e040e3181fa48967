//! Response generation.
//!
//! The [`ResponseGenerator`] trait is the seam for the text-producing
//! capability: the orchestrator hands it an assembled [`PromptContext`] and
//! gets a reply back. The shipped implementation is the [`TemplateGenerator`],
//! a rule-matching fallback that answers common intents with canned text and
//! otherwise acknowledges the message. It never fails; fallible generators
//! (a remote model, say) surface their errors through the `Result`.
//!
//! A model-backed implementation is expected to feed `ctx.render()` to its
//! model; the template generator keys off the user message alone and leaves
//! the rest of the context untouched.

use async_trait::async_trait;
use chrono::Utc;
use parley_core::Result;
use regex::Regex;

use crate::prompt::PromptContext;

/// Produces the assistant reply when no plugin handled the request.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, ctx: &PromptContext<'_>) -> Result<String>;
}

/// Rule-based canned replies keyed off the user message.
pub struct TemplateGenerator {
    inline_math: Regex,
    greeting: Regex,
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self {
            inline_math: Regex::new(r"\d+\s*[+\-*/]\s*\d+").expect("invalid math hint regex"),
            greeting: Regex::new(r"(?i)\b(?:hello|hi|hey)\b").expect("invalid greeting regex"),
        }
    }

    fn reply_for(&self, message: &str) -> String {
        let lower = message.to_lowercase();

        if lower.contains("weather") {
            return "I can help you with weather information! Try asking 'weather in \
                    [city name]' to get current conditions for any city."
                .into();
        }

        if lower.contains("calculate") || self.inline_math.is_match(message) {
            return "I can help with calculations! Try asking 'calculate 25 + 17' or any \
                    math expression and I'll solve it for you."
                .into();
        }

        if self.greeting.is_match(message) {
            return "Hello! I'm your AI assistant. I can help you with:\n\
                    - Weather information (try 'weather in London')\n\
                    - Mathematical calculations (try 'calculate 15 * 8')\n\
                    - General questions and conversations\n\n\
                    What would you like to know?"
                .into();
        }

        if lower.contains("help") || lower.contains("what can you do") {
            return "I can assist you with:\n\n\
                    Weather: Ask 'weather in [city]' for current conditions\n\
                    Math: Ask 'calculate [expression]' for mathematical operations\n\
                    Chat: Ask me general questions and I'll do my best to help\n\n\
                    Try asking me something!"
                .into();
        }

        if lower.contains("thank") {
            return "You're welcome! I'm here to help with weather, calculations, or any \
                    questions you might have. Feel free to ask me anything else!"
                .into();
        }

        if lower.contains("bye") || lower.contains("see you") {
            return "Goodbye! It was nice helping you today. Come back anytime if you need \
                    weather information, calculations, or just want to chat!"
                .into();
        }

        if lower.contains("how are you") || lower.contains("how do you feel") {
            return "I'm doing great, thank you for asking! I'm here and ready to help you \
                    with weather information, calculations, or answer any questions you \
                    might have. How can I assist you today?"
                .into();
        }

        if lower.contains("what are you") || lower.contains("who are you") {
            return "I'm your AI assistant! I'm designed to help you with various tasks \
                    including:\n\
                    - Getting weather information for any city\n\
                    - Solving mathematical calculations\n\
                    - Answering questions and having conversations\n\n\
                    How can I help you today?"
                .into();
        }

        if lower.contains("time") || lower.contains("date") || lower.contains("today") {
            return format!(
                "Current date and time: {}\n\nIs there anything else I can help you with? \
                 I can provide weather information or help with calculations!",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            );
        }

        format!(
            "I understand you're asking about: \"{message}\"\n\n\
             I can help you with:\n\
             - Weather information - try \"weather in [city]\"\n\
             - Mathematical calculations - try \"calculate [expression]\"\n\
             - General questions and conversations\n\n\
             What would you like to know?"
        )
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseGenerator for TemplateGenerator {
    async fn generate(&self, ctx: &PromptContext<'_>) -> Result<String> {
        Ok(self.reply_for(ctx.user_message))
    }
}
