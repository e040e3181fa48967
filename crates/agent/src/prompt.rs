//! Prompt assembly.
//!
//! A [`PromptContext`] is a request-scoped bundle of everything gathered for
//! one message: the recent conversation window, the retrieved knowledge
//! chunks, and the plugin outcome (if any). It borrows all of it; nothing
//! here outlives the request. `render()` flattens the bundle into the text
//! form a generative model would consume.

use parley_core::{Message, PluginResult};
use parley_knowledge::ScoredChunk;

/// Everything assembled for one request, by reference.
pub struct PromptContext<'a> {
    /// Recent conversation window, oldest first (includes the current
    /// user message, which is appended before the window is read).
    pub recent_messages: &'a [Message],

    /// Top-K knowledge chunks for the current message.
    pub chunks: &'a [ScoredChunk],

    /// The plugin outcome, when a detector matched.
    pub plugin_result: Option<&'a PluginResult>,

    /// The raw user message text.
    pub user_message: &'a str,
}

impl PromptContext<'_> {
    /// Render the context into a single prompt string.
    ///
    /// Sections with no content are omitted entirely. A failed plugin
    /// result is omitted too; only usable tool output belongs in the
    /// prompt.
    pub fn render(&self) -> String {
        let mut prompt = String::from(
            "You are an intelligent AI assistant with access to relevant knowledge and tools.\n\
             \n\
             SYSTEM INSTRUCTIONS:\n\
             - Provide helpful, accurate, and contextual responses\n\
             - Use the provided context and plugin results to enhance your answers\n\
             - Be concise but comprehensive\n\
             - If plugin results are available, incorporate them naturally into your response\n\
             \n",
        );

        if !self.recent_messages.is_empty() {
            prompt.push_str("RECENT CONVERSATION:\n");
            for msg in self.recent_messages {
                prompt.push_str(&format!("{}: {}\n", msg.role.label(), msg.content));
            }
            prompt.push('\n');
        }

        if !self.chunks.is_empty() {
            prompt.push_str("RELEVANT KNOWLEDGE:\n");
            for (index, chunk) in self.chunks.iter().enumerate() {
                prompt.push_str(&format!(
                    "[{}] From {}:\n{}\n\n",
                    index + 1,
                    chunk.source_id,
                    chunk.content
                ));
            }
        }

        if let Some(result) = self.plugin_result.filter(|r| r.success) {
            prompt.push_str("TOOL RESULT:\n");
            prompt.push_str(&format!("Used {} tool for \"{}\"\n", result.kind, result.input));
            prompt.push_str(&format!("Result: {}\n\n", result.output));
        }

        prompt.push_str(&format!("USER MESSAGE: {}\n\nASSISTANT:", self.user_message));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, source: &str) -> ScoredChunk {
        ScoredChunk {
            content: content.into(),
            source_id: source.into(),
            score: 0.5,
        }
    }

    #[test]
    fn bare_context_has_only_instructions_and_message() {
        let ctx = PromptContext {
            recent_messages: &[],
            chunks: &[],
            plugin_result: None,
            user_message: "hello",
        };

        let prompt = ctx.render();
        assert!(prompt.starts_with("You are an intelligent AI assistant"));
        assert!(!prompt.contains("RECENT CONVERSATION:"));
        assert!(!prompt.contains("RELEVANT KNOWLEDGE:"));
        assert!(!prompt.contains("TOOL RESULT:"));
        assert!(prompt.ends_with("USER MESSAGE: hello\n\nASSISTANT:"));
    }

    #[test]
    fn conversation_uses_uppercase_role_labels() {
        let messages = vec![Message::user("first question"), Message::assistant("first answer")];
        let ctx = PromptContext {
            recent_messages: &messages,
            chunks: &[],
            plugin_result: None,
            user_message: "followup",
        };

        let prompt = ctx.render();
        assert!(prompt.contains("RECENT CONVERSATION:\nUSER: first question\nASSISTANT: first answer\n"));
    }

    #[test]
    fn knowledge_chunks_are_numbered_with_source() {
        let chunks = vec![chunk("alpha facts", "a.md"), chunk("beta facts", "b.md")];
        let ctx = PromptContext {
            recent_messages: &[],
            chunks: &chunks,
            plugin_result: None,
            user_message: "q",
        };

        let prompt = ctx.render();
        assert!(prompt.contains("[1] From a.md:\nalpha facts"));
        assert!(prompt.contains("[2] From b.md:\nbeta facts"));
    }

    #[test]
    fn successful_plugin_result_is_included() {
        let result = PluginResult::ok("math", "2 + 2", "2 + 2 = 4");
        let ctx = PromptContext {
            recent_messages: &[],
            chunks: &[],
            plugin_result: Some(&result),
            user_message: "calculate 2 + 2",
        };

        let prompt = ctx.render();
        assert!(prompt.contains("TOOL RESULT:\nUsed math tool for \"2 + 2\"\nResult: 2 + 2 = 4"));
    }

    #[test]
    fn failed_plugin_result_is_omitted() {
        let result = PluginResult::failed("weather", "Atlantis", "Unable to fetch weather data");
        let ctx = PromptContext {
            recent_messages: &[],
            chunks: &[],
            plugin_result: Some(&result),
            user_message: "weather in Atlantis",
        };

        assert!(!ctx.render().contains("TOOL RESULT:"));
    }
}
