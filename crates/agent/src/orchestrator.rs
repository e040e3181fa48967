//! The request orchestrator.
//!
//! One `handle` call per user message: validate, record, gather context,
//! try plugins, fall back to generation, record the reply. The orchestrator
//! owns no state of its own; it composes the shared session store, the
//! immutable knowledge index, the plugin registry, and a response generator.
//! No session lock is held across plugin execution or generation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parley_core::{Error, Message, PluginRegistry, Result};
use parley_knowledge::KnowledgeIndex;
use parley_memory::SessionStore;
use serde::Serialize;

use crate::generator::ResponseGenerator;
use crate::prompt::PromptContext;

/// The outcome of one handled message.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    /// The assistant reply text
    pub response: String,

    /// Echo of the conversation identifier
    pub session_id: String,

    /// When the reply was produced
    pub timestamp: DateTime<Utc>,
}

pub struct Orchestrator {
    sessions: Arc<SessionStore>,
    knowledge: Arc<KnowledgeIndex>,
    plugins: Arc<PluginRegistry>,
    generator: Arc<dyn ResponseGenerator>,
    recent_window: usize,
    top_k: usize,
}

impl Orchestrator {
    pub fn new(
        sessions: Arc<SessionStore>,
        knowledge: Arc<KnowledgeIndex>,
        plugins: Arc<PluginRegistry>,
        generator: Arc<dyn ResponseGenerator>,
        recent_window: usize,
        top_k: usize,
    ) -> Self {
        Self {
            sessions,
            knowledge,
            plugins,
            generator,
            recent_window,
            top_k,
        }
    }

    /// Handle one user message within a session.
    ///
    /// The user message is recorded before any fallible work, so a later
    /// generation failure still leaves it in the history. Plugin failures
    /// are not errors; the failed result is simply not used as the reply
    /// and the generator answers instead.
    pub async fn handle(&self, session_id: &str, message: &str) -> Result<AgentReply> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(Error::Validation("session_id is required".into()));
        }
        let text = message.trim();
        if text.is_empty() {
            return Err(Error::Validation("message is required".into()));
        }

        self.sessions.append(session_id, Message::user(text));

        let recent = self.sessions.recent(session_id, self.recent_window);
        let chunks = self.knowledge.query(text, self.top_k);
        let plugin_result = self.plugins.dispatch(text).await;

        let response = match &plugin_result {
            Some(result) if result.success => {
                tracing::info!(session_id, plugin = %result.kind, "plugin handled request");
                result.output.clone()
            }
            _ => {
                let ctx = PromptContext {
                    recent_messages: &recent,
                    chunks: &chunks,
                    plugin_result: plugin_result.as_ref(),
                    user_message: text,
                };
                self.generator.generate(&ctx).await.map_err(|e| {
                    tracing::error!(session_id, error = %e, "response generation failed");
                    Error::Internal("response generation failed".into())
                })?
            }
        };

        self.sessions.append(session_id, Message::assistant(response.clone()));

        Ok(AgentReply {
            response,
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TemplateGenerator;
    use async_trait::async_trait;
    use parley_core::{Plugin, PluginResult};
    use parley_knowledge::{CorpusChunk, HashEmbedder};

    /// Handles text containing "echo"; configurable success.
    struct EchoPlugin {
        succeed: bool,
    }

    #[async_trait]
    impl Plugin for EchoPlugin {
        fn name(&self) -> &str {
            "echo"
        }

        fn matches(&self, text: &str) -> Option<String> {
            text.contains("echo").then(|| text.to_string())
        }

        async fn execute(&self, argument: &str) -> PluginResult {
            if self.succeed {
                PluginResult::ok("echo", argument, format!("echoed: {argument}"))
            } else {
                PluginResult::failed("echo", argument, "echo chamber closed")
            }
        }
    }

    struct BrokenGenerator;

    #[async_trait]
    impl ResponseGenerator for BrokenGenerator {
        async fn generate(&self, _ctx: &PromptContext<'_>) -> Result<String> {
            Err(Error::Internal("model unavailable".into()))
        }
    }

    fn orchestrator_with(
        plugin: Option<EchoPlugin>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> (Orchestrator, Arc<SessionStore>) {
        let sessions = Arc::new(SessionStore::new(50));
        let corpus = vec![CorpusChunk {
            content: "Background knowledge about echoes and conversations.".into(),
            source_id: "notes.md".into(),
        }];
        let knowledge = Arc::new(KnowledgeIndex::build(corpus, Box::new(HashEmbedder::new(128))));

        let mut registry = PluginRegistry::new();
        if let Some(plugin) = plugin {
            registry.register(Box::new(plugin));
        }

        let orchestrator = Orchestrator::new(
            sessions.clone(),
            knowledge,
            Arc::new(registry),
            generator,
            2,
            3,
        );
        (orchestrator, sessions)
    }

    #[tokio::test]
    async fn empty_message_is_a_validation_error() {
        let (orchestrator, sessions) = orchestrator_with(None, Arc::new(TemplateGenerator::new()));
        let err = orchestrator.handle("s1", "   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // Nothing was recorded.
        assert!(sessions.get("s1").is_none());
    }

    #[tokio::test]
    async fn empty_session_id_is_a_validation_error() {
        let (orchestrator, _) = orchestrator_with(None, Arc::new(TemplateGenerator::new()));
        let err = orchestrator.handle("", "hello").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn successful_plugin_output_becomes_the_reply() {
        let (orchestrator, sessions) =
            orchestrator_with(Some(EchoPlugin { succeed: true }), Arc::new(TemplateGenerator::new()));

        let reply = orchestrator.handle("s1", "please echo this").await.unwrap();
        assert_eq!(reply.response, "echoed: please echo this");
        assert_eq!(reply.session_id, "s1");

        // Both the user message and the reply were recorded.
        let session = sessions.get("s1").unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].content, "echoed: please echo this");
    }

    #[tokio::test]
    async fn failed_plugin_falls_back_to_generation() {
        let (orchestrator, _) =
            orchestrator_with(Some(EchoPlugin { succeed: false }), Arc::new(TemplateGenerator::new()));

        let reply = orchestrator.handle("s1", "echo me").await.unwrap();
        // Not the plugin diagnostic; the generator's default reply.
        assert!(!reply.response.contains("echo chamber closed"));
        assert!(reply.response.contains("\"echo me\""));
    }

    #[tokio::test]
    async fn unmatched_message_uses_the_generator() {
        let (orchestrator, _) = orchestrator_with(None, Arc::new(TemplateGenerator::new()));
        let reply = orchestrator.handle("s1", "hello").await.unwrap();
        assert!(reply.response.starts_with("Hello!"));
    }

    #[tokio::test]
    async fn generator_failure_surfaces_as_internal() {
        let (orchestrator, sessions) = orchestrator_with(None, Arc::new(BrokenGenerator));

        let err = orchestrator.handle("s1", "anything at all").await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));

        // The user message append stands even though no reply was produced.
        let session = sessions.get("s1").unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].content, "anything at all");
    }

    #[tokio::test]
    async fn conversation_accumulates_across_turns() {
        let (orchestrator, sessions) = orchestrator_with(None, Arc::new(TemplateGenerator::new()));

        orchestrator.handle("s1", "hello").await.unwrap();
        orchestrator.handle("s1", "tell me more").await.unwrap();

        let session = sessions.get("s1").unwrap();
        assert_eq!(session.messages.len(), 4);
        assert_eq!(session.messages[0].content, "hello");
        assert_eq!(session.messages[2].content, "tell me more");
    }

    #[tokio::test]
    async fn message_is_trimmed_before_recording() {
        let (orchestrator, sessions) = orchestrator_with(None, Arc::new(TemplateGenerator::new()));
        orchestrator.handle("s1", "  hello  ").await.unwrap();
        assert_eq!(sessions.get("s1").unwrap().messages[0].content, "hello");
    }
}
