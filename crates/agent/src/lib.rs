//! The Parley agent — orchestration, prompt assembly, and response
//! generation.
//!
//! The [`Orchestrator`] runs the whole pipeline for one message: record it,
//! gather the recent window and relevant knowledge, let a plugin answer if
//! one claims the intent, otherwise assemble a [`PromptContext`] and ask
//! the [`ResponseGenerator`] for a reply.

pub mod generator;
pub mod orchestrator;
pub mod prompt;

pub use generator::{ResponseGenerator, TemplateGenerator};
pub use orchestrator::{AgentReply, Orchestrator};
pub use prompt::PromptContext;
