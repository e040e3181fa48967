//! Plugin trait — the abstraction over deterministic intent handlers.
//!
//! A plugin recognizes and serves a narrow intent (arithmetic, weather)
//! without invoking general-purpose text generation. Plugins are registered
//! in a [`PluginRegistry`]; **registration order is the priority policy**:
//! dispatch walks the list in order and the first detector that matches
//! wins. A weather detector registered before the calculator keeps a city
//! phrase from being misparsed as an expression.
//!
//! Execution failures never cross this boundary as errors. A handler that
//! cannot produce a result returns `PluginResult { success: false, .. }`
//! with a human-readable diagnostic, and the orchestrator falls back to
//! generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The outcome of one plugin execution. Transient — produced and consumed
/// within a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginResult {
    /// Which capability handled the request (e.g. "weather", "math")
    pub kind: String,

    /// The raw text given to the handler
    pub input: String,

    /// The textual output (or diagnostic when `success` is false)
    pub output: String,

    /// Whether the handler produced a usable result
    pub success: bool,
}

impl PluginResult {
    /// A successful result.
    pub fn ok(kind: impl Into<String>, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            input: input.into(),
            output: output.into(),
            success: true,
        }
    }

    /// A failed result carrying a diagnostic instead of an answer.
    pub fn failed(
        kind: impl Into<String>,
        input: impl Into<String>,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            input: input.into(),
            output: diagnostic.into(),
            success: false,
        }
    }
}

/// The core Plugin trait.
///
/// `matches` is the cheap detection step: given the raw user text it either
/// extracts the argument the handler needs (a location phrase, an
/// expression candidate) or declines. `execute` does the actual work and is
/// infallible by contract — internal failures are encoded in the result.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// The unique capability tag of this plugin (e.g. "weather", "math").
    fn name(&self) -> &str;

    /// Detect whether this plugin serves the given text. Returns the
    /// extracted argument to pass to `execute`, or `None` to decline.
    fn matches(&self, text: &str) -> Option<String>;

    /// Execute the capability with the argument extracted by `matches`.
    async fn execute(&self, argument: &str) -> PluginResult;
}

/// An ordered registry of plugins.
///
/// The orchestrator uses this to run the plugin-dispatch decision: first
/// matching detector wins, later ones are never consulted.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Register a plugin. Appends to the end of the priority list.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Try to dispatch the text to the first matching plugin.
    ///
    /// Returns `None` when no detector claims the text. A matched handler
    /// always yields a result, though it may carry `success: false`.
    pub async fn dispatch(&self, text: &str) -> Option<PluginResult> {
        for plugin in &self.plugins {
            if let Some(argument) = plugin.matches(text) {
                tracing::debug!(plugin = plugin.name(), "plugin matched");
                return Some(plugin.execute(&argument).await);
            }
        }
        None
    }

    /// Registered plugin names, in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
