//! # Parley Core
//!
//! Domain types, traits, and error definitions for the Parley conversational
//! orchestrator. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The orchestrator composes independently-lifecycled services: a mutable
//! session store, a read-only knowledge index, and pluggable intent handlers.
//! The seams between them are defined here so that:
//! - Implementations can be swapped without touching the pipeline
//! - Tests can use mock/stub implementations
//! - The dependency graph stays clean (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod plugin;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use plugin::{Plugin, PluginRegistry, PluginResult};
