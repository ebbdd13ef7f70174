//! # stash-inference
//!
//! LLM inference layer for linkstash.
//!
//! This crate provides:
//! - [`GeminiBackend`]: the HTTP backend speaking Gemini's `generateContent`
//!   wire format
//! - [`FolderClassifier`]: single-label folder classification
//! - [`NameSuggester`]: bounded folder-name suggestions with silent degrade
//! - [`mock::MockBackend`]: a scripted backend for tests
//!
//! The clients are built against the [`stash_core::GenerationBackend`]
//! trait, so the service layer never depends on Gemini directly.

pub mod classify;
pub mod gemini;
pub mod mock;
pub mod suggest;

pub use classify::FolderClassifier;
pub use gemini::{GeminiBackend, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
pub use suggest::NameSuggester;
