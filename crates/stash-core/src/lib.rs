//! # stash-core
//!
//! Core types, traits, and abstractions for linkstash.
//!
//! This crate provides:
//! - The shared [`Error`] enum and [`Result`] alias
//! - Domain models (folders, saved links, debug events)
//! - Repository and generation-backend traits implemented by the other crates
//! - Centralized default constants
//! - Structured logging field-name constants

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{
    BackfillFailure, BackfillReport, ChangeNotification, ClassifyResponse, DebugEvent, Folder,
    FolderRecord, RowEvent, SavedLink, SavedLinkRecord,
};
pub use traits::{DebugEventRepository, FolderRepository, GenerationBackend, SavedLinkRepository};
