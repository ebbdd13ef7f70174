//! Centralized default constants for linkstash.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// CLASSIFICATION PIPELINE
// =============================================================================

/// Maximum unclassified folders fetched per backfill invocation.
///
/// Fixed rather than configurable: the batch runs inside an externally
/// imposed wall-clock budget per invocation, and 20 sequential model calls
/// fit comfortably within it.
pub const BACKFILL_BATCH_SIZE: i64 = 20;

/// Maximum saved-link titles fetched as classification/suggestion context.
pub const CONTEXT_TITLE_LIMIT: i64 = 5;

/// Maximum folder-name suggestions returned to the caller.
pub const MAX_SUGGESTIONS: usize = 3;

/// Sentinel category the model is instructed to emit when unsure.
pub const FALLBACK_CATEGORY: &str = "Other";

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Gemini API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini generation model.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 30;

/// Generation latency above which a slow-operation warning is logged (ms).
pub const SLOW_GEN_THRESHOLD_MS: u64 = 10_000;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

// =============================================================================
// DATABASE
// =============================================================================

/// Default maximum number of connections in the pool.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Default connection timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout in seconds.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

/// Interval between pool health-metric log lines (seconds).
pub const DB_POOL_METRICS_INTERVAL_SECS: u64 = 60;
