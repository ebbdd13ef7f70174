//! Mock generation backend for deterministic testing.
//!
//! Responses are scripted per call (FIFO); once the script runs out the
//! default response is returned. Every prompt is recorded so tests can
//! assert on call counts and prompt content.
//!
//! ## Usage
//!
//! ```rust
//! use stash_core::GenerationBackend;
//! use stash_inference::mock::MockBackend;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let backend = MockBackend::new()
//!         .with_response("Food")
//!         .with_error("Gemini API error: 500");
//!
//!     assert_eq!(backend.generate("p1").await.unwrap(), "Food");
//!     assert!(backend.generate("p2").await.is_err());
//!     assert_eq!(backend.call_count(), 2);
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use stash_core::{Error, GenerationBackend, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Failure(String),
}

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockBackend {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    default_response: String,
    call_log: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Create a mock backend with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_response: "Other".to_string(),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful response.
    pub fn with_response(self, text: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Text(text.to_string()));
        self
    }

    /// Queue a failure carrying the given message.
    pub fn with_error(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(message.to_string()));
        self
    }

    /// Set the response returned once the script is exhausted.
    pub fn with_default_response(mut self, text: &str) -> Self {
        self.default_response = text.to_string();
        self
    }

    /// Number of generate calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(prompt.to_string());

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure(message)) => Err(Error::Inference(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
