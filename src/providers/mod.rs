/*!
 * Backend implementations for the translation model server.
 *
 * This module contains the backend trait the pipeline talks to plus the
 * client implementations:
 * - Ollama: Local LLM server
 * - Mock: Scriptable backend for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::BackendError;

/// Common trait for translation backends.
///
/// The pipeline depends only on this seam, so the concrete HTTP client can be
/// swapped for a mock in tests. An empty string slot in a batch result means
/// that unit failed and must be resolved individually by the caller.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate a single text.
    ///
    /// # Arguments
    /// * `text` - The source text
    /// * `target_lang` - Target language name or code
    /// * `source_lang` - Source language, or None for the default
    ///
    /// # Returns
    /// * The translated text, or a classified error
    async fn translate_once(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<String, BackendError>;

    /// Translate several texts in one model call.
    ///
    /// # Returns
    /// * One slot per input in submission order; empty slots are per-unit
    ///   failures. An error means the whole call failed.
    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<Vec<String>, BackendError>;

    /// Test the connection to the backend.
    ///
    /// # Returns
    /// * A short status string on success
    async fn health_check(&self) -> Result<String, BackendError>;

    /// Short backend identifier for logs.
    fn name(&self) -> &str;
}

pub mod mock;
pub mod ollama;

// Re-export main types for easier usage
pub use mock::MockBackend;
pub use ollama::OllamaClient;
