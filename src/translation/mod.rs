/*!
 * Batched translation pipeline.
 *
 * This module contains the core functionality for resolving document texts
 * through the translation backend. It is split into several submodules:
 *
 * - `protocol`: Numbered segment-marker wire protocol and tolerant parsing
 * - `batch`: Character-bounded batch collection with per-unit fallback
 * - `retry`: Smart retry for single-unit failures (chunking, backoff)
 * - `service`: Multi-target orchestration and the document entry point
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, UnitResult};
pub use self::protocol::{parse_batch_response, wrap_segments, BatchParse};
pub use self::retry::translate_with_recovery;
pub use self::service::{
    translate_blocks_batch, translate_document, translate_texts, DocumentTranslation,
    TranslationOutcome,
};

// Submodules
pub mod batch;
pub mod protocol;
pub mod retry;
pub mod service;

/// Cooperative stop signal polled at batch/unit boundaries.
///
/// An in-flight model call is never interrupted; cancellation takes effect at
/// the next checkpoint and output produced up to that point is a valid
/// partial result.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Create an unset stop flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop at the next checkpoint.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check whether a stop was requested.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
