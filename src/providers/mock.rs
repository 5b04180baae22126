/*!
 * Mock backend implementations for testing.
 *
 * The mock mirrors the real client's structure: batch calls build a
 * marker-formatted response string and run it through the shared protocol
 * parser, so tests exercise the same wire-format handling as production.
 *
 * - `MockBackend::echo()` - Always succeeds, echoing `ECHO-{text}`
 * - `MockBackend::dropping_markers(..)` - Omits chosen markers from batches
 * - `MockBackend::failing(..)` - Always fails with a chosen error
 * - `MockBackend::flaky(..)` - Fails the first N single calls, then succeeds
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::BackendError;
use crate::providers::TranslationBackend;
use crate::translation::protocol::{parse_batch_response, BatchParse};

/// Behavior mode for the mock backend
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Every unit succeeds; responses echo the input
    Echo,
    /// Batch responses omit the markers at these batch positions
    DropMarkers(HashSet<usize>),
    /// Batch calls always error; single calls succeed
    BatchesFail,
    /// Every call fails with this message (classified by substring)
    Failing(String),
    /// The first N single calls fail with this message, later ones succeed
    Flaky {
        /// Number of initial failures
        fail_first: usize,
        /// Error message for the failures
        message: String,
    },
}

/// Mock backend for testing translation behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate_once calls observed
    once_calls: AtomicUsize,
    /// Number of translate_batch calls observed
    batch_calls: AtomicUsize,
    /// Marker-recovery threshold fed into the protocol parser
    partial_accept_ratio: f64,
}

impl MockBackend {
    /// Create a mock with the given behavior.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            once_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            partial_accept_ratio: 0.8,
        }
    }

    /// Echo backend that always succeeds.
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Backend whose batch responses drop the markers at the given batch
    /// positions, simulating model formatting drift.
    pub fn dropping_markers(positions: impl IntoIterator<Item = usize>) -> Self {
        Self::new(MockBehavior::DropMarkers(positions.into_iter().collect()))
    }

    /// Backend whose batch calls always fail, forcing per-unit fallback.
    pub fn batches_fail() -> Self {
        Self::new(MockBehavior::BatchesFail)
    }

    /// Backend that always fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Failing(message.into()))
    }

    /// Backend whose first `fail_first` single calls fail, then succeed.
    pub fn flaky(fail_first: usize, message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Flaky {
            fail_first,
            message: message.into(),
        })
    }

    /// Override the partial-acceptance threshold.
    pub fn with_partial_accept_ratio(mut self, ratio: f64) -> Self {
        self.partial_accept_ratio = ratio;
        self
    }

    /// Number of single-unit calls observed so far.
    pub fn once_call_count(&self) -> usize {
        self.once_calls.load(Ordering::SeqCst)
    }

    /// Number of batch calls observed so far.
    pub fn batch_call_count(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn echo_text(text: &str) -> String {
        format!("ECHO-{}", text)
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate_once(
        &self,
        text: &str,
        _target_lang: &str,
        _source_lang: Option<&str>,
    ) -> Result<String, BackendError> {
        let call_index = self.once_calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Echo | MockBehavior::DropMarkers(_) | MockBehavior::BatchesFail => {
                Ok(Self::echo_text(text))
            }
            MockBehavior::Failing(message) => Err(BackendError::Other(message.clone())),
            MockBehavior::Flaky {
                fail_first,
                message,
            } => {
                if call_index < *fail_first {
                    Err(BackendError::Other(message.clone()))
                } else {
                    Ok(Self::echo_text(text))
                }
            }
        }
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<Vec<String>, BackendError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);

        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.len() == 1 {
            return Ok(vec![self
                .translate_once(&texts[0], target_lang, source_lang)
                .await?]);
        }

        let dropped: HashSet<usize> = match &self.behavior {
            MockBehavior::Echo => HashSet::new(),
            MockBehavior::DropMarkers(positions) => positions.clone(),
            MockBehavior::BatchesFail => {
                return Err(BackendError::Other("batch endpoint unavailable".to_string()))
            }
            MockBehavior::Failing(message) => {
                return Err(BackendError::Other(message.clone()));
            }
            MockBehavior::Flaky { .. } => HashSet::new(),
        };

        // Build the marker response the way a model would, then parse it
        // through the shared protocol to exercise the real wire handling.
        let mut response = String::new();
        for (i, text) in texts.iter().enumerate() {
            if dropped.contains(&i) {
                continue;
            }
            response.push_str(&format!("<<<SEG_{}>>>\n{}\n", i, Self::echo_text(text)));
        }

        match parse_batch_response(&response, texts.len(), self.partial_accept_ratio) {
            BatchParse::Complete(results) | BatchParse::Partial(results) => Ok(results),
            BatchParse::Rejected => Err(BackendError::Parse(format!(
                "Batch parse failed: expected {} segments",
                texts.len()
            ))),
        }
    }

    async fn health_check(&self) -> Result<String, BackendError> {
        Ok("OK; mock".to_string())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
