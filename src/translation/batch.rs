/*!
 * Batch translation manager.
 *
 * Collects translation units and resolves them in character-bounded batches
 * through the segment-marker protocol. Cache hits and blank units resolve
 * without a model call; units a batch response failed to cover are re-queried
 * individually through the smart-retry path; every successful resolution is
 * written through to the cache before being reported.
 */

use log::{debug, error, warn};
use std::collections::HashMap;

use crate::app_config::BatchConfig;
use crate::cache::TranslationCache;
use crate::language_utils::is_traditional_chinese;
use crate::providers::TranslationBackend;
use crate::text::script::to_traditional;
use crate::translation::retry::translate_with_recovery;
use crate::translation::StopFlag;

/// Result of one translation unit: success flag and the resolved text (a
/// visible placeholder on failure).
pub type UnitResult = (bool, String);

/// Batch translator that collects segments and translates them in batches.
///
/// Character-based batching keeps the number of model calls bounded for
/// documents with thousands of small fragments while staying inside the
/// model's context window.
pub struct BatchTranslator<'a> {
    backend: &'a dyn TranslationBackend,
    cache: &'a TranslationCache,
    config: &'a BatchConfig,
    target_lang: String,
    source_lang: Option<String>,
    max_batch_chars: usize,
    normalize_traditional: bool,
    pending: Vec<(String, usize)>,
    pending_chars: usize,
    results: HashMap<usize, UnitResult>,
    next_index: usize,
    stop: Option<StopFlag>,
}

impl<'a> BatchTranslator<'a> {
    /// Create a batch translator for one target-language run.
    pub fn new(
        backend: &'a dyn TranslationBackend,
        cache: &'a TranslationCache,
        config: &'a BatchConfig,
        target_lang: impl Into<String>,
        source_lang: Option<&str>,
    ) -> Self {
        let target_lang = target_lang.into();
        Self {
            backend,
            cache,
            config,
            max_batch_chars: config.effective_max_batch_chars(),
            normalize_traditional: is_traditional_chinese(&target_lang),
            target_lang,
            source_lang: source_lang.map(|s| s.to_string()),
            pending: Vec::new(),
            pending_chars: 0,
            results: HashMap::new(),
            next_index: 0,
            stop: None,
        }
    }

    /// Attach a cooperative stop flag, polled before each per-unit fallback
    /// call.
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = Some(stop);
        self
    }

    fn src_key(&self) -> String {
        TranslationCache::source_key(self.source_lang.as_deref())
    }

    /// Normalize a resolved unit for the target script, then cache it.
    fn finalize(&mut self, idx: usize, text: &str, translated: String) {
        let translated = if self.normalize_traditional {
            to_traditional(&translated)
        } else {
            translated
        };
        self.cache
            .put(&self.src_key(), &self.target_lang, text, &translated);
        self.results.insert(idx, (true, translated));
    }

    fn fail(&mut self, idx: usize, text: &str) {
        self.results.insert(
            idx,
            (
                false,
                format!("[Translation failed|{}] {}", self.target_lang, text),
            ),
        );
    }

    /// Add a unit and return its index.
    ///
    /// Blank units and cache hits resolve immediately. Otherwise the unit is
    /// appended to the pending batch, flushing first if appending would push
    /// the running character counter past the ceiling.
    pub async fn add(&mut self, text: &str) -> usize {
        let idx = self.next_index;
        self.next_index += 1;

        if text.trim().is_empty() {
            self.results.insert(idx, (true, String::new()));
            return idx;
        }

        if let Some(cached) = self.cache.get(&self.src_key(), &self.target_lang, text) {
            self.results.insert(idx, (true, cached));
            return idx;
        }

        let text_chars = text.chars().count();
        if !self.pending.is_empty() && self.pending_chars + text_chars > self.max_batch_chars {
            self.flush().await;
        }

        self.pending.push((text.to_string(), idx));
        self.pending_chars += text_chars;
        idx
    }

    /// Send all pending units as one batched model call and resolve them.
    ///
    /// An accepted response resolves every non-empty slot; empty slots are
    /// per-unit failures and are re-queried individually. A rejected or
    /// failed batch call falls back to one call per unit.
    pub async fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        let total_chars = self.pending_chars;
        self.pending_chars = 0;

        let texts: Vec<String> = pending.iter().map(|(text, _)| text.clone()).collect();

        let backend = self.backend;
        let target_lang = self.target_lang.clone();
        let source_lang = self.source_lang.clone();
        let batch_result = backend
            .translate_batch(&texts, &target_lang, source_lang.as_deref())
            .await;

        match batch_result {
            Ok(results) if results.len() == texts.len() => {
                let mut missing: Vec<(String, usize)> = Vec::new();
                for ((text, idx), translated) in pending.iter().zip(results) {
                    if translated.is_empty() {
                        missing.push((text.clone(), *idx));
                    } else {
                        self.finalize(*idx, text, translated);
                    }
                }
                debug!(
                    "Batch translation succeeded: {} segments, {} chars, {} missing",
                    texts.len(),
                    total_chars,
                    missing.len()
                );
                if !missing.is_empty() {
                    self.fallback_individual(&missing).await;
                }
            }
            Ok(results) => {
                warn!(
                    "Batch translation returned {} results for {} segments, falling back",
                    results.len(),
                    texts.len()
                );
                self.fallback_individual(&pending).await;
            }
            Err(e) => {
                warn!(
                    "Batch translation failed, falling back: {} segments, {} chars: {}",
                    texts.len(),
                    total_chars,
                    e
                );
                self.fallback_individual(&pending).await;
            }
        }
    }

    /// Resolve units one call at a time through the smart-retry path.
    async fn fallback_individual(&mut self, units: &[(String, usize)]) {
        let backend = self.backend;
        let config = self.config;
        let target_lang = self.target_lang.clone();
        let source_lang = self.source_lang.clone();

        for (text, idx) in units {
            if let Some(stop) = &self.stop {
                if stop.is_set() {
                    self.fail(*idx, text);
                    continue;
                }
            }

            let result = translate_with_recovery(
                backend,
                text,
                &target_lang,
                source_lang.as_deref(),
                config,
            )
            .await;

            match result {
                Ok(translated) => self.finalize(*idx, text, translated),
                Err(e) => {
                    error!("Unit translation failed: {}", e);
                    self.fail(*idx, text);
                }
            }
        }
    }

    /// Get the result for an index, flushing pending units if needed.
    pub async fn get(&mut self, idx: usize) -> UnitResult {
        if !self.results.contains_key(&idx) {
            self.flush().await;
        }
        self.results
            .get(&idx)
            .cloned()
            .unwrap_or((false, "[Missing translation result]".to_string()))
    }

    /// Translate a list of units, returning results in submission order.
    pub async fn translate_all(&mut self, texts: &[String]) -> Vec<UnitResult> {
        let mut indices = Vec::with_capacity(texts.len());
        for text in texts {
            indices.push(self.add(text).await);
        }
        self.flush().await;

        let mut results = Vec::with_capacity(indices.len());
        for idx in indices {
            results.push(self.get(idx).await);
        }
        results
    }
}
