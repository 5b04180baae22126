/*!
 * Shared translation routines.
 *
 * The pipeline entry points: block-level translation with sentence
 * segmentation and cache reuse, multi-target orchestration with cooperative
 * stop and progress reporting, and the document-level convenience wrapper
 * that validates size limits before any backend call.
 */

use log::info;
use std::collections::HashMap;

use crate::app_config::{BatchConfig, ParseConfig};
use crate::cache::TranslationCache;
use crate::document::builder::check_size_limits;
use crate::document::model::TranslatableDocument;
use crate::errors::AppError;
use crate::providers::TranslationBackend;
use crate::text::sentence::split_sentences;
use crate::translation::batch::{BatchTranslator, UnitResult};
use crate::translation::retry::translate_with_recovery;
use crate::translation::StopFlag;

/// Progress/log sink supplied by the job layer.
pub type LogSink<'a> = &'a (dyn Fn(String) + Sync);

/// Outcome of a multi-target translation run.
#[derive(Debug, Default)]
pub struct TranslationOutcome {
    /// Resolved map keyed by (target language, source text)
    pub map: HashMap<(String, String), String>,
    /// Units processed (including failures)
    pub done: usize,
    /// Units that resolved to a failure placeholder
    pub failed: usize,
    /// True when the stop flag cut the run short; the map is a valid partial
    pub stopped: bool,
}

/// Translate one text block sentence by sentence, reusing the cache at both
/// whole-block and sentence level.
///
/// Lines are translated independently and rejoined with newlines; sentences
/// within a line rejoin with single spaces. The whole block is cached only
/// when every sentence succeeded.
pub async fn translate_block_sentencewise(
    text: &str,
    target_lang: &str,
    source_lang: Option<&str>,
    cache: &TranslationCache,
    backend: &dyn TranslationBackend,
    config: &BatchConfig,
) -> UnitResult {
    if text.trim().is_empty() {
        return (true, String::new());
    }

    let src_key = TranslationCache::source_key(source_lang);
    if let Some(cached) = cache.get(&src_key, target_lang, text) {
        return (true, cached);
    }

    let mut out_lines: Vec<String> = Vec::new();
    let mut all_ok = true;

    for raw_line in text.split('\n') {
        if raw_line.trim().is_empty() {
            out_lines.push(String::new());
            continue;
        }

        let sentences = {
            let split = split_sentences(raw_line, source_lang);
            if split.is_empty() {
                vec![raw_line.to_string()]
            } else {
                split
            }
        };

        let mut parts: Vec<String> = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            if let Some(cached) = cache.get(&src_key, target_lang, sentence) {
                parts.push(cached);
                continue;
            }
            match translate_with_recovery(backend, sentence, target_lang, source_lang, config).await
            {
                Ok(translated) => {
                    cache.put(&src_key, target_lang, sentence, &translated);
                    parts.push(translated);
                }
                Err(_) => {
                    all_ok = false;
                    parts.push(format!("[Translation failed|{}] {}", target_lang, sentence));
                }
            }
        }
        out_lines.push(parts.join(" "));
    }

    let final_text = out_lines.join("\n");
    if all_ok {
        cache.put(&src_key, target_lang, text, &final_text);
    }
    (all_ok, final_text)
}

/// Sentence position inside the per-text line structure.
type SentenceSlot = (usize, usize, usize, String);

/// Translate a list of text blocks for one target language with
/// character-based batching.
///
/// Each block splits into lines and sentences; cached sentences are reused
/// and only the remainder goes through the batch translator. Results come
/// back in input order as (ok, text) pairs.
pub async fn translate_blocks_batch(
    texts: &[String],
    target_lang: &str,
    source_lang: Option<&str>,
    cache: &TranslationCache,
    backend: &dyn TranslationBackend,
    config: &BatchConfig,
    stop: Option<StopFlag>,
) -> Vec<UnitResult> {
    if texts.is_empty() {
        return Vec::new();
    }
    if texts.len() == 1 {
        return vec![
            translate_block_sentencewise(&texts[0], target_lang, source_lang, cache, backend, config)
                .await,
        ];
    }

    let src_key = TranslationCache::source_key(source_lang);

    // Per text: lines -> sentence slots, None marking a sentence that still
    // needs translation. An empty structure means a blank text; a single
    // pre-filled slot means a whole-text cache hit.
    let mut text_structures: Vec<Vec<Vec<Option<String>>>> = Vec::with_capacity(texts.len());
    let mut to_translate: Vec<SentenceSlot> = Vec::new();

    for (text_idx, text) in texts.iter().enumerate() {
        if text.trim().is_empty() {
            text_structures.push(Vec::new());
            continue;
        }
        if let Some(cached) = cache.get(&src_key, target_lang, text) {
            text_structures.push(vec![vec![Some(cached)]]);
            continue;
        }

        let mut lines_structure: Vec<Vec<Option<String>>> = Vec::new();
        for raw_line in text.split('\n') {
            if raw_line.trim().is_empty() {
                lines_structure.push(vec![Some(String::new())]);
                continue;
            }
            let sentences = {
                let split = split_sentences(raw_line, source_lang);
                if split.is_empty() {
                    vec![raw_line.to_string()]
                } else {
                    split
                }
            };
            let mut sentence_slots: Vec<Option<String>> = Vec::with_capacity(sentences.len());
            for sentence in sentences {
                if let Some(cached) = cache.get(&src_key, target_lang, &sentence) {
                    sentence_slots.push(Some(cached));
                } else {
                    sentence_slots.push(None);
                    to_translate.push((
                        text_idx,
                        lines_structure.len(),
                        sentence_slots.len() - 1,
                        sentence,
                    ));
                }
            }
            lines_structure.push(sentence_slots);
        }
        text_structures.push(lines_structure);
    }

    if !to_translate.is_empty() {
        let mut translator = BatchTranslator::new(backend, cache, config, target_lang, source_lang);
        if let Some(stop) = stop {
            translator = translator.with_stop_flag(stop);
        }
        let sentence_texts: Vec<String> =
            to_translate.iter().map(|(_, _, _, s)| s.clone()).collect();
        let batch_results = translator.translate_all(&sentence_texts).await;

        for ((text_idx, line_idx, sent_idx, _), (_ok, translated)) in
            to_translate.iter().zip(batch_results)
        {
            // Failure placeholders are written through too; reassembly
            // detects them by prefix and reports the block as failed.
            text_structures[*text_idx][*line_idx][*sent_idx] = Some(translated);
        }
    }

    let mut results: Vec<UnitResult> = Vec::with_capacity(texts.len());
    for (text_idx, text) in texts.iter().enumerate() {
        let structure = &text_structures[text_idx];
        if text.trim().is_empty() || structure.is_empty() {
            results.push((true, String::new()));
            continue;
        }

        let mut out_lines: Vec<String> = Vec::with_capacity(structure.len());
        let mut all_ok = true;
        for line_slots in structure {
            let mut parts: Vec<String> = Vec::with_capacity(line_slots.len());
            for slot in line_slots {
                match slot {
                    None => {
                        all_ok = false;
                        parts.push(format!("[Translation failed|{}]", target_lang));
                    }
                    Some(sentence) if sentence.starts_with("[Translation failed") => {
                        all_ok = false;
                        parts.push(sentence.clone());
                    }
                    Some(sentence) => parts.push(sentence.clone()),
                }
            }
            out_lines.push(parts.join(" "));
        }

        let final_text = out_lines.join("\n");
        if all_ok {
            cache.put(&src_key, target_lang, text, &final_text);
        }
        results.push((all_ok, final_text));
    }

    results
}

/// Translate texts for all targets with character-based batching.
///
/// Targets are processed in caller-supplied order; the stop flag is polled
/// before each target and progress lines go through the log sink.
pub async fn translate_texts(
    texts: &[String],
    targets: &[String],
    source_lang: Option<&str>,
    cache: &TranslationCache,
    backend: &dyn TranslationBackend,
    config: &BatchConfig,
    stop: Option<StopFlag>,
    log: LogSink<'_>,
) -> TranslationOutcome {
    let mut outcome = TranslationOutcome::default();
    let total = texts.len() * targets.len();

    for target in targets {
        if stop.as_ref().map(|s| s.is_set()).unwrap_or(false) {
            log(format!(
                "[STOP] Translation stopped at {}/{} segments",
                outcome.done, total
            ));
            outcome.stopped = true;
            break;
        }

        let results = translate_blocks_batch(
            texts,
            target,
            source_lang,
            cache,
            backend,
            config,
            stop.clone(),
        )
        .await;

        for (text, (ok, translated)) in texts.iter().zip(results) {
            outcome.done += 1;
            if !ok {
                outcome.failed += 1;
            }
            outcome
                .map
                .insert((target.clone(), text.clone()), translated);
            if outcome.done % 10 == 0 || outcome.done == total {
                log(format!(
                    "[TR] {}/{} {} len={}",
                    outcome.done,
                    total,
                    target,
                    text.chars().count()
                ));
            }
        }
    }

    outcome
}

/// Per-target translation maps for one document run.
#[derive(Debug, Default)]
pub struct DocumentTranslation {
    /// target language -> (source text -> translated text)
    pub by_target: HashMap<String, HashMap<String, String>>,
    /// Units that resolved to a failure placeholder
    pub failed: usize,
    /// True when the run was cut short by the stop flag
    pub stopped: bool,
}

/// Translate a document's unique texts for every target language.
///
/// Size limits are validated before the first backend call; a document that
/// cannot complete fails here instead of burning backend quota. Failure
/// placeholders are embedded in the returned maps so the output document is
/// always producible and auditable.
pub async fn translate_document(
    document: &TranslatableDocument,
    targets: &[String],
    source_lang: Option<&str>,
    cache: &TranslationCache,
    backend: &dyn TranslationBackend,
    batch_config: &BatchConfig,
    parse_config: &ParseConfig,
    stop: Option<StopFlag>,
    log: LogSink<'_>,
) -> Result<DocumentTranslation, AppError> {
    let translatable = document.translatable_elements();
    let total_text_length: usize = translatable
        .iter()
        .map(|e| e.content.trim().chars().count())
        .sum();

    check_size_limits(
        translatable.len(),
        total_text_length,
        parse_config,
        &format!("{} document", document.source_type.to_uppercase()),
    )?;

    let unique_texts = document.unique_texts();
    info!(
        "Translating {} unique texts across {} targets",
        unique_texts.len(),
        targets.len()
    );
    log(format!(
        "[TR] {} unique texts, {} target language(s)",
        unique_texts.len(),
        targets.len()
    ));

    let outcome = translate_texts(
        &unique_texts,
        targets,
        source_lang,
        cache,
        backend,
        batch_config,
        stop,
        log,
    )
    .await;

    let mut by_target: HashMap<String, HashMap<String, String>> = HashMap::new();
    for ((target, text), translated) in outcome.map {
        by_target.entry(target).or_default().insert(text, translated);
    }

    Ok(DocumentTranslation {
        by_target,
        failed: outcome.failed,
        stopped: outcome.stopped,
    })
}
