/*!
 * Smart retry for single-unit translation failures.
 *
 * Failures are classified and recovered locally where possible:
 * - capacity errors (context/length/memory) split the text into smaller
 *   units and translate each slice independently;
 * - transient errors (timeout/connection/busy) retry the same call behind a
 *   short fixed sequence of escalating waits;
 * - anything else surfaces verbatim.
 */

use log::{debug, info};
use std::time::Duration;

use crate::app_config::BatchConfig;
use crate::errors::{BackendError, BackendErrorKind};
use crate::providers::TranslationBackend;
use crate::text::sentence::split_sentences;

/// Translate one text, applying the smart-retry strategies on failure.
pub async fn translate_with_recovery(
    backend: &dyn TranslationBackend,
    text: &str,
    target_lang: &str,
    source_lang: Option<&str>,
    config: &BatchConfig,
) -> Result<String, BackendError> {
    match backend.translate_once(text, target_lang, source_lang).await {
        Ok(result) => Ok(result),
        Err(error) => smart_retry(backend, text, target_lang, source_lang, config, error).await,
    }
}

async fn smart_retry(
    backend: &dyn TranslationBackend,
    text: &str,
    target_lang: &str,
    source_lang: Option<&str>,
    config: &BatchConfig,
    error: BackendError,
) -> Result<String, BackendError> {
    match error.kind() {
        BackendErrorKind::Capacity => {
            info!(
                "Text too long ({} chars), attempting chunked translation",
                text.chars().count()
            );
            translate_chunked(backend, text, target_lang, source_lang, config).await
        }
        BackendErrorKind::Transient => {
            info!("Temporary error detected, attempting extended retry");
            translate_with_extended_retry(backend, text, target_lang, source_lang, config).await
        }
        BackendErrorKind::Fatal => Err(error),
    }
}

/// Split a failing text into translation slices and the separator to rejoin
/// them with. Paragraph boundaries are preferred, then lines, then
/// sentences; slices still over the limit are hard-cut at the character
/// ceiling.
fn split_into_chunks(text: &str, max_chunk_chars: usize) -> (Vec<String>, &'static str) {
    let (chunks, joiner): (Vec<String>, &'static str) = if text.contains("\n\n") {
        (
            text.split("\n\n")
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            "\n\n",
        )
    } else if text.contains('\n') {
        (
            text.lines()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            "\n",
        )
    } else {
        (split_sentences(text, None), " ")
    };

    let mut final_chunks = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if chunk.chars().count() <= max_chunk_chars {
            final_chunks.push(chunk);
        } else {
            let chars: Vec<char> = chunk.chars().collect();
            for slice in chars.chunks(max_chunk_chars) {
                final_chunks.push(slice.iter().collect());
            }
        }
    }

    (final_chunks, joiner)
}

async fn translate_chunked(
    backend: &dyn TranslationBackend,
    text: &str,
    target_lang: &str,
    source_lang: Option<&str>,
    config: &BatchConfig,
) -> Result<String, BackendError> {
    let (chunks, joiner) = split_into_chunks(text, config.chunk_max_chars);

    if chunks.is_empty() {
        return Err(BackendError::Other(
            "[Chunked translation failed: no valid chunks]".to_string(),
        ));
    }

    let mut translated_chunks = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let translated = backend
            .translate_once(chunk, target_lang, source_lang)
            .await
            .map_err(|e| BackendError::Other(format!("[Chunk translation failed] {}", e)))?;
        translated_chunks.push(translated);
    }

    Ok(translated_chunks.join(joiner))
}

async fn translate_with_extended_retry(
    backend: &dyn TranslationBackend,
    text: &str,
    target_lang: &str,
    source_lang: Option<&str>,
    config: &BatchConfig,
) -> Result<String, BackendError> {
    for wait_secs in &config.retry_waits_secs {
        debug!("Extended retry: waiting {}s before attempt", wait_secs);
        tokio::time::sleep(Duration::from_secs(*wait_secs)).await;

        if let Ok(result) = backend.translate_once(text, target_lang, source_lang).await {
            return Ok(result);
        }
    }

    Err(BackendError::Transport(
        "[Extended retry failed after multiple attempts]".to_string(),
    ))
}
