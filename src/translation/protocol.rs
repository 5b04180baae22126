/*!
 * Numbered segment-marker protocol for batched translation.
 *
 * Each unit in a batch is wrapped as `<<<SEG_i>>>\n{text}` before the model
 * call, and the response is correlated back to units by re-extracting the
 * markers. Models occasionally drop or mangle markers, so parsing is tolerant:
 * a response recovering at least the configured fraction of markers is
 * accepted with the missing slots left empty, and legacy separator formats are
 * tried before rejecting outright.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Legacy plain separator emitted by older prompt formats.
pub const BATCH_SEPARATOR: &str = "---SEGMENT_SEPARATOR---";

static SEG_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<<<SEG_(\d+)>>>").expect("segment marker pattern is valid"));

/// Wrap texts with numbered segment markers for a batched prompt.
pub fn wrap_segments(texts: &[String]) -> String {
    let mut segments = Vec::with_capacity(texts.len());
    for (i, text) in texts.iter().enumerate() {
        segments.push(format!("<<<SEG_{}>>>\n{}", i, text));
    }
    segments.join("\n")
}

/// Outcome of parsing a batched response.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchParse {
    /// Every expected index recovered with non-empty content
    Complete(Vec<String>),
    /// Enough indices recovered; missing slots are empty strings and must be
    /// treated as per-unit failures by the caller
    Partial(Vec<String>),
    /// Too little recovered; the caller should fall back to per-unit calls
    Rejected,
}

impl BatchParse {
    /// The recovered slots, if the response was accepted.
    pub fn into_results(self) -> Option<Vec<String>> {
        match self {
            BatchParse::Complete(results) | BatchParse::Partial(results) => Some(results),
            BatchParse::Rejected => None,
        }
    }
}

/// Parse a batched model response back into per-index results.
///
/// Strategy order: numbered markers, then the legacy separator, then
/// alternative plain separators, then any partial marker result.
pub fn parse_batch_response(
    response: &str,
    expected_count: usize,
    partial_accept_ratio: f64,
) -> BatchParse {
    let mut results = vec![String::new(); expected_count];
    let mut parsed_count = 0usize;

    // Strategy 1: numbered segment markers (most reliable). Content of a
    // segment runs from the end of its marker to the start of the next.
    let marker_spans: Vec<(usize, usize, usize)> = SEG_MARKER
        .captures_iter(response)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let idx: usize = caps.get(1)?.as_str().parse().ok()?;
            Some((idx, whole.start(), whole.end()))
        })
        .collect();

    for (pos, (idx, _, content_start)) in marker_spans.iter().enumerate() {
        let content_end = marker_spans
            .get(pos + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(response.len());
        if *idx < expected_count {
            let content = response[*content_start..content_end].trim();
            if results[*idx].is_empty() && !content.is_empty() {
                results[*idx] = content.to_string();
                parsed_count += 1;
            }
        }
    }

    if !marker_spans.is_empty() {
        if parsed_count == expected_count {
            return BatchParse::Complete(results);
        }
        if (parsed_count as f64) >= (expected_count as f64) * partial_accept_ratio {
            debug!(
                "Accepted partial batch response: {}/{} segments recovered",
                parsed_count, expected_count
            );
            return BatchParse::Partial(results);
        }
    }

    // Strategy 2 & 3: legacy separators.
    let separators = [BATCH_SEPARATOR, "\n---\n", "\n\n---\n\n", "---"];
    for separator in separators {
        if response.contains(separator) {
            let parts: Vec<String> = response
                .split(separator)
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if parts.len() == expected_count {
                return BatchParse::Complete(parts);
            }
        }
    }

    if parsed_count > 0 {
        debug!(
            "Rejecting batch response: only {}/{} segments recovered",
            parsed_count, expected_count
        );
    }

    BatchParse::Rejected
}
