/*!
 * Language-aware sentence segmentation.
 *
 * Splits a text line into translation units. CJK text is split on sentence
 * punctuation directly, since boundary detectors tuned for spaced scripts are
 * unreliable on unspaced ones; other languages use a terminator-plus-space
 * rule with the plain punctuation splitter as the final fallback.
 */

use crate::language_utils::is_cjk_language;

/// Sentence-ending punctuation: fullwidth CJK terminators plus Western.
const CJK_TERMINATORS: [char; 3] = ['\u{3002}', '\u{FF01}', '\u{FF1F}'];
const WESTERN_TERMINATORS: [char; 3] = ['.', '!', '?'];

fn is_terminator(ch: char) -> bool {
    CJK_TERMINATORS.contains(&ch) || WESTERN_TERMINATORS.contains(&ch)
}

/// Split a line into sentences based on a language hint.
///
/// Returns an empty vector for blank input. A line with no boundary
/// punctuation comes back as a single unit; content is never dropped.
pub fn split_sentences(line: &str, lang_hint: Option<&str>) -> Vec<String> {
    if line.trim().is_empty() {
        return Vec::new();
    }

    if lang_hint.map(is_cjk_language).unwrap_or(false) {
        return split_by_punctuation(line);
    }

    let sentences = split_general(line);
    if !sentences.is_empty() {
        return sentences;
    }

    split_by_punctuation(line)
}

/// General boundary rule: a terminator followed by whitespace ends a
/// sentence. Avoids splitting decimals ("3.14") and most abbreviations that
/// run straight into the next word.
fn split_general(line: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut buf = String::new();
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        buf.push(ch);
        let at_boundary = WESTERN_TERMINATORS.contains(&ch)
            && chars.peek().map(|next| next.is_whitespace()).unwrap_or(true);
        if at_boundary || CJK_TERMINATORS.contains(&ch) {
            let trimmed = buf.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            buf.clear();
        }
    }

    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// Punctuation-based splitting applied uniformly, used directly for CJK and
/// as the final fallback elsewhere.
fn split_by_punctuation(line: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut buf = String::new();

    for ch in line.chars() {
        buf.push(ch);
        if is_terminator(ch) {
            let trimmed = buf.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            buf.clear();
        }
    }

    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    if sentences.is_empty() {
        let whole = line.trim();
        if whole.is_empty() {
            Vec::new()
        } else {
            vec![whole.to_string()]
        }
    } else {
        sentences
    }
}
