/*!
 * Text segmentation and script utilities.
 *
 * - `sentence`: Language-aware sentence splitting into translation units
 * - `script`: Translate/skip decisions, CJK and RTL detection, simplified-to-
 *   traditional normalization
 */

pub mod script;
pub mod sentence;

// Re-export main functions for easier usage
pub use script::{detect_text_direction, has_cjk, should_translate, to_traditional, TextDirection};
pub use sentence::split_sentences;
