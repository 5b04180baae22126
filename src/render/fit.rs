/*!
 * Text wrapping and shrink-to-fit font sizing.
 *
 * Wrapping accumulates character by character against measured width, since
 * CJK, Thai and Arabic scripts cannot be wrapped reliably on word boundaries.
 * Fitting starts at the language profile's maximum size and multiplies by the
 * shrink factor until the wrapped height fits or the minimum size is reached;
 * overflow degrades to as-many-lines-as-fit with a logged warning, never a
 * failure.
 */

use log::warn;

use crate::app_config::FontSizeProfile;

/// Baseline-to-baseline spacing multiplier used for placement.
pub const LINE_SPACING: f64 = 1.15;

/// Upper bound on shrink iterations; with the smallest shrink factor in use
/// this comfortably reaches any profile's minimum size.
const MAX_FIT_ITERATIONS: usize = 25;

/// Width measurement seam for the fitting loop.
///
/// The font-resolution collaborator supplies real metrics when a font is
/// available; [`ApproxFontMetrics`] covers the no-font fallback.
pub trait FontMetrics: Send + Sync {
    /// Width of `text` in points at the given size.
    fn text_width(&self, text: &str, font_size: f64) -> f64;

    /// Line height in points at the given size.
    fn line_height(&self, font_size: f64) -> f64 {
        font_size * 1.2
    }
}

/// Script-aware width approximation used when no font is resolvable.
///
/// CJK and other fullwidth glyphs advance one em; everything else advances a
/// fraction of an em typical for proportional Latin faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxFontMetrics;

impl ApproxFontMetrics {
    fn char_advance(ch: char) -> f64 {
        let code = ch as u32;
        let fullwidth = (0x1100..=0x115F).contains(&code)      // Hangul Jamo
            || (0x2E80..=0xA4CF).contains(&code)               // CJK radicals..Yi
            || (0xAC00..=0xD7A3).contains(&code)               // Hangul syllables
            || (0xF900..=0xFAFF).contains(&code)               // CJK compat ideographs
            || (0xFF00..=0xFF60).contains(&code);              // Fullwidth forms
        if fullwidth {
            1.0
        } else if ch == ' ' {
            0.28
        } else if ch.is_ascii() {
            0.52
        } else {
            0.6
        }
    }
}

impl FontMetrics for ApproxFontMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(Self::char_advance).sum::<f64>() * font_size
    }
}

/// Wrap text greedily to the given width, character by character.
///
/// Existing line breaks are preserved; a line that fits passes through
/// unchanged.
pub fn wrap_text(
    text: &str,
    metrics: &dyn FontMetrics,
    font_size: f64,
    max_width: f64,
) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut wrapped: Vec<String> = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            wrapped.push(String::new());
            continue;
        }

        if metrics.text_width(line, font_size) <= max_width {
            wrapped.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for ch in line.chars() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if metrics.text_width(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                if !current.is_empty() {
                    wrapped.push(current);
                }
                current = ch.to_string();
            }
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
    }

    if wrapped.is_empty() {
        vec![String::new()]
    } else {
        wrapped
    }
}

/// Result of a shrink-to-fit pass.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Resolved font size, never below the profile minimum
    pub font_size: f64,
    /// Wrapped lines, truncated to the box capacity on overflow
    pub lines: Vec<String>,
    /// False when content was truncated
    pub fits: bool,
}

/// Find the largest font size (within the profile) at which the wrapped text
/// fits the box, and the wrapped lines at that size.
///
/// Terminates in at most a bounded number of shrink iterations. When even the
/// minimum size overflows, the returned lines are cut to the box capacity and
/// a warning is logged.
pub fn fit_text_to_bbox(
    text: &str,
    bbox_width: f64,
    bbox_height: f64,
    metrics: &dyn FontMetrics,
    profile: &FontSizeProfile,
) -> FitResult {
    // A tight box caps the starting size below the profile maximum.
    let mut font_size = profile
        .max_size_pt
        .min((bbox_height * profile.height_ratio).max(profile.min_size_pt));

    for _ in 0..MAX_FIT_ITERATIONS {
        if font_size < profile.min_size_pt {
            font_size = profile.min_size_pt;
            break;
        }

        let lines = wrap_text(text, metrics, font_size, bbox_width);
        let total_height = lines.len() as f64 * font_size * LINE_SPACING;
        if total_height <= bbox_height {
            return FitResult {
                font_size,
                lines,
                fits: true,
            };
        }

        font_size *= profile.shrink_factor;
    }

    let font_size = font_size.max(profile.min_size_pt);
    let lines = wrap_text(text, metrics, font_size, bbox_width);
    let capacity = ((bbox_height / (font_size * LINE_SPACING)).floor() as usize).max(1);

    if lines.len() <= capacity {
        FitResult {
            font_size,
            lines,
            fits: true,
        }
    } else {
        warn!(
            "Text does not fit in bbox even at minimum font size {}pt: text='{}', bbox=({:.1}, {:.1})",
            font_size,
            text.chars().take(30).collect::<String>(),
            bbox_width,
            bbox_height
        );
        FitResult {
            font_size,
            lines: lines.into_iter().take(capacity).collect(),
            fits: false,
        }
    }
}
