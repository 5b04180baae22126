/*!
 * Geometry instruction model for coordinate-mode rendering.
 *
 * The renderers do not touch container bytes; they emit a `RenderPlan`
 * describing redactions, text insertions, page copies and rules in the
 * internal top-left coordinate space. The container collaborator replays the
 * plan against the actual file.
 */

use serde::{Deserialize, Serialize};

use crate::app_config::LayoutMode;
use crate::document::model::BoundingBox;
use crate::text::script::TextDirection;

impl Serialize for TextDirection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TextDirection::Ltr => serializer.serialize_str("ltr"),
            TextDirection::Rtl => serializer.serialize_str("rtl"),
        }
    }
}

impl<'de> Deserialize<'de> for TextDirection {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        match value.as_str() {
            "rtl" => Ok(TextDirection::Rtl),
            _ => Ok(TextDirection::Ltr),
        }
    }
}

/// A fitted, wrapped text placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInsertion {
    /// Target box the text was fitted into
    pub bbox: BoundingBox,
    /// Wrapped lines in draw order, truncated to what fits
    pub lines: Vec<String>,
    /// Resolved font size in points
    pub font_size: f64,
    /// Line spacing multiplier applied between baselines
    pub line_spacing: f64,
    /// Language code for the collaborator's font lookup
    pub lang_code: String,
    /// Dominant text direction
    pub direction: TextDirection,
    /// True when the text did not fully fit even at the minimum size
    pub overflowed: bool,
}

/// Instruction to copy a source page region into the output page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageCopy {
    /// 1-based source page number
    pub source_page: usize,
    /// Destination rectangle on the output page
    pub dest: BoundingBox,
}

/// A straight rule line (e.g. the side-by-side divider).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleLine {
    /// Start x
    pub x0: f64,
    /// Start y
    pub y0: f64,
    /// End x
    pub x1: f64,
    /// End y
    pub y1: f64,
    /// Stroke width in points
    pub width: f64,
    /// Grey level in [0, 1], 0 = black
    pub gray: f64,
}

/// Everything to draw for one output page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRenderPlan {
    /// 1-based page number in the output
    pub page_num: usize,
    /// Output page width in points
    pub width: f64,
    /// Output page height in points
    pub height: f64,
    /// Source-page copies, drawn first
    pub copies: Vec<PageCopy>,
    /// Regions whose original glyphs are removed, applied together before
    /// any insertion on the page
    pub redactions: Vec<BoundingBox>,
    /// Translated text placements
    pub insertions: Vec<TextInsertion>,
    /// Decoration lines
    pub rules: Vec<RuleLine>,
}

/// A complete coordinate-mode render plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Mode the plan was produced for
    pub mode: LayoutMode,
    /// Per-page instructions in page order
    pub pages: Vec<PageRenderPlan>,
    /// Truncated source texts that had no resolved translation
    pub missing_translations: Vec<String>,
}

impl RenderPlan {
    /// Total number of text insertions across all pages.
    pub fn insertion_count(&self) -> usize {
        self.pages.iter().map(|p| p.insertions.len()).sum()
    }

    /// Total number of redaction rectangles across all pages.
    pub fn redaction_count(&self) -> usize {
        self.pages.iter().map(|p| p.redactions.len()).sum()
    }
}
