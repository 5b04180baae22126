/*!
 * Translatable document data model.
 *
 * The unified intermediate layer for document translation: format-specific
 * parsers build a `TranslatableDocument`, the translation pipeline resolves a
 * text -> translation map against it, and the renderers consume its geometry.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Type of document element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Ordinary body text
    Text,
    /// Document or section title
    Title,
    /// Page header region
    Header,
    /// Page footer region
    Footer,
    /// Cell inside a detected table
    TableCell,
    /// List item
    ListItem,
    /// Figure or table caption
    Caption,
    /// Footnote text
    Footnote,
}

/// Bounding box in the internal coordinate space.
///
/// Top-left origin, x increases right, y increases down, unit points
/// (1 point = 1/72 inch). `x0 <= x1` and `y0 <= y1` always hold; the
/// constructors normalize ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
    // True once the coordinates are in the internal top-left space. A box
    // still in page space (bottom-left origin) carries false until
    // normalize_bbox flips it; the flag stops a second flip from undoing the
    // first.
    #[serde(default = "default_converted", skip_serializing)]
    pub(crate) converted: bool,
}

fn default_converted() -> bool {
    true
}

impl BoundingBox {
    /// Create a box already in the internal top-left space.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            x0,
            y0,
            x1,
            y1,
            converted: true,
        }
    }

    /// Create a box holding raw page-space coordinates (bottom-left origin,
    /// y increases upward). It must pass through
    /// [`normalize_bbox`](crate::document::bbox::normalize_bbox) before use.
    pub fn page_space(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            converted: false,
        }
    }

    /// Width of the bounding box
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// X coordinate of the center
    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    /// Y coordinate of the center
    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    /// Return this box translated by (dx, dy).
    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            converted: self.converted,
        }
    }

    /// Return this box shrunk inward by `margin` on every side.
    pub fn shrunk(&self, margin: f64) -> Self {
        Self {
            x0: self.x0 + margin,
            y0: self.y0 + margin,
            x1: self.x1 - margin,
            y1: self.y1 - margin,
            converted: self.converted,
        }
    }

    /// Return this box grown outward by `margin` on every side.
    pub fn inflated(&self, margin: f64) -> Self {
        self.shrunk(-margin)
    }

    /// Check whether two boxes overlap.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

/// Text style information captured from the source document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Font name as reported by the source
    pub font_name: Option<String>,
    /// Font size in points
    pub font_size: Option<f64>,
    /// Bold flag
    #[serde(default)]
    pub is_bold: bool,
    /// Italic flag
    #[serde(default)]
    pub is_italic: bool,
    /// Text colour as a hex string, e.g. "#FF0000"
    pub color: Option<String>,
    /// Background colour as a hex string
    pub background_color: Option<String>,
}

/// A translatable element in the document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatableElement {
    /// Stable identifier, unique within a document
    pub element_id: String,
    /// Source text, trimmed
    pub content: String,
    /// Element classification
    pub element_type: ElementType,
    /// 1-based page number
    pub page_num: usize,
    /// Position on the page, if the source is position-addressable
    pub bbox: Option<BoundingBox>,
    /// Captured style, if available
    pub style: Option<StyleInfo>,
    /// False for elements retained only for context (e.g. skipped headers)
    #[serde(default = "default_should_translate")]
    pub should_translate: bool,
    /// Translated text, set once after the translation map resolves
    pub translated_content: Option<String>,
    /// Free-form structural metadata (block/line numbers, container handles)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

fn default_should_translate() -> bool {
    true
}

/// Information about a document page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based page number
    pub page_num: usize,
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Rotation in degrees: 0, 90, 180 or 270
    #[serde(default)]
    pub rotation: u16,
}

/// Document-level metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Creating application
    pub creator: Option<String>,
    /// Producing application
    pub producer: Option<String>,
    /// Creation date string as reported by the source
    pub creation_date: Option<String>,
    /// Modification date string as reported by the source
    pub modification_date: Option<String>,
    /// Number of pages
    #[serde(default)]
    pub page_count: usize,
    /// False when average extracted characters per page fall below the
    /// scanned-source threshold
    #[serde(default = "default_should_translate")]
    pub has_text_layer: bool,
}

/// A document ready for translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatableDocument {
    /// Path of the source file
    pub source_path: String,
    /// Source container type, e.g. "pdf", "docx", "pptx"
    pub source_type: String,
    /// All extracted elements
    pub elements: Vec<TranslatableElement>,
    /// Physical pages; a synthetic single page for flow documents
    pub pages: Vec<PageInfo>,
    /// Document-level metadata
    pub metadata: DocumentMetadata,
}

impl TranslatableDocument {
    /// Elements that should be translated.
    pub fn translatable_elements(&self) -> Vec<&TranslatableElement> {
        self.elements.iter().filter(|e| e.should_translate).collect()
    }

    /// Elements on a specific page.
    pub fn elements_by_page(&self, page_num: usize) -> Vec<&TranslatableElement> {
        self.elements
            .iter()
            .filter(|e| e.page_num == page_num)
            .collect()
    }

    /// All elements grouped by page number, ordered by page.
    pub fn all_elements_by_page(&self) -> BTreeMap<usize, Vec<&TranslatableElement>> {
        let mut result: BTreeMap<usize, Vec<&TranslatableElement>> = BTreeMap::new();
        for element in &self.elements {
            result.entry(element.page_num).or_default().push(element);
        }
        result
    }

    /// Page info for a specific page number.
    pub fn page_info(&self, page_num: usize) -> Option<&PageInfo> {
        self.pages.iter().find(|p| p.page_num == page_num)
    }

    /// Elements sorted by reading order (top-to-bottom, left-to-right).
    ///
    /// y0 is rounded to a coarse bucket so fragments on the same visual line
    /// sort left-to-right rather than by sub-point jitter.
    pub fn elements_in_reading_order(&self) -> Vec<&TranslatableElement> {
        let mut sorted: Vec<&TranslatableElement> = self.elements.iter().collect();
        sorted.sort_by(|a, b| {
            reading_order_key(a)
                .partial_cmp(&reading_order_key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Unique translatable texts, trimmed and deduplicated in first-seen order.
    pub fn unique_texts(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut unique = Vec::new();
        for element in self.elements.iter().filter(|e| e.should_translate) {
            let text = element.content.trim();
            if !text.is_empty() && seen.insert(text) {
                unique.push(text.to_string());
            }
        }
        unique
    }

    /// Apply a content -> translation map onto the elements.
    pub fn apply_translations(&mut self, translations: &HashMap<String, String>) {
        for element in &mut self.elements {
            if element.should_translate {
                if let Some(translated) = translations.get(element.content.trim()) {
                    element.translated_content = Some(translated.clone());
                }
            }
        }
    }
}

fn reading_order_key(element: &TranslatableElement) -> (usize, f64, f64) {
    match &element.bbox {
        Some(bbox) => {
            let y_rounded = (bbox.y0 / 10.0).round() * 10.0;
            (element.page_num, y_rounded, bbox.x0)
        }
        None => (element.page_num, 0.0, 0.0),
    }
}
