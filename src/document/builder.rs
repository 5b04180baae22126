/*!
 * Document assembly support for format-specific parsers.
 *
 * Parsers walk their container structure and feed lines/paragraphs/cells into
 * a `DocumentBuilder`, which owns deduplication, header/footer
 * classification, table tagging, reading-order sorting and size validation.
 * The builder keeps the core data model free of any container library's node
 * types: parsers pass an opaque structural reference string instead.
 */

use log::debug;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::app_config::ParseConfig;
use crate::document::bbox::{header_footer_region, is_bbox_inside, PageRegion};
use crate::document::model::{
    BoundingBox, DocumentMetadata, ElementType, PageInfo, StyleInfo, TranslatableDocument,
    TranslatableElement,
};
use crate::errors::DocumentError;
use crate::render::inline::is_inserted_translation;

/// Tolerance in points when testing element containment in a table box.
const TABLE_CONTAINMENT_TOLERANCE_PT: f64 = 5.0;

/// Average extracted characters per page below which a page source is
/// considered scanned (no usable text layer).
const TEXT_LAYER_CHARS_PER_PAGE: usize = 20;

/// Incremental builder for a [`TranslatableDocument`].
pub struct DocumentBuilder {
    source_path: String,
    source_type: String,
    config: ParseConfig,
    elements: Vec<TranslatableElement>,
    pages: Vec<PageInfo>,
    seen_keys: HashSet<String>,
    metadata: DocumentMetadata,
    total_chars: usize,
}

impl DocumentBuilder {
    /// Create a builder for the given source.
    pub fn new(
        source_path: impl Into<String>,
        source_type: impl Into<String>,
        config: ParseConfig,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            source_type: source_type.into(),
            config,
            elements: Vec::new(),
            pages: Vec::new(),
            seen_keys: HashSet::new(),
            metadata: DocumentMetadata::default(),
            total_chars: 0,
        }
    }

    /// Register a physical page and return its 1-based number.
    pub fn add_page(&mut self, width: f64, height: f64, rotation: u16) -> usize {
        let page_num = self.pages.len() + 1;
        self.pages.push(PageInfo {
            page_num,
            width,
            height,
            rotation,
        });
        page_num
    }

    /// Set document-level metadata captured from the container.
    pub fn set_metadata(&mut self, metadata: DocumentMetadata) {
        self.metadata = metadata;
    }

    /// Add one visual text line from a position-addressable page.
    ///
    /// The bbox must already be in the internal top-left space (run it
    /// through `normalize_bbox` when the source is page-space). Header and
    /// footer regions are classified against the page margins; with the
    /// skip-header-footer policy enabled they are retained but marked
    /// non-translatable. Returns false when the line was deduplicated or
    /// empty.
    pub fn push_line(
        &mut self,
        page_num: usize,
        text: &str,
        bbox: BoundingBox,
        style: Option<StyleInfo>,
        structural_ref: &str,
    ) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }

        let key = structural_key(structural_ref, trimmed);
        if !self.seen_keys.insert(key) {
            debug!("Skipping duplicate structural node: {}", structural_ref);
            return false;
        }

        let page_height = self
            .pages
            .iter()
            .find(|p| p.page_num == page_num)
            .map(|p| p.height)
            .unwrap_or(0.0);

        let mut element_type = ElementType::Text;
        let mut should_translate = true;

        match header_footer_region(&bbox, page_height, self.config.header_footer_margin_pt) {
            PageRegion::Header => {
                element_type = ElementType::Header;
                if self.config.skip_header_footer {
                    should_translate = false;
                }
            }
            PageRegion::Footer => {
                element_type = ElementType::Footer;
                if self.config.skip_header_footer {
                    should_translate = false;
                }
            }
            PageRegion::Body => {}
        }

        let mut metadata = HashMap::new();
        metadata.insert("structural_ref".to_string(), structural_ref.to_string());

        self.total_chars += trimmed.chars().count();
        self.elements.push(TranslatableElement {
            element_id: format!("p{}_{}_{}", page_num, structural_ref, short_uuid()),
            content: trimmed.to_string(),
            element_type,
            page_num,
            bbox: Some(bbox),
            style,
            should_translate,
            translated_content: None,
            metadata,
        });
        true
    }

    /// Add one flow-document block (paragraph, cell, shape) without geometry.
    ///
    /// Blocks that carry the insertion marker from a previous pipeline run
    /// are skipped so re-parsing already-translated output cannot feed the
    /// inserted translations back in as source text. Returns false when the
    /// block was skipped or deduplicated.
    pub fn push_block(
        &mut self,
        page_num: usize,
        text: &str,
        element_type: ElementType,
        structural_ref: &str,
    ) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }

        if is_inserted_translation(trimmed) {
            debug!("Skipping previously inserted translation block");
            return false;
        }

        let key = structural_key(structural_ref, trimmed);
        if !self.seen_keys.insert(key) {
            return false;
        }

        let mut metadata = HashMap::new();
        metadata.insert("structural_ref".to_string(), structural_ref.to_string());

        self.total_chars += trimmed.chars().count();
        self.elements.push(TranslatableElement {
            element_id: format!("blk_{}", short_uuid()),
            content: trimmed.to_string(),
            element_type,
            page_num,
            bbox: None,
            style: None,
            should_translate: true,
            translated_content: None,
            metadata,
        });
        true
    }

    /// Re-tag elements contained in the given table boxes as table cells.
    ///
    /// Runs per page after the page's lines are pushed; containment allows a
    /// small tolerance because line boxes often poke past cell rules by a
    /// point or two.
    pub fn mark_tables(&mut self, page_num: usize, table_boxes: &[BoundingBox]) {
        for element in self
            .elements
            .iter_mut()
            .filter(|e| e.page_num == page_num)
        {
            let Some(bbox) = &element.bbox else { continue };
            for table_box in table_boxes {
                if is_bbox_inside(bbox, table_box, TABLE_CONTAINMENT_TOLERANCE_PT) {
                    element.element_type = ElementType::TableCell;
                    element
                        .metadata
                        .insert("in_table".to_string(), "true".to_string());
                    break;
                }
            }
        }
    }

    /// Finalize the document: validate size limits, sort elements into
    /// reading order and fill derived metadata.
    pub fn finish(mut self) -> Result<TranslatableDocument, DocumentError> {
        check_size_limits(
            self.elements.len(),
            self.total_chars,
            &self.config,
            &self.source_type,
        )?;

        // Flow documents without page boundaries get a synthetic single page.
        if self.pages.is_empty() {
            self.pages.push(PageInfo {
                page_num: 1,
                width: 612.0,
                height: 792.0,
                rotation: 0,
            });
        }

        self.metadata.page_count = self.pages.len();
        self.metadata.has_text_layer =
            self.total_chars / self.pages.len().max(1) >= TEXT_LAYER_CHARS_PER_PAGE;

        let mut document = TranslatableDocument {
            source_path: self.source_path,
            source_type: self.source_type,
            elements: self.elements,
            pages: self.pages,
            metadata: self.metadata,
        };

        let ordered: Vec<TranslatableElement> = document
            .elements_in_reading_order()
            .into_iter()
            .cloned()
            .collect();
        document.elements = ordered;

        Ok(document)
    }
}

/// Validate a segment count and total text length against the configured
/// document limits. Violations are fatal before any translation call so a
/// document that cannot complete never burns backend quota.
pub fn check_size_limits(
    segment_count: usize,
    total_text_length: usize,
    config: &ParseConfig,
    document_type: &str,
) -> Result<(), DocumentError> {
    if segment_count > config.max_segments {
        return Err(DocumentError::TooManySegments {
            document_type: document_type.to_string(),
            segment_count,
            max_segments: config.max_segments,
        });
    }

    if total_text_length > config.max_text_length {
        return Err(DocumentError::TextTooLong {
            document_type: document_type.to_string(),
            text_length: total_text_length,
            max_text_length: config.max_text_length,
        });
    }

    Ok(())
}

/// Structural deduplication key: content hash plus length plus a text prefix.
///
/// Repeated identical structural nodes (the same paragraph reachable through
/// two container views) hash to the same key and are emitted once.
fn structural_key(structural_ref: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(structural_ref.as_bytes());
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let prefix: String = text.chars().take(50).collect();
    format!("{:x}_{}_{}", digest, text.chars().count(), prefix)
}

fn short_uuid() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
