/*!
 * Inline renderer for flow documents.
 *
 * Emits an ordered block list in which every translatable element is followed
 * by a translation block carrying a private zero-width marker character. The
 * marker makes the operation idempotent: a document that already contains
 * inserted blocks is passed through without duplicating them, and parsers use
 * the same marker to avoid re-ingesting inserted translations as source text.
 */

use log::debug;
use std::collections::HashMap;

use crate::app_config::RenderConfig;
use crate::document::model::TranslatableDocument;

/// Zero-width marker appended to every inserted translation block.
pub const INSERT_MARKER: char = '\u{200b}';

/// Check whether a text block is a previously inserted translation.
pub fn is_inserted_translation(text: &str) -> bool {
    text.contains(INSERT_MARKER)
}

/// Kind of an emitted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineBlockKind {
    /// Page boundary heading ("-- Page N --")
    PageBreak,
    /// Source content, reproduced verbatim
    Original,
    /// Inserted translation, marker included
    Translation,
}

/// One block of inline-mode output.
#[derive(Debug, Clone)]
pub struct InlineBlock {
    /// Block kind
    pub kind: InlineBlockKind,
    /// Block text; translation blocks end with the insertion marker
    pub text: String,
    /// Element this block was produced from, when applicable
    pub element_id: Option<String>,
    /// True for source elements excluded from translation (kept greyed-out)
    pub untranslated_source: bool,
    /// Italic styling hint for translation blocks
    pub italic: bool,
    /// Font size hint in points for translation blocks
    pub font_size: Option<f64>,
}

/// Renderer that appends translations after each original block.
pub struct InlineRenderer {
    config: RenderConfig,
}

impl InlineRenderer {
    /// Create an inline renderer with the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Produce the inline block sequence for a document and translation map.
    ///
    /// Elements already carrying the insertion marker pass through untouched
    /// and suppress re-insertion for the element they follow, so rendering an
    /// already-rendered document again yields no new insertions.
    pub fn render(
        &self,
        document: &TranslatableDocument,
        translations: &HashMap<String, String>,
    ) -> Vec<InlineBlock> {
        let elements = document.elements_in_reading_order();
        let mut blocks: Vec<InlineBlock> = Vec::new();
        let mut current_page = 0usize;
        let mut inserted = 0usize;
        let mut skipped = 0usize;

        for (pos, element) in elements.iter().enumerate() {
            if element.page_num != current_page {
                current_page = element.page_num;
                blocks.push(InlineBlock {
                    kind: InlineBlockKind::PageBreak,
                    text: format!("-- Page {} --", current_page),
                    element_id: None,
                    untranslated_source: false,
                    italic: false,
                    font_size: None,
                });
            }

            let content = element.content.trim();
            if content.is_empty() {
                continue;
            }

            // A block inserted by a previous run passes through as-is.
            if is_inserted_translation(content) {
                blocks.push(InlineBlock {
                    kind: InlineBlockKind::Translation,
                    text: content.to_string(),
                    element_id: Some(element.element_id.clone()),
                    untranslated_source: false,
                    italic: true,
                    font_size: Some(self.config.insert_font_size_pt),
                });
                continue;
            }

            if !element.should_translate {
                blocks.push(InlineBlock {
                    kind: InlineBlockKind::Original,
                    text: content.to_string(),
                    element_id: Some(element.element_id.clone()),
                    untranslated_source: true,
                    italic: false,
                    font_size: None,
                });
                continue;
            }

            blocks.push(InlineBlock {
                kind: InlineBlockKind::Original,
                text: content.to_string(),
                element_id: Some(element.element_id.clone()),
                untranslated_source: false,
                italic: false,
                font_size: None,
            });

            // The element's translation already follows it from a previous
            // run; re-inserting would duplicate it.
            let next_is_inserted = elements
                .get(pos + 1)
                .map(|next| is_inserted_translation(next.content.trim()))
                .unwrap_or(false);
            if next_is_inserted {
                skipped += 1;
                continue;
            }

            let translation_text = match translations.get(content) {
                Some(translated) => translated.clone(),
                None => format!(
                    "[Translation missing] {}...",
                    content.chars().take(50).collect::<String>()
                ),
            };

            blocks.push(InlineBlock {
                kind: InlineBlockKind::Translation,
                text: format!("{}{}", translation_text, INSERT_MARKER),
                element_id: Some(element.element_id.clone()),
                untranslated_source: false,
                italic: true,
                font_size: Some(self.config.insert_font_size_pt),
            });
            inserted += 1;
        }

        debug!(
            "Inline render: {} insertions, {} suppressed as already present",
            inserted, skipped
        );
        blocks
    }
}
