/*!
 * Coordinate renderer for position-addressable documents.
 *
 * Places translations at the exact geometry of the source text. Overlay mode
 * redacts the original glyphs (precise quads where the locator finds them)
 * and inserts fitted text into each element's box; side-by-side mode doubles
 * the page width, keeps the untouched original on the left and overlays
 * translations on a copy of the page on the right.
 */

use log::{debug, warn};
use std::collections::HashMap;

use crate::app_config::{font_profile_for, LayoutMode, RenderConfig};
use crate::document::model::{BoundingBox, TranslatableDocument, TranslatableElement};
use crate::errors::RenderError;
use crate::language_utils::lang_code;
use crate::render::fit::{fit_text_to_bbox, ApproxFontMetrics, FontMetrics, LINE_SPACING};
use crate::render::plan::{PageCopy, PageRenderPlan, RenderPlan, RuleLine, TextInsertion};
use crate::text::script::detect_text_direction;

/// Padding in points around an element box when matching located quads.
const QUAD_MATCH_TOLERANCE_PT: f64 = 2.0;

/// Redaction rectangles thinner than this are dropped as degenerate.
const MIN_REDACTION_EXTENT_PT: f64 = 1.0;

/// Fallback page size (US Letter) when a page has no recorded dimensions.
const FALLBACK_PAGE_SIZE: (f64, f64) = (612.0, 792.0);

/// Locates the exact glyph quads of a text on a page.
///
/// Supplied by the container collaborator (exact substring search in the
/// page's text layer). Returning no quads is fine; the renderer falls back to
/// the element's own box with a wider margin.
pub trait GlyphLocator {
    /// All quads where `text` occurs on the 1-based page.
    fn find_text(&self, page_num: usize, text: &str) -> Vec<BoundingBox>;
}

/// Locator that never finds anything, forcing the bbox fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLocator;

impl GlyphLocator for NullLocator {
    fn find_text(&self, _page_num: usize, _text: &str) -> Vec<BoundingBox> {
        Vec::new()
    }
}

/// Renderer that places translations at original text coordinates.
pub struct CoordinateRenderer {
    target_lang: String,
    target_code: String,
    config: RenderConfig,
    metrics: Box<dyn FontMetrics>,
}

impl CoordinateRenderer {
    /// Create a coordinate renderer for the target language.
    ///
    /// Uses the script-aware width approximation until real font metrics are
    /// attached; a missing font is a fallback, never a failure.
    pub fn new(target_lang: impl Into<String>, config: RenderConfig) -> Self {
        let target_lang = target_lang.into();
        let target_code = lang_code(&target_lang);
        Self {
            target_lang,
            target_code,
            config,
            metrics: Box::new(ApproxFontMetrics),
        }
    }

    /// Attach width metrics from a resolved font.
    pub fn with_metrics(mut self, metrics: Box<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Target language this renderer fits and selects fonts for.
    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// Produce a render plan for the requested mode.
    pub fn plan(
        &self,
        document: &TranslatableDocument,
        translations: &HashMap<String, String>,
        locator: &dyn GlyphLocator,
        mode: LayoutMode,
    ) -> Result<RenderPlan, RenderError> {
        match mode {
            LayoutMode::Overlay => Ok(self.plan_overlay(document, translations, locator)),
            LayoutMode::SideBySide => Ok(self.plan_side_by_side(document, translations)),
            LayoutMode::Inline => Err(RenderError::UnsupportedMode("inline".to_string())),
        }
    }

    fn page_size(&self, document: &TranslatableDocument, page_num: usize) -> (f64, f64) {
        document
            .page_info(page_num)
            .map(|p| (p.width, p.height))
            .unwrap_or(FALLBACK_PAGE_SIZE)
    }

    /// Resolve the translation for an element, or the visible placeholder.
    ///
    /// Returns None when the element should be left alone entirely.
    fn resolve_translation(
        &self,
        element: &TranslatableElement,
        translations: &HashMap<String, String>,
        missing: &mut Vec<String>,
    ) -> Option<String> {
        let original = element.content.trim();
        match translations.get(original) {
            Some(translated) => Some(translated.clone()),
            None => {
                missing.push(original.chars().take(50).collect());
                if self.config.show_missing_placeholder {
                    Some(format!(
                        "{} {}...",
                        self.config.missing_placeholder,
                        original.chars().take(20).collect::<String>()
                    ))
                } else {
                    None
                }
            }
        }
    }

    /// Fit a translation into a target box and build the insertion.
    fn build_insertion(&self, bbox: BoundingBox, text: &str) -> TextInsertion {
        let profile = font_profile_for(&self.target_code);
        let fit = fit_text_to_bbox(
            text,
            bbox.width(),
            bbox.height(),
            self.metrics.as_ref(),
            &profile,
        );
        TextInsertion {
            bbox,
            lines: fit.lines,
            font_size: fit.font_size,
            line_spacing: LINE_SPACING,
            lang_code: self.target_code.clone(),
            direction: detect_text_direction(text),
            overflowed: !fit.fits,
        }
    }

    /// Overlay mode: redact the original glyphs and insert translations at
    /// the same position.
    fn plan_overlay(
        &self,
        document: &TranslatableDocument,
        translations: &HashMap<String, String>,
        locator: &dyn GlyphLocator,
    ) -> RenderPlan {
        let mut pages: Vec<PageRenderPlan> = Vec::new();
        let mut missing: Vec<String> = Vec::new();

        for (page_num, elements) in document.all_elements_by_page() {
            let (width, height) = self.page_size(document, page_num);
            let mut redactions: Vec<BoundingBox> = Vec::new();
            let mut insertions: Vec<TextInsertion> = Vec::new();

            for element in elements {
                if !element.should_translate {
                    continue;
                }
                let Some(bbox) = element.bbox else { continue };

                let Some(translated) =
                    self.resolve_translation(element, translations, &mut missing)
                else {
                    continue;
                };

                // Prefer the precise glyph quad over the (coarser) element
                // box so the mask cannot clip adjacent borders or images.
                let original = element.content.trim();
                let search_area = bbox.inflated(QUAD_MATCH_TOLERANCE_PT);
                let matched_quad = locator
                    .find_text(page_num, original)
                    .into_iter()
                    .find(|quad| quad.intersects(&search_area));

                let redact_rect = match matched_quad {
                    Some(quad) => quad.shrunk(self.config.mask_margin_pt),
                    None => bbox.shrunk(self.config.mask_margin_pt * 2.0),
                };

                if redact_rect.width() < MIN_REDACTION_EXTENT_PT
                    || redact_rect.height() < MIN_REDACTION_EXTENT_PT
                {
                    debug!("Skipping degenerate redaction for '{}'", original);
                    continue;
                }

                if self.config.draw_mask {
                    redactions.push(redact_rect);
                }
                // The translated text gets the full element box to work with.
                insertions.push(self.build_insertion(bbox, &translated));
            }

            pages.push(PageRenderPlan {
                page_num,
                width,
                height,
                copies: Vec::new(),
                redactions,
                insertions,
                rules: Vec::new(),
            });
        }

        if !missing.is_empty() {
            warn!("{} text(s) without translation", missing.len());
        }

        RenderPlan {
            mode: LayoutMode::Overlay,
            pages,
            missing_translations: missing,
        }
    }

    /// Side-by-side mode: doubled-width pages, original left, translated
    /// overlay right, divider at the midpoint.
    fn plan_side_by_side(
        &self,
        document: &TranslatableDocument,
        translations: &HashMap<String, String>,
    ) -> RenderPlan {
        let mut pages: Vec<PageRenderPlan> = Vec::new();
        let mut missing: Vec<String> = Vec::new();
        let elements_by_page = document.all_elements_by_page();

        for page in &document.pages {
            let (width, height) = (page.width, page.height);
            let out_width = width * 2.0;

            // Left half keeps the untouched original; the right half carries
            // the original again as a background layer under the overlay.
            let copies = vec![
                PageCopy {
                    source_page: page.page_num,
                    dest: BoundingBox::new(0.0, 0.0, width, height),
                },
                PageCopy {
                    source_page: page.page_num,
                    dest: BoundingBox::new(width, 0.0, out_width, height),
                },
            ];

            let mut redactions: Vec<BoundingBox> = Vec::new();
            let mut insertions: Vec<TextInsertion> = Vec::new();

            for element in elements_by_page.get(&page.page_num).into_iter().flatten() {
                if !element.should_translate {
                    continue;
                }
                let Some(bbox) = element.bbox else { continue };

                let Some(translated) =
                    self.resolve_translation(element, translations, &mut missing)
                else {
                    continue;
                };

                let shifted = bbox.shifted(width, 0.0);
                if self.config.draw_mask {
                    redactions.push(shifted);
                }
                insertions.push(self.build_insertion(shifted, &translated));
            }

            let rules = vec![RuleLine {
                x0: width,
                y0: 0.0,
                x1: width,
                y1: height,
                width: 0.5,
                gray: 0.8,
            }];

            pages.push(PageRenderPlan {
                page_num: page.page_num,
                width: out_width,
                height,
                copies,
                redactions,
                insertions,
                rules,
            });
        }

        if !missing.is_empty() {
            warn!("{} text(s) without translation", missing.len());
        }

        RenderPlan {
            mode: LayoutMode::SideBySide,
            pages,
            missing_translations: missing,
        }
    }
}
