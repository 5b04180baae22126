/*!
 * Tests for the inline and coordinate renderers.
 */

use std::collections::HashMap;

use laytrans::app_config::{font_profile_for, LayoutMode, RenderConfig};
use laytrans::document::model::{BoundingBox, ElementType};
use laytrans::render::coordinate::{CoordinateRenderer, GlyphLocator, NullLocator};
use laytrans::render::fit::{fit_text_to_bbox, ApproxFontMetrics};
use laytrans::render::inline::{InlineBlockKind, InlineRenderer};
use laytrans::render::INSERT_MARKER;

use crate::common::{make_document, make_element};

struct MapLocator(HashMap<String, BoundingBox>);

impl GlyphLocator for MapLocator {
    fn find_text(&self, _page_num: usize, text: &str) -> Vec<BoundingBox> {
        self.0.get(text).copied().into_iter().collect()
    }
}

#[test]
fn test_inlineRender_twice_shouldNotDuplicateInsertedBlocks() {
    let renderer = InlineRenderer::new(RenderConfig::default());
    let document = make_document(vec![
        make_element("a", "Hello", ElementType::Text, 1, None, true),
        make_element("b", "World", ElementType::Text, 1, None, true),
    ]);
    let mut translations = HashMap::new();
    translations.insert("Hello".to_string(), "Bonjour".to_string());
    translations.insert("World".to_string(), "Monde".to_string());

    let first = renderer.render(&document, &translations);
    let first_insertions = first
        .iter()
        .filter(|b| b.kind == InlineBlockKind::Translation)
        .count();
    assert_eq!(first_insertions, 2);

    // Round-trip the output back into a document, as a re-run would see it.
    let reparsed = make_document(
        first
            .iter()
            .filter(|b| b.kind != InlineBlockKind::PageBreak)
            .enumerate()
            .map(|(i, b)| {
                make_element(&format!("e{}", i), &b.text, ElementType::Text, 1, None, true)
            })
            .collect(),
    );
    let second = renderer.render(&reparsed, &translations);
    let second_insertions = second
        .iter()
        .filter(|b| b.kind == InlineBlockKind::Translation)
        .count();

    assert_eq!(
        second_insertions, first_insertions,
        "re-rendering must not insert additional translation blocks"
    );
}

#[test]
fn test_inlineRender_shouldMarkEveryInsertedBlock() {
    let renderer = InlineRenderer::new(RenderConfig::default());
    let document = make_document(vec![make_element(
        "a",
        "Hello",
        ElementType::Text,
        1,
        None,
        true,
    )]);
    let mut translations = HashMap::new();
    translations.insert("Hello".to_string(), "Bonjour".to_string());

    let blocks = renderer.render(&document, &translations);
    for block in blocks
        .iter()
        .filter(|b| b.kind == InlineBlockKind::Translation)
    {
        assert!(block.text.contains(INSERT_MARKER));
    }
}

#[test]
fn test_overlayRender_endToEnd_shouldRedactOnlyTranslatedElements() {
    // "Hello" is a header with translate=false: its glyphs must stay
    // untouched. "Monde" must be placed inside "World"'s original box.
    let hello_box = BoundingBox::new(72.0, 40.0, 200.0, 56.0);
    let world_box = BoundingBox::new(72.0, 350.0, 220.0, 366.0);
    let document = make_document(vec![
        make_element("h", "Hello", ElementType::Header, 1, Some(hello_box), false),
        make_element("w", "World", ElementType::Text, 1, Some(world_box), true),
    ]);

    let mut translations = HashMap::new();
    translations.insert("World".to_string(), "Monde".to_string());

    let mut quads = HashMap::new();
    quads.insert("Hello".to_string(), hello_box);
    quads.insert("World".to_string(), world_box);

    let renderer = CoordinateRenderer::new("fr", RenderConfig::default());
    let plan = renderer
        .plan(&document, &translations, &MapLocator(quads), LayoutMode::Overlay)
        .unwrap();

    let page = &plan.pages[0];
    assert!(
        page.redactions.iter().all(|r| !r.intersects(&hello_box)),
        "untranslated header glyphs must not be redacted"
    );
    assert_eq!(page.insertions.len(), 1);
    assert_eq!(page.insertions[0].bbox, world_box);
    assert_eq!(page.insertions[0].lines, vec!["Monde"]);
    assert!(plan.missing_translations.is_empty());
}

#[test]
fn test_overlayRender_redactionsGroupBeforeInsertions() {
    // Two translated elements on one page: the page plan carries both
    // redactions together so the collaborator applies them in one pass.
    let box_a = BoundingBox::new(72.0, 100.0, 220.0, 116.0);
    let box_b = BoundingBox::new(72.0, 200.0, 220.0, 216.0);
    let document = make_document(vec![
        make_element("a", "First line", ElementType::Text, 1, Some(box_a), true),
        make_element("b", "Second line", ElementType::Text, 1, Some(box_b), true),
    ]);
    let mut translations = HashMap::new();
    translations.insert("First line".to_string(), "Première ligne".to_string());
    translations.insert("Second line".to_string(), "Deuxième ligne".to_string());

    let renderer = CoordinateRenderer::new("fr", RenderConfig::default());
    let plan = renderer
        .plan(&document, &translations, &NullLocator, LayoutMode::Overlay)
        .unwrap();

    assert_eq!(plan.pages.len(), 1);
    assert_eq!(plan.pages[0].redactions.len(), 2);
    assert_eq!(plan.pages[0].insertions.len(), 2);
}

#[test]
fn test_sideBySideRender_shouldKeepLeftHalfUntouched() {
    let world_box = BoundingBox::new(72.0, 350.0, 220.0, 366.0);
    let document = make_document(vec![make_element(
        "w",
        "World",
        ElementType::Text,
        1,
        Some(world_box),
        true,
    )]);
    let mut translations = HashMap::new();
    translations.insert("World".to_string(), "Monde".to_string());

    let renderer = CoordinateRenderer::new("fr", RenderConfig::default());
    let plan = renderer
        .plan(&document, &translations, &NullLocator, LayoutMode::SideBySide)
        .unwrap();

    let page = &plan.pages[0];
    assert_eq!(page.width, 1224.0);
    // Every insertion and redaction lives on the right half.
    assert!(page.insertions.iter().all(|i| i.bbox.x0 >= 612.0));
    assert!(page.redactions.iter().all(|r| r.x0 >= 612.0));
    // Divider at the midpoint.
    assert_eq!(page.rules[0].x0, 612.0);
}

#[test]
fn test_fontFit_shouldTerminateAndRespectMinimum() {
    let metrics = ApproxFontMetrics;
    let profiles = ["default", "zh-tw", "ar", "th"];
    let texts = [
        "short",
        "a much longer sentence that will certainly need wrapping to fit",
        "漢字がたくさん並んでいる長い文章のサンプルです",
    ];

    for profile_key in profiles {
        let profile = font_profile_for(profile_key);
        for text in texts {
            for (w, h) in [(500.0, 100.0), (80.0, 20.0), (10.0, 5.0)] {
                let result = fit_text_to_bbox(text, w, h, &metrics, &profile);
                assert!(
                    result.font_size >= profile.min_size_pt,
                    "font size {} fell below minimum {} for '{}' in ({}, {})",
                    result.font_size,
                    profile.min_size_pt,
                    text,
                    w,
                    h
                );
            }
        }
    }
}

#[test]
fn test_fontFit_withCjkProfile_shouldUseLanguageBounds() {
    let metrics = ApproxFontMetrics;
    let profile = font_profile_for("ja");
    let result = fit_text_to_bbox("とても長い日本語の文章です", 20.0, 10.0, &metrics, &profile);
    assert!(result.font_size >= 6.0);
}
