/*!
 * Tests for the document model, bbox geometry and builder.
 */

use laytrans::app_config::ParseConfig;
use laytrans::document::bbox::{normalize_bbox, sort_by_reading_order};
use laytrans::document::builder::check_size_limits;
use laytrans::document::model::{BoundingBox, ElementType};
use laytrans::document::DocumentBuilder;
use laytrans::errors::DocumentError;

use crate::common::{make_document, make_element};

#[test]
fn test_normalizeBbox_fromPageCoords_shouldMatchReferenceValues() {
    // (72, 700, 540, 750) on a 792pt page lands at y0=42, y1=92.
    let raw = BoundingBox::page_space(72.0, 700.0, 540.0, 750.0);
    let normalized = normalize_bbox(raw, 792.0, true);

    assert_eq!(normalized.x0, 72.0);
    assert_eq!(normalized.y0, 42.0);
    assert_eq!(normalized.x1, 540.0);
    assert_eq!(normalized.y1, 92.0);
}

#[test]
fn test_normalizeBbox_doubleApplication_shouldNotFlipBack() {
    let raw = BoundingBox::page_space(72.0, 700.0, 540.0, 750.0);
    let once = normalize_bbox(raw, 792.0, true);
    let twice = normalize_bbox(once, 792.0, true);

    // The second pass must be a no-op, not a flip back into page space.
    assert_eq!(twice.y0, 42.0);
    assert_eq!(twice.y1, 92.0);
    assert_eq!(once, twice);
}

#[test]
fn test_sortByReadingOrder_shouldReturnOriginalIndices() {
    // Boxes at y=300, 100, 200 with identical x sort to indices [1, 2, 0].
    let boxes = vec![
        BoundingBox::new(50.0, 300.0, 200.0, 320.0),
        BoundingBox::new(50.0, 100.0, 200.0, 120.0),
        BoundingBox::new(50.0, 200.0, 200.0, 220.0),
    ];
    assert_eq!(sort_by_reading_order(&boxes), vec![1, 2, 0]);
}

#[test]
fn test_uniqueTexts_shouldDeduplicateAcrossElements() {
    let document = make_document(vec![
        make_element("a", "Repeated", ElementType::Text, 1, None, true),
        make_element("b", "Repeated", ElementType::Text, 1, None, true),
        make_element("c", "Distinct", ElementType::Text, 1, None, true),
    ]);
    assert_eq!(document.unique_texts(), vec!["Repeated", "Distinct"]);
}

#[test]
fn test_applyTranslations_shouldSkipNonTranslatable() {
    let mut document = make_document(vec![
        make_element("a", "Hello", ElementType::Header, 1, None, false),
        make_element("b", "World", ElementType::Text, 1, None, true),
    ]);

    let mut map = std::collections::HashMap::new();
    map.insert("Hello".to_string(), "Bonjour".to_string());
    map.insert("World".to_string(), "Monde".to_string());
    document.apply_translations(&map);

    assert_eq!(document.elements[0].translated_content, None);
    assert_eq!(
        document.elements[1].translated_content.as_deref(),
        Some("Monde")
    );
}

#[test]
fn test_builder_shouldClassifyHeadersAndFootersByMargin() {
    let mut builder = DocumentBuilder::new("sample.pdf", "pdf", ParseConfig::default());
    builder.add_page(612.0, 792.0, 0);

    builder.push_line(
        1,
        "Running head",
        BoundingBox::new(50.0, 12.0, 400.0, 28.0),
        None,
        "b0_l0",
    );
    builder.push_line(
        1,
        "Body text",
        BoundingBox::new(50.0, 400.0, 400.0, 416.0),
        None,
        "b1_l0",
    );
    builder.push_line(
        1,
        "Page 3 of 9",
        BoundingBox::new(50.0, 770.0, 400.0, 786.0),
        None,
        "b2_l0",
    );

    let document = builder.finish().unwrap();
    let types: Vec<ElementType> = document.elements.iter().map(|e| e.element_type).collect();
    assert_eq!(
        types,
        vec![ElementType::Header, ElementType::Text, ElementType::Footer]
    );
    // Without the skip policy everything stays translatable.
    assert!(document.elements.iter().all(|e| e.should_translate));
}

#[test]
fn test_builder_withSkipHeaderFooter_shouldRetainForContext() {
    let config = ParseConfig {
        skip_header_footer: true,
        ..ParseConfig::default()
    };
    let mut builder = DocumentBuilder::new("sample.pdf", "pdf", config);
    builder.add_page(612.0, 792.0, 0);
    builder.push_line(
        1,
        "Confidential",
        BoundingBox::new(50.0, 10.0, 200.0, 26.0),
        None,
        "b0_l0",
    );

    let document = builder.finish().unwrap();
    assert_eq!(document.elements.len(), 1);
    assert!(!document.elements[0].should_translate);
    assert!(document.unique_texts().is_empty());
}

#[test]
fn test_builder_markTables_shouldUseToleranceMargin() {
    let mut builder = DocumentBuilder::new("sample.pdf", "pdf", ParseConfig::default());
    builder.add_page(612.0, 792.0, 0);
    // The line pokes 3pt past the table edge, inside the 5pt tolerance.
    builder.push_line(
        1,
        "Cell value",
        BoundingBox::new(97.0, 200.0, 180.0, 214.0),
        None,
        "b0_l0",
    );
    builder.mark_tables(1, &[BoundingBox::new(100.0, 195.0, 300.0, 400.0)]);

    let document = builder.finish().unwrap();
    assert_eq!(document.elements[0].element_type, ElementType::TableCell);
}

#[test]
fn test_checkSizeLimits_shouldBeFatalBeforeTranslation() {
    let config = ParseConfig {
        max_segments: 5,
        max_text_length: 1_000,
        ..ParseConfig::default()
    };

    let err = check_size_limits(6, 100, &config, "PDF document").unwrap_err();
    assert!(matches!(
        err,
        DocumentError::TooManySegments {
            segment_count: 6,
            max_segments: 5,
            ..
        }
    ));

    let err = check_size_limits(2, 1_001, &config, "PDF document").unwrap_err();
    assert!(matches!(err, DocumentError::TextTooLong { .. }));

    assert!(check_size_limits(5, 1_000, &config, "PDF document").is_ok());
}
