/*!
 * End-to-end pipeline tests: parse-shaped input through translation and
 * coordinate rendering with a mock backend.
 */

use std::collections::HashMap;

use laytrans::app_config::{LayoutMode, ParseConfig, RenderConfig};
use laytrans::document::bbox::normalize_bbox;
use laytrans::document::model::BoundingBox;
use laytrans::document::DocumentBuilder;
use laytrans::providers::MockBackend;
use laytrans::render::coordinate::{CoordinateRenderer, NullLocator};
use laytrans::translation::service::translate_document;

use crate::common::{batch_config_with_limit, make_cache};

fn build_sample_document() -> laytrans::document::model::TranslatableDocument {
    let mut builder = DocumentBuilder::new("fixtures/report.pdf", "pdf", ParseConfig::default());
    builder.add_page(612.0, 792.0, 0);

    // Page-space boxes, converted exactly once on ingestion.
    let lines = [
        ("Quarterly results improved.", (72.0, 700.0, 540.0, 716.0)),
        ("Revenue grew in every region.", (72.0, 660.0, 540.0, 676.0)),
        ("Quarterly results improved.", (72.0, 620.0, 540.0, 636.0)),
    ];
    for (i, (text, (x0, y0, x1, y1))) in lines.iter().enumerate() {
        let bbox = normalize_bbox(BoundingBox::page_space(*x0, *y0, *x1, *y1), 792.0, true);
        builder.push_line(1, text, bbox, None, &format!("b{}_l0", i));
    }

    builder.finish().unwrap()
}

#[tokio::test]
async fn test_pipeline_translateThenOverlay_shouldCoverEveryTranslatableLine() {
    let document = build_sample_document();
    let backend = MockBackend::echo();
    let cache = make_cache();
    let batch_config = batch_config_with_limit(10_000);

    let translation = translate_document(
        &document,
        &["fr".to_string()],
        Some("en"),
        &cache,
        &backend,
        &batch_config,
        &ParseConfig::default(),
        None,
        &|_message| {},
    )
    .await
    .unwrap();

    assert_eq!(translation.failed, 0);
    let map: &HashMap<String, String> = &translation.by_target["fr"];
    // Three lines but two unique texts.
    assert_eq!(map.len(), 2);

    let renderer = CoordinateRenderer::new("fr", RenderConfig::default());
    let plan = renderer
        .plan(&document, map, &NullLocator, LayoutMode::Overlay)
        .unwrap();

    // Every element gets an insertion, including the repeated line.
    assert_eq!(plan.insertion_count(), 3);
    assert_eq!(plan.redaction_count(), 3);
    assert!(plan.missing_translations.is_empty());
}

#[tokio::test]
async fn test_pipeline_secondRun_shouldResolveEntirelyFromCache() {
    let document = build_sample_document();
    let cache = make_cache();
    let batch_config = batch_config_with_limit(10_000);

    let first_backend = MockBackend::echo();
    translate_document(
        &document,
        &["fr".to_string()],
        Some("en"),
        &cache,
        &first_backend,
        &batch_config,
        &ParseConfig::default(),
        None,
        &|_message| {},
    )
    .await
    .unwrap();

    // A second run over the same cache must not reach the backend at all.
    let second_backend = MockBackend::echo();
    let second = translate_document(
        &document,
        &["fr".to_string()],
        Some("en"),
        &cache,
        &second_backend,
        &batch_config,
        &ParseConfig::default(),
        None,
        &|_message| {},
    )
    .await
    .unwrap();

    assert_eq!(second.failed, 0);
    assert_eq!(second_backend.batch_call_count(), 0);
    assert_eq!(second_backend.once_call_count(), 0);
}

#[tokio::test]
async fn test_pipeline_applyTranslations_shouldFillElementContent() {
    let mut document = build_sample_document();
    let backend = MockBackend::echo();
    let cache = make_cache();
    let batch_config = batch_config_with_limit(10_000);

    let translation = translate_document(
        &document,
        &["fr".to_string()],
        Some("en"),
        &cache,
        &backend,
        &batch_config,
        &ParseConfig::default(),
        None,
        &|_message| {},
    )
    .await
    .unwrap();

    document.apply_translations(&translation.by_target["fr"]);
    assert!(document
        .elements
        .iter()
        .all(|e| e.translated_content.is_some()));
}
