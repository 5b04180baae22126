/*!
 * Tests for the multi-target translation service.
 */

use std::sync::Mutex;

use laytrans::app_config::ParseConfig;
use laytrans::document::model::ElementType;
use laytrans::errors::AppError;
use laytrans::providers::MockBackend;
use laytrans::translation::service::{translate_document, translate_texts};
use laytrans::translation::StopFlag;

use crate::common::{batch_config_with_limit, make_cache, make_document, make_element};

#[tokio::test]
async fn test_translateTexts_withTwoTargets_shouldKeyMapByTargetAndText() {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);
    let texts = vec!["Hello there".to_string(), "Good morning".to_string()];
    let targets = vec!["fr".to_string(), "de".to_string()];

    let outcome = translate_texts(
        &texts,
        &targets,
        Some("en"),
        &cache,
        &backend,
        &config,
        None,
        &|_message| {},
    )
    .await;

    assert_eq!(outcome.done, 4);
    assert_eq!(outcome.failed, 0);
    assert!(!outcome.stopped);
    assert!(outcome
        .map
        .contains_key(&("fr".to_string(), "Hello there".to_string())));
    assert!(outcome
        .map
        .contains_key(&("de".to_string(), "Good morning".to_string())));
}

#[tokio::test]
async fn test_translateTexts_withStopFlagSet_shouldStopBeforeFirstTarget() {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);
    let stop = StopFlag::new();
    stop.stop();

    let logs: Mutex<Vec<String>> = Mutex::new(Vec::new());
    let outcome = translate_texts(
        &["Hello".to_string()],
        &["fr".to_string()],
        None,
        &cache,
        &backend,
        &config,
        Some(stop),
        &|message| logs.lock().unwrap().push(message),
    )
    .await;

    assert!(outcome.stopped);
    assert!(outcome.map.is_empty());
    assert_eq!(backend.batch_call_count(), 0);
    assert!(logs
        .lock()
        .unwrap()
        .iter()
        .any(|line| line.starts_with("[STOP]")));
}

#[tokio::test]
async fn test_translateTexts_shouldReportProgressLines() {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);
    let texts: Vec<String> = (0..10).map(|i| format!("sentence number {}", i)).collect();

    let logs: Mutex<Vec<String>> = Mutex::new(Vec::new());
    translate_texts(
        &texts,
        &["fr".to_string()],
        None,
        &cache,
        &backend,
        &config,
        None,
        &|message| logs.lock().unwrap().push(message),
    )
    .await;

    let lines = logs.lock().unwrap();
    assert!(lines.iter().any(|line| line.contains("[TR] 10/10 fr")));
}

#[tokio::test]
async fn test_translateTexts_withFailingBackend_shouldEmbedPlaceholders() {
    let backend = MockBackend::failing("model not found");
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);

    let outcome = translate_texts(
        &["Untranslatable line".to_string()],
        &["de".to_string()],
        None,
        &cache,
        &backend,
        &config,
        None,
        &|_message| {},
    )
    .await;

    assert_eq!(outcome.failed, 1);
    let result = outcome
        .map
        .get(&("de".to_string(), "Untranslatable line".to_string()))
        .unwrap();
    assert!(result.contains("[Translation failed|de]"));
}

#[tokio::test]
async fn test_translateDocument_overSegmentLimit_shouldFailBeforeAnyCall() {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let batch_config = batch_config_with_limit(10_000);
    let parse_config = ParseConfig {
        max_segments: 2,
        ..ParseConfig::default()
    };

    let document = make_document(
        (0..3)
            .map(|i| {
                make_element(
                    &format!("e{}", i),
                    &format!("Paragraph {}", i),
                    ElementType::Text,
                    1,
                    None,
                    true,
                )
            })
            .collect(),
    );

    let err = translate_document(
        &document,
        &["fr".to_string()],
        None,
        &cache,
        &backend,
        &batch_config,
        &parse_config,
        None,
        &|_message| {},
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Document(_)));
    assert_eq!(backend.batch_call_count(), 0);
    assert_eq!(backend.once_call_count(), 0);
}

#[tokio::test]
async fn test_translateDocument_shouldGroupResultsByTarget() {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let batch_config = batch_config_with_limit(10_000);
    let parse_config = ParseConfig::default();

    let document = make_document(vec![
        make_element("a", "Hello friends", ElementType::Text, 1, None, true),
        make_element("b", "Hello friends", ElementType::Text, 1, None, true),
        make_element("h", "Skip me", ElementType::Header, 1, None, false),
    ]);

    let result = translate_document(
        &document,
        &["fr".to_string(), "de".to_string()],
        Some("en"),
        &cache,
        &backend,
        &batch_config,
        &parse_config,
        None,
        &|_message| {},
    )
    .await
    .unwrap();

    assert!(!result.stopped);
    assert_eq!(result.failed, 0);
    assert_eq!(result.by_target.len(), 2);
    // Duplicate elements collapse to one unique text per target.
    assert_eq!(result.by_target["fr"].len(), 1);
    assert!(result.by_target["fr"].contains_key("Hello friends"));
    // Non-translatable content never reaches the map.
    assert!(!result.by_target["fr"].contains_key("Skip me"));
}
