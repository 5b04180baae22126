/*!
 * Common test utilities shared across the test suite.
 */

use std::collections::HashMap;

use laytrans::app_config::{BatchConfig, CacheConfig};
use laytrans::cache::TranslationCache;
use laytrans::document::model::{
    BoundingBox, DocumentMetadata, ElementType, PageInfo, TranslatableDocument,
    TranslatableElement,
};

/// Build a translatable element with sensible defaults.
pub fn make_element(
    id: &str,
    content: &str,
    element_type: ElementType,
    page_num: usize,
    bbox: Option<BoundingBox>,
    should_translate: bool,
) -> TranslatableElement {
    TranslatableElement {
        element_id: id.to_string(),
        content: content.to_string(),
        element_type,
        page_num,
        bbox,
        style: None,
        should_translate,
        translated_content: None,
        metadata: HashMap::new(),
    }
}

/// Build a single-page US Letter document around the given elements.
pub fn make_document(elements: Vec<TranslatableElement>) -> TranslatableDocument {
    TranslatableDocument {
        source_path: "fixtures/sample.pdf".to_string(),
        source_type: "pdf".to_string(),
        elements,
        pages: vec![PageInfo {
            page_num: 1,
            width: 612.0,
            height: 792.0,
            rotation: 0,
        }],
        metadata: DocumentMetadata {
            page_count: 1,
            has_text_layer: true,
            ..DocumentMetadata::default()
        },
    }
}

/// In-memory cache with default limits.
pub fn make_cache() -> TranslationCache {
    TranslationCache::new_in_memory(CacheConfig::default()).expect("in-memory cache")
}

/// Batch config with a custom ceiling, unclamped bounds and no retry waits,
/// so tests control batch splitting precisely and run fast.
pub fn batch_config_with_limit(max_batch_chars: usize) -> BatchConfig {
    BatchConfig {
        max_batch_chars,
        min_batch_chars_bound: 1,
        max_batch_chars_bound: 1_000_000,
        retry_waits_secs: vec![0],
        ..BatchConfig::default()
    }
}
