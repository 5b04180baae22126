/*!
 * Tests for the batch translator and the segment-marker protocol contract.
 */

use laytrans::providers::MockBackend;
use laytrans::translation::BatchTranslator;

use crate::common::{batch_config_with_limit, make_cache};

/// N unique non-empty texts "0".."N-1"; the echo mock answers ECHO-{i}.
fn numbered_texts(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

async fn run_round_trip(max_batch_chars: usize, count: usize) -> (MockBackend, Vec<(bool, String)>) {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let config = batch_config_with_limit(max_batch_chars);
    let results = {
        let mut translator = BatchTranslator::new(&backend, &cache, &config, "fr", None);
        translator.translate_all(&numbered_texts(count)).await
    };
    (backend, results)
}

fn assert_echo_results(results: &[(bool, String)]) {
    for (i, (ok, text)) in results.iter().enumerate() {
        assert!(*ok, "unit {} failed: {}", i, text);
        assert_eq!(text, &format!("ECHO-{}", i), "wrong result at index {}", i);
    }
}

#[tokio::test]
async fn test_batchRoundTrip_withSingleBatch_shouldReturnAllInOrder() {
    // Ceiling far above the total character count: one batch call.
    let (backend, results) = run_round_trip(10_000, 10).await;
    assert_eq!(results.len(), 10);
    assert_echo_results(&results);
    assert_eq!(backend.batch_call_count(), 1);
}

#[tokio::test]
async fn test_batchRoundTrip_withTwoWaySplit_shouldReturnAllInOrder() {
    // Ten one-char texts with a five-char ceiling: exactly two batches.
    let (backend, results) = run_round_trip(5, 10).await;
    assert_eq!(results.len(), 10);
    assert_echo_results(&results);
    assert_eq!(backend.batch_call_count(), 2);
}

#[tokio::test]
async fn test_batchRoundTrip_withUnitSplit_shouldReturnAllInOrder() {
    // One-char ceiling: every unit flushes the previous one.
    let (backend, results) = run_round_trip(1, 10).await;
    assert_eq!(results.len(), 10);
    assert_echo_results(&results);
    assert_eq!(backend.batch_call_count(), 10);
}

#[tokio::test]
async fn test_partialBatchRecovery_shouldRequeryOnlyMissingUnits() {
    // 17 of 20 markers come back (85%), above the acceptance threshold. The
    // three empty slots must be re-queried individually - no more, no less.
    let dropped = [2usize, 9, 15];
    let backend = MockBackend::dropping_markers(dropped);
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);

    let texts: Vec<String> = (0..20).map(|i| format!("unit-{:02}", i)).collect();
    let results = {
        let mut translator = BatchTranslator::new(&backend, &cache, &config, "fr", None);
        translator.translate_all(&texts).await
    };

    assert_eq!(results.len(), 20);
    for (i, (ok, text)) in results.iter().enumerate() {
        assert!(*ok, "unit {} failed", i);
        assert_eq!(text, &format!("ECHO-unit-{:02}", i));
    }

    assert_eq!(backend.batch_call_count(), 1);
    assert_eq!(
        backend.once_call_count(),
        dropped.len(),
        "individual-call count must equal the missing-marker count"
    );
}

#[tokio::test]
async fn test_partialBatchRecovery_belowThreshold_shouldFallBackWholeBatch() {
    // 7 of 10 markers (70%) is under the threshold: the parse rejects and
    // every unit goes through the individual path.
    let backend = MockBackend::dropping_markers([0, 1, 2]);
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);

    let texts: Vec<String> = (0..10).map(|i| format!("unit-{}", i)).collect();
    let results = {
        let mut translator = BatchTranslator::new(&backend, &cache, &config, "fr", None);
        translator.translate_all(&texts).await
    };

    assert!(results.iter().all(|(ok, _)| *ok));
    assert_eq!(backend.once_call_count(), 10);
}

#[tokio::test]
async fn test_translateAll_withCachedUnits_shouldSkipModelEntirely() {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);

    cache.put("auto", "fr", "alpha", "cached-alpha");
    cache.put("auto", "fr", "beta", "cached-beta");

    let results = {
        let mut translator = BatchTranslator::new(&backend, &cache, &config, "fr", None);
        translator
            .translate_all(&["alpha".to_string(), "beta".to_string()])
            .await
    };

    assert_eq!(results[0].1, "cached-alpha");
    assert_eq!(results[1].1, "cached-beta");
    assert_eq!(backend.batch_call_count(), 0);
    assert_eq!(backend.once_call_count(), 0);
}

#[tokio::test]
async fn test_translateAll_withEmptyUnits_shouldResolveWithoutCalls() {
    let backend = MockBackend::echo();
    let cache = make_cache();
    let config = batch_config_with_limit(10_000);

    let results = {
        let mut translator = BatchTranslator::new(&backend, &cache, &config, "fr", None);
        translator
            .translate_all(&["".to_string(), "  ".to_string()])
            .await
    };

    assert_eq!(results, vec![(true, String::new()), (true, String::new())]);
    assert_eq!(backend.batch_call_count(), 0);
}
