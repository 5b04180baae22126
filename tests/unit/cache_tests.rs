/*!
 * Tests for the durable translation cache.
 */

use laytrans::app_config::CacheConfig;
use laytrans::cache::TranslationCache;

fn config(max_entries: usize, cleanup_batch: usize) -> CacheConfig {
    CacheConfig {
        db_path: None,
        max_entries,
        cleanup_batch,
    }
}

#[test]
fn test_cache_putThenGet_shouldRoundTrip() {
    let cache = TranslationCache::new_in_memory(config(100, 10)).unwrap();
    cache.put("en", "fr", "hello", "bonjour");
    assert_eq!(cache.get("en", "fr", "hello"), Some("bonjour".to_string()));
}

#[test]
fn test_cache_get_withUnseenKey_shouldReturnNone() {
    let cache = TranslationCache::new_in_memory(config(100, 10)).unwrap();
    assert_eq!(cache.get("en", "fr", "never stored"), None);
}

#[test]
fn test_cache_put_withSameKey_shouldOverwriteNotAppend() {
    let cache = TranslationCache::new_in_memory(config(100, 10)).unwrap();
    cache.put("en", "fr", "hello", "bonjour");
    cache.put("en", "fr", "hello", "salut");

    assert_eq!(cache.get("en", "fr", "hello"), Some("salut".to_string()));
    assert_eq!(cache.stats().unwrap().total_entries, 1);
}

#[test]
fn test_cache_withUnicodeText_shouldHandleCorrectly() {
    let cache = TranslationCache::new_in_memory(config(100, 10)).unwrap();
    let source = "こんにちは世界";
    let translation = "Bonjour 你好 مرحبا";

    cache.put("ja", "multi", source, translation);
    assert_eq!(cache.get("ja", "multi", source), Some(translation.to_string()));
}

#[test]
fn test_cache_eviction_shouldNeverExceedLimitAfterPass() {
    let cache = TranslationCache::new_in_memory(config(20, 5)).unwrap();
    for i in 0..100 {
        cache.put("en", "fr", &format!("text-{}", i), &format!("tr-{}", i));
    }

    let stats = cache.stats().unwrap();
    assert!(
        stats.total_entries <= 20,
        "entry count {} exceeds configured limit 20",
        stats.total_entries
    );
}

#[test]
fn test_cache_eviction_shouldPreferEvictingLeastRecentlyUsed() {
    let cache = TranslationCache::new_in_memory(config(5, 2)).unwrap();
    for i in 0..5 {
        cache.put("en", "fr", &format!("text-{}", i), "tr");
    }

    // Touch text-0 so the pass evicts text-1/text-2 instead.
    assert!(cache.get("en", "fr", "text-0").is_some());
    cache.put("en", "fr", "text-5", "tr");

    assert!(cache.get("en", "fr", "text-0").is_some());
    assert!(cache.stats().unwrap().total_entries <= 5);
}

#[test]
fn test_cache_onDisk_shouldPersistAcrossReopens() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("translations.db");

    {
        let cache = TranslationCache::open_at(&db_path, config(100, 10)).unwrap();
        cache.put("en", "de", "good morning", "guten Morgen");
    }

    let reopened = TranslationCache::open_at(&db_path, config(100, 10)).unwrap();
    assert_eq!(
        reopened.get("en", "de", "good morning"),
        Some("guten Morgen".to_string())
    );
}

#[test]
fn test_cache_concurrentWriters_shouldStaySafeAndBounded() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("translations.db");
    let cache = TranslationCache::open_at(&db_path, config(50, 10)).unwrap();

    let mut handles = Vec::new();
    for worker in 0..4 {
        let cache = cache.clone();
        handles.push(std::thread::spawn(move || {
            for i in 0..50 {
                let key = format!("w{}-text-{}", worker, i);
                cache.put("en", "fr", &key, "tr");
                let _ = cache.get("en", "fr", &key);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.stats().unwrap();
    assert!(stats.total_entries <= 50);
}

#[test]
fn test_cache_stats_shouldReportConfiguredLimit() {
    let cache = TranslationCache::new_in_memory(config(321, 10)).unwrap();
    let stats = cache.stats().unwrap();
    assert_eq!(stats.max_entries, 321);
    assert_eq!(stats.total_entries, 0);
}
