/*!
 * Durable translation cache.
 *
 * SQLite-backed persistence for resolved translations:
 * - `connection`: Connection management and schema initialization
 * - `store`: The cache store with amortized-batch LRU eviction
 */

pub mod connection;
pub mod store;

// Re-export main types
pub use connection::CacheConnection;
pub use store::{CacheStats, TranslationCache};
