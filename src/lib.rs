/*!
 * # laytrans - Layout-Preserving Document Translator
 *
 * A Rust library for translating documents through a local language-model
 * backend while preserving the original visual layout.
 *
 * ## Features
 *
 * - Character-bounded batch translation with a segment-marker protocol
 * - Tolerant batch-response parsing with partial acceptance and per-unit
 *   fallback
 * - Smart retry: chunked re-translation for capacity errors, escalating
 *   waits for transient errors
 * - Durable translation cache with amortized-batch LRU eviction
 * - Bounding-box-addressed document model with reading-order sorting
 * - Coordinate-preserving rendering: overlay and side-by-side geometry
 *   planning with shrink-to-fit font sizing
 * - Inline rendering for flow documents with idempotent re-runs
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Bounding-box-addressed document model and parser support
 * - `text`: Sentence segmentation and script utilities
 * - `translation`: Batched translation pipeline:
 *   - `translation::protocol`: Segment-marker wire protocol
 *   - `translation::batch`: Batch collection and fallback
 *   - `translation::retry`: Smart retry strategies
 *   - `translation::service`: Multi-target orchestration
 * - `cache`: SQLite-backed translation cache
 * - `render`: Inline and coordinate layout renderers
 * - `providers`: Backend clients (Ollama, mock)
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod cache;
pub mod document;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod render;
pub mod text;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, LayoutMode};
pub use cache::TranslationCache;
pub use document::{BoundingBox, TranslatableDocument, TranslatableElement};
pub use errors::{AppError, BackendError, DocumentError, RenderError};
pub use providers::{OllamaClient, TranslationBackend};
pub use render::{CoordinateRenderer, InlineRenderer, RenderPlan};
pub use translation::{BatchTranslator, StopFlag};
