/*!
 * Document model for layout-aware translation.
 *
 * This module contains the bounding-box-addressed element tree that format
 * parsers produce and renderers consume:
 *
 * - `model`: Core data types (elements, pages, document aggregate)
 * - `bbox`: Bounding box geometry utilities and reading-order sorting
 * - `builder`: Assembly support for format-specific parsers
 */

pub mod bbox;
pub mod builder;
pub mod model;

// Re-export main types for easier usage
pub use bbox::{normalize_bbox, PageRegion};
pub use builder::{check_size_limits, DocumentBuilder};
pub use model::{
    BoundingBox, DocumentMetadata, ElementType, PageInfo, StyleInfo, TranslatableDocument,
    TranslatableElement,
};
