/*!
 * Layout renderers.
 *
 * Two families share the document model and translation map:
 *
 * - `inline`: Flow documents; translations appended after each original
 *   block, marker-protected for idempotence
 * - `coordinate`: Page documents; overlay and side-by-side geometry planning
 * - `fit`: Character-granular wrapping and shrink-to-fit font sizing
 * - `plan`: The geometry instruction model consumed by container
 *   collaborators
 */

pub mod coordinate;
pub mod fit;
pub mod inline;
pub mod plan;

// Re-export main types for easier usage
pub use coordinate::{CoordinateRenderer, GlyphLocator, NullLocator};
pub use fit::{fit_text_to_bbox, wrap_text, ApproxFontMetrics, FitResult, FontMetrics};
pub use inline::{is_inserted_translation, InlineBlock, InlineBlockKind, InlineRenderer, INSERT_MARKER};
pub use plan::{PageCopy, PageRenderPlan, RenderPlan, RuleLine, TextInsertion};
