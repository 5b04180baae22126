/*!
 * Bounding box utility functions.
 *
 * Normalization from page-space coordinates, overlap and containment
 * calculations, and the reading-order sort used across parsers and renderers.
 */

use super::model::BoundingBox;

/// Region classification returned by [`header_footer_region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRegion {
    /// Within the top margin of the page
    Header,
    /// Within the bottom margin of the page
    Footer,
    /// Anywhere else
    Body,
}

/// Normalize a box into the internal coordinate system.
///
/// Internal system: top-left origin, x right, y down, unit points.
/// Page-description formats store coordinates with a bottom-left origin and y
/// increasing upward; `from_page_coords = true` flips them
/// (`y' = page_height - y`, swapping top and bottom). The flip runs at most
/// once per box: a box that has already been normalized is returned with its
/// coordinates untouched, so accidental double application cannot flip it
/// back into page space.
pub fn normalize_bbox(bbox: BoundingBox, page_height: f64, from_page_coords: bool) -> BoundingBox {
    let mut x0 = bbox.x0;
    let mut y0 = bbox.y0;
    let mut x1 = bbox.x1;
    let mut y1 = bbox.y1;

    if from_page_coords && !bbox.converted {
        let y0_new = page_height - y1;
        let y1_new = page_height - y0;
        y0 = y0_new;
        y1 = y1_new;
    }

    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
    }
    if y0 > y1 {
        std::mem::swap(&mut y0, &mut y1);
    }

    BoundingBox::new(x0, y0, x1, y1)
}

/// Intersection over Union between two boxes, in [0, 1].
pub fn calculate_iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let x0 = a.x0.max(b.x0);
    let y0 = a.y0.max(b.y0);
    let x1 = a.x1.min(b.x1);
    let y1 = a.y1.min(b.y1);

    if x0 >= x1 || y0 >= y1 {
        return 0.0;
    }

    let intersection = (x1 - x0) * (y1 - y0);
    let union = a.width() * a.height() + b.width() * b.height() - intersection;

    if union <= 0.0 {
        return 0.0;
    }

    intersection / union
}

/// Check whether `inner` is contained within `outer`, allowing `tolerance`
/// points of overhang on every side.
pub fn is_bbox_inside(inner: &BoundingBox, outer: &BoundingBox, tolerance: f64) -> bool {
    inner.x0 >= outer.x0 - tolerance
        && inner.y0 >= outer.y0 - tolerance
        && inner.x1 <= outer.x1 + tolerance
        && inner.y1 <= outer.y1 + tolerance
}

/// Merge boxes into one encompassing box. Returns None for an empty slice.
pub fn merge_bboxes(bboxes: &[BoundingBox]) -> Option<BoundingBox> {
    let first = bboxes.first()?;
    let mut x0 = first.x0;
    let mut y0 = first.y0;
    let mut x1 = first.x1;
    let mut y1 = first.y1;

    for bbox in &bboxes[1..] {
        x0 = x0.min(bbox.x0);
        y0 = y0.min(bbox.y0);
        x1 = x1.max(bbox.x1);
        y1 = y1.max(bbox.y1);
    }

    Some(BoundingBox::new(x0, y0, x1, y1))
}

/// Minimum distance between two boxes in points; 0 when they overlap.
pub fn bbox_distance(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let dx = if a.x1 < b.x0 {
        b.x0 - a.x1
    } else if b.x1 < a.x0 {
        a.x0 - b.x1
    } else {
        0.0
    };

    let dy = if a.y1 < b.y0 {
        b.y0 - a.y1
    } else if b.y1 < a.y0 {
        a.y0 - b.y1
    } else {
        0.0
    };

    (dx * dx + dy * dy).sqrt()
}

/// Classify a box against the page-edge margins.
///
/// A box starting above the top margin is a header; one ending below the
/// bottom margin is a footer.
pub fn header_footer_region(bbox: &BoundingBox, page_height: f64, margin_pt: f64) -> PageRegion {
    if bbox.y0 < margin_pt {
        PageRegion::Header
    } else if bbox.y1 > page_height - margin_pt {
        PageRegion::Footer
    } else {
        PageRegion::Body
    }
}

/// Sort boxes by reading order (top-to-bottom, left-to-right) and return the
/// original indices in that order.
///
/// y0 is rounded to a 10pt bucket so fragments on the same visual line group
/// together before the horizontal sort. This approximates reading order for
/// single-column and simple multi-column layouts without full column
/// detection.
pub fn sort_by_reading_order(bboxes: &[BoundingBox]) -> Vec<usize> {
    let mut indexed: Vec<(usize, &BoundingBox)> = bboxes.iter().enumerate().collect();

    indexed.sort_by(|(_, a), (_, b)| {
        let key_a = ((a.y0 / 10.0).round() * 10.0, a.x0);
        let key_b = ((b.y0 / 10.0).round() * 10.0, b.x0);
        key_a
            .partial_cmp(&key_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    indexed.into_iter().map(|(idx, _)| idx).collect()
}
