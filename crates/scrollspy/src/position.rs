//! Position tracker
//!
//! Reads the element's bounding box and the document scroll offset once per
//! pass and turns them into whole-pixel document coordinates.

use scrollspy_host::{DOMRect, Document, HostError, NodeId, Viewport};

/// Round to the nearest pixel and clamp at the document origin
pub fn round_offset(value: f64) -> u64 {
    let rounded = value.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        rounded as u64
    }
}

/// Absolute top edge of an element: viewport-relative top plus scroll,
/// measured against a reference line `reference_offset` px below the viewport top
pub fn compute_top(client_top: f64, scroll_top: f64, reference_offset: f64) -> u64 {
    round_offset(client_top + scroll_top - reference_offset)
}

/// One layout read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Reference top of the element
    pub top: u64,
    /// Rounded document scroll offset
    pub scroll: u64,
    /// Current viewport-relative border box
    pub rect: DOMRect,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Copy)]
pub struct PositionTracker {
    element: NodeId,
    reference_offset: f64,
}

impl PositionTracker {
    pub fn new(element: NodeId, reference_offset: f64) -> Self {
        Self { element, reference_offset }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Measure the element. May force layout in a real host, so callers do
    /// this at most once per classification pass.
    pub fn measure(&self, document: &Document) -> Result<Measurement, HostError> {
        let rect = document.bounding_client_rect(self.element)?;
        let scroll_top = document.scroll_top();
        Ok(Measurement {
            top: compute_top(rect.top(), scroll_top, self.reference_offset),
            scroll: round_offset(scroll_top),
            rect,
            viewport: document.viewport(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_top() {
        assert_eq!(compute_top(200.0, 0.0, 0.0), 200);
        assert_eq!(compute_top(50.0, 150.0, 0.0), 200);
        assert_eq!(compute_top(200.0, 0.0, 15.0), 185);
    }

    #[test]
    fn test_negative_top_clamps_to_zero() {
        assert_eq!(compute_top(-40.0, 10.0, 0.0), 0);
        assert_eq!(compute_top(5.0, 0.0, 15.0), 0);
        assert_eq!(round_offset(f64::NAN), 0);
    }

    #[test]
    fn test_sub_pixel_rounding() {
        assert_eq!(compute_top(199.6, 0.0, 0.0), 200);
        assert_eq!(compute_top(199.4, 0.0, 0.0), 199);
        assert_eq!(round_offset(0.4), 0);
    }

    #[test]
    fn test_measure_is_scroll_invariant_for_static_layout() {
        let mut doc = Document::new(Viewport::new(800.0, 600.0));
        let el = doc.create_element("nav", DOMRect::from_xywh(0.0, 200.0, 800.0, 50.0));
        let tracker = PositionTracker::new(el, 0.0);

        let before = tracker.measure(&doc).unwrap();
        doc.set_scroll(0.0, 120.4);
        let after = tracker.measure(&doc).unwrap();

        assert_eq!(before.top, 200);
        assert_eq!(after.top, 200);
        assert_eq!(after.scroll, 120);
        assert_eq!(after.rect.top(), 200.0 - 120.4);
    }
}
