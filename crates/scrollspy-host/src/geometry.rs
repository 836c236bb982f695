//! Geometry
//!
//! DOMRect and viewport dimensions.

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Same rect moved by `(dx, dy)`
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Size of the visible area of the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `rect` (viewport-relative) lies entirely inside the viewport
    pub fn fully_contains(&self, rect: &DOMRect) -> bool {
        rect.top() >= 0.0
            && rect.left() >= 0.0
            && rect.bottom() <= self.height
            && rect.right() <= self.width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
    }

    #[test]
    fn test_translate() {
        let rect = DOMRect::from_xywh(0.0, 200.0, 50.0, 50.0).translate(0.0, -150.0);
        assert_eq!(rect.top(), 50.0);
        assert_eq!(rect.bottom(), 100.0);
    }

    #[test]
    fn test_viewport_containment() {
        let viewport = Viewport::new(800.0, 600.0);

        assert!(viewport.fully_contains(&DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0)));
        assert!(!viewport.fully_contains(&DOMRect::from_xywh(0.0, -1.0, 10.0, 10.0)));
        assert!(!viewport.fully_contains(&DOMRect::from_xywh(-1.0, 0.0, 10.0, 10.0)));
        assert!(!viewport.fully_contains(&DOMRect::from_xywh(0.0, 595.0, 10.0, 10.0)));
        assert!(!viewport.fully_contains(&DOMRect::from_xywh(795.0, 0.0, 10.0, 10.0)));
    }
}
