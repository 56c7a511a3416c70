//! Geometry types
//!
//! Viewport-relative rectangles and element scroll metrics.

/// 2D point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
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

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if point is inside
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Element scroll state
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Maximum horizontal scroll offset
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    /// Maximum vertical scroll offset
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Whether the content overflows horizontally
    pub fn has_horizontal_overflow(&self) -> bool {
        self.scroll_width > self.client_width
    }

    /// Whether the content overflows vertically
    pub fn has_vertical_overflow(&self) -> bool {
        self.scroll_height > self.client_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
    }

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);

        assert!(rect.contains_point(5.0, 5.0));
        assert!(rect.contains_point(0.0, 0.0));
        assert!(rect.contains_point(10.0, 10.0));
        assert!(!rect.contains_point(10.1, 5.0));
    }

    #[test]
    fn test_scroll_metrics_overflow() {
        let metrics = ScrollMetrics {
            scroll_left: 0.0,
            scroll_top: 0.0,
            scroll_width: 400.0,
            scroll_height: 100.0,
            client_width: 200.0,
            client_height: 100.0,
        };

        assert!(metrics.has_horizontal_overflow());
        assert!(!metrics.has_vertical_overflow());
        assert_eq!(metrics.max_scroll_left(), 200.0);
        assert_eq!(metrics.max_scroll_top(), 0.0);
    }
}
