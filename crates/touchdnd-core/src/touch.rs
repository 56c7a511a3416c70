//! Touch samples
//!
//! Normalized multi-touch input snapshots consumed by the drag engine.

use crate::geometry::Point;
use crate::ElementId;

/// A single touch point
#[derive(Debug, Clone)]
pub struct TouchPoint {
    pub identifier: u64,
    pub screen_x: f64,
    pub screen_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
    /// Element the touch started on, when the platform reports it
    pub target: Option<ElementId>,
}

impl TouchPoint {
    pub fn new(identifier: u64, client_x: f64, client_y: f64) -> Self {
        Self {
            identifier,
            screen_x: client_x,
            screen_y: client_y,
            client_x,
            client_y,
            page_x: client_x,
            page_y: client_y,
            target: None,
        }
    }
}

/// Touch lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Snapshot of one touch event
#[derive(Debug, Clone)]
pub struct TouchSample {
    pub phase: TouchPhase,
    /// All currently active touches
    pub touches: Vec<TouchPoint>,
    /// Touches that triggered this sample
    pub changed_touches: Vec<TouchPoint>,
}

impl TouchSample {
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, changed: Vec<TouchPoint>) -> Self {
        Self { phase, touches, changed_touches: changed }
    }

    /// First changed touch, the one synthetic event geometry is copied from
    pub fn first_changed(&self) -> Option<&TouchPoint> {
        self.changed_touches.first()
    }

    /// Changed touch with the given identifier
    pub fn changed_with_identifier(&self, identifier: u64) -> Option<&TouchPoint> {
        self.changed_touches.iter().find(|t| t.identifier == identifier)
    }

    /// Whether the sample involves the given identifier at all
    pub fn involves(&self, identifier: u64) -> bool {
        self.touches.iter().any(|t| t.identifier == identifier)
            || self.changed_touches.iter().any(|t| t.identifier == identifier)
    }

    /// Centroid of the active touches in viewport coordinates.
    ///
    /// On end/cancel samples the active list may be empty; the changed list
    /// still carries the final coordinates and is used as a fallback.
    pub fn client_centroid(&self) -> Option<Point> {
        Self::centroid(self.points(), |t| (t.client_x, t.client_y))
    }

    /// Centroid of the active touches in document coordinates
    pub fn page_centroid(&self) -> Option<Point> {
        Self::centroid(self.points(), |t| (t.page_x, t.page_y))
    }

    fn points(&self) -> &[TouchPoint] {
        if self.touches.is_empty() {
            &self.changed_touches
        } else {
            &self.touches
        }
    }

    fn centroid(points: &[TouchPoint], axis: impl Fn(&TouchPoint) -> (f64, f64)) -> Option<Point> {
        if points.is_empty() {
            return None;
        }
        let (mut x, mut y) = (0.0, 0.0);
        for point in points {
            let (px, py) = axis(point);
            x += px;
            y += py;
        }
        let n = points.len() as f64;
        Some(Point::new(x / n, y / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_touch_centroid() {
        let sample = TouchSample::new(
            TouchPhase::Move,
            vec![TouchPoint::new(1, 100.0, 200.0)],
            vec![TouchPoint::new(1, 100.0, 200.0)],
        );

        let centroid = sample.client_centroid().unwrap();
        assert_eq!(centroid, Point::new(100.0, 200.0));
    }

    #[test]
    fn test_multi_touch_centroid() {
        let sample = TouchSample::new(
            TouchPhase::Move,
            vec![TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(2, 100.0, 50.0)],
            vec![TouchPoint::new(2, 100.0, 50.0)],
        );

        let centroid = sample.client_centroid().unwrap();
        assert_eq!(centroid, Point::new(50.0, 25.0));
    }

    #[test]
    fn test_end_sample_falls_back_to_changed() {
        let sample = TouchSample::new(
            TouchPhase::End,
            Vec::new(),
            vec![TouchPoint::new(7, 30.0, 40.0)],
        );

        assert_eq!(sample.client_centroid(), Some(Point::new(30.0, 40.0)));
        assert!(sample.involves(7));
    }

    #[test]
    fn test_empty_sample_has_no_centroid() {
        let sample = TouchSample::new(TouchPhase::Cancel, Vec::new(), Vec::new());
        assert_eq!(sample.client_centroid(), None);
    }
}
