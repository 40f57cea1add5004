//! Ellipse shape.

use super::{ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An ellipse whose bounding box starts at the local origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(radius_x: f64, radius_y: f64) -> Self {
        Self {
            radius_x,
            radius_y,
            style: ShapeStyle::default(),
        }
    }

    /// Create a circle.
    pub fn circle(radius: f64) -> Self {
        Self::new(radius, radius)
    }

    /// Local center point.
    pub fn center(&self) -> Point {
        Point::new(self.radius_x, self.radius_y)
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center(), (self.radius_x, self.radius_y), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.radius_x * 2.0, self.radius_y * 2.0)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let center = self.center();
        let half_sw = self.style.stroke_width / 2.0;
        let dx_outer = (point.x - center.x) / (self.radius_x + tolerance + half_sw);
        let dy_outer = (point.y - center.y) / (self.radius_y + tolerance + half_sw);
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Outline only: reject if inside inner ellipse
        let inner_rx = (self.radius_x - tolerance - half_sw).max(0.0);
        let inner_ry = (self.radius_y - tolerance - half_sw).max(0.0);
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dx_inner = (point.x - center.x) / inner_rx;
        let dy_inner = (point.y - center.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner > 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle() {
        let circle = Ellipse::circle(10.0);
        assert!((circle.radius_x - circle.radius_y).abs() < f64::EPSILON);
        assert_eq!(circle.center(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_hit_test_edge() {
        let circle = Ellipse::circle(10.0);
        assert!(circle.hit_test(Point::new(20.0, 10.0), 0.0));
        assert!(!circle.hit_test(Point::new(25.0, 10.0), 0.0));
        // Hollow center
        assert!(!circle.hit_test(Point::new(10.0, 10.0), 0.0));
    }

    #[test]
    fn test_bounds() {
        let ellipse = Ellipse::new(30.0, 20.0);
        let bounds = ellipse.bounds();
        assert!((bounds.x1 - 60.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 40.0).abs() < f64::EPSILON);
    }
}
