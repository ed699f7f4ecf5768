//! Geometric primitives for page-structure analysis.
//!
//! Upstream detectors report regions as axis-aligned rectangles in page
//! coordinates (origin at the top-left, y growing downward), so the types
//! here are deliberately simpler than a general polygon representation.

use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X-coordinate of the top-left corner.
    pub x: f32,
    /// Y-coordinate of the top-left corner.
    pub y: f32,
    /// Width of the box.
    pub width: f32,
    /// Height of the box.
    pub height: f32,
}

impl BoundingBox {
    /// Creates a new bounding box from its origin and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The maximum x-coordinate of the box.
    #[inline]
    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    /// The maximum y-coordinate of the box.
    #[inline]
    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// The top-left corner of the box.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The centroid of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The area of the box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the box has finite coordinates and positive dimensions.
    ///
    /// Detectors occasionally emit degenerate boxes; those are excluded
    /// from analysis and reported as data-quality warnings.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_area() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        let center = bbox.center();
        assert_eq!(center.x, 60.0);
        assert_eq!(center.y, 45.0);
        assert_eq!(bbox.area(), 5000.0);
        assert_eq!(bbox.x_max(), 110.0);
        assert_eq!(bbox.y_max(), 70.0);
    }

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_degenerate_boxes_are_invalid() {
        assert!(BoundingBox::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, 10.0, -1.0).is_valid());
        assert!(!BoundingBox::new(f32::NAN, 0.0, 10.0, 10.0).is_valid());
    }
}
