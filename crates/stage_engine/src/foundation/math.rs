//! Math utilities and types
//!
//! Provides the 2D math types used by the scene graph and camera. Transforms
//! are 3x3 homogeneous matrices so they compose the same way a canvas
//! context does: `parent * child`, applied right-to-left to points.

pub use nalgebra::{Matrix3, Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4D vector type (used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 3x3 homogeneous matrix for 2D affine transforms
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// RGBA color with components in `[0, 1]`
pub type Color = Vec4;

/// Axis-aligned rectangle described by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (non-negative)
    pub width: f32,
    /// Height (non-negative)
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle of the given size centered on a point
    pub fn from_center(center: Point2, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width * 0.5,
            y: center.y - height * 0.5,
            width,
            height,
        }
    }

    /// Left edge
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point
    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains_point(&self, point: Point2) -> bool {
        point.x >= self.left() && point.x <= self.right() &&
        point.y >= self.top() && point.y <= self.bottom()
    }

    /// Check if `other` lies completely inside this rectangle, with a small
    /// tolerance for accumulated float error
    pub fn contains_rect(&self, other: &Rect, epsilon: f32) -> bool {
        other.left() >= self.left() - epsilon &&
        other.right() <= self.right() + epsilon &&
        other.top() >= self.top() - epsilon &&
        other.bottom() <= self.bottom() + epsilon
    }

    /// Check if this rectangle intersects another
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right() && self.right() >= other.left() &&
        self.top() <= other.bottom() && self.bottom() >= other.top()
    }
}

/// Convex quadrilateral given by its four corners in drawing order
/// (top-left, top-right, bottom-right, bottom-left before transformation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Corner points
    pub corners: [Point2; 4],
}

impl Quad {
    /// Create a quad from an axis-aligned rectangle
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            corners: [
                Point2::new(rect.left(), rect.top()),
                Point2::new(rect.right(), rect.top()),
                Point2::new(rect.right(), rect.bottom()),
                Point2::new(rect.left(), rect.bottom()),
            ],
        }
    }

    /// Map every corner through a homogeneous transform
    pub fn transformed(&self, matrix: &Mat3) -> Self {
        Self {
            corners: self.corners.map(|corner| matrix.transform_point(&corner)),
        }
    }

    /// Smallest axis-aligned rectangle containing all corners
    pub fn aabb(&self) -> Rect {
        let mut min = self.corners[0];
        let mut max = self.corners[0];
        for corner in &self.corners[1..] {
            min.x = min.x.min(corner.x);
            min.y = min.y.min(corner.y);
            max.x = max.x.max(corner.x);
            max.y = max.y.max(corner.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Extension trait for Mat3 with 2D homogeneous constructors
pub trait Mat3Ext {
    /// Translation by `(x, y)`
    fn translation(x: f32, y: f32) -> Mat3;

    /// Counter-clockwise rotation (in a y-down space: clockwise on screen)
    fn rotation(angle: f32) -> Mat3;

    /// Non-uniform scaling
    fn scaling(sx: f32, sy: f32) -> Mat3;

    /// Skew by the given angles (radians) along x and y
    fn skew(skew_x: f32, skew_y: f32) -> Mat3;

    /// Translation component of the matrix
    fn translation_part(&self) -> Vec2;
}

impl Mat3Ext for Mat3 {
    fn translation(x: f32, y: f32) -> Mat3 {
        Mat3::new_translation(&Vec2::new(x, y))
    }

    fn rotation(angle: f32) -> Mat3 {
        Mat3::new_rotation(angle)
    }

    fn scaling(sx: f32, sy: f32) -> Mat3 {
        Mat3::new_nonuniform_scaling(&Vec2::new(sx, sy))
    }

    fn skew(skew_x: f32, skew_y: f32) -> Mat3 {
        // Same layout as a canvas transform(1, tan(ky), tan(kx), 1, 0, 0)
        Mat3::new(
            1.0, skew_x.tan(), 0.0,
            skew_y.tan(), 1.0, 0.0,
            0.0, 0.0, 1.0,
        )
    }

    fn translation_part(&self) -> Vec2 {
        Vec2::new(self.m13, self.m23)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_translation_then_rotation_order() {
        // Rotate first, then translate: the point rotates around the origin
        let matrix = Mat3::translation(10.0, 0.0) * Mat3::rotation(constants::HALF_PI);
        let point = matrix.transform_point(&Point2::new(1.0, 0.0));

        assert_relative_eq!(point, Point2::new(10.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_quad_aabb_of_rotated_square() {
        let quad = Quad::from_rect(&Rect::new(-1.0, -1.0, 2.0, 2.0));
        let rotated = quad.transformed(&Mat3::rotation(constants::PI / 4.0));
        let aabb = rotated.aabb();
        let half_diagonal = 2.0_f32.sqrt();

        assert_relative_eq!(aabb.x, -half_diagonal, epsilon = EPSILON);
        assert_relative_eq!(aabb.width, 2.0 * half_diagonal, epsilon = EPSILON);
    }

    #[test]
    fn test_rect_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        let inner = Rect::from_center(Point2::new(50.0, 25.0), 20.0, 10.0);

        assert!(outer.contains_rect(&inner, 0.0));
        assert!(outer.contains_point(inner.center()));
        assert!(!inner.contains_rect(&outer, 0.0));
        assert!(outer.intersects(&inner));
    }

    #[test]
    fn test_skew_shears_x_by_y() {
        let matrix = Mat3::skew(constants::PI / 4.0, 0.0);
        let point = matrix.transform_point(&Point2::new(0.0, 1.0));

        assert_relative_eq!(point, Point2::new(1.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_lerp_and_clamp() {
        assert_relative_eq!(utils::lerp(2.0, 4.0, 0.5), 3.0);
        assert_relative_eq!(utils::clamp(5.0, 0.0, 1.0), 1.0);
        assert_relative_eq!(utils::rad_to_deg(utils::deg_to_rad(90.0)), 90.0, epsilon = EPSILON);
    }
}
