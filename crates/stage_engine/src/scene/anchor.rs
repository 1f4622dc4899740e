//! Anchor points of a node's box

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;

/// One of the nine reference points of a box
///
/// A node's `anchor` picks the point of its own box that sits at its
/// `(x, y)`; its `child_anchor` picks the point children are positioned
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// Top-left corner
    #[default]
    TopLeft,
    /// Top edge midpoint
    TopCenter,
    /// Top-right corner
    TopRight,
    /// Left edge midpoint
    MiddleLeft,
    /// Center of the box
    Center,
    /// Right edge midpoint
    MiddleRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom edge midpoint
    BottomCenter,
    /// Bottom-right corner
    BottomRight,
}

impl Anchor {
    /// Fraction of the box (0, 0.5 or 1 per axis) where the anchor lies,
    /// with y growing downwards
    pub fn to_normalized(self) -> Vec2 {
        let (x, y) = match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::MiddleLeft => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::MiddleRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        };
        Vec2::new(x, y)
    }

    /// Offset of the anchor from the top-left corner of a `width × height` box
    pub fn offset(self, width: f32, height: f32) -> Vec2 {
        self.to_normalized().component_mul(&Vec2::new(width, height))
    }
}
