//! Rendering context abstraction
//!
//! The scene graph never draws pixels itself. It composes transforms and
//! opacity on a [`DrawContext`] and hands the prepared context to node draw
//! hooks. Backends implement the trait over their canvas; the
//! [`RecordingContext`] keeps a command list instead, for tests and headless
//! runs.

use crate::foundation::math::{Color, Mat3, Mat3Ext, Quad, Rect};

/// 2D immediate-mode drawing surface with a transform/alpha state stack
pub trait DrawContext {
    /// Push the current transform and alpha
    fn save(&mut self);

    /// Pop the last saved transform and alpha; ignored when nothing is saved
    fn restore(&mut self);

    /// Post-multiply the current transform: `current = current * matrix`
    fn transform(&mut self, matrix: &Mat3);

    /// Current user-to-device transform
    fn current_transform(&self) -> Mat3;

    /// Current global alpha in `[0, 1]`
    fn global_alpha(&self) -> f32;

    /// Replace the global alpha
    fn set_global_alpha(&mut self, alpha: f32);

    /// Fill a rectangle given in user space
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Translate the user space
    fn translate(&mut self, x: f32, y: f32) {
        if x != 0.0 || y != 0.0 {
            self.transform(&Mat3::translation(x, y));
        }
    }

    /// Scale the user space
    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform(&Mat3::scaling(sx, sy));
    }

    /// Rotate the user space
    fn rotate(&mut self, angle: f32) {
        self.transform(&Mat3::rotation(angle));
    }
}

/// Recorded drawing operation in device space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled rectangle, already transformed to device space
    FillRect {
        /// Device-space corners
        quad: Quad,
        /// Fill color
        color: Color,
        /// Global alpha in effect
        alpha: f32,
    },
}

#[derive(Debug, Clone, Copy)]
struct ContextState {
    transform: Mat3,
    alpha: f32,
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            transform: Mat3::identity(),
            alpha: 1.0,
        }
    }
}

/// [`DrawContext`] that records commands instead of rasterizing
#[derive(Debug, Default)]
pub struct RecordingContext {
    state: ContextState,
    stack: Vec<ContextState>,
    commands: Vec<DrawCommand>,
}

impl RecordingContext {
    /// Create an empty recording with identity transform and full alpha
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands (state stack is kept)
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of unmatched `save` calls
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn transform(&mut self, matrix: &Mat3) {
        self.state.transform *= matrix;
    }

    fn current_transform(&self) -> Mat3 {
        self.state.transform
    }

    fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            quad: Quad::from_rect(&rect).transformed(&self.state.transform),
            color,
            alpha: self.state.alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point2;
    use approx::assert_relative_eq;

    #[test]
    fn test_save_restore_round_trip() {
        let mut ctx = RecordingContext::new();
        ctx.save();
        ctx.translate(10.0, 5.0);
        ctx.set_global_alpha(0.5);
        ctx.restore();

        assert_eq!(ctx.current_transform(), Mat3::identity());
        assert_eq!(ctx.global_alpha(), 1.0);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_fill_rect_records_device_space() {
        let mut ctx = RecordingContext::new();
        ctx.translate(100.0, 0.0);
        ctx.scale(2.0, 2.0);
        ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::new(1.0, 0.0, 0.0, 1.0));

        let DrawCommand::FillRect { quad, .. } = &ctx.commands()[0];
        assert_relative_eq!(quad.corners[0], Point2::new(100.0, 0.0));
        assert_relative_eq!(quad.corners[2], Point2::new(120.0, 20.0));
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut ctx = RecordingContext::new();
        ctx.translate(1.0, 1.0);
        ctx.restore();

        assert_eq!(ctx.current_transform(), Mat3::translation(1.0, 1.0));
    }
}
