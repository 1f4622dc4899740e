//! Screen-space camera overlays
//!
//! Cinematic bars and fade-to-black run on their own small interpolators
//! instead of the animation scheduler: each keeps a source, a target, a
//! duration and the elapsed time, and can be retargeted mid-transition.

use crate::config::OverlayConfig;
use crate::foundation::math::{utils, Color, Rect};
use crate::scene::DrawContext;

/// Linear, clamped transition of a strength in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTransition {
    source: f32,
    target: f32,
    duration: f32,
    elapsed: f32,
}

impl OverlayTransition {
    /// Settled transition at `value`
    pub fn new(value: f32) -> Self {
        let value = value.clamp(0.0, 1.0);
        Self {
            source: value,
            target: value,
            duration: 0.0,
            elapsed: 0.0,
        }
    }

    /// Start moving from the current value toward `target`
    pub fn start(&mut self, target: f32, duration: f32) {
        self.source = self.current();
        self.target = target.clamp(0.0, 1.0);
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
    }

    /// Advance by `dt` seconds, never past the end
    pub fn update(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Current strength
    pub fn current(&self) -> f32 {
        if self.elapsed >= self.duration {
            return self.target;
        }
        utils::lerp(self.source, self.target, self.elapsed / self.duration)
    }

    /// Strength the transition is heading to
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the value is still changing
    pub fn is_transitioning(&self) -> bool {
        self.elapsed < self.duration && self.source != self.target
    }
}

/// Letterbox bars sliding in from the top and bottom edges
#[derive(Debug, Clone)]
pub struct CinematicBars {
    transition: OverlayTransition,
    height: f32,
    color: Color,
    duration: f32,
}

impl CinematicBars {
    /// Hidden bars styled by `config`
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            transition: OverlayTransition::new(0.0),
            height: config.bar_height.clamp(0.0, 0.5),
            color: config.bar_color(),
            duration: config.bars_duration,
        }
    }

    /// Slide the bars in over the configured duration
    pub fn show(&mut self) {
        self.transition.start(1.0, self.duration);
    }

    /// Slide the bars out over the configured duration
    pub fn hide(&mut self) {
        self.transition.start(0.0, self.duration);
    }

    /// Move to `strength` (0 = hidden, 1 = fully in) over `duration` seconds
    pub fn transition_to(&mut self, strength: f32, duration: f32) {
        self.transition.start(strength, duration);
    }

    /// Current strength
    pub fn strength(&self) -> f32 {
        self.transition.current()
    }

    /// Whether the bars are moving
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_transitioning()
    }

    /// Advance the transition
    pub fn update(&mut self, dt: f32) {
        self.transition.update(dt);
    }

    /// Paint both bars over a `width × height` surface; returns whether any
    /// bar is visible
    pub fn draw(&self, ctx: &mut dyn DrawContext, width: f32, height: f32) -> bool {
        let strength = self.strength();
        if strength <= 0.0 || self.height <= 0.0 {
            return false;
        }
        let bar = height * self.height * strength;
        ctx.fill_rect(Rect::new(0.0, 0.0, width, bar), self.color);
        ctx.fill_rect(Rect::new(0.0, height - bar, width, bar), self.color);
        true
    }
}

/// Full-surface tint
#[derive(Debug, Clone)]
pub struct FadeToBlack {
    transition: OverlayTransition,
    color: Color,
    duration: f32,
}

impl FadeToBlack {
    /// Transparent fade styled by `config`
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            transition: OverlayTransition::new(0.0),
            color: config.fade_color(),
            duration: config.fade_duration,
        }
    }

    /// Fade the picture out (tint to full strength)
    pub fn fade_out(&mut self) {
        self.transition.start(1.0, self.duration);
    }

    /// Fade the picture back in
    pub fn fade_in(&mut self) {
        self.transition.start(0.0, self.duration);
    }

    /// Move to `strength` over `duration` seconds
    pub fn transition_to(&mut self, strength: f32, duration: f32) {
        self.transition.start(strength, duration);
    }

    /// Current tint strength
    pub fn strength(&self) -> f32 {
        self.transition.current()
    }

    /// Whether the tint is changing
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_transitioning()
    }

    /// Advance the transition
    pub fn update(&mut self, dt: f32) {
        self.transition.update(dt);
    }

    /// Tint a `width × height` surface; returns whether the tint is visible
    pub fn draw(&self, ctx: &mut dyn DrawContext, width: f32, height: f32) -> bool {
        let strength = self.strength();
        if strength <= 0.0 {
            return false;
        }
        ctx.save();
        let alpha = ctx.global_alpha() * strength;
        ctx.set_global_alpha(alpha);
        ctx.fill_rect(Rect::new(0.0, 0.0, width, height), self.color);
        ctx.restore();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawCommand, RecordingContext};
    use approx::assert_relative_eq;

    #[test]
    fn test_transition_is_linear_and_clamped() {
        let mut transition = OverlayTransition::new(0.0);
        transition.start(1.0, 2.0);

        transition.update(0.5);
        assert_relative_eq!(transition.current(), 0.25);
        transition.update(10.0);
        assert_eq!(transition.current(), 1.0);
        assert!(!transition.is_transitioning());
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut transition = OverlayTransition::new(0.0);
        transition.start(1.0, 1.0);
        transition.update(0.5);

        transition.start(0.0, 1.0);
        assert_relative_eq!(transition.current(), 0.5);
        transition.update(0.5);
        assert_relative_eq!(transition.current(), 0.25);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut transition = OverlayTransition::new(0.0);
        transition.start(1.0, 0.0);

        assert_eq!(transition.current(), 1.0);
        assert!(!transition.is_transitioning());
    }

    #[test]
    fn test_bars_draw_top_and_bottom() {
        let config = OverlayConfig {
            bar_height: 0.1,
            bars_duration: 1.0,
            ..Default::default()
        };
        let mut bars = CinematicBars::new(&config);
        let mut ctx = RecordingContext::new();
        assert!(!bars.draw(&mut ctx, 200.0, 100.0));

        bars.show();
        bars.update(0.5);
        assert!(bars.draw(&mut ctx, 200.0, 100.0));

        let rects: Vec<Rect> = ctx
            .commands()
            .iter()
            .map(|DrawCommand::FillRect { quad, .. }| quad.aabb())
            .collect();
        assert_eq!(rects.len(), 2);
        assert_relative_eq!(rects[0].height, 5.0);
        assert_relative_eq!(rects[1].y, 95.0);
    }

    #[test]
    fn test_fade_tints_with_strength() {
        let config = OverlayConfig {
            fade_duration: 2.0,
            ..Default::default()
        };
        let mut fade = FadeToBlack::new(&config);
        let mut ctx = RecordingContext::new();

        fade.fade_out();
        fade.update(1.0);
        assert!(fade.is_transitioning());
        assert!(fade.draw(&mut ctx, 10.0, 10.0));

        let DrawCommand::FillRect { alpha, .. } = &ctx.commands()[0];
        assert_relative_eq!(*alpha, 0.5);
        assert_eq!(ctx.global_alpha(), 1.0);

        fade.fade_in();
        fade.update(2.0);
        assert!(!fade.draw(&mut ctx, 10.0, 10.0));
    }
}
