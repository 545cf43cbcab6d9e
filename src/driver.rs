//! Per-frame driver.
//!
//! Once per rendered frame the driver advances the shader clock, copies the
//! particles' current positions into the point buffer and eases the cloud's
//! display transform towards a progress-dependent target. The transform eases
//! more slowly than the particles move, so the shape keeps settling for a
//! moment after the last particle has landed.

use crate::buffer::PointBuffer;
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::PI;

/// Shader time added every frame. Fixed per frame, not per second.
pub const TIME_STEP: f32 = 0.03;

/// Fraction of the remaining scale distance covered per frame.
pub const SCALE_SMOOTHING: f32 = 0.2;

/// Fraction of the remaining rotation distance covered per frame.
pub const ROTATION_SMOOTHING: f32 = 0.05;

/// Display scale of a fully converged cloud.
pub const DEFAULT_BASE_SCALE: f32 = 2.8;

/// Uniform scale and rotation about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub rotation_y: f32,
}

impl Transform {
    pub fn new(scale: f32, rotation_y: f32) -> Self {
        Self { scale, rotation_y }
    }

    /// Model matrix applying the same scale on all three axes.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            Vec3::ZERO,
        )
    }
}

/// Scale the transform eases towards at `progress`.
///
/// Dispersed clouds are shown larger: `2 * base + 1` at progress 0, `base` at 1.
#[inline]
pub fn target_scale(base_scale: f32, progress: f32) -> f32 {
    (base_scale + 1.0) * (1.0 - progress) + base_scale
}

/// Rotation the transform eases towards at `progress`.
///
/// Half a turn at progress 0, facing forward from progress 2/3 onwards.
#[inline]
pub fn target_rotation(progress: f32) -> f32 {
    (1.0 - (progress * 1.5).min(1.0)) * PI
}

/// Frame-to-frame animation state that is not per-particle.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    time: f32,
    base_scale: f32,
    transform: Transform,
}

impl FrameDriver {
    pub fn new(base_scale: f32) -> Self {
        Self {
            time: 0.0,
            base_scale,
            transform: Transform::new(base_scale, 0.0),
        }
    }

    /// Run one frame: advance time, upload positions and ease the transform.
    pub fn update(&mut self, progress: f32, positions: &[Vec3], buffer: &mut PointBuffer) {
        self.time += TIME_STEP;

        buffer.write_positions(positions);

        let scale = target_scale(self.base_scale, progress);
        self.transform.scale += (scale - self.transform.scale) * SCALE_SMOOTHING;

        let rotation = target_rotation(progress);
        self.transform.rotation_y += (rotation - self.transform.rotation_y) * ROTATION_SMOOTHING;
    }

    /// Reset the transform to its playback starting pose.
    pub fn snap_for_play(&mut self) {
        self.transform = Transform::new(self.base_scale, PI);
    }

    /// Shader time accumulated so far.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[inline]
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    /// Change the converged display scale. The transform eases to it over
    /// the following frames.
    pub fn set_base_scale(&mut self, base_scale: f32) {
        self.base_scale = base_scale;
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_SCALE)
    }
}
