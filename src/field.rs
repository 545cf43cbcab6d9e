//! Particle fields built from sampled outlines.
//!
//! A [`ParticleField`] holds three index-aligned arrays: where each particle
//! rests (`home`), where it is right now (`current`) and its `color`. The
//! arrays are only ever created together by [`ParticleField::build`], so a
//! field with N particles always has N entries in each.

use crate::gradient::{horizontal_ratio, Gradient};
use crate::jitter::Jitter;
use crate::outline::Viewport;
use glam::{Vec2, Vec3};

/// Map a document point to a centered, y-up 3D home position.
#[inline]
pub fn home_position(point: Vec2, viewport: Viewport) -> Vec3 {
    Vec3::new(
        point.x - viewport.width * 0.5,
        -point.y + viewport.height * 0.5,
        0.0,
    )
}

/// Index-aligned particle state for one outline at one density.
#[derive(Debug, Clone)]
pub struct ParticleField {
    viewport: Viewport,
    home: Vec<Vec3>,
    current: Vec<Vec3>,
    color: Vec<Vec3>,
}

impl ParticleField {
    /// An empty field with no particles.
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            home: Vec::new(),
            current: Vec::new(),
            color: Vec::new(),
        }
    }

    /// Build homes, dispersed start positions and colors from sampled points.
    ///
    /// Each `current` position is its home plus a per-axis offset of
    /// `(random - 0.5) * diffusion`.
    pub fn build(
        points: &[Vec2],
        viewport: Viewport,
        gradient: &Gradient,
        diffusion: f32,
        jitter: &mut Jitter,
    ) -> Self {
        let home: Vec<Vec3> = points.iter().map(|&p| home_position(p, viewport)).collect();
        let current = home.iter().map(|&h| h + jitter.offset(diffusion)).collect();

        let mut field = Self {
            viewport,
            home,
            current,
            color: Vec::new(),
        };
        field.recolor(gradient);
        field
    }

    /// Recompute colors from the existing homes. Positions are untouched.
    pub fn recolor(&mut self, gradient: &Gradient) {
        let width = self.viewport.width;
        self.color.clear();
        self.color
            .extend(self.home.iter().map(|h| gradient.sample(horizontal_ratio(h.x, width))));
    }

    /// Horizontal ratio of particle `i` (0 at the left edge, 1 at the right).
    #[inline]
    pub fn ratio(&self, i: usize) -> f32 {
        horizontal_ratio(self.home[i].x, self.viewport.width)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.home.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.home.is_empty()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn home(&self) -> &[Vec3] {
        &self.home
    }

    #[inline]
    pub fn current(&self) -> &[Vec3] {
        &self.current
    }

    /// Mutable positions, for the timeline to drive.
    #[inline]
    pub fn current_mut(&mut self) -> &mut [Vec3] {
        &mut self.current
    }

    #[inline]
    pub fn colors(&self) -> &[Vec3] {
        &self.color
    }
}
