//! Tunable render parameters and their bindings.
//!
//! Parameter editors (a GUI panel, keyboard shortcuts, a script) never touch
//! engine internals. They describe an edit as a [`ParamChange`] and hand it to
//! [`ParticleEngine::apply`](crate::ParticleEngine::apply), which validates the
//! value and runs exactly the recompute that parameter needs:
//!
//! | Change | Recompute |
//! |--------|-----------|
//! | `Density` | full field rebuild, progress preserved |
//! | `GradientStart` / `GradientEnd` | colors only |
//! | `PointSize` / `Amplitude` | uniform write |
//! | `Progress` | timeline seek + pause |
//! | `Play` | timeline restart |

use crate::driver::DEFAULT_BASE_SCALE;
use crate::gradient::{Gradient, Rgb};
use serde::{Deserialize, Serialize};

pub const MIN_DENSITY: u32 = 1;
pub const MIN_POINT_SIZE: u32 = 1;
pub const MAX_POINT_SIZE: u32 = 30;
/// Pixel ratios above this are treated as this.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

fn default_density() -> u32 {
    5
}

fn default_point_size() -> u32 {
    10
}

fn default_base_scale() -> f32 {
    DEFAULT_BASE_SCALE
}

fn default_color() -> Rgb {
    Rgb::WHITE
}

/// Every user-tunable value of the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RenderParams {
    /// Particles per unit of outline length.
    #[serde(default = "default_density")]
    pub density: u32,
    /// Upper bound editors may set `density` to.
    #[serde(default = "default_density")]
    pub density_max: u32,
    /// Point size in logical pixels.
    #[serde(default = "default_point_size")]
    pub point_size: u32,
    /// Sway strength, 0.0-1.0.
    #[serde(default)]
    pub amplitude: f32,
    /// Color at the left edge of the viewport.
    #[serde(default = "default_color")]
    pub gradient_start: Rgb,
    /// Color at the right edge of the viewport.
    #[serde(default = "default_color")]
    pub gradient_end: Rgb,
    /// Display scale of the converged shape.
    #[serde(default = "default_base_scale")]
    pub base_scale: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            density: default_density(),
            density_max: default_density(),
            point_size: default_point_size(),
            amplitude: 0.0,
            gradient_start: Rgb::WHITE,
            gradient_end: Rgb::WHITE,
            base_scale: DEFAULT_BASE_SCALE,
        }
    }
}

impl RenderParams {
    pub fn gradient(&self) -> Gradient {
        Gradient::new(self.gradient_start, self.gradient_end)
    }

    /// Clamp every field into its valid range.
    pub fn validated(mut self) -> Self {
        self.density_max = self.density_max.max(MIN_DENSITY);
        self.density = clamp_density(self.density, self.density_max);
        self.point_size = clamp_point_size(self.point_size);
        self.amplitude = clamp_amplitude(self.amplitude);
        if !(self.base_scale.is_finite() && self.base_scale > 0.0) {
            self.base_scale = DEFAULT_BASE_SCALE;
        }
        self
    }

    /// `point_size` in physical pixels for the given pixel ratio.
    pub fn physical_point_size(&self, pixel_ratio: f32) -> f32 {
        self.point_size as f32 * effective_pixel_ratio(pixel_ratio)
    }
}

#[inline]
pub fn clamp_density(density: u32, density_max: u32) -> u32 {
    density.clamp(MIN_DENSITY, density_max.max(MIN_DENSITY))
}

#[inline]
pub fn clamp_point_size(size: u32) -> u32 {
    size.clamp(MIN_POINT_SIZE, MAX_POINT_SIZE)
}

#[inline]
pub fn clamp_amplitude(amplitude: f32) -> f32 {
    if amplitude.is_nan() {
        0.0
    } else {
        amplitude.clamp(0.0, 1.0)
    }
}

/// Surface pixel ratio, capped at [`MAX_PIXEL_RATIO`]. Invalid ratios count as 1.
#[inline]
pub fn effective_pixel_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// A single edit coming from a parameter editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    Density(u32),
    PointSize(u32),
    Amplitude(f32),
    GradientStart(Rgb),
    GradientEnd(Rgb),
    /// Scrub the convergence timeline and pause.
    Progress(f32),
    /// Restart the convergence animation.
    Play,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = RenderParams::default();
        assert_eq!(p.density, 5);
        assert_eq!(p.density_max, 5);
        assert_eq!(p.point_size, 10);
        assert_eq!(p.amplitude, 0.0);
        assert_eq!(p.gradient_start, Rgb::WHITE);
        assert_eq!(p.base_scale, 2.8);
    }

    #[test]
    fn test_validated_clamps() {
        let p = RenderParams {
            density: 0,
            density_max: 3,
            point_size: 99,
            amplitude: -4.0,
            base_scale: f32::NAN,
            ..Default::default()
        }
        .validated();
        assert_eq!(p.density, 1);
        assert_eq!(p.point_size, 30);
        assert_eq!(p.amplitude, 0.0);
        assert_eq!(p.base_scale, DEFAULT_BASE_SCALE);

        let p = RenderParams {
            density: 9,
            density_max: 3,
            ..Default::default()
        }
        .validated();
        assert_eq!(p.density, 3);
    }

    #[test]
    fn test_pixel_ratio_cap() {
        let p = RenderParams::default();
        assert_eq!(p.physical_point_size(1.0), 10.0);
        assert_eq!(p.physical_point_size(3.0), 20.0);
        assert_eq!(p.physical_point_size(0.0), 10.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let p: RenderParams = serde_json::from_str(r##"{"density": 2, "gradient_end": "#000"}"##).unwrap();
        assert_eq!(p.density, 2);
        assert_eq!(p.point_size, 10);
        assert_eq!(p.gradient_end, Rgb::BLACK);
    }
}
