//! # Outline Particles
//!
//! Turns vector outlines into animated point clouds: every outline is sampled
//! at a fixed density along its arc length, each sample becomes a particle
//! colored by a left-to-right gradient, and a staggered timeline sweeps the
//! particles from a random dispersal back onto the outline.
//!
//! ## Quick Start
//!
//! ```ignore
//! use outline_particles::prelude::*;
//!
//! let mut library = ShapeLibrary::new();
//! library.insert(
//!     "wave",
//!     OutlineDocument::from_path_data("wave", 200.0, 100.0, &["M0 50 C50 0 150 100 200 50"])?,
//!     true,
//! )?;
//!
//! let mut engine = ParticleEngine::builder(library)
//!     .with_params(RenderParams { density: 3, ..Default::default() })
//!     .build()?;
//!
//! engine.play();
//! loop {
//!     engine.update(1.0 / 60.0);
//!     upload(engine.frame().vertex_bytes());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Outlines
//!
//! An [`OutlineDocument`] is a viewport plus zero or more path curves parsed
//! from SVG path data. Shapes are registered by name in a [`ShapeLibrary`].
//!
//! ### Particles
//!
//! A [`ParticleField`] holds three index-aligned arrays: the `home` position
//! on the outline, the animated `current` position and the gradient `color`.
//! Outline coordinates are re-centered on the viewport with y pointing up.
//!
//! ### Convergence
//!
//! A [`Timeline`] plays one tween per particle. Particles further right start
//! later, which produces the left-to-right sweep. Progress can be scrubbed,
//! and survives rebuilds caused by density or shape changes.
//!
//! ### Parameters
//!
//! Editors describe edits as [`ParamChange`] values; the engine applies the
//! cheapest recompute for each:
//!
//! | Parameter | Effect |
//! |-----------|--------|
//! | density | resample + rebuild, progress kept |
//! | gradient start / end | recolor only |
//! | point size / amplitude | shader uniforms |
//! | progress | seek + pause |
//!
//! ## Rendering
//!
//! The engine never talks to a GPU itself. Each frame it fills a
//! [`PointBuffer`] and exposes a [`Frame`] to any [`RenderTarget`]. With the
//! `render` feature, [`window::run`] opens a winit window backed by a wgpu
//! point renderer using [`shader::POINT_SHADER`].

pub mod buffer;
pub mod config;
pub mod driver;
pub mod easing;
pub mod error;
pub mod field;
pub mod gradient;
pub mod jitter;
pub mod outline;
pub mod params;
pub mod shader;
pub mod time;
pub mod timeline;
mod engine;

#[cfg(feature = "render")]
pub mod gpu;
#[cfg(feature = "render")]
pub mod window;

pub use bytemuck;
pub use glam::{Mat4, Vec2, Vec3};

pub use buffer::{Frame, PointBuffer, PointUniforms, PointVertex, RenderTarget, ShaderUniforms};
pub use config::{SceneConfig, ShapeConfig};
pub use driver::{FrameDriver, Transform};
pub use easing::Easing;
pub use engine::{EngineBuilder, ParticleEngine};
pub use error::{ColorParseError, ConfigError, OutlineError};
#[cfg(feature = "render")]
pub use error::{GpuError, RunError};
pub use field::ParticleField;
pub use gradient::{Gradient, Rgb};
pub use jitter::Jitter;
pub use outline::{sample_outline, OutlineDocument, PathCurve, ShapeLibrary, Viewport};
pub use params::{ParamChange, RenderParams};
pub use time::FrameClock;
pub use timeline::{ConvergencePlan, Timeline, Tween};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use outline_particles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{Frame, RenderTarget};
    pub use crate::config::SceneConfig;
    pub use crate::easing::Easing;
    pub use crate::engine::{EngineBuilder, ParticleEngine};
    pub use crate::error::{ConfigError, OutlineError};
    pub use crate::gradient::Rgb;
    pub use crate::outline::{OutlineDocument, ShapeLibrary};
    pub use crate::params::{ParamChange, RenderParams};
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3};
}
