//! The particle engine: outline in, animated point cloud out.
//!
//! [`ParticleEngine`] owns the whole pipeline. On every rebuild it samples the
//! active outline, builds a fresh [`ParticleField`], schedules its convergence
//! and reallocates the point buffer, all before returning, so no frame ever
//! sees a half-built particle set. On every frame it advances the timeline and
//! lets the [`FrameDriver`] upload positions and ease the display transform.

use crate::buffer::{Frame, PointBuffer, RenderTarget, ShaderUniforms};
use crate::driver::{FrameDriver, Transform};
use crate::easing::Easing;
use crate::error::OutlineError;
use crate::field::ParticleField;
use crate::gradient::Rgb;
use crate::jitter::{Jitter, DIFFUSION_RADIUS};
use crate::outline::{sample_outline, ShapeLibrary};
use crate::params::{
    clamp_amplitude, clamp_density, clamp_point_size, effective_pixel_ratio, ParamChange,
    RenderParams,
};
use crate::timeline::{ConvergencePlan, Timeline};

/// Builder for [`ParticleEngine`].
///
/// ```ignore
/// let engine = ParticleEngine::builder(library)
///     .with_shape("logo")
///     .with_params(RenderParams::default())
///     .with_seed(7)
///     .build()?;
/// ```
pub struct EngineBuilder {
    library: ShapeLibrary,
    shape: Option<String>,
    params: RenderParams,
    jitter: Option<Jitter>,
    diffusion: f32,
    easing: Easing,
    pixel_ratio: f32,
}

impl EngineBuilder {
    fn new(library: ShapeLibrary) -> Self {
        Self {
            library,
            shape: None,
            params: RenderParams::default(),
            jitter: None,
            diffusion: DIFFUSION_RADIUS,
            easing: Easing::default(),
            pixel_ratio: 1.0,
        }
    }

    /// Shape shown first. Defaults to the first shape in the library.
    pub fn with_shape(mut self, name: impl Into<String>) -> Self {
        self.shape = Some(name.into());
        self
    }

    pub fn with_params(mut self, params: RenderParams) -> Self {
        self.params = params;
        self
    }

    /// Seed the dispersion randomness for reproducible clouds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.jitter = Some(Jitter::seeded(seed));
        self
    }

    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Spread of dispersed positions around their homes.
    pub fn with_diffusion(mut self, diffusion: f32) -> Self {
        self.diffusion = diffusion.max(0.0);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Build the engine, settled at progress 1.
    pub fn build(self) -> Result<ParticleEngine, OutlineError> {
        let active = match self.shape {
            Some(name) if self.library.contains(&name) => name,
            Some(name) => return Err(OutlineError::UnknownShape(name)),
            None => self
                .library
                .names()
                .next()
                .map(str::to_string)
                .ok_or(OutlineError::EmptyLibrary)?,
        };

        let params = self.params.validated();
        let mut jitter = self.jitter.unwrap_or_default();

        let document = self
            .library
            .get(&active)
            .ok_or_else(|| OutlineError::UnknownShape(active.clone()))?;
        let points = sample_outline(document, params.density);
        let mut field = ParticleField::build(
            &points,
            document.viewport,
            &params.gradient(),
            self.diffusion,
            &mut jitter,
        );
        let plan = ConvergencePlan::for_field(&field, self.easing);
        let timeline = Timeline::new(plan, field.current_mut());

        let mut buffer = PointBuffer::new();
        buffer.reallocate(field.current(), field.colors());

        log::debug!(
            "Built '{}' at density {}: {} particles",
            active,
            params.density,
            field.len()
        );

        Ok(ParticleEngine {
            library: self.library,
            active,
            driver: FrameDriver::new(params.base_scale),
            params,
            diffusion: self.diffusion,
            easing: self.easing,
            jitter,
            field,
            timeline,
            buffer,
            pixel_ratio: self.pixel_ratio,
        })
    }
}

/// Outline particle engine.
pub struct ParticleEngine {
    library: ShapeLibrary,
    active: String,
    params: RenderParams,
    diffusion: f32,
    easing: Easing,
    jitter: Jitter,
    field: ParticleField,
    timeline: Timeline,
    driver: FrameDriver,
    buffer: PointBuffer,
    pixel_ratio: f32,
}

impl ParticleEngine {
    pub fn builder(library: ShapeLibrary) -> EngineBuilder {
        EngineBuilder::new(library)
    }

    // ========== Playback ==========

    /// Restart the convergence animation from fully dispersed.
    pub fn play(&mut self) {
        self.timeline.play(self.field.current_mut());
        self.driver.snap_for_play();
        log::info!("Playing '{}' ({} particles)", self.active, self.field.len());
    }

    /// Alias of [`play`](Self::play) for hosts that trigger on user input.
    pub fn start_animation(&mut self) {
        self.play();
    }

    /// Jump to `progress` (0.0-1.0) and pause.
    pub fn set_progress(&mut self, progress: f32) {
        self.timeline.set_progress(progress, self.field.current_mut());
    }

    /// Current convergence progress.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.timeline.progress()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.timeline.is_playing()
    }

    // ========== Frame loop ==========

    /// Advance one frame.
    ///
    /// `delta` is the wall-clock time since the previous frame and only moves
    /// the timeline while it is playing. Shader time always advances by a
    /// fixed step.
    pub fn update(&mut self, delta: f32) {
        self.timeline.tick(delta, self.field.current_mut());
        self.driver
            .update(self.timeline.progress(), self.field.current(), &mut self.buffer);
    }

    /// Update, then hand the frame to `target`.
    pub fn render_to<T: RenderTarget + ?Sized>(&mut self, delta: f32, target: &mut T) {
        self.pixel_ratio = target.pixel_ratio();
        self.update(delta);
        target.submit(&self.frame());
    }

    /// Current frame data for a renderer.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            vertices: self.buffer.vertices(),
            generation: self.buffer.generation(),
            uniforms: self.uniforms(),
            transform: self.driver.transform(),
        }
    }

    pub fn uniforms(&self) -> ShaderUniforms {
        ShaderUniforms {
            point_size: self.params.physical_point_size(self.pixel_ratio),
            time: self.driver.time(),
            amplitude: self.params.amplitude,
        }
    }

    // ========== Parameters ==========

    /// Apply one edit from a parameter editor.
    pub fn apply(&mut self, change: ParamChange) {
        match change {
            ParamChange::Density(d) => self.set_density(d),
            ParamChange::PointSize(s) => self.set_point_size(s),
            ParamChange::Amplitude(a) => self.set_amplitude(a),
            ParamChange::GradientStart(c) => self.set_gradient_start(c),
            ParamChange::GradientEnd(c) => self.set_gradient_end(c),
            ParamChange::Progress(p) => self.set_progress(p),
            ParamChange::Play => self.play(),
        }
    }

    /// Change the sampling density and rebuild, keeping the current progress.
    pub fn set_density(&mut self, density: u32) {
        let clamped = clamp_density(density, self.params.density_max);
        if clamped != density {
            log::warn!(
                "Density {} out of range 1..={}, using {}",
                density,
                self.params.density_max,
                clamped
            );
        }
        self.params.density = clamped;
        self.rebuild();
    }

    pub fn set_point_size(&mut self, size: u32) {
        let clamped = clamp_point_size(size);
        if clamped != size {
            log::warn!("Point size {} out of range, using {}", size, clamped);
        }
        self.params.point_size = clamped;
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.params.amplitude = clamp_amplitude(amplitude);
    }

    /// Change the left gradient color. Only colors are recomputed.
    pub fn set_gradient_start(&mut self, color: Rgb) {
        self.params.gradient_start = color;
        self.recolor();
    }

    /// Change the right gradient color. Only colors are recomputed.
    pub fn set_gradient_end(&mut self, color: Rgb) {
        self.params.gradient_end = color;
        self.recolor();
    }

    pub fn set_base_scale(&mut self, base_scale: f32) {
        if base_scale.is_finite() && base_scale > 0.0 {
            self.params.base_scale = base_scale;
            self.driver.set_base_scale(base_scale);
        }
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = effective_pixel_ratio(pixel_ratio);
    }

    // ========== Shapes ==========

    /// Switch to another shape and rebuild, keeping the current progress.
    pub fn set_shape(&mut self, name: &str) -> Result<(), OutlineError> {
        if !self.library.contains(name) {
            log::warn!("Unknown shape '{}', keeping '{}'", name, self.active);
            return Err(OutlineError::UnknownShape(name.to_string()));
        }
        self.switch_to(name.to_string());
        Ok(())
    }

    /// Switch to the next shape in library order.
    pub fn next_shape(&mut self) {
        if let Some(next) = self.library.next_name(&self.active).map(str::to_string) {
            if next != self.active {
                self.switch_to(next);
            }
        }
    }

    /// `name` must be in the library.
    fn switch_to(&mut self, name: String) {
        log::info!("Switching shape '{}' -> '{}'", self.active, name);
        self.active = name;
        self.rebuild();
    }

    #[inline]
    pub fn active_shape(&self) -> &str {
        &self.active
    }

    #[inline]
    pub fn library(&self) -> &ShapeLibrary {
        &self.library
    }

    // ========== State access ==========

    #[inline]
    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline]
    pub fn buffer(&self) -> &PointBuffer {
        &self.buffer
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.driver.transform()
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.field.len()
    }

    // ========== Internals ==========

    /// Resample the active shape and replace field, plan and buffer together.
    fn rebuild(&mut self) {
        let Some(document) = self.library.get(&self.active) else {
            return;
        };

        let points = sample_outline(document, self.params.density);
        let mut field = ParticleField::build(
            &points,
            document.viewport,
            &self.params.gradient(),
            self.diffusion,
            &mut self.jitter,
        );
        let plan = ConvergencePlan::for_field(&field, self.easing);
        self.timeline.rebuild(plan, field.current_mut());
        self.buffer.reallocate(field.current(), field.colors());
        self.field = field;

        log::debug!(
            "Rebuilt '{}' at density {}: {} particles, progress {:.3}",
            self.active,
            self.params.density,
            self.field.len(),
            self.timeline.progress()
        );
    }

    fn recolor(&mut self) {
        self.field.recolor(&self.params.gradient());
        self.buffer.write_colors(self.field.colors());
    }
}
