//! GPU-facing point data.
//!
//! [`PointBuffer`] is the CPU staging copy of the vertex buffer the renderer
//! draws: one [`PointVertex`] per particle. The engine reallocates it on every
//! field rebuild and rewrites its positions every frame. A [`RenderTarget`]
//! receives the finished [`Frame`] and uploads it however it likes.

use crate::driver::Transform;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// One particle as the vertex shader sees it.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Shader parameters exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderUniforms {
    /// Point size in physical pixels (already multiplied by the pixel ratio).
    pub point_size: f32,
    /// Accumulated animation time.
    pub time: f32,
    /// Sway strength, 0.0-1.0.
    pub amplitude: f32,
}

/// Uniform block layout matching `shader::POINT_SHADER`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PointUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub time: f32,
    pub amplitude: f32,
    pub _padding: [f32; 3],
}

impl PointUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, viewport: [f32; 2], shader: &ShaderUniforms) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            viewport,
            point_size: shader.point_size,
            time: shader.time,
            amplitude: shader.amplitude,
            _padding: [0.0; 3],
        }
    }
}

/// CPU staging copy of the point vertex buffer.
#[derive(Debug, Clone, Default)]
pub struct PointBuffer {
    vertices: Vec<PointVertex>,
    generation: u64,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the old contents and allocate for a new particle set.
    ///
    /// Bumps [`generation`](Self::generation) so GPU-side copies know to
    /// recreate their buffers instead of writing into the old one.
    pub fn reallocate(&mut self, positions: &[Vec3], colors: &[Vec3]) {
        self.vertices = positions
            .iter()
            .zip(colors)
            .map(|(p, c)| PointVertex {
                position: p.to_array(),
                color: c.to_array(),
            })
            .collect();
        self.generation += 1;
    }

    /// Overwrite every vertex position.
    pub fn write_positions(&mut self, positions: &[Vec3]) {
        for (v, p) in self.vertices.iter_mut().zip(positions) {
            v.position = p.to_array();
        }
    }

    /// Overwrite every vertex color in place.
    pub fn write_colors(&mut self, colors: &[Vec3]) {
        for (v, c) in self.vertices.iter_mut().zip(colors) {
            v.color = c.to_array();
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Incremented on every [`reallocate`](Self::reallocate).
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub vertices: &'a [PointVertex],
    /// Changes whenever the vertex count or particle set changed.
    pub generation: u64,
    pub uniforms: ShaderUniforms,
    pub transform: Transform,
}

impl Frame<'_> {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices)
    }
}

/// A render surface that can draw the point cloud.
pub trait RenderTarget {
    /// Physical pixels per logical pixel.
    fn pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Draw (or record) one frame.
    fn submit(&mut self, frame: &Frame<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 24);
        // mat4 + mat4 + vec2 + 3 floats, padded to 16
        assert_eq!(std::mem::size_of::<PointUniforms>(), 160);
    }

    #[test]
    fn test_reallocate_bumps_generation() {
        let mut buffer = PointBuffer::new();
        assert_eq!(buffer.generation(), 0);
        buffer.reallocate(&[Vec3::ONE], &[Vec3::ZERO]);
        assert_eq!(buffer.generation(), 1);
        assert_eq!(buffer.len(), 1);
        buffer.reallocate(&[], &[]);
        assert_eq!(buffer.generation(), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_write_positions_keeps_colors() {
        let mut buffer = PointBuffer::new();
        buffer.reallocate(&[Vec3::ZERO, Vec3::ZERO], &[Vec3::X, Vec3::Y]);
        buffer.write_positions(&[Vec3::new(1.0, 2.0, 3.0), Vec3::splat(4.0)]);
        assert_eq!(buffer.vertices()[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(buffer.vertices()[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(buffer.as_bytes().len(), 48);
    }
}
