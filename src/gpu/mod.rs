//! wgpu point renderer for the reference host.
//!
//! Draws the engine's [`Frame`] as instanced, pixel-sized quads through a
//! fixed perspective camera looking down -Z at the origin. Points are
//! alpha-blended in submission order with no depth buffer; the cloud is flat
//! until the model rotation turns it.

mod camera;

use std::mem;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

pub use camera::Camera;

use crate::buffer::{Frame, PointUniforms, PointVertex, RenderTarget};
use crate::error::GpuError;
use crate::shader::POINT_SHADER;

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

/// Vertices per point quad (two triangles).
const QUAD_VERTICES: u32 = 6;

/// Shader, pipeline and the uniform block it reads.
struct PointPipeline {
    pipeline: wgpu::RenderPipeline,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PointPipeline {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Uniforms"),
            contents: bytemuck::bytes_of(&<PointUniforms as bytemuck::Zeroable>::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        mem::size_of::<PointUniforms>() as wgpu::BufferAddress,
                    ),
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Uniforms"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(POINT_SHADER.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: mem::size_of::<PointVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            // Quads face the camera whatever the model rotation, so no culling.
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniforms,
            bind_group,
        }
    }
}

/// Per-point instance data, reallocated only when the point set grows.
struct PointInstances {
    buffer: wgpu::Buffer,
    capacity: usize,
    generation: u64,
    len: u32,
}

impl PointInstances {
    fn new(device: &wgpu::Device) -> Self {
        Self {
            buffer: instance_buffer(device, 1),
            capacity: 1,
            generation: 0,
            len: 0,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &Frame<'_>) {
        let count = frame.vertices.len();
        if frame.generation != self.generation {
            if count > self.capacity {
                self.capacity = count.next_power_of_two();
                self.buffer = instance_buffer(device, self.capacity);
            }
            self.generation = frame.generation;
            log::debug!(
                "Point set changed: {} points, buffer capacity {}",
                count,
                self.capacity
            );
        }
        self.len = count as u32;
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, frame.vertex_bytes());
        }
    }
}

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Point Instances"),
        size: (capacity.max(1) * mem::size_of::<PointVertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Prefers an sRGB format so gradient colors blend as authored.
fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    size: PhysicalSize<u32>,
) -> wgpu::SurfaceConfiguration {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| caps.formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: Vec::new(),
        desired_maximum_frame_latency: 2,
    }
}

/// Window surface plus the point pipeline. Implements [`RenderTarget`] so the
/// engine can hand it frames directly.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    points: PointPipeline,
    instances: PointInstances,
    pub camera: Camera,
    scale_factor: f32,
    surface_error: Option<wgpu::SurfaceError>,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor() as f32;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Point Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let config = surface_config(&surface.get_capabilities(&adapter), size);
        surface.configure(&device, &config);

        let points = PointPipeline::new(&device, config.format);
        let instances = PointInstances::new(&device);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            points,
            instances,
            camera: Camera::new(),
            scale_factor,
            surface_error: None,
        })
    }

    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reconfigure the surface at its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor as f32;
    }

    /// Error from the most recent [`submit`](RenderTarget::submit), if any.
    pub fn take_surface_error(&mut self) -> Option<wgpu::SurfaceError> {
        self.surface_error.take()
    }

    fn write_uniforms(&self, frame: &Frame<'_>) {
        let (width, height) = (self.config.width as f32, self.config.height as f32);
        let uniforms = PointUniforms::new(
            self.camera.view_proj(width / height),
            frame.transform.model_matrix(),
            [width, height],
            &frame.uniforms,
        );
        self.queue
            .write_buffer(&self.points.uniforms, 0, bytemuck::bytes_of(&uniforms));
    }

    fn draw(&self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Point Frame"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Points"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.instances.len > 0 {
                pass.set_pipeline(&self.points.pipeline);
                pass.set_bind_group(0, &self.points.bind_group, &[]);
                pass.set_vertex_buffer(0, self.instances.buffer.slice(..));
                pass.draw(0..QUAD_VERTICES, 0..self.instances.len);
            }
        }

        self.queue.submit([encoder.finish()]);
        output.present();
        Ok(())
    }
}

impl RenderTarget for GpuState {
    fn pixel_ratio(&self) -> f32 {
        self.scale_factor
    }

    fn submit(&mut self, frame: &Frame<'_>) {
        self.instances.upload(&self.device, &self.queue, frame);
        self.write_uniforms(frame);
        if let Err(e) = self.draw() {
            self.surface_error = Some(e);
        }
    }
}
