//! Reference host: a winit window driving a [`ParticleEngine`] through the
//! wgpu point renderer.
//!
//! | Key | Action |
//! |-----|--------|
//! | Space | Play from dispersed |
//! | ← / → | Progress -0.05 / +0.05 (pauses) |
//! | ↑ / ↓ | Density +1 / -1 |
//! | `[` / `]` | Point size -1 / +1 |
//! | A | Amplitude +0.1, wrapping to 0 past 1 |
//! | Tab | Next shape |
//! | C | Swap gradient endpoints |

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::engine::ParticleEngine;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::params::ParamChange;
use crate::time::FrameClock;

const PROGRESS_STEP: f32 = 0.05;
const AMPLITUDE_STEP: f32 = 0.1;

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostAction {
    Param(ParamChange),
    NextShape,
    SwapGradient,
}

/// Map a key to an action given the engine's current state.
pub fn key_action(key: KeyCode, engine: &ParticleEngine) -> Option<HostAction> {
    let params = engine.params();
    let action = match key {
        KeyCode::Space => HostAction::Param(ParamChange::Play),
        KeyCode::ArrowLeft => {
            HostAction::Param(ParamChange::Progress((engine.progress() - PROGRESS_STEP).max(0.0)))
        }
        KeyCode::ArrowRight => {
            HostAction::Param(ParamChange::Progress((engine.progress() + PROGRESS_STEP).min(1.0)))
        }
        KeyCode::ArrowUp => HostAction::Param(ParamChange::Density(params.density.saturating_add(1))),
        KeyCode::ArrowDown => HostAction::Param(ParamChange::Density(params.density.saturating_sub(1))),
        KeyCode::BracketLeft => {
            HostAction::Param(ParamChange::PointSize(params.point_size.saturating_sub(1)))
        }
        KeyCode::BracketRight => {
            HostAction::Param(ParamChange::PointSize(params.point_size.saturating_add(1)))
        }
        KeyCode::KeyA => HostAction::Param(ParamChange::Amplitude(next_amplitude(params.amplitude))),
        KeyCode::Tab => HostAction::NextShape,
        KeyCode::KeyC => HostAction::SwapGradient,
        _ => return None,
    };
    Some(action)
}

/// Step the amplitude by 0.1, wrapping back to 0 once it would pass 1.
fn next_amplitude(amplitude: f32) -> f32 {
    let next = ((amplitude + AMPLITUDE_STEP) * 10.0).round() / 10.0;
    if next > 1.0 {
        0.0
    } else {
        next
    }
}

pub fn apply_action(engine: &mut ParticleEngine, action: HostAction) {
    match action {
        HostAction::Param(change) => engine.apply(change),
        HostAction::NextShape => engine.next_shape(),
        HostAction::SwapGradient => {
            let start = engine.params().gradient_start;
            let end = engine.params().gradient_end;
            engine.set_gradient_start(end);
            engine.set_gradient_end(start);
        }
    }
}

pub struct App {
    engine: ParticleEngine,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    error: Option<RunError>,
}

impl App {
    pub fn new(engine: ParticleEngine) -> Self {
        Self {
            engine,
            clock: FrameClock::new(),
            window: None,
            gpu_state: None,
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(format!("Outline Particles - {}", self.engine.active_shape()))
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone()))?;
        self.engine.set_pixel_ratio(window.scale_factor() as f32);
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        // Holding a key scrubs and steps, but toggles fire once
        if event.repeat && matches!(code, KeyCode::Space | KeyCode::Tab | KeyCode::KeyC) {
            return;
        }
        if let Some(action) = key_action(code, &self.engine) {
            log::debug!("{:?} -> {:?}", code, action);
            apply_action(&mut self.engine, action);
            if action == HostAction::NextShape {
                if let Some(window) = &self.window {
                    window.set_title(&format!("Outline Particles - {}", self.engine.active_shape()));
                }
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.set_scale_factor(scale_factor);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(&event);
            }
            WindowEvent::Occluded(false) => self.clock.reset(),
            WindowEvent::RedrawRequested => {
                let delta = self.clock.tick();
                if self.clock.frames() % 600 == 0 {
                    log::debug!("{:.1} fps", self.clock.fps());
                }
                if let Some(gpu_state) = &mut self.gpu_state {
                    self.engine.render_to(delta, gpu_state);
                    match gpu_state.take_surface_error() {
                        None => {}
                        Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.reconfigure()
                        }
                        Some(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Some(e) => log::warn!("Render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open a window and run `scene` until it is closed.
pub fn run(scene: &SceneConfig) -> Result<(), RunError> {
    let engine = scene.build_engine()?;
    log::info!(
        "Loaded {} shape(s), starting with '{}' ({} particles)",
        engine.library().len(),
        engine.active_shape(),
        engine.particle_count()
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(engine);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
