//! Error types for the outline particle engine.
//!
//! The animation core itself never fails: sampling, field rebuilds and frame
//! updates clamp or guard their inputs. Errors only arise at the edges, when
//! outline documents, colors and scene files are loaded, and when the optional
//! render host sets up its window and GPU.

use std::fmt;

/// Errors that can occur while building outline documents.
#[derive(Debug)]
pub enum OutlineError {
    /// A path's `d` attribute could not be parsed.
    InvalidPathData {
        shape: String,
        source: kurbo::SvgParseError,
    },
    /// The viewport has a negative or non-finite dimension.
    InvalidViewport { shape: String, width: f32, height: f32 },
    /// Two shapes were registered under the same name.
    DuplicateShape(String),
    /// A shape name was requested that the library does not contain.
    UnknownShape(String),
    /// An engine was requested over a library with no shapes.
    EmptyLibrary,
}

impl fmt::Display for OutlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlineError::InvalidPathData { shape, source } => {
                write!(f, "Invalid path data in shape '{}': {}", shape, source)
            }
            OutlineError::InvalidViewport { shape, width, height } => write!(
                f,
                "Invalid viewport {}x{} for shape '{}'. Width and height must be finite and >= 0.",
                width, height, shape
            ),
            OutlineError::DuplicateShape(name) => {
                write!(f, "Shape '{}' is already registered", name)
            }
            OutlineError::UnknownShape(name) => write!(f, "No shape named '{}'", name),
            OutlineError::EmptyLibrary => write!(f, "Shape library is empty. Add at least one outline document."),
        }
    }
}

impl std::error::Error for OutlineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutlineError::InvalidPathData { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A color string that is not `#rgb` or `#rrggbb` hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid hex color '{}'. Expected #rgb or #rrggbb.", self.0)
    }
}

impl std::error::Error for ColorParseError {}

/// Errors that can occur when loading or saving a scene configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the scene file.
    Io(std::io::Error),
    /// The scene file is not valid JSON for a scene.
    Json(serde_json::Error),
    /// A shape in the scene is malformed or missing.
    Outline(OutlineError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access scene file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse scene: {}", e),
            ConfigError::Outline(e) => write!(f, "Invalid shape in scene: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Outline(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<OutlineError> for ConfigError {
    fn from(e: OutlineError) -> Self {
        ConfigError::Outline(e)
    }
}

/// Point renderer setup failures.
#[cfg(feature = "render")]
#[derive(Debug)]
pub enum GpuError {
    /// The window could not back a wgpu surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the window's surface.
    NoAdapter,
    Device(wgpu::RequestDeviceError),
}

#[cfg(feature = "render")]
impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::Surface(e) => write!(f, "Cannot create window surface: {}", e),
            GpuError::NoAdapter => write!(f, "No GPU adapter can present to this window"),
            GpuError::Device(e) => write!(f, "Cannot open GPU device: {}", e),
        }
    }
}

#[cfg(feature = "render")]
impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::Surface(e) => Some(e),
            GpuError::Device(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

#[cfg(feature = "render")]
impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::Surface(e)
    }
}

#[cfg(feature = "render")]
impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::Device(e)
    }
}

/// Errors that can occur when running the render host.
#[cfg(feature = "render")]
#[derive(Debug)]
pub enum RunError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// Failed to set up the GPU renderer.
    Gpu(GpuError),
    /// Failed to load the scene.
    Config(ConfigError),
}

#[cfg(feature = "render")]
impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Gpu(e) => write!(f, "GPU error: {}", e),
            RunError::Config(e) => write!(f, "Scene error: {}", e),
        }
    }
}

#[cfg(feature = "render")]
impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Gpu(e) => Some(e),
            RunError::Config(e) => Some(e),
        }
    }
}

#[cfg(feature = "render")]
impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

#[cfg(feature = "render")]
impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

#[cfg(feature = "render")]
impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

#[cfg(feature = "render")]
impl From<GpuError> for RunError {
    fn from(e: GpuError) -> Self {
        RunError::Gpu(e)
    }
}
