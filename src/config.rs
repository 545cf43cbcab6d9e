//! Scene configuration files.
//!
//! A scene bundles the render parameters with the outline shapes to show, and
//! can be saved to and loaded from JSON:
//!
//! ```json
//! {
//!   "params": { "density": 3, "gradient_start": "#ff6a00", "gradient_end": "#ee0979" },
//!   "shapes": [
//!     { "name": "logo", "width": 100, "height": 100, "paths": ["M10 50 L90 50"], "required": true }
//!   ],
//!   "seed": 7
//! }
//! ```

use crate::engine::{EngineBuilder, ParticleEngine};
use crate::error::{ConfigError, OutlineError};
use crate::jitter::Jitter;
use crate::outline::{OutlineDocument, ShapeLibrary};
use crate::params::RenderParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_showcase() -> usize {
    3
}

/// One outline shape in a scene file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ShapeConfig {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// SVG path data strings, one per path curve.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Always included when picking the showcase.
    #[serde(default)]
    pub required: bool,
}

impl ShapeConfig {
    pub fn to_document(&self) -> Result<OutlineDocument, OutlineError> {
        OutlineDocument::from_path_data(&self.name, self.width, self.height, &self.paths)
    }
}

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    #[serde(default)]
    pub params: RenderParams,
    pub shapes: Vec<ShapeConfig>,
    /// Shape shown first. When unset, the first showcase shape is used.
    #[serde(default)]
    pub initial_shape: Option<String>,
    /// Seed for dispersion randomness. Random per run when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// How many optional shapes join the required ones.
    #[serde(default = "default_showcase")]
    pub showcase_optional: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            params: RenderParams::default(),
            shapes: Vec::new(),
            initial_shape: None,
            seed: None,
            showcase_optional: default_showcase(),
        }
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse every shape into a library.
    pub fn library(&self) -> Result<ShapeLibrary, OutlineError> {
        let mut library = ShapeLibrary::new();
        for shape in &self.shapes {
            library.insert(shape.name.clone(), shape.to_document()?, shape.required)?;
        }
        Ok(library)
    }

    /// Engine builder for this scene.
    ///
    /// Only the showcase selection (required shapes plus `showcase_optional`
    /// random optional ones) ends up in the engine's library.
    pub fn builder(&self) -> Result<EngineBuilder, ConfigError> {
        let full = self.library()?;
        if full.is_empty() {
            return Err(OutlineError::EmptyLibrary.into());
        }

        let mut jitter = match self.seed {
            Some(seed) => Jitter::seeded(seed),
            None => Jitter::from_time(),
        };

        let mut library = ShapeLibrary::new();
        for name in full.showcase(&mut jitter, self.showcase_optional) {
            if let Some(entry) = full.entries().iter().find(|e| e.name == name) {
                library.insert(entry.name.clone(), entry.document.clone(), entry.required)?;
            }
        }
        if let Some(initial) = &self.initial_shape {
            if !library.contains(initial) {
                let document = full
                    .get(initial)
                    .ok_or_else(|| OutlineError::UnknownShape(initial.clone()))?;
                library.insert(initial.clone(), document.clone(), false)?;
            }
        }

        let mut builder = ParticleEngine::builder(library)
            .with_params(self.params.clone())
            .with_jitter(jitter);
        if let Some(initial) = &self.initial_shape {
            builder = builder.with_shape(initial.clone());
        }
        Ok(builder)
    }

    /// Build a settled engine for this scene.
    pub fn build_engine(&self) -> Result<ParticleEngine, ConfigError> {
        Ok(self.builder()?.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r##"{
        "params": { "density": 2, "gradient_start": "#000000", "gradient_end": "#ffffff" },
        "shapes": [
            { "name": "a", "width": 10, "height": 10, "paths": ["M0 0 L10 0"], "required": true },
            { "name": "b", "width": 10, "height": 10, "paths": ["M0 0 L0 10"] },
            { "name": "c", "width": 10, "height": 10, "paths": ["M0 0 L5 5"] }
        ],
        "seed": 3,
        "showcase_optional": 1
    }"##;

    #[test]
    fn test_parse_scene() {
        let scene = SceneConfig::from_json(SCENE).unwrap();
        assert_eq!(scene.shapes.len(), 3);
        assert_eq!(scene.params.density, 2);
        assert_eq!(scene.params.point_size, 10);
        assert!(scene.shapes[0].required);
        assert!(!scene.shapes[1].required);
    }

    #[test]
    fn test_showcase_library() {
        let scene = SceneConfig::from_json(SCENE).unwrap();
        let engine = scene.build_engine().unwrap();
        assert_eq!(engine.library().len(), 2);
        assert_eq!(engine.active_shape(), "a");
        assert_eq!(engine.particle_count(), 20);
    }

    #[test]
    fn test_initial_shape_always_available() {
        let mut scene = SceneConfig::from_json(SCENE).unwrap();
        scene.showcase_optional = 0;
        scene.initial_shape = Some("c".into());
        let engine = scene.build_engine().unwrap();
        assert_eq!(engine.active_shape(), "c");
    }

    #[test]
    fn test_empty_scene_rejected() {
        let scene = SceneConfig::default();
        assert!(matches!(
            scene.build_engine(),
            Err(ConfigError::Outline(OutlineError::EmptyLibrary))
        ));
    }

    #[test]
    fn test_bad_path_rejected() {
        let json = r#"{ "shapes": [ { "name": "x", "width": 1, "height": 1, "paths": ["Q"] } ] }"#;
        let scene = SceneConfig::from_json(json).unwrap();
        assert!(matches!(scene.build_engine(), Err(ConfigError::Outline(_))));
    }

    #[test]
    fn test_demo_scene_builds() {
        let mut scene = SceneConfig::from_json(include_str!("../demos/scene.json")).unwrap();
        scene.seed = Some(1);
        let engine = scene.build_engine().unwrap();
        assert_eq!(engine.active_shape(), "heart");
        assert_eq!(engine.library().len(), 3);
        assert!(engine.particle_count() > 0);
    }

    #[test]
    fn test_save_and_load() {
        let scene = SceneConfig::from_json(SCENE).unwrap();
        let path = std::env::temp_dir().join(format!("outline-scene-{}.json", std::process::id()));
        scene.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, scene);
    }
}
