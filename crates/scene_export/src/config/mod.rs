//! Configuration system
//!
//! Export behavior that is not part of the host scene lives here: the root
//! element vocabulary, which shading path surface shaders take, and the
//! names of the host nodes that carry resolution and render-region state.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Which path surface shaders take when both could handle a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SurfaceShading {
    /// Plugin-style `bsdf` elements from the translator table
    #[default]
    Translate,
    /// Node-network `shader` elements from the graph walker
    Network,
}

/// Constant background closure appended after the shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Emit the background element at all
    pub enabled: bool,
    /// Linear RGB color
    pub color: [f64; 3],
    /// Emission strength
    pub strength: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: [0.2, 0.2, 0.2],
            strength: 2.0,
        }
    }
}

/// # Export Configuration
///
/// Every field has a default, so an empty TOML table is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Kind of the root element
    pub root_element: String,
    /// Value of the root `version` attribute
    pub scene_version: String,
    /// Surface shader path preference
    pub surface_shading: SurfaceShading,
    /// Emit an `integrator` element ahead of the sensor
    pub write_integrator: bool,
    /// Digits used when substituting frame numbers into texture names
    pub texture_frame_padding: usize,
    /// Host node carrying `width`/`height`
    pub resolution_node: String,
    /// Host node carrying the render region (`left`, `rght`, `top`, `bot`)
    pub render_globals_node: String,
    /// Background closure
    pub background: BackgroundConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root_element: "scene".to_string(),
            scene_version: "0.5.0".to_string(),
            surface_shading: SurfaceShading::default(),
            write_integrator: true,
            texture_frame_padding: 4,
            resolution_node: "defaultResolution".to_string(),
            render_globals_node: "defaultRenderGlobals".to_string(),
            background: BackgroundConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Set the surface shading path
    pub fn with_surface_shading(mut self, shading: SurfaceShading) -> Self {
        self.surface_shading = shading;
        self
    }

    /// Enable or disable the integrator element
    pub fn with_integrator(mut self, enabled: bool) -> Self {
        self.write_integrator = enabled;
        self
    }

    /// Replace the background settings
    pub fn with_background(mut self, background: BackgroundConfig) -> Self {
        self.background = background;
        self
    }

    /// Set the root element kind
    pub fn with_root_element(mut self, kind: impl Into<String>) -> Self {
        self.root_element = kind.into();
        self
    }
}

impl Config for ExportConfig {}
