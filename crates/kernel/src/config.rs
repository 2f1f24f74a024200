use std::path::Path;

use glam::Vec3;
use roamfield_common::{Color, Shape};
use roamfield_input::{BindingError, KeyBindings};
use roamfield_tiles::{MAX_COORD, TileField, TileFieldError};
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid tile field: {0}")]
    Tiles(#[from] TileFieldError),
    #[error("damping must lie in [0, 1], got {0}")]
    Damping(f32),
    #[error("acceleration must be finite, got {0}")]
    Acceleration(f32),
    #[error("{body} has a degenerate shape: {shape:?}")]
    Shape { body: &'static str, shape: Shape },
    #[error("{0} is not finite")]
    NonFinite(&'static str),
    #[error("{body} at {position} lies beyond the tile coordinate range")]
    OutOfRange { body: &'static str, position: Vec3 },
    #[error("invalid key bindings: {0}")]
    Bindings(#[from] BindingError),
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Shape, starting position, and color of one scene body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub shape: Shape,
    pub position: Vec3,
    pub color: Color,
}

/// Scene and tuning parameters.
///
/// All quantities are per tick: `acceleration` is added to velocity once per
/// held key per tick and `damping` multiplies velocity once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the obstacle recolor stream.
    pub seed: u64,
    pub tile_size: f32,
    pub tiles_per_axis: u32,
    pub tile_color: Color,
    pub acceleration: f32,
    pub damping: f32,
    /// Player start. Obstacle hits also reset the player here.
    pub player: BodyConfig,
    pub item: BodyConfig,
    pub obstacle: BodyConfig,
    /// Camera eye before the first tick.
    pub camera_start: Vec3,
    /// Camera eye relative to the player once following.
    pub camera_offset: Vec3,
    pub keys: KeyBindings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tile_size: 20.0,
            tiles_per_axis: 3,
            tile_color: Color::from_hex(0x444444),
            acceleration: 0.02,
            damping: 0.9,
            player: BodyConfig {
                shape: Shape::cube(1.0),
                position: Vec3::new(0.0, 0.5, 0.0),
                color: Color::from_hex(0x00ff00),
            },
            item: BodyConfig {
                shape: Shape::Sphere { radius: 0.3 },
                position: Vec3::new(5.0, 0.3, 5.0),
                color: Color::from_hex(0xffff00),
            },
            obstacle: BodyConfig {
                shape: Shape::cube(1.0),
                position: Vec3::new(-5.0, 0.5, -5.0),
                color: Color::from_hex(0xff0000),
            },
            camera_start: Vec3::new(0.0, 5.0, 5.0),
            camera_offset: Vec3::new(0.0, 5.0, 5.0),
            keys: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    /// Spawn point used at start and after every obstacle hit.
    pub fn spawn(&self) -> Vec3 {
        self.player.position
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML config file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded sim config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        TileField::new(self.tile_size, self.tiles_per_axis)?;
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(ConfigError::Damping(self.damping));
        }
        if !self.acceleration.is_finite() {
            return Err(ConfigError::Acceleration(self.acceleration));
        }
        for (name, body) in [
            ("player", &self.player),
            ("item", &self.item),
            ("obstacle", &self.obstacle),
        ] {
            let half = body.shape.half_extents();
            if !half.is_finite() || half.cmplt(Vec3::ZERO).any() || half == Vec3::ZERO {
                return Err(ConfigError::Shape {
                    body: name,
                    shape: body.shape,
                });
            }
            if !body.position.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
            let limit = f64::from(MAX_COORD) * f64::from(self.tile_size);
            if f64::from(body.position.x.abs()) > limit || f64::from(body.position.z.abs()) > limit {
                return Err(ConfigError::OutOfRange {
                    body: name,
                    position: body.position,
                });
            }
        }
        if !self.camera_start.is_finite() {
            return Err(ConfigError::NonFinite("camera_start"));
        }
        if !self.camera_offset.is_finite() {
            return Err(ConfigError::NonFinite("camera_offset"));
        }
        self.keys.validate()?;
        Ok(())
    }
}
