//! Shared configuration for solidview
//!
//! This crate provides the single source of truth for display dimensions,
//! tessellation tolerances, overlay styling, and log filtering shared by the
//! session core and the command-dispatch binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 800;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Fraction of a shape's largest coarse extent used as the refinement
/// deflection when computing bounding boxes.
pub const DEFAULT_BOUNDS_RELATIVE_DEFLECTION: f64 = 0.001;

/// Fraction of a shape's largest extent used when meshing for display.
pub const DEFAULT_DISPLAY_RELATIVE_DEFLECTION: f64 = 0.001;

/// Lower bound on any absolute display deflection.
pub const DEFAULT_MIN_DEFLECTION: f64 = 1e-4;

/// Azure, the bounding-box overlay color (RGB, 0.0-1.0).
pub const DEFAULT_OVERLAY_COLOR: [f32; 3] = [0.941, 1.0, 1.0];

/// Bounding-box overlays are mostly see-through.
pub const DEFAULT_OVERLAY_TRANSPARENCY: f32 = 0.8;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "SOLIDVIEW_CONFIG";

/// File name looked up next to the binary
pub const CONFIG_FILE_NAME: &str = "solidview.toml";

/// Errors raised while validating or persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to write configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Display configuration for the presentation shell window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Get scaled width (for physical pixel calculations)
    pub fn scaled_width(&self) -> u32 {
        (self.width as f32 * self.scale) as u32
    }

    /// Get scaled height (for physical pixel calculations)
    pub fn scaled_height(&self) -> u32 {
        (self.height as f32 * self.scale) as u32
    }
}

/// Bounding volume refinement settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    /// Deflection = largest coarse extent * this factor
    pub relative_deflection: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            relative_deflection: DEFAULT_BOUNDS_RELATIVE_DEFLECTION,
        }
    }
}

/// Display meshing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub display_relative_deflection: f64,
    pub min_deflection: f64,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            display_relative_deflection: DEFAULT_DISPLAY_RELATIVE_DEFLECTION,
            min_deflection: DEFAULT_MIN_DEFLECTION,
        }
    }
}

impl TessellationConfig {
    /// Absolute display deflection for a shape whose largest extent is `extent`.
    pub fn display_deflection(&self, extent: f64) -> f64 {
        (extent * self.display_relative_deflection).max(self.min_deflection)
    }
}

/// Styling of the bounding-box overlays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub color: [f32; 3],
    pub transparency: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_OVERLAY_COLOR,
            transparency: DEFAULT_OVERLAY_TRANSPARENCY,
        }
    }
}

/// Log filtering; `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Complete configuration for one solidview session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub display: DisplayConfig,
    pub bounds: BoundsConfig,
    pub tessellation: TessellationConfig,
    pub overlay: OverlayConfig,
    pub log: LogConfig,
}

impl SessionConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<SessionConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        tracing::info!("Loaded configuration from {}", path.display());
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Rejected configuration, using defaults: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Malformed configuration file, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No configuration file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write configuration as pretty TOML.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Resolve the config file location (`SOLIDVIEW_CONFIG`, else next to the binary).
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("solidview"))
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(CONFIG_FILE_NAME)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_finite("bounds.relative_deflection", self.bounds.relative_deflection)?;
        positive_finite(
            "tessellation.display_relative_deflection",
            self.tessellation.display_relative_deflection,
        )?;
        positive_finite("tessellation.min_deflection", self.tessellation.min_deflection)?;

        let t = self.overlay.transparency;
        if !(0.0..=1.0).contains(&t) {
            return Err(ConfigError::Invalid {
                field: "overlay.transparency",
                reason: format!("{} is outside [0, 1]", t),
            });
        }
        if self.overlay.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid {
                field: "overlay.color",
                reason: "components must lie in [0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

fn positive_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} must be positive and finite", value),
        })
    }
}
