//! Engine configuration and its JSON persistence.

use crate::edge::{DEFAULT_EDGE_TOLERANCE, SetSquareEdges};
use crate::shapes::ShapeStyle;
use crate::stroke::{DEFAULT_COPY_OFFSET, DEFAULT_SELECTION_THRESHOLD};
use crate::style::StyleConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything the drawing engine reads from the settings layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub style: StyleConfig,
    /// Line style for parametric shapes; ink comes from `style`.
    pub shapes: ShapeStyle,
    /// Edge snapping distance, in canvas units.
    pub edge_tolerance: f64,
    pub set_square_edges: SetSquareEdges,
    /// Pick distance for stroke selection.
    pub selection_threshold: f64,
    /// Per-axis offset of a copied stroke.
    pub copy_offset: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            shapes: ShapeStyle::default(),
            edge_tolerance: DEFAULT_EDGE_TOLERANCE,
            set_square_edges: SetSquareEdges::default(),
            selection_threshold: DEFAULT_SELECTION_THRESHOLD,
            copy_offset: DEFAULT_COPY_OFFSET,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration and clamp every value.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;
        Ok(config.sanitized())
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Clamp style ranges and replace non-positive distances with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.style = self.style.sanitized();
        self.shapes = self.shapes.sanitized();
        self.edge_tolerance =
            positive_or("edge_tolerance", self.edge_tolerance, defaults.edge_tolerance);
        self.selection_threshold = positive_or(
            "selection_threshold",
            self.selection_threshold,
            defaults.selection_threshold,
        );
        if !self.copy_offset.is_finite() {
            log::warn!("copy_offset {} invalid, using default", self.copy_offset);
            self.copy_offset = defaults.copy_offset;
        }
        self
    }
}

fn positive_or(name: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("{name} {value} invalid, using default {default}");
        default
    }
}
