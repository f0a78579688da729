//! Conversion configuration for VDSKit
//!
//! Holds the defaults the converter applies when the command line does not
//! say otherwise. Supports JSON and TOML files, the latter stored in the
//! platform configuration directory by default.
//!
//! Configuration is organized into sections:
//! - Label settings (sheet, cut type and tool applied to the drawing)
//! - Geometry settings (curve flattening)
//! - Output settings (directory and file extension)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use vdskit_core::LayerLabel;

use crate::error::{SettingsError, SettingsResult};

/// Label applied to the whole drawing.
///
/// A cut or tool left out of a config file stays unset, so the codec picks
/// it from the other field instead of pairing it with a fixed default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSettings {
    /// Sheet identifier, or `NOCUT` for reference-only output
    #[serde(default = "default_sheet")]
    pub sheet: String,
    /// Cut type name; picked from the tool when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<String>,
    /// Tool name; picked from the cut type when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

fn default_sheet() -> String {
    "green".to_string()
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            cut: Some("normal".to_string()),
            tool: Some("T40GREEN".to_string()),
        }
    }
}

impl LabelSettings {
    /// Encode these settings as a layer label
    pub fn to_label(&self) -> SettingsResult<LayerLabel> {
        Ok(LayerLabel::new(
            &self.sheet,
            self.cut.as_deref(),
            self.tool.as_deref(),
        )?)
    }
}

/// Geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Maximum chord length when flattening curves to measure the extent
    pub facet_size: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self { facet_size: 1.0 }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory for generated documents; next to the input when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// File extension of generated documents
    pub extension: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: None,
            extension: "vds".to_string(),
        }
    }
}

/// Complete conversion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConvertConfig {
    /// Default label
    pub label: LabelSettings,
    /// Geometry settings
    pub geometry: GeometrySettings,
    /// Output settings
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl ConvertConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let facet = self.geometry.facet_size;
        if !facet.is_finite() || facet <= 0.0 {
            return Err(SettingsError::invalid(
                "geometry.facet_size",
                format!("must be a finite number > 0, got {facet}"),
            ));
        }

        let extension = self.output.extension.trim();
        if extension.is_empty() {
            return Err(SettingsError::invalid("output.extension", "must not be empty"));
        }
        if extension.contains(['/', '\\', '.']) {
            return Err(SettingsError::invalid(
                "output.extension",
                format!("'{extension}' must be a bare extension"),
            ));
        }

        self.label.to_label()?;
        Ok(())
    }

    /// Default config location: `<config dir>/vdskit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(dir.join("vdskit").join("config.toml"))
    }

    /// Load the config from [`Self::default_path`], or the defaults when
    /// there is no such file
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                debug!("Using default config: {}", e);
                return Ok(Self::default());
            }
        };
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
