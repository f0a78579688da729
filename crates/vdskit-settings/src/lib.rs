//! VDSKit Settings Crate
//!
//! Handles the conversion configuration: the default layer label, the
//! flattening facet size and output options, loaded from TOML or JSON.

pub mod config;
pub mod error;

pub use config::{ConvertConfig, GeometrySettings, LabelSettings, OutputSettings};
pub use error::{SettingsError, SettingsResult};
