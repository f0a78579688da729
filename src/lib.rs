//! # VDSKit
//!
//! Converts SVG drawings into VDS cutting jobs, one document per sheet.
//!
//! ## Architecture
//!
//! VDSKit is organized as a workspace with multiple crates:
//!
//! 1. **vdskit-core** - Layer label codec, cut types, tools and their compatibility table
//! 2. **vdskit-designer** - Drawing model, SVG import, curve flattening, path data and VDS export
//! 3. **vdskit-settings** - Conversion defaults loaded from TOML or JSON
//! 4. **vdskit** - Logging setup and the command-line front end
//!
//! ## Features
//!
//! - **SVG Import**: paths and basic shapes, nested groups and the full transform grammar
//! - **Layer Labels**: `sheet.cut.tool` tags with a fixed cut/tool compatibility table
//! - **Multi-Sheet Export**: one VDS document per sheet, sized from the flattened drawing

pub mod cli;

pub use vdskit_core::{CutType, LabelError, LayerLabel, Tool};
pub use vdskit_designer::{to_drawing, to_vds, Drawing, ImportError, VdsDocuments, VdsGenerator};
pub use vdskit_settings::{ConvertConfig, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, leaving stdout to dumped path data
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(false)
}

/// Initialize logging, defaulting to `debug` instead of `info` when verbose
pub fn init_logging_with(verbose: bool) -> anyhow::Result<()> {
    use tracing::Level;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
