//! # VDSKit Designer
//!
//! Geometry side of the SVG to VDS conversion: the drawing model, SVG
//! import, curve flattening and the VDS exporter.
//!
//! ## Pipeline
//!
//! ```text
//! SVG text
//!   └── import::to_path_data   (tree walk, transforms, shapes -> path data)
//!         └── import::to_drawing   (path data -> Drawing with m_1..m_n)
//!               ├── Drawing::set_label   (tag sub-models with layer labels)
//!               └── vds::to_vds
//!                     ├── measure::flattened_extent      (sheet size)
//!                     └── export::path_data_by_layer     (figures per label)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use vdskit_core::LayerLabel;
//! use vdskit_designer::{to_drawing, to_vds};
//!
//! let svg = r#"<svg><path d="M 0 0 L 0 10 10 10"/></svg>"#;
//! let mut drawing = to_drawing(svg)?;
//! drawing.set_label(&LayerLabel::parse("green.normal.T40GREEN")?);
//!
//! let documents = to_vds(&drawing).expect("drawing has an extent");
//! assert!(documents["green"].contains("<CutType>0</CutType>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod arc;
pub mod error;
pub mod export;
pub mod import;
pub mod measure;
pub mod model;
pub mod path_data;
pub mod straighten;
pub mod transform;
pub mod vds;

pub use error::{ImportError, PathDataError, Result};
pub use export::{path_data, path_data_by_layer};
pub use import::{model_from_path_data, to_drawing, to_path_data, ANCHOR_ID};
pub use measure::{extent, flattened_extent, Extent};
pub use model::{Drawing, Path, PathType, Point, WalkedPath, POINT_TOLERANCE};
pub use path_data::{Command, PathData};
pub use straighten::{straighten, DEFAULT_FACET_SIZE};
pub use transform::{parse_transform, Transform, TransformExt};
pub use vds::{escape_xml, to_vds, VdsDocuments, VdsGenerator};
