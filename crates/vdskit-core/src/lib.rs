//! # VDSKit Core
//!
//! Core types shared by the VDSKit crates: the layer label codec that tags
//! geometry with a sheet, a cut type and a tool, together with the fixed
//! cut/tool compatibility table and the label error type.

pub mod error;
pub mod label;

pub use error::{LabelError, Result};
pub use label::{
    encode, modify, parse, validate, CutType, LabelOverrides, LayerLabel, SheetCut, Tool, NOCUT,
    SEPARATOR,
};
