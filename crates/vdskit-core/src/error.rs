//! Error handling for VDSKit labels
//!
//! Every way a layer label can be rejected has its own variant so callers
//! can tell a grammar problem from a cut/tool compatibility problem.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Layer label error type
///
/// Returned by the codec's validate, encode, parse and modify operations.
/// A label error is never fatal to a pipeline: callers check it and drop
/// or report the offending label.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// Sheet identifier is empty
    #[error("Sheet identifier is empty")]
    EmptySheet,

    /// Sheet identifier contains the label separator
    #[error("Sheet identifier '{sheet}' contains the separator '{separator}'")]
    SheetContainsSeparator {
        /// The rejected sheet identifier.
        sheet: String,
        /// The separator character.
        separator: char,
    },

    /// Cut type is not one of the known cut types
    #[error("Unknown cut type: {cut}")]
    UnknownCut {
        /// The unknown cut name.
        cut: String,
    },

    /// Tool is not one of the known tools
    #[error("Unknown tool: {tool}")]
    UnknownTool {
        /// The unknown tool name.
        tool: String,
    },

    /// Cut type and tool exist but cannot be used together
    #[error("Tool {tool} cannot perform a {cut} cut")]
    Incompatible {
        /// The requested cut type.
        cut: String,
        /// The requested tool.
        tool: String,
    },

    /// Label does not split into sheet, cut and tool
    #[error("Label '{label}' has {found} fields, expected 3")]
    FieldCount {
        /// The rejected label text.
        label: String,
        /// Number of fields found after splitting.
        found: usize,
    },

    /// A NOCUT label cannot carry a cut type or tool
    #[error("NOCUT label cannot carry a cut type or tool")]
    SentinelWithCutOrTool,

    /// Re-targeting a NOCUT label to a sheet needs both a cut type and a tool
    #[error("Converting a NOCUT label to sheet '{sheet}' requires both a cut type and a tool")]
    MissingCutOrTool {
        /// The requested sheet identifier.
        sheet: String,
    },
}

impl LabelError {
    /// Check if this error comes from the cut/tool compatibility table
    pub fn is_compatibility_error(&self) -> bool {
        matches!(
            self,
            LabelError::Incompatible { .. }
                | LabelError::UnknownCut { .. }
                | LabelError::UnknownTool { .. }
        )
    }

    /// Check if this error comes from the sheet identifier
    pub fn is_sheet_error(&self) -> bool {
        matches!(
            self,
            LabelError::EmptySheet | LabelError::SheetContainsSeparator { .. }
        )
    }
}

/// Result type using LabelError
pub type Result<T> = std::result::Result<T, LabelError>;
