//! Error types for drawing import.
//!
//! Only a source that cannot be read as a drawing tree is an error. A valid
//! tree without usable geometry yields an empty drawing instead.

use thiserror::Error;

/// Errors raised while turning source text into a drawing.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The source is not a well-formed drawing tree.
    #[error("Malformed SVG: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Generated path data could not be read back.
    #[error(transparent)]
    PathData(#[from] PathDataError),
}

impl ImportError {
    /// Check if the source text itself was malformed
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, ImportError::Xml(_))
    }
}

/// Path data that does not follow the path-command grammar.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid path data at token {position}: {reason}")]
pub struct PathDataError {
    /// Index of the offending token.
    pub position: usize,
    /// What was wrong with it.
    pub reason: String,
}

impl PathDataError {
    pub(crate) fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

/// Result type using ImportError
pub type Result<T> = std::result::Result<T, ImportError>;
