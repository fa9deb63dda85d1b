//! Per-file errors raised by the processing pipeline.

use thiserror::Error;

use crate::bbox::Bbox;
use crate::readers::ReadError;

/// Every variant is scoped to a single input file; a batch keeps going after any of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// The filename stem does not split into exactly 8 `_`-separated components.
    #[error("malformed filename {name:?}: expected 8 '_'-separated components, found {found}")]
    MalformedFilename { name: String, found: usize },

    /// Component 7 of the filename is not a known variable code.
    #[error("unknown variable code {code:?}")]
    UnknownVariableCode { code: String },

    /// The requested window does not intersect the raster.
    #[error("bounding box {requested} does not intersect raster extent {extent}")]
    OutOfBounds { requested: Bbox, extent: Bbox },

    /// The raster could not be opened or decoded.
    #[error("unable to read raster {path}: {reason}")]
    SourceUnreadable { path: String, reason: String },
}

impl ProcessError {
    /// Attach the file path to a raster collaborator error.
    pub fn from_read(path: impl Into<String>, err: ReadError) -> Self {
        match err {
            ReadError::OutOfBounds { requested, extent } => {
                ProcessError::OutOfBounds { requested, extent }
            }
            other => ProcessError::SourceUnreadable {
                path: path.into(),
                reason: other.to_string(),
            },
        }
    }

    /// Short machine-readable kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::MalformedFilename { .. } => "malformed_filename",
            ProcessError::UnknownVariableCode { .. } => "unknown_variable_code",
            ProcessError::OutOfBounds { .. } => "out_of_bounds",
            ProcessError::SourceUnreadable { .. } => "source_unreadable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;
