//! Error types for building and serializing slide tables.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, writing or reading a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML reading or writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// The dataset has no rows, or its header row has no cells.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// A row does not have as many cells as the header row.
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The number of column weights does not match the number of columns.
    #[error("Got {found} column weights for {expected} columns")]
    ColumnWeights { expected: usize, found: usize },

    /// A column weight is negative or not finite, or all weights are zero.
    #[error("Invalid column weight: {0}")]
    InvalidWeight(f64),

    /// A font size outside what a DrawingML run can hold (1 to 4000 pt).
    #[error("Invalid font size: {0} pt")]
    InvalidFontSize(f64),

    /// A computed length does not fit in an EMU value.
    #[error("Length overflow: {0}")]
    LengthOverflow(String),

    /// No slide exists at the requested index.
    #[error("Slide index {index} out of range (presentation has {count} slides)")]
    SlideIndexOutOfRange { index: usize, count: usize },

    /// The requested layout index is not one of the layouts we can write.
    #[error("Unsupported slide layout index: {0}")]
    UnsupportedLayout(usize),

    /// A title was set on a slide whose layout has no title placeholder.
    #[error("Layout '{0}' has no title placeholder")]
    NoTitlePlaceholder(&'static str),
}
