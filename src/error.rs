//! Error types for the docsmith library.

use std::io;
use thiserror::Error;

/// Result type alias for docsmith operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or compiling a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while assembling the package.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error writing the ZIP container.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error producing XML content.
    #[error("XML write error: {0}")]
    Xml(String),

    /// A style with this id is already registered.
    #[error("Duplicate style id: {0}")]
    DuplicateStyleId(String),

    /// A list definition with this reference is already registered.
    #[error("Duplicate list reference: {0}")]
    DuplicateListReference(String),

    /// A list definition has malformed levels.
    #[error("Invalid list definition '{reference}': {reason}")]
    InvalidListDefinition { reference: String, reason: String },

    /// A style id was looked up in the registry but does not exist.
    #[error("Unknown style id: {0}")]
    UnknownStyleId(String),

    /// A paragraph references a style that is not registered.
    #[error("Unknown style reference: {0}")]
    UnknownStyleReference(String),

    /// A paragraph or marker request references an undefined list.
    #[error("Unknown list reference: {0}")]
    UnknownListReference(String),

    /// A list exists but does not define the requested level.
    #[error("Unknown level {level} for list '{reference}'")]
    UnknownListLevel { reference: String, level: u8 },

    /// Content was added before any section was opened.
    #[error("No section is open; call add_section first")]
    MissingSection,

    /// A table row does not cover exactly the declared columns.
    #[error("Row {row} covers {found} columns, table declares {expected}")]
    RowCellCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A table is wider than the usable content width.
    #[error("Table width {width} exceeds available content width {available}")]
    TableWidthOverflow { width: u32, available: u32 },

    /// Page margins leave no room for content.
    #[error("Invalid page geometry: {0}")]
    InvalidPageGeometry(String),

    /// The `basedOn` chain of a style loops back on itself.
    #[error("Style inheritance cycle: {}", chain.join(" -> "))]
    StyleCycleDetected { chain: Vec<String> },

    /// The package could not be assembled consistently.
    #[error("Package assembly error: {0}")]
    PackageAssembly(String),
}

impl Error {
    /// Returns true for errors that reject the input description, as opposed
    /// to failures while writing the package.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            Error::Io(_) | Error::ZipArchive(_) | Error::Xml(_) | Error::PackageAssembly(_)
        )
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
