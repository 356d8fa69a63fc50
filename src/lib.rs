//! # docsmith
//!
//! Declarative Word (.docx) document generation.
//!
//! Describe a document as a tree of sections, paragraphs, runs and tables,
//! register the paragraph styles and list definitions it uses, and compile
//! it into a complete Office Open XML package held in memory.
//!
//! ## Quick Start
//!
//! ```
//! use docsmith::{
//!     compile, DocumentBuilder, NumberingDefinition, NumberingLevel, Paragraph,
//!     SectionProperties, StyleDefinition, RunProps,
//! };
//!
//! let doc = DocumentBuilder::new()
//!     .style(
//!         StyleDefinition::new("Heading1", "Heading 1")
//!             .based_on("Normal")
//!             .run(RunProps { size: Some(32), bold: Some(true), ..Default::default() }),
//!     )?
//!     .list(NumberingDefinition::new("numbers", vec![NumberingLevel::decimal(0, "%1.")]))?
//!     .add_section(SectionProperties::default())
//!     .add_paragraph(Paragraph::heading(1, "Executive Summary"))?
//!     .add_paragraph(Paragraph::with_text("First point").numbered("numbers", 0))?
//!     .build();
//!
//! let bytes = compile(&doc)?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok::<(), docsmith::Error>(())
//! ```
//!
//! ## Compilation stages
//!
//! 1. Resolve every style's effective properties through its `basedOn` chain
//! 2. Resolve each section's page geometry and lay out its tables
//! 3. Assign list markers in reading order
//! 4. Write the package parts
//! 5. Verify relationships and the manifest, then zip
//!
//! Any failure aborts the compilation; no partial package is returned.
//!
//! ## Features
//!
//! - `async`: [`compile_async`] on the Tokio blocking pool

pub mod builder;
pub mod container;
pub mod docx;
pub mod error;
pub mod layout;
pub mod model;
pub mod options;
pub mod units;
mod xml;

// Re-exports
pub use builder::DocumentBuilder;
pub use docx::{
    LevelFormat, Marker, NumberingDefinition, NumberingLevel, NumberingRegistry, StyleDefinition,
    StyleRegistry,
};
pub use error::{Error, Result};
pub use layout::{LayoutDefaults, ResolvedDocument, TableLayout};
pub use model::{
    Alignment, Block, Border, BorderStyle, Cell, CellBorders, CellMargins, Document, Metadata,
    Orientation, PageMargins, PageSize, Paragraph, ParagraphProps, Row, RunProps, Section,
    SectionProperties, Shading, ShadingPattern, Spacing, Table, TextRun, VerticalAlignment,
};
pub use options::{Compression, PackOptions};
pub use units::WidthSpec;

use log::debug;

/// Compile a document into `.docx` bytes with default options.
///
/// Compiling the same document twice yields identical bytes.
pub fn compile(document: &Document) -> Result<Vec<u8>> {
    compile_with_options(document, &PackOptions::default())
}

/// Compile a document into `.docx` bytes.
///
/// # Example
///
/// ```
/// use docsmith::{compile_with_options, DocumentBuilder, PackOptions, Paragraph, SectionProperties};
///
/// let doc = DocumentBuilder::new()
///     .add_section(SectionProperties::default())
///     .add_paragraph(Paragraph::with_text("Draft"))?
///     .build();
/// let bytes = compile_with_options(&doc, &PackOptions::debug())?;
/// assert!(!bytes.is_empty());
/// # Ok::<(), docsmith::Error>(())
/// ```
pub fn compile_with_options(document: &Document, options: &PackOptions) -> Result<Vec<u8>> {
    debug!(
        "Compiling document: {} sections, {} blocks",
        document.sections().len(),
        document.total_blocks()
    );
    let resolved = ResolvedDocument::resolve(document, &options.layout_defaults())?;
    docx::write_package(&resolved, options)
}

/// Compile a document on the Tokio blocking pool.
#[cfg(feature = "async")]
pub async fn compile_async(document: Document, options: PackOptions) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || compile_with_options(&document, &options))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_compiles() {
        let doc = DocumentBuilder::new()
            .add_section(SectionProperties::default())
            .build();
        let bytes = compile(&doc).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_document_without_sections_compiles() {
        let bytes = compile(&Document::default()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_errors_abort_compilation() {
        let doc = DocumentBuilder::new()
            .add_section(SectionProperties::default().margins(PageMargins::uniform(8000)))
            .build();
        assert!(matches!(
            compile(&doc),
            Err(Error::InvalidPageGeometry(_))
        ));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_compile_async_matches_sync() {
        let doc = DocumentBuilder::new()
            .add_section(SectionProperties::default())
            .add_paragraph(Paragraph::with_text("async"))
            .unwrap()
            .build();
        let sync = compile(&doc).unwrap();
        let async_bytes = compile_async(doc, PackOptions::default()).await.unwrap();
        assert_eq!(sync, async_bytes);
    }
}
