//! Content tree builder.

use crate::docx::numbering::NumberingDefinition;
use crate::docx::styles::StyleDefinition;
use crate::error::{Error, Result};
use crate::model::{
    Block, Document, Metadata, Paragraph, ParagraphProps, RunProps, Section, SectionProperties,
    Table,
};
use log::trace;

/// Builds a [`Document`] section by section.
///
/// Styles and lists must be registered before the content that references
/// them: every paragraph is checked when it is added, including paragraphs
/// nested inside table cells.
///
/// # Example
///
/// ```
/// use docsmith::{DocumentBuilder, Paragraph, SectionProperties};
///
/// let doc = DocumentBuilder::new()
///     .add_section(SectionProperties::default())
///     .add_paragraph(Paragraph::with_text("Hello"))?
///     .build();
/// assert_eq!(doc.total_blocks(), 1);
/// # Ok::<(), docsmith::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a paragraph style.
    pub fn style(mut self, style: StyleDefinition) -> Result<Self> {
        self.document.styles.register(style)?;
        Ok(self)
    }

    /// Set the run and paragraph defaults every style inherits.
    pub fn document_defaults(mut self, run: RunProps, paragraph: ParagraphProps) -> Self {
        self.document.styles.set_document_defaults(run, paragraph);
        self
    }

    /// Register a list definition.
    pub fn list(mut self, definition: NumberingDefinition) -> Result<Self> {
        self.document.numbering.define_list(definition)?;
        Ok(self)
    }

    /// Set document metadata.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.document.metadata = metadata;
        self
    }

    /// Open a new section; subsequent content goes into it.
    pub fn add_section(mut self, properties: SectionProperties) -> Self {
        self.document.sections.push(Section::new(properties));
        trace!("Opened section {}", self.document.sections.len());
        self
    }

    /// Append a paragraph to the current section.
    pub fn add_paragraph(self, paragraph: Paragraph) -> Result<Self> {
        self.validate_paragraph(&paragraph)?;
        self.push(Block::Paragraph(paragraph))
    }

    /// Append a table to the current section.
    pub fn add_table(self, table: Table) -> Result<Self> {
        self.validate_table(&table)?;
        self.push(Block::Table(table))
    }

    /// Append a page break to the current section.
    pub fn add_page_break(self) -> Result<Self> {
        self.push(Block::PageBreak)
    }

    /// Finish building.
    pub fn build(self) -> Document {
        self.document
    }

    fn push(mut self, block: Block) -> Result<Self> {
        let section = self
            .document
            .sections
            .last_mut()
            .ok_or(Error::MissingSection)?;
        section.children.push(block);
        Ok(self)
    }

    fn validate_paragraph(&self, paragraph: &Paragraph) -> Result<()> {
        if let Some(ref style_id) = paragraph.style_id {
            if !self.document.styles.contains(style_id) {
                return Err(Error::UnknownStyleReference(style_id.clone()));
            }
        }
        if let Some(ref numbering) = paragraph.numbering {
            self.document
                .numbering
                .level(&numbering.reference, numbering.level)?;
        }
        Ok(())
    }

    fn validate_table(&self, table: &Table) -> Result<()> {
        for row in &table.rows {
            for cell in &row.cells {
                for block in &cell.children {
                    match block {
                        Block::Paragraph(p) => self.validate_paragraph(p)?,
                        Block::Table(t) => self.validate_table(t)?,
                        Block::PageBreak => {}
                    }
                }
            }
        }
        Ok(())
    }
}
