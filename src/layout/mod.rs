//! Layout resolution.
//!
//! Turns a [`Document`] into a [`ResolvedDocument`]: effective styles, absolute
//! page geometry per section, absolute table layout, and list markers
//! assigned in reading order. The resolved tree borrows from the document and
//! is what the package writer serializes.

pub mod geometry;
pub mod table;

pub use geometry::ResolvedGeometry;
pub use table::{
    ResolvedBorders, ResolvedCell, ResolvedMargins, ResolvedRow, ResolvedTable, TableLayout,
};

use crate::docx::numbering::{ListCounters, Marker};
use crate::docx::styles::EffectiveStyle;
use crate::error::Result;
use crate::model::{Block, Document, Paragraph};
use log::debug;

/// Layout parameters that are not part of the document description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutDefaults {
    /// Cell margins used when neither the cell nor its table sets one
    pub cell_margins: ResolvedMargins,
}

/// A paragraph together with its list marker, once assigned.
#[derive(Debug, Clone)]
pub struct ResolvedParagraph<'a> {
    pub paragraph: &'a Paragraph,
    pub marker: Option<Marker>,
}

/// A laid-out block.
#[derive(Debug, Clone)]
pub enum ResolvedBlock<'a> {
    Paragraph(ResolvedParagraph<'a>),
    Table(ResolvedTable<'a>),
    PageBreak,
}

/// A section with its absolute geometry.
#[derive(Debug, Clone)]
pub struct ResolvedSection<'a> {
    pub geometry: ResolvedGeometry,
    pub blocks: Vec<ResolvedBlock<'a>>,
}

/// A fully resolved document, ready to serialize.
#[derive(Debug, Clone)]
pub struct ResolvedDocument<'a> {
    pub document: &'a Document,
    /// Effective styles, root first, then registration order
    pub styles: Vec<EffectiveStyle>,
    pub sections: Vec<ResolvedSection<'a>>,
}

impl<'a> ResolvedDocument<'a> {
    /// Resolve styles, geometry, tables and list markers.
    pub fn resolve(document: &'a Document, defaults: &LayoutDefaults) -> Result<Self> {
        let styles = document.styles().resolve_all()?;
        debug!("Resolved {} styles", styles.len());

        let mut sections = Vec::with_capacity(document.sections().len());
        for section in document.sections() {
            let geometry = geometry::resolve(&section.properties)?;
            let blocks = layout_blocks(&section.children, geometry.content_width, defaults)?;
            sections.push(ResolvedSection { geometry, blocks });
        }
        debug!("Laid out {} sections", sections.len());

        let mut counters = document.numbering().counters();
        let mut assigned = 0usize;
        for section in &mut sections {
            assigned += assign_markers(&mut section.blocks, &mut counters)?;
        }
        debug!("Assigned {} list markers", assigned);

        Ok(Self {
            document,
            styles,
            sections,
        })
    }

    /// Render the resolved content as plain text, one line per paragraph,
    /// list items prefixed with their markers and table cells separated by
    /// tabs.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            render_blocks(&section.blocks, &mut out);
        }
        out
    }
}

/// Lay out a sequence of blocks against the available width.
pub(crate) fn layout_blocks<'a>(
    blocks: &'a [Block],
    available_width: u32,
    defaults: &LayoutDefaults,
) -> Result<Vec<ResolvedBlock<'a>>> {
    blocks
        .iter()
        .map(|block| {
            Ok(match block {
                Block::Paragraph(paragraph) => ResolvedBlock::Paragraph(ResolvedParagraph {
                    paragraph,
                    marker: None,
                }),
                Block::Table(table) => {
                    ResolvedBlock::Table(TableLayout::resolve(table, available_width, defaults)?)
                }
                Block::PageBreak => ResolvedBlock::PageBreak,
            })
        })
        .collect()
}

/// Walk blocks in reading order (rows, then cells, then cell content) and
/// request a marker for every list paragraph.
fn assign_markers(blocks: &mut [ResolvedBlock<'_>], counters: &mut ListCounters<'_>) -> Result<usize> {
    let mut assigned = 0;
    for block in blocks {
        match block {
            ResolvedBlock::Paragraph(resolved) => {
                if let Some(numbering) = &resolved.paragraph.numbering {
                    resolved.marker =
                        Some(counters.next_marker(&numbering.reference, numbering.level)?);
                    assigned += 1;
                }
            }
            ResolvedBlock::Table(table) => {
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        assigned += assign_markers(&mut cell.blocks, counters)?;
                    }
                }
            }
            ResolvedBlock::PageBreak => {}
        }
    }
    Ok(assigned)
}

fn render_blocks(blocks: &[ResolvedBlock<'_>], out: &mut String) {
    for block in blocks {
        match block {
            ResolvedBlock::Paragraph(resolved) => {
                if let Some(marker) = &resolved.marker {
                    out.push_str(&marker.text);
                    out.push(' ');
                }
                out.push_str(&resolved.paragraph.plain_text());
                out.push('\n');
            }
            ResolvedBlock::Table(table) => {
                for row in &table.rows {
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|cell| {
                            let mut text = String::new();
                            render_blocks(&cell.blocks, &mut text);
                            text.trim_end().replace('\n', " ")
                        })
                        .collect();
                    out.push_str(&cells.join("\t"));
                    out.push('\n');
                }
            }
            ResolvedBlock::PageBreak => out.push('\u{c}'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::numbering::{NumberingDefinition, NumberingLevel};
    use crate::model::{Cell, Row, SectionProperties, Table};
    use crate::DocumentBuilder;

    fn lists() -> Vec<NumberingDefinition> {
        vec![
            NumberingDefinition::new("bullets", vec![NumberingLevel::bullet(0, "•")]),
            NumberingDefinition::new(
                "numbers",
                vec![
                    NumberingLevel::decimal(0, "%1."),
                    NumberingLevel::decimal(1, "%1.%2."),
                ],
            ),
        ]
    }

    fn builder() -> DocumentBuilder {
        let mut builder = DocumentBuilder::new();
        for list in lists() {
            builder = builder.list(list).unwrap();
        }
        builder.add_section(SectionProperties::default())
    }

    #[test]
    fn test_markers_follow_reading_order() {
        let table = Table::new(vec![4000]).row(Row::new(vec![Cell::with_paragraph(
            Paragraph::with_text("in table").numbered("numbers", 0),
        )]));
        let doc = builder()
            .add_paragraph(Paragraph::with_text("first").numbered("numbers", 0))
            .unwrap()
            .add_table(table)
            .unwrap()
            .add_paragraph(Paragraph::with_text("nested").numbered("numbers", 1))
            .unwrap()
            .add_paragraph(Paragraph::with_text("point").numbered("bullets", 0))
            .unwrap()
            .build();

        let resolved = ResolvedDocument::resolve(&doc, &LayoutDefaults::default()).unwrap();
        assert_eq!(
            resolved.plain_text(),
            "1. first\n2. in table\n2.1. nested\n• point\n"
        );
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let doc = builder()
            .add_paragraph(Paragraph::with_text("one").numbered("numbers", 0))
            .unwrap()
            .add_paragraph(Paragraph::with_text("two").numbered("numbers", 0))
            .unwrap()
            .build();
        let defaults = LayoutDefaults::default();
        let first = ResolvedDocument::resolve(&doc, &defaults).unwrap().plain_text();
        let second = ResolvedDocument::resolve(&doc, &defaults).unwrap().plain_text();
        assert_eq!(first, "1. one\n2. two\n");
        assert_eq!(first, second);
    }

    #[test]
    fn test_sections_use_own_geometry() {
        let narrow = SectionProperties::default()
            .margins(crate::model::PageMargins::uniform(3000));
        let table = Table::new(vec![9000]).row(Row::new(vec![Cell::with_text("wide")]));
        let doc = builder()
            .add_table(table.clone())
            .unwrap()
            .add_section(narrow)
            .add_table(table)
            .unwrap()
            .build();

        let err = ResolvedDocument::resolve(&doc, &LayoutDefaults::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::TableWidthOverflow {
                width: 9000,
                available: 6240
            }
        ));
    }
}
