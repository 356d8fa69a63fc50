//! Document model structures.

use super::{Paragraph, SectionProperties, Table};
use crate::docx::numbering::NumberingRegistry;
use crate::docx::styles::StyleRegistry;
use serde::{Deserialize, Serialize};

/// Document metadata written to docProps/core.xml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Document author/creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Document description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Keywords/tags
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,
}

impl Metadata {
    /// Check if no metadata field is set.
    pub fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }
}

/// A block-level content node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// A page break
    PageBreak,
}

impl Block {
    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.plain_text(),
            Block::Table(t) => t.plain_text(),
            Block::PageBreak => String::new(),
        }
    }
}

/// A document section with its own page geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Page setup
    #[serde(default)]
    pub properties: SectionProperties,

    /// Content blocks
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Section {
    /// Create a new empty section.
    pub fn new(properties: SectionProperties) -> Self {
        Self {
            properties,
            children: Vec::new(),
        }
    }

    /// Check if this section is empty.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get the number of content blocks.
    pub fn len(&self) -> usize {
        self.children.len()
    }
}

/// A complete document description, ready for compilation.
///
/// Built with [`crate::DocumentBuilder`]; immutable afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Document metadata
    pub(crate) metadata: Metadata,

    /// Paragraph styles
    pub(crate) styles: StyleRegistry,

    /// List definitions
    pub(crate) numbering: NumberingRegistry,

    /// Sections in reading order
    pub(crate) sections: Vec<Section>,
}

impl Document {
    /// Document metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Paragraph style registry.
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// List definition registry.
    pub fn numbering(&self) -> &NumberingRegistry {
        &self.numbering
    }

    /// Sections in reading order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get the total number of content blocks across all sections.
    pub fn total_blocks(&self) -> usize {
        self.sections.iter().map(|s| s.len()).sum()
    }

    /// Check if the document has no content.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.is_empty())
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a document previously dumped with [`Document::to_json`].
    ///
    /// Registries are rebuilt, so duplicate ids or malformed list levels are
    /// rejected. Paragraph references are checked at compile time.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Row, TextRun};

    #[test]
    fn test_block_plain_text() {
        let para = Block::Paragraph(Paragraph::with_runs(vec![
            TextRun::plain("Hello, "),
            TextRun::plain("World").bold(),
            TextRun::plain("!"),
        ]));
        assert_eq!(para.plain_text(), "Hello, World!");
        assert_eq!(Block::PageBreak.plain_text(), "");

        let table = Block::Table(
            Table::new(vec![1000, 1000]).row(Row::new(vec![Cell::with_text("A1"), Cell::with_text("B1")])),
        );
        assert!(table.plain_text().contains("A1\tB1"));
    }

    #[test]
    fn test_block_serialization_is_tagged() {
        let json = serde_json::to_string(&Block::PageBreak).unwrap();
        assert_eq!(json, r#"{"type":"PageBreak"}"#);

        let block: Block = serde_json::from_str(r#"{"type":"Paragraph","runs":[{"text":"x"}]}"#).unwrap();
        assert_eq!(block.plain_text(), "x");
    }

    #[test]
    fn test_json_dump_reloads() {
        use crate::docx::{NumberingDefinition, NumberingLevel, StyleDefinition};

        let doc = crate::DocumentBuilder::new()
            .style(StyleDefinition::new("Lead", "Lead").based_on("Normal"))
            .unwrap()
            .list(NumberingDefinition::new("steps", vec![NumberingLevel::decimal(0, "%1.")]))
            .unwrap()
            .add_section(SectionProperties::default())
            .add_paragraph(Paragraph::with_text("one").numbered("steps", 0))
            .unwrap()
            .add_paragraph(Paragraph::with_text("lead").style("Lead"))
            .unwrap()
            .build();

        let reloaded = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert!(reloaded.styles().contains("Lead"));
        assert_eq!(reloaded.numbering().num_id("steps"), Some(1));
        assert_eq!(
            crate::compile(&reloaded).unwrap(),
            crate::compile(&doc).unwrap()
        );
    }

    #[test]
    fn test_json_rejects_duplicate_styles() {
        let json = r#"{
            "styles": {
                "root": {"id": "Normal", "name": "Normal"},
                "styles": [{"id": "A", "name": "A"}, {"id": "A", "name": "A"}]
            }
        }"#;
        let err = Document::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate style id: A"));
    }

    #[test]
    fn test_metadata_is_empty() {
        assert!(Metadata::default().is_empty());
        let meta = Metadata {
            title: Some("Proposal".into()),
            ..Default::default()
        };
        assert!(!meta.is_empty());
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("subject"));
    }
}
