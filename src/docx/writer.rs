//! WordprocessingML serialization of a resolved document.

use crate::container::{content_type, rel_type, write_core_properties, Package};
use crate::docx::styles::write_run_props;
use crate::error::{Error, Result};
use crate::layout::{
    ResolvedBlock, ResolvedBorders, ResolvedCell, ResolvedDocument, ResolvedGeometry,
    ResolvedParagraph, ResolvedTable,
};
use crate::model::{Border, TextRun};
use crate::options::PackOptions;
use crate::xml::{sanitize_text, XmlWriter, NS_R, NS_W};
use log::{debug, trace};

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const STYLES_PART: &str = "word/styles.xml";
pub(crate) const NUMBERING_PART: &str = "word/numbering.xml";
pub(crate) const CORE_PART: &str = "docProps/core.xml";

/// Write every part of a resolved document and assemble the package.
pub(crate) fn write_package(resolved: &ResolvedDocument<'_>, options: &PackOptions) -> Result<Vec<u8>> {
    let document = resolved.document;
    let pretty = options.pretty_xml;
    let mut package = Package::new(pretty);

    let body = DocumentWriter::new(resolved, pretty).write()?;
    package.add_part(DOCUMENT_PART, content_type::WML_DOCUMENT_MAIN, body);
    package.relate("", rel_type::OFFICE_DOCUMENT, DOCUMENT_PART);

    let styles = document.styles().write_part(&resolved.styles, pretty)?;
    package.add_part(STYLES_PART, content_type::WML_STYLES, styles);
    package.relate(DOCUMENT_PART, rel_type::STYLES, "styles.xml");

    if !document.numbering().is_empty() {
        let numbering = document.numbering().write_part(pretty)?;
        package.add_part(NUMBERING_PART, content_type::WML_NUMBERING, numbering);
        package.relate(DOCUMENT_PART, rel_type::NUMBERING, "numbering.xml");
    }

    if !document.metadata().is_empty() {
        let core = write_core_properties(document.metadata(), pretty)?;
        package.add_part(CORE_PART, content_type::OPC_CORE_PROPERTIES, core);
        package.relate("", rel_type::CORE_PROPERTIES, CORE_PART);
    }

    debug!("Wrote {} parts", package.parts().len());
    package.finish(options.compression)
}

/// Streams `word/document.xml`.
struct DocumentWriter<'r, 'a> {
    resolved: &'r ResolvedDocument<'a>,
    xml: XmlWriter,
    paragraphs: usize,
    tables: usize,
}

impl<'r, 'a> DocumentWriter<'r, 'a> {
    fn new(resolved: &'r ResolvedDocument<'a>, pretty: bool) -> Self {
        Self {
            resolved,
            xml: XmlWriter::new(pretty),
            paragraphs: 0,
            tables: 0,
        }
    }

    fn write(mut self) -> Result<Vec<u8>> {
        self.xml.declaration()?;
        self.xml
            .start("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
        self.xml.start("w:body", &[])?;

        let resolved = self.resolved;
        let last = resolved.sections.len().saturating_sub(1);
        for (index, section) in resolved.sections.iter().enumerate() {
            self.write_blocks(&section.blocks)?;
            if index == last {
                self.write_section_properties(&section.geometry)?;
            } else {
                // A section that is not the last ends with a paragraph carrying its properties
                self.xml.start("w:p", &[])?;
                self.xml.start("w:pPr", &[])?;
                self.write_section_properties(&section.geometry)?;
                self.xml.end("w:pPr")?;
                self.xml.end("w:p")?;
            }
        }

        self.xml.end("w:body")?;
        self.xml.end("w:document")?;
        trace!(
            "document.xml: {} paragraphs, {} tables",
            self.paragraphs,
            self.tables
        );
        Ok(self.xml.into_bytes())
    }

    fn write_blocks(&mut self, blocks: &[ResolvedBlock<'_>]) -> Result<()> {
        for block in blocks {
            match block {
                ResolvedBlock::Paragraph(p) => self.write_paragraph(p)?,
                ResolvedBlock::Table(t) => self.write_table(t)?,
                ResolvedBlock::PageBreak => self.write_page_break()?,
            }
        }
        Ok(())
    }

    fn write_paragraph(&mut self, resolved: &ResolvedParagraph<'_>) -> Result<()> {
        let para = resolved.paragraph;
        self.paragraphs += 1;

        if let Some(ref style_id) = para.style_id {
            if !self.resolved.document.styles().contains(style_id) {
                return Err(Error::PackageAssembly(format!(
                    "paragraph references unwritten style {}",
                    style_id
                )));
            }
        }
        let marker = match (&para.numbering, &resolved.marker) {
            (Some(numbering), None) => {
                return Err(Error::PackageAssembly(format!(
                    "list paragraph ({}, level {}) has no marker",
                    numbering.reference, numbering.level
                )));
            }
            (_, marker) => marker.as_ref(),
        };

        self.xml.start("w:p", &[])?;

        let has_props = para.style_id.is_some()
            || marker.is_some()
            || para.spacing.is_some()
            || para.alignment.is_some();
        if has_props {
            self.xml.start("w:pPr", &[])?;
            if let Some(ref style_id) = para.style_id {
                self.xml.val("w:pStyle", style_id)?;
            }
            if let Some(marker) = marker {
                self.xml.start("w:numPr", &[])?;
                self.xml.val("w:ilvl", &marker.level.to_string())?;
                self.xml.val("w:numId", &marker.num_id.to_string())?;
                self.xml.end("w:numPr")?;
            }
            if let Some(spacing) = para.spacing {
                let before = spacing.before.map(|v| v.to_string());
                let after = spacing.after.map(|v| v.to_string());
                let line = spacing.line.map(|v| v.to_string());
                let mut attrs = Vec::new();
                if let Some(ref v) = before {
                    attrs.push(("w:before", v.as_str()));
                }
                if let Some(ref v) = after {
                    attrs.push(("w:after", v.as_str()));
                }
                if let Some(ref v) = line {
                    attrs.push(("w:line", v.as_str()));
                    attrs.push(("w:lineRule", "auto"));
                }
                self.xml.empty("w:spacing", &attrs)?;
            }
            if let Some(marker) = marker {
                let left = marker.indent.left.to_string();
                let hanging = marker.indent.hanging.to_string();
                self.xml.empty(
                    "w:ind",
                    &[("w:left", left.as_str()), ("w:hanging", hanging.as_str())],
                )?;
            }
            if let Some(alignment) = para.alignment {
                self.xml.val("w:jc", alignment.ooxml_value())?;
            }
            self.xml.end("w:pPr")?;
        }

        for run in &para.runs {
            self.write_run(run)?;
        }

        self.xml.end("w:p")
    }

    fn write_run(&mut self, run: &TextRun) -> Result<()> {
        let text = sanitize_text(&run.text);
        if text.is_empty() {
            return Ok(());
        }

        self.xml.start("w:r", &[])?;
        write_run_props(&mut self.xml, &run.props)?;

        let mut segment = String::new();
        for c in text.chars() {
            match c {
                '\n' | '\t' => {
                    self.flush_text(&mut segment)?;
                    if c == '\n' {
                        self.xml.empty("w:br", &[])?;
                    } else {
                        self.xml.empty("w:tab", &[])?;
                    }
                }
                '\r' => {}
                _ => segment.push(c),
            }
        }
        self.flush_text(&mut segment)?;

        self.xml.end("w:r")
    }

    fn flush_text(&mut self, segment: &mut String) -> Result<()> {
        if segment.is_empty() {
            return Ok(());
        }
        self.xml
            .text_element("w:t", &[("xml:space", "preserve")], segment)?;
        segment.clear();
        Ok(())
    }

    fn write_page_break(&mut self) -> Result<()> {
        self.xml.start("w:p", &[])?;
        self.xml.start("w:r", &[])?;
        self.xml.empty("w:br", &[("w:type", "page")])?;
        self.xml.end("w:r")?;
        self.xml.end("w:p")
    }

    fn write_table(&mut self, table: &ResolvedTable<'_>) -> Result<()> {
        self.tables += 1;
        self.xml.start("w:tbl", &[])?;

        self.xml.start("w:tblPr", &[])?;
        let width = table.width.to_string();
        self.xml
            .empty("w:tblW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
        self.xml.empty("w:tblLayout", &[("w:type", "fixed")])?;
        self.xml.end("w:tblPr")?;

        self.xml.start("w:tblGrid", &[])?;
        for column in table.grid {
            let w = column.to_string();
            self.xml.empty("w:gridCol", &[("w:w", w.as_str())])?;
        }
        self.xml.end("w:tblGrid")?;

        for row in &table.rows {
            self.xml.start("w:tr", &[])?;
            if row.is_header {
                self.xml.start("w:trPr", &[])?;
                self.xml.empty("w:tblHeader", &[])?;
                self.xml.end("w:trPr")?;
            }
            for cell in &row.cells {
                self.write_cell(cell)?;
            }
            self.xml.end("w:tr")?;
        }

        self.xml.end("w:tbl")
    }

    fn write_cell(&mut self, cell: &ResolvedCell<'_>) -> Result<()> {
        self.xml.start("w:tc", &[])?;
        self.xml.start("w:tcPr", &[])?;

        let width = cell.width.to_string();
        self.xml
            .empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
        if cell.col_span > 1 {
            self.xml.val("w:gridSpan", &cell.col_span.to_string())?;
        }
        self.write_cell_borders(&cell.borders)?;
        if let Some(shading) = cell.shading {
            let color = shading.color.as_deref().unwrap_or("auto");
            self.xml.empty(
                "w:shd",
                &[
                    ("w:val", shading.pattern.ooxml_value()),
                    ("w:color", color),
                    ("w:fill", shading.fill.as_str()),
                ],
            )?;
        }
        self.xml.start("w:tcMar", &[])?;
        for (name, value) in [
            ("w:top", cell.margins.top),
            ("w:left", cell.margins.left),
            ("w:bottom", cell.margins.bottom),
            ("w:right", cell.margins.right),
        ] {
            let w = value.to_string();
            self.xml.empty(name, &[("w:w", w.as_str()), ("w:type", "dxa")])?;
        }
        self.xml.end("w:tcMar")?;
        self.xml
            .val("w:vAlign", cell.vertical_alignment.ooxml_value())?;
        self.xml.end("w:tcPr")?;

        self.write_blocks(&cell.blocks)?;
        // A cell must end with a paragraph
        if !matches!(
            cell.blocks.last(),
            Some(ResolvedBlock::Paragraph(_) | ResolvedBlock::PageBreak)
        ) {
            self.xml.empty("w:p", &[])?;
        }

        self.xml.end("w:tc")
    }

    fn write_cell_borders(&mut self, borders: &ResolvedBorders) -> Result<()> {
        if borders.is_empty() {
            return Ok(());
        }
        self.xml.start("w:tcBorders", &[])?;
        for (name, border) in [
            ("w:top", &borders.top),
            ("w:left", &borders.left),
            ("w:bottom", &borders.bottom),
            ("w:right", &borders.right),
        ] {
            if let Some(border) = border {
                self.write_border(name, border)?;
            }
        }
        self.xml.end("w:tcBorders")
    }

    fn write_border(&mut self, name: &str, border: &Border) -> Result<()> {
        let size = border.size.to_string();
        self.xml.empty(
            name,
            &[
                ("w:val", border.style.ooxml_value()),
                ("w:sz", size.as_str()),
                ("w:space", "0"),
                ("w:color", border.color.as_str()),
            ],
        )
    }

    fn write_section_properties(&mut self, geometry: &ResolvedGeometry) -> Result<()> {
        self.xml.start("w:sectPr", &[])?;

        let w = geometry.page_width.to_string();
        let h = geometry.page_height.to_string();
        self.xml.empty(
            "w:pgSz",
            &[
                ("w:w", w.as_str()),
                ("w:h", h.as_str()),
                ("w:orient", geometry.orientation.ooxml_value()),
            ],
        )?;

        let m = &geometry.margins;
        let values = [m.top, m.right, m.bottom, m.left, m.header, m.footer, m.gutter].map(|v| v.to_string());
        let names = [
            "w:top", "w:right", "w:bottom", "w:left", "w:header", "w:footer", "w:gutter",
        ];
        let attrs: Vec<(&str, &str)> = names
            .iter()
            .zip(values.iter())
            .map(|(n, v)| (*n, v.as_str()))
            .collect();
        self.xml.empty("w:pgMar", &attrs)?;

        self.xml.end("w:sectPr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutDefaults;
    use crate::model::{
        Border, Cell, CellBorders, Paragraph, Row, SectionProperties, Shading, Table,
    };
    use crate::DocumentBuilder;

    fn document_xml(builder: DocumentBuilder) -> String {
        let doc = builder.build();
        let resolved = ResolvedDocument::resolve(&doc, &LayoutDefaults::default()).unwrap();
        String::from_utf8(DocumentWriter::new(&resolved, false).write().unwrap()).unwrap()
    }

    fn section() -> DocumentBuilder {
        DocumentBuilder::new().add_section(SectionProperties::default())
    }

    #[test]
    fn test_run_text_breaks_and_tabs() {
        let xml = document_xml(
            section()
                .add_paragraph(Paragraph::with_text("a\tb\nc & d"))
                .unwrap(),
        );
        assert!(xml.contains(
            r#"<w:r><w:t xml:space="preserve">a</w:t><w:tab/><w:t xml:space="preserve">b</w:t><w:br/><w:t xml:space="preserve">c &amp; d</w:t></w:r>"#
        ));
    }

    #[test]
    fn test_paragraph_properties() {
        let para = Paragraph::new()
            .run(crate::model::TextRun::plain("Title").bold().size(32))
            .spacing(crate::model::Spacing::after(240))
            .align(crate::model::Alignment::Center);
        let xml = document_xml(section().add_paragraph(para).unwrap());
        assert!(xml.contains(
            r#"<w:pPr><w:spacing w:after="240"/><w:jc w:val="center"/></w:pPr>"#
        ));
        assert!(xml.contains(r#"<w:rPr><w:b w:val="1"/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr>"#));
    }

    #[test]
    fn test_section_properties_placement() {
        let xml = document_xml(
            section()
                .add_paragraph(Paragraph::with_text("first"))
                .unwrap()
                .add_section(SectionProperties::default().landscape())
                .add_paragraph(Paragraph::with_text("second"))
                .unwrap(),
        );
        // First section closes with a paragraph-level sectPr
        assert!(xml.contains(r#"<w:p><w:pPr><w:sectPr><w:pgSz w:w="12240" w:h="15840" w:orient="portrait"/>"#));
        // Final section's sectPr is the last child of the body
        assert!(xml.ends_with(
            r#"<w:pgSz w:w="15840" w:h="12240" w:orient="landscape"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#
        ));
    }

    #[test]
    fn test_table_cells() {
        let table = Table::new(vec![2800, 6560])
            .borders(CellBorders::all(Border::single(1, "CCCCCC")))
            .row(Row::header(vec![
                Cell::with_text("Component").shading(Shading::fill("D5E8F0")),
                Cell::new(),
            ]));
        let xml = document_xml(section().add_table(table).unwrap());
        assert!(xml.contains(r#"<w:tblGrid><w:gridCol w:w="2800"/><w:gridCol w:w="6560"/></w:tblGrid>"#));
        assert!(xml.contains(r#"<w:trPr><w:tblHeader/></w:trPr>"#));
        assert!(xml.contains(r#"<w:tcW w:w="2800" w:type="dxa"/>"#));
        assert!(xml.contains(r#"<w:top w:val="single" w:sz="1" w:space="0" w:color="CCCCCC"/>"#));
        assert!(xml.contains(r#"<w:shd w:val="clear" w:color="auto" w:fill="D5E8F0"/>"#));
        // Empty cell still holds a paragraph
        assert!(xml.contains(r#"<w:vAlign w:val="top"/></w:tcPr><w:p/></w:tc>"#));
    }

    #[test]
    fn test_page_break() {
        let xml = document_xml(section().add_page_break().unwrap());
        assert!(xml.contains(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#));
    }
}
