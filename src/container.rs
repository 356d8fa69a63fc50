//! OPC package assembly over a ZIP archive.
//!
//! A [`Package`] collects named parts and the relationships between them,
//! generates the `[Content_Types].xml` manifest and the `.rels` parts,
//! verifies that every cross-reference lands on a part, and writes the
//! container into memory.

use crate::error::{Error, Result};
use crate::model::Metadata;
use crate::options::Compression;
use crate::xml::XmlWriter;
use log::{debug, trace};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::{Component, Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Content types of the parts this crate writes.
pub mod content_type {
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const WML_DOCUMENT_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const WML_NUMBERING: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
    pub const WML_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const XML: &str = "application/xml";
}

/// Relationship type URIs.
pub mod rel_type {
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
}

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Name of the manifest part.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// A relationship entry of a .rels part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's directory
    pub target: String,
}

/// Relationships of one source part, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its generated id.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.entries.iter().filter(|r| r.rel_type == rel_type).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_xml(&self, pretty: bool) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new(pretty);
        xml.declaration()?;
        xml.start("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
        for rel in &self.entries {
            xml.empty(
                "Relationship",
                &[
                    ("Id", rel.id.as_str()),
                    ("Type", rel.rel_type.as_str()),
                    ("Target", rel.target.as_str()),
                ],
            )?;
        }
        xml.end("Relationships")?;
        Ok(xml.into_bytes())
    }
}

/// A named part with its content type.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part name without the leading slash (e.g., "word/document.xml")
    pub name: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// An OPC package under assembly.
#[derive(Debug, Default)]
pub struct Package {
    parts: Vec<Part>,
    /// Relationships keyed by source part name ("" for the package itself)
    relationships: Vec<(String, Relationships)>,
    pretty_xml: bool,
}

impl Package {
    /// Create an empty package.
    pub fn new(pretty_xml: bool) -> Self {
        Self {
            pretty_xml,
            ..Default::default()
        }
    }

    /// Add a part.
    pub fn add_part(&mut self, name: &str, content_type: &'static str, data: Vec<u8>) {
        trace!("Adding part {} ({} bytes)", name, data.len());
        self.parts.push(Part {
            name: name.to_string(),
            content_type,
            data,
        });
    }

    /// Relate `source` (a part name, or "" for the package) to `target`,
    /// given relative to the source's directory. Returns the relationship id.
    pub fn relate(&mut self, source: &str, rel_type: &str, target: &str) -> String {
        let index = match self.relationships.iter().position(|(s, _)| s == source) {
            Some(i) => i,
            None => {
                self.relationships
                    .push((source.to_string(), Relationships::new()));
                self.relationships.len() - 1
            }
        };
        self.relationships[index].1.add(rel_type, target)
    }

    /// Get a part by name.
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Relationships of a source part.
    pub fn relationships(&self, source: &str) -> Option<&Relationships> {
        self.relationships
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, r)| r)
    }

    /// Name of the .rels part holding the relationships of `source`.
    pub fn rels_part_name(source: &str) -> String {
        if source.is_empty() || source == "/" {
            return "_rels/.rels".to_string();
        }
        let path = Path::new(source);
        let file = path.file_name().unwrap_or_default().to_string_lossy();
        match path.parent().map(|p| p.to_string_lossy()) {
            Some(dir) if !dir.is_empty() => format!("{}/_rels/{}.rels", dir, file),
            _ => format!("_rels/{}.rels", file),
        }
    }

    /// Resolve a relative target against the directory of its source part.
    pub fn resolve_target(source: &str, target: &str) -> String {
        if let Some(stripped) = target.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(source).parent().unwrap_or(Path::new(""));
        let mut result = PathBuf::from(base_dir);
        for component in Path::new(target).components() {
            match component {
                Component::ParentDir => {
                    result.pop();
                }
                Component::Normal(c) => result.push(c),
                _ => {}
            }
        }
        result.to_string_lossy().replace('\\', "/")
    }

    /// Check that part names are unique, every relationship source and
    /// target names a part, and the package has a main document.
    pub fn verify(&self) -> Result<()> {
        let mut names = HashSet::new();
        for part in &self.parts {
            if !names.insert(part.name.as_str()) {
                return Err(Error::PackageAssembly(format!(
                    "part {} written twice",
                    part.name
                )));
            }
        }

        for (source, rels) in &self.relationships {
            if !source.is_empty() && !names.contains(source.as_str()) {
                return Err(Error::PackageAssembly(format!(
                    "relationships declared for missing part {}",
                    source
                )));
            }
            for rel in rels.iter() {
                let resolved = Self::resolve_target(source, &rel.target);
                if !names.contains(resolved.as_str()) {
                    return Err(Error::PackageAssembly(format!(
                        "relationship {} of '{}' targets missing part {}",
                        rel.id, source, resolved
                    )));
                }
            }
        }

        let main = self
            .relationships("")
            .map(|rels| rels.get_by_type(rel_type::OFFICE_DOCUMENT).len())
            .unwrap_or(0);
        if main != 1 {
            return Err(Error::PackageAssembly(format!(
                "expected one main document relationship, found {}",
                main
            )));
        }
        Ok(())
    }

    /// Generate `[Content_Types].xml`: defaults for rels and xml, one
    /// override per part.
    pub fn manifest(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new(self.pretty_xml);
        xml.declaration()?;
        xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        xml.empty(
            "Default",
            &[
                ("Extension", "rels"),
                ("ContentType", content_type::OPC_RELATIONSHIPS),
            ],
        )?;
        xml.empty(
            "Default",
            &[("Extension", "xml"), ("ContentType", content_type::XML)],
        )?;
        for part in &self.parts {
            let part_name = format!("/{}", part.name);
            xml.empty(
                "Override",
                &[
                    ("PartName", part_name.as_str()),
                    ("ContentType", part.content_type),
                ],
            )?;
        }
        xml.end("Types")?;
        Ok(xml.into_bytes())
    }

    /// Verify the package and write the ZIP container into memory.
    ///
    /// Entries carry a fixed timestamp so identical packages produce
    /// identical bytes.
    pub fn finish(self, compression: Compression) -> Result<Vec<u8>> {
        self.verify()?;

        let options = SimpleFileOptions::default()
            .compression_method(compression.method())
            .last_modified_time(zip::DateTime::default());
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file(CONTENT_TYPES_PART, options)?;
        zip.write_all(&self.manifest()?)?;

        for (source, rels) in &self.relationships {
            if source.is_empty() {
                zip.start_file(Self::rels_part_name(source), options)?;
                zip.write_all(&rels.to_xml(self.pretty_xml)?)?;
            }
        }

        for part in &self.parts {
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }

        for (source, rels) in &self.relationships {
            if !source.is_empty() {
                zip.start_file(Self::rels_part_name(source), options)?;
                zip.write_all(&rels.to_xml(self.pretty_xml)?)?;
            }
        }

        let bytes = zip.finish()?.into_inner();
        debug!(
            "Wrote package: {} parts, {} relationship parts, {} bytes",
            self.parts.len(),
            self.relationships.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Write `docProps/core.xml` from document metadata.
pub fn write_core_properties(meta: &Metadata, pretty: bool) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new(pretty);
    xml.declaration()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    if let Some(ref title) = meta.title {
        xml.text_element("dc:title", &[], title)?;
    }
    if let Some(ref subject) = meta.subject {
        xml.text_element("dc:subject", &[], subject)?;
    }
    if let Some(ref creator) = meta.creator {
        xml.text_element("dc:creator", &[], creator)?;
    }
    if !meta.keywords.is_empty() {
        xml.text_element("cp:keywords", &[], &meta.keywords.join(", "))?;
    }
    if let Some(ref description) = meta.description {
        xml.text_element("dc:description", &[], description)?;
    }
    xml.end("cp:coreProperties")?;
    Ok(xml.into_bytes())
}
