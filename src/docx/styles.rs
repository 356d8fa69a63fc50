//! Paragraph style registry and the styles part.

use crate::error::{Error, Result};
use crate::model::{ParagraphProps, RunProps};
use crate::xml::{XmlWriter, NS_W};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Id of the implicit root style every other style inherits from.
pub const ROOT_STYLE_ID: &str = "Normal";

/// A paragraph style definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Display name (e.g., "Heading 1")
    pub name: String,
    /// Base style; the root style when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
    /// Style applied to the paragraph following this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Show in the quick style gallery
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quick_format: bool,
    /// Run (text) properties
    #[serde(default, skip_serializing_if = "RunProps::is_empty")]
    pub run_props: RunProps,
    /// Paragraph properties
    #[serde(default, skip_serializing_if = "ParagraphProps::is_empty")]
    pub paragraph_props: ParagraphProps,
}

impl StyleDefinition {
    /// Create a style with the given id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            based_on: None,
            next: None,
            quick_format: false,
            run_props: RunProps::default(),
            paragraph_props: ParagraphProps::default(),
        }
    }

    /// Set the base style.
    pub fn based_on(mut self, id: impl Into<String>) -> Self {
        self.based_on = Some(id.into());
        self
    }

    /// Set the follow-on style.
    pub fn next(mut self, id: impl Into<String>) -> Self {
        self.next = Some(id.into());
        self
    }

    /// Mark as a quick style.
    pub fn quick_format(mut self) -> Self {
        self.quick_format = true;
        self
    }

    /// Set run properties.
    pub fn run(mut self, props: RunProps) -> Self {
        self.run_props = props;
        self
    }

    /// Set paragraph properties.
    pub fn paragraph(mut self, props: ParagraphProps) -> Self {
        self.paragraph_props = props;
        self
    }
}

/// A style with its inheritance chain folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveStyle {
    /// The requested style id
    pub id: String,
    /// Style ids from the root down to `id`
    pub chain: Vec<String>,
    /// Flattened run properties
    pub run_props: RunProps,
    /// Flattened paragraph properties
    pub paragraph_props: ParagraphProps,
}

/// Registry of paragraph styles.
///
/// Always contains the root style [`ROOT_STYLE_ID`], which holds the document
/// defaults. Styles iterate in registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StyleRegistryData")]
pub struct StyleRegistry {
    root: StyleDefinition,
    styles: Vec<StyleDefinition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// Serialized form of a [`StyleRegistry`]; the index is rebuilt on load.
#[derive(Deserialize)]
struct StyleRegistryData {
    root: StyleDefinition,
    #[serde(default)]
    styles: Vec<StyleDefinition>,
}

impl TryFrom<StyleRegistryData> for StyleRegistry {
    type Error = Error;

    fn try_from(data: StyleRegistryData) -> Result<Self> {
        let mut registry = StyleRegistry::new();
        registry.set_document_defaults(data.root.run_props, data.root.paragraph_props);
        for style in data.styles {
            registry.register(style)?;
        }
        Ok(registry)
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self {
            root: StyleDefinition::new(ROOT_STYLE_ID, ROOT_STYLE_ID).quick_format(),
            styles: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl StyleRegistry {
    /// Create a registry holding only the root style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style.
    pub fn register(&mut self, style: StyleDefinition) -> Result<()> {
        if self.contains(&style.id) {
            return Err(Error::DuplicateStyleId(style.id));
        }
        self.index.insert(style.id.clone(), self.styles.len());
        self.styles.push(style);
        Ok(())
    }

    /// Set the document-wide defaults carried by the root style.
    pub fn set_document_defaults(&mut self, run: RunProps, paragraph: ParagraphProps) {
        self.root.run_props = run;
        self.root.paragraph_props = paragraph;
    }

    /// Get a style definition by id.
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        if id == ROOT_STYLE_ID {
            return Some(&self.root);
        }
        self.index.get(id).map(|&i| &self.styles[i])
    }

    /// Check whether a style id is known.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The root style.
    pub fn root(&self) -> &StyleDefinition {
        &self.root
    }

    /// Registered styles in registration order, excluding the root.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.iter()
    }

    /// Number of styles including the root.
    pub fn len(&self) -> usize {
        self.styles.len() + 1
    }

    /// Always false; the root style is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Resolve a style id to its flattened properties.
    ///
    /// Walks `based_on` links up to the root, then folds root-first so that
    /// the nearest explicit value wins.
    pub fn resolve(&self, id: &str) -> Result<EffectiveStyle> {
        let mut chain: Vec<&StyleDefinition> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = Some(id);

        while let Some(style_id) = current {
            let style = self
                .get(style_id)
                .ok_or_else(|| Error::UnknownStyleId(style_id.to_string()))?;
            if !visited.insert(style.id.as_str()) {
                let mut ids: Vec<String> = chain.iter().map(|s| s.id.clone()).collect();
                ids.push(style.id.clone());
                return Err(Error::StyleCycleDetected { chain: ids });
            }
            chain.push(style);
            current = match style.based_on.as_deref() {
                Some(base) => Some(base),
                None if style.id != ROOT_STYLE_ID => Some(ROOT_STYLE_ID),
                None => None,
            };
        }

        let mut run_props = RunProps::default();
        let mut paragraph_props = ParagraphProps::default();
        for style in chain.iter().rev() {
            run_props.merge(&style.run_props);
            paragraph_props.merge(&style.paragraph_props);
        }

        Ok(EffectiveStyle {
            id: id.to_string(),
            chain: chain.iter().rev().map(|s| s.id.clone()).collect(),
            run_props,
            paragraph_props,
        })
    }

    /// Resolve every style, failing on the first broken chain or dangling
    /// `next` link.
    pub fn resolve_all(&self) -> Result<Vec<EffectiveStyle>> {
        let all = std::iter::once(&self.root).chain(self.styles.iter());
        for style in all {
            if let Some(next) = style.next.as_deref() {
                if !self.contains(next) {
                    return Err(Error::UnknownStyleId(next.to_string()));
                }
            }
        }
        std::iter::once(&self.root)
            .chain(self.styles.iter())
            .map(|s| self.resolve(&s.id))
            .collect()
    }

    /// Write `word/styles.xml` from already resolved styles.
    pub(crate) fn write_part(&self, resolved: &[EffectiveStyle], pretty: bool) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new(pretty);
        xml.declaration()?;
        xml.start("w:styles", &[("xmlns:w", NS_W)])?;

        xml.start("w:docDefaults", &[])?;
        xml.start("w:rPrDefault", &[])?;
        write_run_props(&mut xml, &self.root.run_props)?;
        xml.end("w:rPrDefault")?;
        xml.start("w:pPrDefault", &[])?;
        write_style_paragraph_props(&mut xml, &self.root.paragraph_props)?;
        xml.end("w:pPrDefault")?;
        xml.end("w:docDefaults")?;

        for effective in resolved {
            let def = self.get(&effective.id).ok_or_else(|| {
                Error::PackageAssembly(format!("resolved style '{}' not registered", effective.id))
            })?;
            let is_root = def.id == ROOT_STYLE_ID;
            let mut attrs = vec![("w:type", "paragraph")];
            if is_root {
                attrs.push(("w:default", "1"));
            }
            attrs.push(("w:styleId", def.id.as_str()));
            xml.start("w:style", &attrs)?;
            xml.val("w:name", &def.name)?;
            if !is_root {
                xml.val("w:basedOn", def.based_on.as_deref().unwrap_or(ROOT_STYLE_ID))?;
            }
            if let Some(ref next) = def.next {
                xml.val("w:next", next)?;
            }
            if def.quick_format {
                xml.empty("w:qFormat", &[])?;
            }
            write_style_paragraph_props(&mut xml, &effective.paragraph_props)?;
            write_run_props(&mut xml, &effective.run_props)?;
            xml.end("w:style")?;
        }

        xml.end("w:styles")?;
        Ok(xml.into_bytes())
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Write a `w:rPr` element; nothing when no property is set.
pub(crate) fn write_run_props(xml: &mut XmlWriter, props: &RunProps) -> Result<()> {
    if props.is_empty() {
        return Ok(());
    }
    xml.start("w:rPr", &[])?;
    if let Some(font) = props.font.as_deref() {
        xml.empty(
            "w:rFonts",
            &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font), ("w:eastAsia", font)],
        )?;
    }
    if let Some(bold) = props.bold {
        xml.val("w:b", on_off(bold))?;
    }
    if let Some(italic) = props.italic {
        xml.val("w:i", on_off(italic))?;
    }
    if let Some(ref color) = props.color {
        xml.val("w:color", color)?;
    }
    if let Some(size) = props.size {
        let size = size.to_string();
        xml.val("w:sz", &size)?;
        xml.val("w:szCs", &size)?;
    }
    if let Some(underline) = props.underline {
        xml.val("w:u", if underline { "single" } else { "none" })?;
    }
    xml.end("w:rPr")
}

fn write_style_paragraph_props(xml: &mut XmlWriter, props: &ParagraphProps) -> Result<()> {
    if props.is_empty() {
        return Ok(());
    }
    xml.start("w:pPr", &[])?;
    if props.spacing_before.is_some() || props.spacing_after.is_some() {
        let before = props.spacing_before.map(|v| v.to_string());
        let after = props.spacing_after.map(|v| v.to_string());
        let mut attrs = Vec::new();
        if let Some(ref b) = before {
            attrs.push(("w:before", b.as_str()));
        }
        if let Some(ref a) = after {
            attrs.push(("w:after", a.as_str()));
        }
        xml.empty("w:spacing", &attrs)?;
    }
    if let Some(alignment) = props.alignment {
        xml.val("w:jc", alignment.ooxml_value())?;
    }
    if let Some(level) = props.outline_level {
        xml.val("w:outlineLvl", &level.to_string())?;
    }
    xml.end("w:pPr")
}
