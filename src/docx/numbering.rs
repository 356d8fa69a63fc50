//! List (numbering) definitions, per-compilation counters and the numbering part.

use crate::error::{Error, Result};
use crate::model::Alignment;
use crate::xml::{XmlWriter, NS_W};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deepest level WordprocessingML allows (levels 0-8).
pub const MAX_LIST_LEVELS: usize = 9;

/// Marker format of a list level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelFormat {
    Bullet,
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
}

impl LevelFormat {
    pub(crate) fn ooxml_value(self) -> &'static str {
        match self {
            LevelFormat::Bullet => "bullet",
            LevelFormat::Decimal => "decimal",
            LevelFormat::LowerLetter => "lowerLetter",
            LevelFormat::UpperLetter => "upperLetter",
            LevelFormat::LowerRoman => "lowerRoman",
            LevelFormat::UpperRoman => "upperRoman",
        }
    }

    /// Check if this format counts items.
    pub fn is_ordered(self) -> bool {
        !matches!(self, LevelFormat::Bullet)
    }

    /// Render an ordinal in this format.
    pub fn format_ordinal(self, n: u32) -> String {
        match self {
            LevelFormat::Bullet => String::new(),
            LevelFormat::Decimal => n.to_string(),
            LevelFormat::LowerLetter => to_letters(n),
            LevelFormat::UpperLetter => to_letters(n).to_uppercase(),
            LevelFormat::LowerRoman => to_roman(n).to_lowercase(),
            LevelFormat::UpperRoman => to_roman(n),
        }
    }
}

/// Letter numbering: a..z, then aa..zz, as word processors count.
fn to_letters(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    let letter = (b'a' + ((n - 1) % 26) as u8) as char;
    let repeat = ((n - 1) / 26 + 1) as usize;
    std::iter::repeat(letter).take(repeat).collect()
}

fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for &(value, numeral) in TABLE.iter() {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Paragraph indentation of a list level, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indent {
    pub left: u32,
    pub hanging: u32,
}

/// One level of a list definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingLevel {
    /// Level index (0-8)
    pub level: u8,
    /// Marker format
    pub format: LevelFormat,
    /// Level text (e.g., "•", "%1.", "%1.%2.")
    pub text: String,
    /// First ordinal
    #[serde(default = "default_start")]
    pub start: u32,
    /// Marker alignment
    #[serde(default)]
    pub alignment: Alignment,
    /// Paragraph indentation
    pub indent: Indent,
}

fn default_start() -> u32 {
    1
}

impl NumberingLevel {
    /// A level with the conventional indentation for its depth.
    pub fn new(level: u8, format: LevelFormat, text: impl Into<String>) -> Self {
        Self {
            level,
            format,
            text: text.into(),
            start: 1,
            alignment: Alignment::Left,
            indent: Indent {
                left: 720 * (u32::from(level) + 1),
                hanging: 360,
            },
        }
    }

    /// A bullet level.
    pub fn bullet(level: u8, text: impl Into<String>) -> Self {
        Self::new(level, LevelFormat::Bullet, text)
    }

    /// A decimal level.
    pub fn decimal(level: u8, text: impl Into<String>) -> Self {
        Self::new(level, LevelFormat::Decimal, text)
    }

    /// Set the indentation.
    pub fn indent(mut self, left: u32, hanging: u32) -> Self {
        self.indent = Indent { left, hanging };
        self
    }

    /// Set the first ordinal.
    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }
}

/// A named list definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingDefinition {
    /// Reference used by paragraphs (e.g., "bullets")
    pub reference: String,
    /// Levels, unique and contiguous from 0
    pub levels: Vec<NumberingLevel>,
}

impl NumberingDefinition {
    pub fn new(reference: impl Into<String>, levels: Vec<NumberingLevel>) -> Self {
        Self {
            reference: reference.into(),
            levels,
        }
    }

    /// Get a level definition.
    pub fn level(&self, level: u8) -> Option<&NumberingLevel> {
        self.levels.get(level as usize)
    }

    fn validate(&mut self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidListDefinition {
            reference: self.reference.clone(),
            reason,
        };
        if self.levels.is_empty() {
            return Err(invalid("no levels".to_string()));
        }
        if self.levels.len() > MAX_LIST_LEVELS {
            return Err(invalid(format!(
                "{} levels, at most {} allowed",
                self.levels.len(),
                MAX_LIST_LEVELS
            )));
        }
        let mut sorted = self.levels.clone();
        sorted.sort_by_key(|l| l.level);
        for (expected, lvl) in sorted.iter().enumerate() {
            if lvl.level as usize != expected {
                return Err(invalid(format!(
                    "levels must be unique and contiguous from 0, found {} at position {}",
                    lvl.level, expected
                )));
            }
        }
        self.levels = sorted;
        Ok(())
    }
}

/// A rendered list marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Marker text (e.g., "•", "2.", "1.3.")
    pub text: String,
    /// Paragraph indentation for the level
    pub indent: Indent,
    /// Numbering instance id in the package
    pub num_id: u32,
    /// Level index
    pub level: u8,
}

/// Registry of list definitions.
///
/// Definitions are immutable once registered. Marker state lives in
/// [`ListCounters`], created per compilation with [`NumberingRegistry::counters`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "NumberingRegistryData")]
pub struct NumberingRegistry {
    definitions: Vec<NumberingDefinition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct NumberingRegistryData {
    #[serde(default)]
    definitions: Vec<NumberingDefinition>,
}

impl TryFrom<NumberingRegistryData> for NumberingRegistry {
    type Error = Error;

    fn try_from(data: NumberingRegistryData) -> Result<Self> {
        let mut registry = NumberingRegistry::new();
        for definition in data.definitions {
            registry.define_list(definition)?;
        }
        Ok(registry)
    }
}

impl NumberingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a list definition.
    pub fn define_list(&mut self, mut definition: NumberingDefinition) -> Result<()> {
        if self.index.contains_key(&definition.reference) {
            return Err(Error::DuplicateListReference(definition.reference));
        }
        definition.validate()?;
        self.index
            .insert(definition.reference.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Get a definition by reference.
    pub fn get(&self, reference: &str) -> Option<&NumberingDefinition> {
        self.index.get(reference).map(|&i| &self.definitions[i])
    }

    /// Check whether a reference is defined.
    pub fn contains(&self, reference: &str) -> bool {
        self.index.contains_key(reference)
    }

    /// Look up a level, reporting which part of the reference is unknown.
    pub fn level(&self, reference: &str, level: u8) -> Result<&NumberingLevel> {
        let definition = self
            .get(reference)
            .ok_or_else(|| Error::UnknownListReference(reference.to_string()))?;
        definition.level(level).ok_or_else(|| Error::UnknownListLevel {
            reference: reference.to_string(),
            level,
        })
    }

    /// Package numbering id of a reference (1-based, definition order).
    pub fn num_id(&self, reference: &str) -> Option<u32> {
        self.index.get(reference).map(|&i| i as u32 + 1)
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NumberingDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Fresh counter state for one compilation.
    pub fn counters(&self) -> ListCounters<'_> {
        ListCounters {
            registry: self,
            last: HashMap::new(),
        }
    }

    /// Write `word/numbering.xml`.
    pub(crate) fn write_part(&self, pretty: bool) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new(pretty);
        xml.declaration()?;
        xml.start("w:numbering", &[("xmlns:w", NS_W)])?;

        for (abstract_id, definition) in self.definitions.iter().enumerate() {
            let abstract_id = abstract_id.to_string();
            xml.start("w:abstractNum", &[("w:abstractNumId", abstract_id.as_str())])?;
            let multi = if definition.levels.len() > 1 {
                "hybridMultilevel"
            } else {
                "singleLevel"
            };
            xml.val("w:multiLevelType", multi)?;
            for level in &definition.levels {
                let ilvl = level.level.to_string();
                xml.start("w:lvl", &[("w:ilvl", ilvl.as_str())])?;
                xml.val("w:start", &level.start.to_string())?;
                xml.val("w:numFmt", level.format.ooxml_value())?;
                xml.val("w:lvlText", &level.text)?;
                let jc = match level.alignment {
                    Alignment::Center => "center",
                    Alignment::Right => "right",
                    Alignment::Left | Alignment::Justify => "left",
                };
                xml.val("w:lvlJc", jc)?;
                xml.start("w:pPr", &[])?;
                let left = level.indent.left.to_string();
                let hanging = level.indent.hanging.to_string();
                xml.empty("w:ind", &[("w:left", left.as_str()), ("w:hanging", hanging.as_str())])?;
                xml.end("w:pPr")?;
                xml.end("w:lvl")?;
            }
            xml.end("w:abstractNum")?;
        }

        for (i, _) in self.definitions.iter().enumerate() {
            let num_id = (i + 1).to_string();
            let abstract_id = i.to_string();
            xml.start("w:num", &[("w:numId", num_id.as_str())])?;
            xml.val("w:abstractNumId", &abstract_id)?;
            xml.end("w:num")?;
        }

        xml.end("w:numbering")?;
        Ok(xml.into_bytes())
    }
}

/// Per-compilation list counters.
///
/// Markers must be requested in document order; there is no rollback. A
/// request at level `L` restarts every deeper level of the same list.
#[derive(Debug)]
pub struct ListCounters<'a> {
    registry: &'a NumberingRegistry,
    /// Last ordinal emitted per (reference, level)
    last: HashMap<(String, u8), u32>,
}

impl ListCounters<'_> {
    /// Produce the marker for the next item of `reference` at `level`.
    pub fn next_marker(&mut self, reference: &str, level: u8) -> Result<Marker> {
        let registry = self.registry;
        let definition_level = registry.level(reference, level)?;
        let definition = registry
            .get(reference)
            .ok_or_else(|| Error::UnknownListReference(reference.to_string()))?;

        self.last
            .retain(|(r, l), _| !(r.as_str() == reference && *l > level));

        let key = (reference.to_string(), level);
        let ordinal = match self.last.get(&key) {
            Some(&last) => last.checked_add(1).ok_or_else(|| {
                Error::PackageAssembly(format!(
                    "list '{}' level {} ran out of ordinals",
                    reference, level
                ))
            })?,
            None => definition_level.start,
        };
        self.last.insert(key, ordinal);

        let text = if definition_level.format.is_ordered() {
            self.render_level_text(definition, level, ordinal)
        } else {
            definition_level.text.clone()
        };

        Ok(Marker {
            text,
            indent: definition_level.indent,
            num_id: registry.num_id(reference).unwrap_or_default(),
            level,
        })
    }

    /// Substitute `%1`..`%9` with the current ordinals of levels 0..8.
    fn render_level_text(&self, definition: &NumberingDefinition, level: u8, ordinal: u32) -> String {
        let template = match definition.level(level) {
            Some(l) => l.text.as_str(),
            None => return String::new(),
        };
        let mut out = String::with_capacity(template.len() + 4);
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            let digit = match chars.peek() {
                Some(d) if c == '%' && ('1'..='9').contains(d) => *d,
                _ => {
                    out.push(c);
                    continue;
                }
            };
            chars.next();
            let target = digit as u8 - b'1';
            if target > level {
                continue;
            }
            if let Some(target_level) = definition.level(target) {
                let value = if target == level {
                    ordinal
                } else {
                    self.last
                        .get(&(definition.reference.clone(), target))
                        .copied()
                        .unwrap_or(target_level.start)
                };
                out.push_str(&target_level.format.format_ordinal(value));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NumberingRegistry {
        let mut reg = NumberingRegistry::new();
        reg.define_list(NumberingDefinition::new(
            "bullets",
            vec![NumberingLevel::bullet(0, "•").indent(720, 360)],
        ))
        .unwrap();
        reg.define_list(NumberingDefinition::new(
            "numbers",
            vec![
                NumberingLevel::decimal(0, "%1."),
                NumberingLevel::decimal(1, "%1.%2."),
                NumberingLevel::new(2, LevelFormat::LowerLetter, "(%3)"),
            ],
        ))
        .unwrap();
        reg
    }

    #[test]
    fn test_define_list_errors() {
        let mut reg = registry();
        let err = reg
            .define_list(NumberingDefinition::new("bullets", vec![NumberingLevel::bullet(0, "-")]))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateListReference(r) if r == "bullets"));

        let err = reg
            .define_list(NumberingDefinition::new(
                "gappy",
                vec![NumberingLevel::bullet(0, "-"), NumberingLevel::bullet(2, "-")],
            ))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidListDefinition { .. }));

        let err = reg
            .define_list(NumberingDefinition::new(
                "dupes",
                vec![NumberingLevel::bullet(0, "-"), NumberingLevel::bullet(0, "*")],
            ))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidListDefinition { .. }));

        let err = reg.define_list(NumberingDefinition::new("empty", vec![])).unwrap_err();
        assert!(matches!(err, Error::InvalidListDefinition { .. }));
    }

    #[test]
    fn test_levels_are_sorted_on_definition() {
        let mut reg = NumberingRegistry::new();
        reg.define_list(NumberingDefinition::new(
            "mixed",
            vec![NumberingLevel::decimal(1, "%2)"), NumberingLevel::decimal(0, "%1.")],
        ))
        .unwrap();
        assert_eq!(reg.level("mixed", 0).unwrap().text, "%1.");
        assert_eq!(reg.level("mixed", 1).unwrap().text, "%2)");
    }

    #[test]
    fn test_decimal_sequence() {
        let reg = registry();
        let mut counters = reg.counters();
        let texts: Vec<String> = (0..3)
            .map(|_| counters.next_marker("numbers", 0).unwrap().text)
            .collect();
        assert_eq!(texts, vec!["1.", "2.", "3."]);
    }

    #[test]
    fn test_nested_reset() {
        let reg = registry();
        let mut counters = reg.counters();
        assert_eq!(counters.next_marker("numbers", 0).unwrap().text, "1.");
        assert_eq!(counters.next_marker("numbers", 1).unwrap().text, "1.1.");
        assert_eq!(counters.next_marker("numbers", 1).unwrap().text, "1.2.");
        assert_eq!(counters.next_marker("numbers", 0).unwrap().text, "2.");
        assert_eq!(counters.next_marker("numbers", 1).unwrap().text, "2.1.");
        assert_eq!(counters.next_marker("numbers", 2).unwrap().text, "(a)");
        assert_eq!(counters.next_marker("numbers", 2).unwrap().text, "(b)");
        assert_eq!(counters.next_marker("numbers", 1).unwrap().text, "2.2.");
        assert_eq!(counters.next_marker("numbers", 2).unwrap().text, "(a)");
    }

    #[test]
    fn test_ordinal_exhaustion_is_an_error() {
        let mut reg = NumberingRegistry::new();
        reg.define_list(NumberingDefinition::new(
            "last",
            vec![NumberingLevel::decimal(0, "%1.").start(u32::MAX)],
        ))
        .unwrap();
        let mut counters = reg.counters();
        assert_eq!(
            counters.next_marker("last", 0).unwrap().text,
            format!("{}.", u32::MAX)
        );
        assert!(matches!(
            counters.next_marker("last", 0),
            Err(Error::PackageAssembly(_))
        ));
    }

    #[test]
    fn test_bullets_are_constant() {
        let reg = registry();
        let mut counters = reg.counters();
        let first = counters.next_marker("bullets", 0).unwrap();
        let second = counters.next_marker("bullets", 0).unwrap();
        assert_eq!(first.text, "•");
        assert_eq!(second.text, "•");
        assert_eq!(first.indent, Indent { left: 720, hanging: 360 });
        assert_eq!(first.num_id, 1);
    }

    #[test]
    fn test_lists_count_independently() {
        let reg = registry();
        let mut counters = reg.counters();
        counters.next_marker("numbers", 0).unwrap();
        counters.next_marker("bullets", 0).unwrap();
        assert_eq!(counters.next_marker("numbers", 0).unwrap().text, "2.");
        assert_eq!(counters.next_marker("numbers", 0).unwrap().num_id, 2);
    }

    #[test]
    fn test_fresh_counters_restart() {
        let reg = registry();
        let mut first = reg.counters();
        first.next_marker("numbers", 0).unwrap();
        first.next_marker("numbers", 0).unwrap();
        let mut second = reg.counters();
        assert_eq!(second.next_marker("numbers", 0).unwrap().text, "1.");
    }

    #[test]
    fn test_unknown_references() {
        let reg = registry();
        let mut counters = reg.counters();
        assert!(matches!(
            counters.next_marker("steps", 0),
            Err(Error::UnknownListReference(r)) if r == "steps"
        ));
        assert!(matches!(
            counters.next_marker("bullets", 1),
            Err(Error::UnknownListLevel { level: 1, .. })
        ));
    }

    #[test]
    fn test_start_value() {
        let mut reg = NumberingRegistry::new();
        reg.define_list(NumberingDefinition::new(
            "roman",
            vec![NumberingLevel::new(0, LevelFormat::UpperRoman, "%1.").start(4)],
        ))
        .unwrap();
        let mut counters = reg.counters();
        assert_eq!(counters.next_marker("roman", 0).unwrap().text, "IV.");
        assert_eq!(counters.next_marker("roman", 0).unwrap().text, "V.");
    }

    #[test]
    fn test_format_ordinal() {
        assert_eq!(LevelFormat::LowerLetter.format_ordinal(1), "a");
        assert_eq!(LevelFormat::LowerLetter.format_ordinal(27), "aa");
        assert_eq!(LevelFormat::UpperLetter.format_ordinal(28), "BB");
        assert_eq!(LevelFormat::UpperRoman.format_ordinal(1994), "MCMXCIV");
        assert_eq!(LevelFormat::LowerRoman.format_ordinal(9), "ix");
    }

    #[test]
    fn test_write_part() {
        let reg = registry();
        let xml = String::from_utf8(reg.write_part(false).unwrap()).unwrap();
        assert!(xml.contains(r#"<w:abstractNum w:abstractNumId="0">"#));
        assert!(xml.contains(r#"<w:abstractNum w:abstractNumId="1">"#));
        assert!(xml.contains(r#"<w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>"#));
        assert!(xml.contains(r#"<w:numFmt w:val="lowerLetter"/>"#));
        assert!(xml.contains(r#"<w:ind w:left="720" w:hanging="360"/>"#));
        // Every abstractNum precedes the first num
        let last_abstract = xml.rfind("<w:abstractNum ").unwrap();
        let first_num = xml.find("<w:num ").unwrap();
        assert!(last_abstract < first_num);
    }
}
