//! Paragraph and text run models.

use serde::{Deserialize, Serialize};

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// The `w:jc` value for this alignment.
    pub(crate) fn ooxml_value(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Run-level (character) formatting.
///
/// Every field is optional: an unset field inherits from the paragraph style,
/// a set field overrides it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProps {
    /// Font family (e.g., "Arial")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Font size in half-points (e.g., 24 = 12pt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Bold text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    /// Italic text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    /// Single underline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,

    /// Text color (hex, e.g., "1F4788")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl RunProps {
    /// Create empty run properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether any property is set.
    pub fn is_empty(&self) -> bool {
        *self == RunProps::default()
    }

    /// Merge with another RunProps (other takes precedence).
    pub fn merge(&mut self, other: &RunProps) {
        if other.font.is_some() {
            self.font = other.font.clone();
        }
        if other.size.is_some() {
            self.size = other.size;
        }
        if other.bold.is_some() {
            self.bold = other.bold;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
        if other.color.is_some() {
            self.color = other.color.clone();
        }
    }
}

/// Paragraph-level formatting carried by styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphProps {
    /// Space before the paragraph in twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_before: Option<u32>,

    /// Space after the paragraph in twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<u32>,

    /// Outline level (0 = top-level heading)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,

    /// Alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl ParagraphProps {
    /// Check whether any property is set.
    pub fn is_empty(&self) -> bool {
        *self == ParagraphProps::default()
    }

    /// Merge with another ParagraphProps (other takes precedence).
    pub fn merge(&mut self, other: &ParagraphProps) {
        if other.spacing_before.is_some() {
            self.spacing_before = other.spacing_before;
        }
        if other.spacing_after.is_some() {
            self.spacing_after = other.spacing_after;
        }
        if other.outline_level.is_some() {
            self.outline_level = other.outline_level;
        }
        if other.alignment.is_some() {
            self.alignment = other.alignment;
        }
    }
}

/// Direct paragraph spacing, in twips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<u32>,

    /// Line spacing in 240ths of a line (240 = single)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Spacing {
    /// Spacing after the paragraph only.
    pub fn after(after: u32) -> Self {
        Self {
            after: Some(after),
            ..Default::default()
        }
    }

    /// Spacing before and after the paragraph.
    pub fn around(before: u32, after: u32) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
            line: None,
        }
    }
}

/// A reference from a paragraph to a list definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingRef {
    /// List reference (e.g., "bullets")
    pub reference: String,
    /// Nesting level (0 = top level)
    #[serde(default)]
    pub level: u8,
}

impl NumberingRef {
    pub fn new(reference: impl Into<String>, level: u8) -> Self {
        Self {
            reference: reference.into(),
            level,
        }
    }
}

/// A run of text with consistent formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Direct formatting overriding the paragraph style
    #[serde(default, skip_serializing_if = "RunProps::is_empty")]
    pub props: RunProps,
}

impl TextRun {
    /// Create a plain text run with no direct formatting.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            props: RunProps::default(),
        }
    }

    /// Create a run with the given formatting.
    pub fn styled(text: impl Into<String>, props: RunProps) -> Self {
        Self {
            text: text.into(),
            props,
        }
    }

    /// Set bold.
    pub fn bold(mut self) -> Self {
        self.props.bold = Some(true);
        self
    }

    /// Set italic.
    pub fn italic(mut self) -> Self {
        self.props.italic = Some(true);
        self
    }

    /// Set underline.
    pub fn underline(mut self) -> Self {
        self.props.underline = Some(true);
        self
    }

    /// Set the font size in half-points.
    pub fn size(mut self, half_points: u32) -> Self {
        self.props.size = Some(half_points);
        self
    }

    /// Set the font family.
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.props.font = Some(font.into());
        self
    }

    /// Set the text color (hex RGB).
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.props.color = Some(color.into());
        self
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A paragraph of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in this paragraph
    #[serde(default)]
    pub runs: Vec<TextRun>,

    /// Paragraph style id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,

    /// List membership
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numbering: Option<NumberingRef>,

    /// Direct spacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,

    /// Direct alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
            ..Default::default()
        }
    }

    /// Create a paragraph from runs.
    pub fn with_runs(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    /// Create a heading paragraph using the `Heading{level}` style.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::with_text(text).style(format!("Heading{}", level))
    }

    /// Set the paragraph style.
    pub fn style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    /// Make this paragraph an item of a list.
    pub fn numbered(mut self, reference: impl Into<String>, level: u8) -> Self {
        self.numbering = Some(NumberingRef::new(reference, level));
        self
    }

    /// Set direct spacing.
    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Set direct alignment.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Add a text run to this paragraph.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Add a text run, builder style.
    pub fn run(mut self, run: TextRun) -> Self {
        self.runs.push(run);
        self
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if this paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() || self.runs.iter().all(|r| r.is_empty())
    }

    /// Check if this paragraph is a list item.
    pub fn is_list_item(&self) -> bool {
        self.numbering.is_some()
    }
}
