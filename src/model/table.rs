//! Table model structures.

use super::{Block, Paragraph};
use crate::units::WidthSpec;
use serde::{Deserialize, Serialize};

/// Line style of a border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// Explicitly no border
    None,
    #[default]
    Single,
    Double,
    Dotted,
    Dashed,
    Thick,
}

impl BorderStyle {
    pub(crate) fn ooxml_value(self) -> &'static str {
        match self {
            BorderStyle::None => "nil",
            BorderStyle::Single => "single",
            BorderStyle::Double => "double",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Thick => "thick",
        }
    }
}

/// A single border line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    /// Line style
    #[serde(default)]
    pub style: BorderStyle,
    /// Width in eighths of a point (e.g., 8 = 1pt)
    pub size: u32,
    /// Color (hex RGB)
    pub color: String,
}

impl Border {
    /// A single-line border.
    pub fn single(size: u32, color: impl Into<String>) -> Self {
        Self {
            style: BorderStyle::Single,
            size,
            color: color.into(),
        }
    }

    /// An explicit "no border" that suppresses any inherited border.
    pub fn none() -> Self {
        Self {
            style: BorderStyle::None,
            size: 0,
            color: "auto".to_string(),
        }
    }
}

/// Borders on the four sides of a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBorders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Border>,
}

impl CellBorders {
    /// The same border on all four sides.
    pub fn all(border: Border) -> Self {
        Self {
            top: Some(border.clone()),
            bottom: Some(border.clone()),
            left: Some(border.clone()),
            right: Some(border),
        }
    }
}

/// Shading pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingPattern {
    /// Fill color only
    #[default]
    Clear,
    /// Solid pattern color
    Solid,
    Pct10,
    Pct25,
    Pct50,
}

impl ShadingPattern {
    pub(crate) fn ooxml_value(self) -> &'static str {
        match self {
            ShadingPattern::Clear => "clear",
            ShadingPattern::Solid => "solid",
            ShadingPattern::Pct10 => "pct10",
            ShadingPattern::Pct25 => "pct25",
            ShadingPattern::Pct50 => "pct50",
        }
    }
}

/// Cell background shading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shading {
    /// Fill color (hex RGB)
    pub fill: String,
    /// Pattern drawn over the fill
    #[serde(default)]
    pub pattern: ShadingPattern,
    /// Pattern color (hex RGB), `auto` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Shading {
    /// A clear shading with the given fill color.
    pub fn fill(fill: impl Into<String>) -> Self {
        Self {
            fill: fill.into(),
            pattern: ShadingPattern::Clear,
            color: None,
        }
    }
}

/// Internal cell margins in twips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMargins {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
}

impl CellMargins {
    /// Margins with every side set.
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top: Some(top),
            bottom: Some(bottom),
            left: Some(left),
            right: Some(right),
        }
    }
}

/// Vertical alignment of cell content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    pub(crate) fn ooxml_value(self) -> &'static str {
        match self {
            VerticalAlignment::Top => "top",
            VerticalAlignment::Center => "center",
            VerticalAlignment::Bottom => "bottom",
        }
    }
}

/// A cell in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell content (block-level only)
    #[serde(default)]
    pub children: Vec<Block>,

    /// Horizontal span (number of grid columns covered)
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub col_span: u32,

    /// Borders overriding the table default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borders: Option<CellBorders>,

    /// Background shading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<Shading>,

    /// Internal margins overriding the table default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<CellMargins>,

    /// Declared width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<WidthSpec>,

    /// Vertical alignment
    #[serde(default, skip_serializing_if = "is_default_vertical_alignment")]
    pub vertical_alignment: VerticalAlignment,
}

fn default_span() -> u32 {
    1
}

fn is_default_span(n: &u32) -> bool {
    *n == 1
}

fn is_default_vertical_alignment(a: &VerticalAlignment) -> bool {
    *a == VerticalAlignment::Top
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            col_span: 1,
            borders: None,
            shading: None,
            margins: None,
            width: None,
            vertical_alignment: VerticalAlignment::Top,
        }
    }
}

impl Cell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell holding one paragraph.
    pub fn with_paragraph(para: Paragraph) -> Self {
        Self {
            children: vec![Block::Paragraph(para)],
            ..Default::default()
        }
    }

    /// Create a cell with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_paragraph(Paragraph::with_text(text))
    }

    /// Add a block to this cell.
    pub fn add_block(&mut self, block: Block) {
        self.children.push(block);
    }

    /// Set the column span.
    pub fn span(mut self, columns: u32) -> Self {
        self.col_span = columns;
        self
    }

    /// Set borders.
    pub fn borders(mut self, borders: CellBorders) -> Self {
        self.borders = Some(borders);
        self
    }

    /// Set shading.
    pub fn shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    /// Set margins.
    pub fn margins(mut self, margins: CellMargins) -> Self {
        self.margins = Some(margins);
        self
    }

    /// Set the declared width.
    pub fn width(mut self, width: WidthSpec) -> Self {
        self.width = Some(width);
        self
    }

    /// Set vertical alignment.
    pub fn valign(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        self.children
            .iter()
            .map(|b| b.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if this cell spans multiple columns.
    pub fn has_col_span(&self) -> bool {
        self.col_span > 1
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in this row
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Repeat this row at the top of each page
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

impl Row {
    /// Create a row from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Add a cell to this row.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Get the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get the number of grid columns covered (accounting for spans).
    pub fn effective_columns(&self) -> usize {
        self.cells.iter().map(|c| c.col_span.max(1) as usize).sum()
    }
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Grid column widths in twips
    #[serde(default)]
    pub column_widths: Vec<u32>,

    /// Declared table width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<WidthSpec>,

    /// Border applied to every cell side not set by the cell itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_borders: Option<CellBorders>,

    /// Margins applied to every cell not setting its own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_margins: Option<CellMargins>,

    /// Rows in this table
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table over the given column grid.
    pub fn new(column_widths: Vec<u32>) -> Self {
        Self {
            column_widths,
            ..Default::default()
        }
    }

    /// Set the declared table width.
    pub fn width(mut self, width: WidthSpec) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the default cell borders.
    pub fn borders(mut self, borders: CellBorders) -> Self {
        self.default_borders = Some(borders);
        self
    }

    /// Set the default cell margins.
    pub fn margins(mut self, margins: CellMargins) -> Self {
        self.default_margins = Some(margins);
        self
    }

    /// Add a row, builder style.
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Add a row to this table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of grid columns.
    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Sum of the grid column widths in twips, `None` if it does not fit a `u32`.
    pub fn grid_width(&self) -> Option<u32> {
        self.column_widths
            .iter()
            .try_fold(0u32, |acc, &w| acc.checked_add(w))
    }

    /// Check if the table has merged cells.
    pub fn has_merged_cells(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.cells.iter().any(|c| c.has_col_span()))
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            let cells: Vec<String> = row.cells.iter().map(|c| c.plain_text()).collect();
            text.push_str(&cells.join("\t"));
            text.push('\n');
        }
        text
    }
}
