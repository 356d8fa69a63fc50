//! Table layout: column widths, cell widths, borders, shading and margins.

use super::{layout_blocks, LayoutDefaults, ResolvedBlock};
use crate::error::{Error, Result};
use crate::model::{Border, CellBorders, CellMargins, Shading, Table, VerticalAlignment};
use crate::units::WidthSpec;
use log::{debug, warn};

/// Absolute cell margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for ResolvedMargins {
    fn default() -> Self {
        Self {
            top: 0,
            bottom: 0,
            left: 108,
            right: 108,
        }
    }
}

impl ResolvedMargins {
    fn resolve(cell: Option<&CellMargins>, table: Option<&CellMargins>, defaults: &Self) -> Self {
        let pick = |side: fn(&CellMargins) -> Option<u32>, fallback: u32| {
            cell.and_then(side)
                .or_else(|| table.and_then(side))
                .unwrap_or(fallback)
        };
        Self {
            top: pick(|m| m.top, defaults.top),
            bottom: pick(|m| m.bottom, defaults.bottom),
            left: pick(|m| m.left, defaults.left),
            right: pick(|m| m.right, defaults.right),
        }
    }
}

/// Effective borders of a cell. `None` means the side has no border at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBorders {
    pub top: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub right: Option<Border>,
}

impl ResolvedBorders {
    fn resolve(cell: Option<&CellBorders>, table: Option<&CellBorders>) -> Self {
        let pick = |side: fn(&CellBorders) -> Option<Border>| {
            cell.and_then(side).or_else(|| table.and_then(side))
        };
        Self {
            top: pick(|b| b.top.clone()),
            bottom: pick(|b| b.bottom.clone()),
            left: pick(|b| b.left.clone()),
            right: pick(|b| b.right.clone()),
        }
    }

    /// Check if no side carries a border.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

/// A cell with every visual property made absolute.
#[derive(Debug, Clone)]
pub struct ResolvedCell<'a> {
    /// Absolute width in twips
    pub width: u32,
    pub col_span: u32,
    pub borders: ResolvedBorders,
    pub shading: Option<&'a Shading>,
    pub margins: ResolvedMargins,
    pub vertical_alignment: VerticalAlignment,
    /// Cell content, laid out against the inner width
    pub blocks: Vec<ResolvedBlock<'a>>,
}

impl ResolvedCell<'_> {
    /// Width available to content after the left and right margins.
    pub fn inner_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margins.left.saturating_add(self.margins.right))
    }
}

/// A laid-out table row.
#[derive(Debug, Clone)]
pub struct ResolvedRow<'a> {
    pub is_header: bool,
    pub cells: Vec<ResolvedCell<'a>>,
}

/// A laid-out table.
#[derive(Debug, Clone)]
pub struct ResolvedTable<'a> {
    /// Absolute table width in twips
    pub width: u32,
    /// Grid column widths in twips
    pub grid: &'a [u32],
    pub rows: Vec<ResolvedRow<'a>>,
}

impl ResolvedTable<'_> {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.grid.len()
    }
}

/// Table layout engine.
pub struct TableLayout;

impl TableLayout {
    /// Lay out a table against the available content width.
    ///
    /// Fails when the grid or an absolute table width does not fit, or when
    /// a row does not cover exactly the declared columns.
    pub fn resolve<'a>(
        table: &'a Table,
        content_width: u32,
        defaults: &LayoutDefaults,
    ) -> Result<ResolvedTable<'a>> {
        let grid = table.column_widths.as_slice();
        let grid_width = table.grid_width().ok_or(Error::TableWidthOverflow {
            width: u32::MAX,
            available: content_width,
        })?;
        if grid_width > content_width {
            return Err(Error::TableWidthOverflow {
                width: grid_width,
                available: content_width,
            });
        }

        let width = match table.width {
            Some(WidthSpec::Dxa(w)) if w > content_width => {
                return Err(Error::TableWidthOverflow {
                    width: w,
                    available: content_width,
                });
            }
            Some(spec @ (WidthSpec::Dxa(_) | WidthSpec::Percent(_))) => {
                spec.to_twips(content_width).unwrap_or(grid_width)
            }
            Some(WidthSpec::Auto) | None => grid_width,
        };
        if width != grid_width {
            debug!(
                "Table width {} differs from its grid width {}",
                width, grid_width
            );
        }

        let expected = grid.len();
        let mut rows = Vec::with_capacity(table.rows.len());
        for (row_index, row) in table.rows.iter().enumerate() {
            let found = row.effective_columns();
            if found != expected {
                return Err(Error::RowCellCountMismatch {
                    row: row_index,
                    expected,
                    found,
                });
            }

            let mut column = 0usize;
            let mut cells = Vec::with_capacity(row.cells.len());
            for cell in &row.cells {
                let span = cell.col_span.max(1) as usize;
                let spanned: u32 = grid[column..column + span].iter().sum();
                column += span;

                let cell_width = match cell.width {
                    Some(spec @ (WidthSpec::Dxa(_) | WidthSpec::Percent(_))) => {
                        spec.to_twips(width).unwrap_or(spanned)
                    }
                    Some(WidthSpec::Auto) | None => spanned,
                };
                if cell_width != spanned {
                    warn!(
                        "Row {}: cell width {} differs from its spanned columns {}",
                        row_index, cell_width, spanned
                    );
                }

                let margins = ResolvedMargins::resolve(
                    cell.margins.as_ref(),
                    table.default_margins.as_ref(),
                    &defaults.cell_margins,
                );
                let inner_width =
                    cell_width.saturating_sub(margins.left.saturating_add(margins.right));
                let blocks = layout_blocks(&cell.children, inner_width, defaults)?;

                cells.push(ResolvedCell {
                    width: cell_width,
                    col_span: span as u32,
                    borders: ResolvedBorders::resolve(
                        cell.borders.as_ref(),
                        table.default_borders.as_ref(),
                    ),
                    shading: cell.shading.as_ref(),
                    margins,
                    vertical_alignment: cell.vertical_alignment,
                    blocks,
                });
            }

            rows.push(ResolvedRow {
                is_header: row.is_header,
                cells,
            });
        }

        Ok(ResolvedTable { width, grid, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Cell, Row};

    fn two_by_two(widths: Vec<u32>) -> Table {
        Table::new(widths)
            .row(Row::new(vec![Cell::with_text("A1"), Cell::with_text("B1")]))
            .row(Row::new(vec![Cell::with_text("A2"), Cell::with_text("B2")]))
    }

    #[test]
    fn test_width_overflow() {
        let defaults = LayoutDefaults::default();
        let table = two_by_two(vec![5000, 5000]);
        let err = TableLayout::resolve(&table, 9000, &defaults).unwrap_err();
        assert!(matches!(
            err,
            Error::TableWidthOverflow {
                width: 10000,
                available: 9000
            }
        ));

        let table = two_by_two(vec![4500, 4500]);
        let resolved = TableLayout::resolve(&table, 9000, &defaults).unwrap();
        assert_eq!(resolved.width, 9000);
        assert_eq!(resolved.rows[0].cells[1].width, 4500);
    }

    #[test]
    fn test_grid_sum_overflow() {
        let defaults = LayoutDefaults::default();
        let table = Table::new(vec![u32::MAX, 2])
            .row(Row::new(vec![Cell::with_text("A"), Cell::with_text("B")]));
        let err = TableLayout::resolve(&table, 9360, &defaults).unwrap_err();
        assert!(matches!(
            err,
            Error::TableWidthOverflow {
                available: 9360,
                ..
            }
        ));
    }

    #[test]
    fn test_huge_margins_saturate() {
        let defaults = LayoutDefaults::default();
        let table = Table::new(vec![4000])
            .row(Row::new(vec![Cell::with_text("A").margins(CellMargins {
                left: Some(u32::MAX),
                right: Some(u32::MAX),
                ..Default::default()
            })]));
        let resolved = TableLayout::resolve(&table, 9000, &defaults).unwrap();
        assert_eq!(resolved.rows[0].cells[0].inner_width(), 0);
    }

    #[test]
    fn test_explicit_width_overflow() {
        let table = two_by_two(vec![2000, 2000]).width(WidthSpec::Dxa(9500));
        let err = TableLayout::resolve(&table, 9360, &LayoutDefaults::default()).unwrap_err();
        assert!(matches!(err, Error::TableWidthOverflow { width: 9500, .. }));
    }

    #[test]
    fn test_percent_table_width() {
        let table = two_by_two(vec![2000, 2000]).width(WidthSpec::Percent(50));
        let resolved = TableLayout::resolve(&table, 9000, &LayoutDefaults::default()).unwrap();
        assert_eq!(resolved.width, 4500);
    }

    #[test]
    fn test_row_cell_count_mismatch() {
        let table = Table::new(vec![3000, 3000, 3000])
            .row(Row::new(vec![
                Cell::with_text("a"),
                Cell::with_text("b"),
                Cell::with_text("c"),
            ]))
            .row(Row::new(vec![Cell::with_text("a"), Cell::with_text("b")]));
        let err = TableLayout::resolve(&table, 9360, &LayoutDefaults::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::RowCellCountMismatch {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_spanned_cell_width() {
        let table = Table::new(vec![1000, 2000, 3000]).row(Row::new(vec![
            Cell::with_text("wide").span(2),
            Cell::with_text("narrow"),
        ]));
        let resolved = TableLayout::resolve(&table, 9360, &LayoutDefaults::default()).unwrap();
        let cells = &resolved.rows[0].cells;
        assert_eq!(cells[0].width, 3000);
        assert_eq!(cells[0].col_span, 2);
        assert_eq!(cells[1].width, 3000);
    }

    #[test]
    fn test_border_and_margin_fallback() {
        let table = Table::new(vec![4000, 4000])
            .borders(CellBorders::all(Border::single(1, "CCCCCC")))
            .margins(CellMargins {
                top: Some(80),
                bottom: Some(80),
                ..Default::default()
            })
            .row(Row::new(vec![
                Cell::with_text("plain"),
                Cell::with_text("custom")
                    .borders(CellBorders {
                        top: Some(Border::single(12, "1F4788")),
                        left: Some(Border::none()),
                        ..Default::default()
                    })
                    .margins(CellMargins {
                        left: Some(120),
                        ..Default::default()
                    }),
            ]));
        let resolved = TableLayout::resolve(&table, 9360, &LayoutDefaults::default()).unwrap();
        let plain = &resolved.rows[0].cells[0];
        let custom = &resolved.rows[0].cells[1];

        assert_eq!(plain.borders.top.as_ref().unwrap().color, "CCCCCC");
        assert_eq!(
            plain.margins,
            ResolvedMargins {
                top: 80,
                bottom: 80,
                left: 108,
                right: 108
            }
        );

        assert_eq!(custom.borders.top.as_ref().unwrap().size, 12);
        assert_eq!(custom.borders.left, Some(Border::none()));
        assert_eq!(custom.borders.bottom.as_ref().unwrap().color, "CCCCCC");
        assert_eq!(custom.margins.left, 120);
        assert_eq!(custom.margins.top, 80);
        assert_eq!(custom.inner_width(), 4000 - 120 - 108);
    }

    #[test]
    fn test_no_borders_without_defaults() {
        let table = two_by_two(vec![1000, 1000]);
        let resolved = TableLayout::resolve(&table, 9360, &LayoutDefaults::default()).unwrap();
        assert!(resolved.rows[0].cells[0].borders.is_empty());
        assert!(resolved.rows[0].cells[0].shading.is_none());
    }

    #[test]
    fn test_nested_table_uses_inner_width() {
        let inner = Table::new(vec![4000]).row(Row::new(vec![Cell::with_text("deep")]));
        let mut outer_cell = Cell::new().margins(CellMargins::new(0, 0, 100, 100));
        outer_cell.add_block(Block::Table(inner));
        let outer = Table::new(vec![4100]).row(Row::new(vec![outer_cell]));

        let err = TableLayout::resolve(&outer, 9360, &LayoutDefaults::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::TableWidthOverflow {
                width: 4000,
                available: 3900
            }
        ));
    }
}
