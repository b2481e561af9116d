//! Table layout: location, formatting, column widths and the table shape itself.

use crate::error::{Error, Result};
use crate::types::Dataset;
use crate::units::{inches, pt, Emu};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Font sizes a DrawingML run accepts, in hundredths of a point (1 to 4000 pt).
pub const FONT_SIZE_CENTIPOINTS: RangeInclusive<i64> = 100..=400_000;

/// Horizontal paragraph alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    /// Value of the DrawingML `algn` attribute.
    pub fn as_ooxml(self) -> &'static str {
        match self {
            TextAlign::Left => "l",
            TextAlign::Center => "ctr",
            TextAlign::Right => "r",
            TextAlign::Justify => "just",
        }
    }

    /// Parse a DrawingML `algn` attribute value.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "l" => Some(TextAlign::Left),
            "ctr" => Some(TextAlign::Center),
            "r" => Some(TextAlign::Right),
            "just" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

/// Where a table sits on its slide. Height follows from the row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLocation {
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
}

impl Default for TableLocation {
    fn default() -> Self {
        Self {
            left: inches(1.0),
            top: inches(1.5),
            width: inches(8.0),
        }
    }
}

impl TableLocation {
    pub fn new(left: Emu, top: Emu, width: Emu) -> Self {
        Self { left, top, width }
    }
}

/// Formatting applied uniformly to every cell and row of a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableFormat {
    /// Font size of every cell run.
    pub font_size: Emu,
    /// Height of every row.
    pub row_height: Emu,
    /// Paragraph alignment in every cell; `None` inherits the table style.
    pub alignment: Option<TextAlign>,
    /// Style the first row as a header.
    pub header_row: bool,
    /// Alternate row shading.
    pub banded_rows: bool,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            font_size: pt(14.0),
            row_height: inches(0.4),
            alignment: Some(TextAlign::Center),
            header_row: true,
            banded_rows: true,
        }
    }
}

impl TableFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, font_size: Emu) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_row_height(mut self, row_height: Emu) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_alignment(mut self, alignment: Option<TextAlign>) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_header_row(mut self, header_row: bool) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_banded_rows(mut self, banded_rows: bool) -> Self {
        self.banded_rows = banded_rows;
        self
    }

    /// Check that the font size can be written as a run size.
    pub fn validate(&self) -> Result<()> {
        if !FONT_SIZE_CENTIPOINTS.contains(&self.font_size.centipoints()) {
            return Err(Error::InvalidFontSize(self.font_size.pt()));
        }
        Ok(())
    }
}

/// Split `total` into `count` column widths.
///
/// Without weights the split is equal. With weights each column gets
/// `total * w / sum(w)`. The rounding remainder goes to the last column, so
/// the widths always add up to `total`.
pub fn column_widths(total: Emu, count: usize, weights: Option<&[f64]>) -> Result<Vec<Emu>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut widths: Vec<Emu> = match weights {
        None => vec![Emu(total.0 / count as i64); count],
        Some(weights) => {
            if weights.len() != count {
                return Err(Error::ColumnWeights {
                    expected: count,
                    found: weights.len(),
                });
            }
            if let Some(&bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(Error::InvalidWeight(bad));
            }

            let sum: f64 = weights.iter().sum();
            if sum <= 0.0 {
                return Err(Error::InvalidWeight(sum));
            }

            weights
                .iter()
                .map(|w| Emu((total.0 as f64 * w / sum) as i64))
                .collect()
        }
    };

    let assigned: i128 = widths.iter().map(|w| i128::from(w.0)).sum();
    if let Some(last) = widths.last_mut() {
        let adjusted = i128::from(last.0) + i128::from(total.0) - assigned;
        last.0 = i64::try_from(adjusted).map_err(|_| {
            Error::LengthOverflow(format!("column widths for a table {} EMU wide", total))
        })?;
    }

    Ok(widths)
}

/// A table placed on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableShape {
    /// Shape name shown in the selection pane.
    pub name: String,
    pub left: Emu,
    pub top: Emu,
    pub width: Emu,
    pub height: Emu,
    /// One width per column.
    pub column_widths: Vec<Emu>,
    /// One height per row.
    pub row_heights: Vec<Emu>,
    /// Cell texts, row-major.
    pub cells: Vec<Vec<String>>,
    pub format: TableFormat,
}

impl TableShape {
    /// Lay out `data` as a table, optionally transposed.
    pub fn from_dataset(
        data: &Dataset,
        location: &TableLocation,
        format: &TableFormat,
        weights: Option<&[f64]>,
        transpose: bool,
    ) -> Result<Self> {
        format.validate()?;
        let cells = data.to_text_grid(transpose)?;
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);

        let column_widths = column_widths(location.width, cols, weights)?;
        let row_heights = vec![format.row_height; rows];
        let height = i64::try_from(rows)
            .ok()
            .and_then(|rows| format.row_height.0.checked_mul(rows))
            .map(Emu)
            .ok_or_else(|| {
                Error::LengthOverflow(format!("{} rows of {} EMU", rows, format.row_height))
            })?;

        Ok(Self {
            name: String::from("Table"),
            left: location.left,
            top: location.top,
            width: location.width,
            height,
            column_widths,
            row_heights,
            cells,
            format: *format,
        })
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Text of the cell at (`row`, `col`).
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_widths_sum_to_total() {
        let widths = column_widths(Emu(1000), 3, None).unwrap();
        assert_eq!(widths, vec![Emu(333), Emu(333), Emu(334)]);
    }

    #[test]
    fn test_weighted_widths() {
        let total = inches(5.0);
        let widths = column_widths(total, 3, Some(&[2.0, 2.0, 2.0])).unwrap();
        assert_eq!(widths.iter().map(|w| w.0).sum::<i64>(), total.0);
        assert_eq!(widths[0], Emu(1_524_000));

        let widths = column_widths(Emu(1200), 3, Some(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(widths, vec![Emu(200), Emu(400), Emu(600)]);
    }

    #[test]
    fn test_weight_errors() {
        assert!(matches!(
            column_widths(Emu(100), 3, Some(&[1.0, 1.0])),
            Err(Error::ColumnWeights {
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            column_widths(Emu(100), 2, Some(&[1.0, -1.0])),
            Err(Error::InvalidWeight(_))
        ));
        assert!(matches!(
            column_widths(Emu(100), 2, Some(&[0.0, 0.0])),
            Err(Error::InvalidWeight(_))
        ));
        assert!(matches!(
            column_widths(Emu(100), 1, Some(&[f64::NAN])),
            Err(Error::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_table_from_dataset() {
        let data = Dataset::with_header(["Aa", "Bb"], vec![vec![3, 4], vec![6, 7], vec![9, 10]]);
        let location = TableLocation::new(inches(1.5), inches(2.0), inches(5.0));
        let format = TableFormat::new()
            .with_font_size(pt(12.0))
            .with_row_height(inches(0.85));

        let table = TableShape::from_dataset(&data, &location, &format, None, true).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.cell(0, 3), Some("9"));
        assert_eq!(table.cell(1, 0), Some("Bb"));
        assert_eq!(table.height, Emu(inches(0.85).0 * 2));
        assert_eq!(table.row_heights, vec![inches(0.85); 2]);
        assert_eq!(table.left, inches(1.5));
    }

    #[test]
    fn test_huge_lengths_are_errors() {
        let data = Dataset::with_header(["a", "b"], vec![vec![1, 2], vec![3, 4]]);
        let location = TableLocation::default();

        let tall = TableFormat::new().with_row_height(inches(1e14));
        assert!(matches!(
            TableShape::from_dataset(&data, &location, &tall, None, false),
            Err(Error::LengthOverflow(_))
        ));

        let widths = column_widths(Emu(i64::MAX), 3, Some(&[1.0, 1.0, 1.0])).unwrap();
        assert_eq!(
            widths.iter().map(|w| i128::from(w.0)).sum::<i128>(),
            i128::from(i64::MAX)
        );
    }

    #[test]
    fn test_font_size_range() {
        let data = Dataset::with_header(["a"], vec![vec![1]]);
        let location = TableLocation::default();

        for size in [0.5, 0.0, -12.0, 4000.5] {
            let format = TableFormat::new().with_font_size(pt(size));
            assert!(matches!(
                TableShape::from_dataset(&data, &location, &format, None, false),
                Err(Error::InvalidFontSize(_))
            ));
        }
        for size in [1.0, 12.0, 4000.0] {
            let format = TableFormat::new().with_font_size(pt(size));
            assert!(TableShape::from_dataset(&data, &location, &format, None, false).is_ok());
        }
    }

    #[test]
    fn test_weights_checked_against_transposed_columns() {
        let data = Dataset::with_header(["a", "b"], vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        let location = TableLocation::default();
        let format = TableFormat::default();

        assert!(TableShape::from_dataset(&data, &location, &format, Some(&[1.0, 1.0]), false).is_ok());
        assert!(matches!(
            TableShape::from_dataset(&data, &location, &format, Some(&[1.0, 1.0]), true),
            Err(Error::ColumnWeights { expected: 4, .. })
        ));
    }

    #[test]
    fn test_alignment_codes() {
        for align in [TextAlign::Left, TextAlign::Center, TextAlign::Right, TextAlign::Justify] {
            assert_eq!(TextAlign::from_ooxml(align.as_ooxml()), Some(align));
        }
        assert_eq!(TextAlign::from_ooxml("dist"), None);
    }
}
