//! Tabular input data: cell values and datasets.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value in a dataset.
///
/// Deserializes from JSON `null`, integers, floats and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell.
    Empty,
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl CellValue {
    /// Render the value as the text shown in a table cell.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    /// Check if cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

/// An ordered sequence of rows. The first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Create a dataset from rows. Shape is checked by [`Dataset::validate`].
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Create a dataset from a header row and value rows.
    pub fn with_header<H, S, R, V>(header: H, body: R) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = Vec<V>>,
        V: Into<CellValue>,
    {
        let mut rows = vec![header
            .into_iter()
            .map(|s| CellValue::Text(s.into()))
            .collect::<Vec<_>>()];
        rows.extend(
            body.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect()),
        );
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// The header row, if any.
    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// All rows after the header.
    pub fn body(&self) -> &[Vec<CellValue>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, taken from the header row.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Check that the dataset is non-empty and every row is as long as the header.
    pub fn validate(&self) -> Result<()> {
        let expected = self.column_count();
        if expected == 0 {
            return Err(Error::EmptyDataset);
        }

        for (row, cells) in self.rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(Error::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }

        Ok(())
    }

    /// Swap rows and columns. The dataset must be valid.
    pub fn transposed(&self) -> Result<Dataset> {
        self.validate()?;

        let rows = (0..self.column_count())
            .map(|col| self.rows.iter().map(|row| row[col].clone()).collect())
            .collect();

        Ok(Dataset { rows })
    }

    /// Validated grid of cell texts, optionally transposed.
    pub fn to_text_grid(&self, transpose: bool) -> Result<Vec<Vec<String>>> {
        let transposed;
        let rows = if transpose {
            transposed = self.transposed()?;
            transposed.rows()
        } else {
            self.validate()?;
            self.rows()
        };

        Ok(rows
            .iter()
            .map(|row| row.iter().map(CellValue::as_text).collect())
            .collect())
    }
}
