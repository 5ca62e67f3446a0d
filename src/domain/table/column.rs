// ============================================================
// TABLE AND COLUMN TYPES
// ============================================================
// Column-oriented in-memory table with per-column typing

use super::CellValue;
use crate::domain::error::{AppError, Result};

/// Column payload. The type is decided once, at ingestion: a column is
/// integer or float only when every non-empty cell parses as such,
/// otherwise the whole column stays text. Empty cells are `None` in
/// every representation, distinct from `0` and from `""`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Infer the column type from raw cell text.
    ///
    /// A cell that parses as a non-finite float (`NaN`, `inf`) counts as
    /// missing rather than forcing the column to text, matching how the
    /// usual dataframe readers treat such markers.
    fn infer(cells: &[&str]) -> ColumnData {
        let mut integers = Vec::with_capacity(cells.len());
        let mut all_integer = true;
        for cell in cells {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                integers.push(None);
                continue;
            }
            match trimmed.parse::<i64>() {
                Ok(v) => integers.push(Some(v)),
                Err(_) => {
                    all_integer = false;
                    break;
                }
            }
        }
        if all_integer {
            return ColumnData::Integer(integers);
        }

        let mut floats = Vec::with_capacity(cells.len());
        let mut all_float = true;
        for cell in cells {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                floats.push(None);
                continue;
            }
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => floats.push(Some(v)),
                Ok(_) => floats.push(None),
                Err(_) => {
                    all_float = false;
                    break;
                }
            }
        }
        if all_float {
            return ColumnData::Float(floats);
        }

        ColumnData::Text(
            cells
                .iter()
                .map(|cell| {
                    if cell.trim().is_empty() {
                        None
                    } else {
                        Some((*cell).to_string())
                    }
                })
                .collect(),
        )
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }
}

/// A single named column of a parsed table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Number of cells (shared row count of the table).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column as an ordered series of cell values.
    pub fn values(&self) -> Vec<CellValue> {
        match &self.data {
            ColumnData::Integer(cells) => cells
                .iter()
                .map(|c| c.map(CellValue::Integer).unwrap_or(CellValue::Null))
                .collect(),
            ColumnData::Float(cells) => cells
                .iter()
                .map(|c| c.map(CellValue::Float).unwrap_or(CellValue::Null))
                .collect(),
            ColumnData::Text(cells) => cells
                .iter()
                .map(|c| {
                    c.as_ref()
                        .map(|s| CellValue::Text(s.clone()))
                        .unwrap_or(CellValue::Null)
                })
                .collect(),
        }
    }

    /// Cells widened to floats for statistics. `None` for text columns.
    pub fn numeric_cells(&self) -> Option<Vec<Option<f64>>> {
        match &self.data {
            ColumnData::Integer(cells) => {
                Some(cells.iter().map(|c| c.map(|i| i as f64)).collect())
            }
            ColumnData::Float(cells) => Some(cells.clone()),
            ColumnData::Text(_) => None,
        }
    }
}

/// An ordered set of named columns sharing a fixed row count. Built per
/// request from parsed delimited text and dropped when the response is
/// serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a typed table from header names and raw string records.
    /// Short records are padded with missing cells.
    pub fn from_records(names: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let row_count = records.len();
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let raw: Vec<&str> = records
                    .iter()
                    .map(|record| record.get(idx).map(String::as_str).unwrap_or(""))
                    .collect();
                Column {
                    name,
                    data: ColumnData::infer(&raw),
                }
            })
            .collect();

        Self { columns, row_count }
    }

    /// Number of data rows (the header row is not counted).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Column names in parse order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AppError::ColumnNotFound(name.to_string()))
    }

    /// Extract the requested columns as ordered value series, preserving
    /// request order. Fails on the first absent name.
    pub fn extract_columns(&self, names: &[String]) -> Result<Vec<(String, Vec<CellValue>)>> {
        names
            .iter()
            .map(|name| Ok((name.clone(), self.column(name)?.values())))
            .collect()
    }
}
