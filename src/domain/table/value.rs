// ============================================================
// CELL VALUE
// ============================================================
// A single cell in an extracted column series

use serde::Serialize;

/// A dynamically-typed cell value as it appears in a chart payload.
/// Serializes untagged, so a series comes out as plain JSON numbers,
/// strings, and nulls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}
