// ============================================================
// CHART DATA USE CASE
// ============================================================
// Orchestrate parsing, column extraction, and summary computation

use serde_json::{Map, Value};

use crate::application::use_cases::boxplot::BoxplotSummary;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Table};
use crate::infrastructure::csv::TableParser;

/// Which payload the client asked for. The front-end sends a free-form
/// `graph_type` string; only `"boxPlot"` selects summary mode, anything
/// else is a raw series pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    BoxPlot,
    Raw,
}

impl ChartMode {
    pub fn from_graph_type(graph_type: Option<&str>) -> Self {
        match graph_type {
            Some("boxPlot") => ChartMode::BoxPlot,
            _ => ChartMode::Raw,
        }
    }
}

/// Chart data extraction use case
pub struct ChartDataService;

impl ChartDataService {
    /// Parse uploaded delimited text into a table, detecting the
    /// delimiter from a sample of the content.
    pub fn parse_table(content: &str, header_row: usize) -> Result<Table> {
        TableParser::parse_auto_detect(content, header_row)
    }

    /// Column names in parse order, for the front-end's axis pickers.
    pub fn column_names(content: &str, header_row: usize) -> Result<Vec<String>> {
        Ok(Self::parse_table(content, header_row)?.column_names())
    }

    /// Build the response payload for the requested axes and mode.
    ///
    /// The x column is validated in both modes even though the boxplot
    /// payload does not carry it; a bad axis selection should fail the
    /// same way regardless of chart type.
    pub fn chart_payload(
        table: &Table,
        x_axis: &str,
        y_axes: &[String],
        mode: ChartMode,
    ) -> Result<Value> {
        let x_column = table.column(x_axis)?;

        match mode {
            ChartMode::Raw => {
                let mut y_axis = Map::new();
                for (name, values) in table.extract_columns(y_axes)? {
                    y_axis.insert(name, series_value(values));
                }

                let mut payload = Map::new();
                payload.insert("x_axis".to_string(), series_value(x_column.values()));
                payload.insert("y_axis".to_string(), Value::Object(y_axis));
                Ok(Value::Object(payload))
            }
            ChartMode::BoxPlot => {
                let mut payload = Map::new();
                for name in y_axes {
                    let column = table.column(name)?;
                    let cells = column.numeric_cells().ok_or_else(|| {
                        AppError::InsufficientData(format!(
                            "column '{}' has no numeric values",
                            name
                        ))
                    })?;
                    let summary = BoxplotSummary::compute(&cells)?;
                    payload.insert(name.clone(), summary_value(&summary));
                }
                Ok(Value::Object(payload))
            }
        }
    }
}

fn series_value(values: Vec<CellValue>) -> Value {
    Value::Array(values.into_iter().map(cell_value).collect())
}

fn cell_value(cell: CellValue) -> Value {
    match cell {
        CellValue::Integer(i) => Value::Number(i.into()),
        CellValue::Float(v) => serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CellValue::Text(s) => Value::String(s),
        CellValue::Null => Value::Null,
    }
}

fn summary_value(summary: &BoxplotSummary) -> Value {
    let mut map = Map::new();
    for (key, value) in [
        ("min", summary.min),
        ("q1", summary.q1),
        ("median", summary.median),
        ("q3", summary.q3),
        ("max", summary.max),
    ] {
        map.insert(
            key.to_string(),
            serde_json::Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}
