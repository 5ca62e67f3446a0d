// ============================================================
// TABLE PARSER
// ============================================================
// Parse delimited text into a typed Table with a header-row offset

use csv::{ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

/// Delimited-text parser. Rows before `header_row` are discarded, the row
/// at `header_row` supplies column names, everything after it is data.
pub struct TableParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for TableParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl TableParser {
    /// Create a new parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Decode an uploaded body, accepting UTF-8 and falling back to
    /// Windows-1252 for legacy exports.
    pub fn decode(bytes: &[u8]) -> String {
        match std::str::from_utf8(bytes) {
            Ok(content) => content.to_string(),
            Err(_) => {
                let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
                content.into_owned()
            }
        }
    }

    /// Parse delimited content into a typed table.
    pub fn parse(&self, content: &str, header_row: usize) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .has_headers(false) // The header offset is applied below
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse row {}: {}", index + 1, e))
            })?;
            records.push(record);
        }

        if header_row >= records.len() {
            return Err(AppError::ParseError(format!(
                "Header row {} is out of range ({} rows available)",
                header_row,
                records.len()
            )));
        }

        let names: Vec<String> = records[header_row].iter().map(|s| s.to_string()).collect();
        let rows: Vec<Vec<String>> = records[header_row + 1..]
            .iter()
            .map(|record| record.iter().map(|s| s.to_string()).collect())
            .collect();

        Ok(Table::from_records(names, rows))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &candidates {
            let sample_lines: Vec<_> = content.lines().take(10).collect();

            if sample_lines.is_empty() {
                continue;
            }

            let mut field_counts = Vec::new();

            for line in &sample_lines {
                let count = line.chars().filter(|&c| c as u8 == delimiter).count();
                field_counts.push(count);
            }

            // Score by consistency (low standard deviation) and frequency
            if !field_counts.is_empty() {
                let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
                let variance = field_counts
                    .iter()
                    .map(|&x| (x as f32 - avg).powi(2))
                    .sum::<f32>()
                    / field_counts.len() as f32;

                let score = avg / (1.0 + variance.sqrt());

                if score > best_score {
                    best_score = score;
                    best_delimiter = delimiter;
                }
            }
        }

        best_delimiter
    }

    /// Parse with automatic delimiter detection.
    pub fn parse_auto_detect(content: &str, header_row: usize) -> Result<Table> {
        let delimiter = Self::detect_delimiter(content);
        Self::new().with_delimiter(delimiter).parse(content, header_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::CellValue;

    #[test]
    fn test_parse_simple_csv() {
        let content = "name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = TableParser::new().parse(content, 0).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["name", "age", "city"]);
        assert_eq!(
            table.column("age").unwrap().values(),
            vec![CellValue::Integer(30), CellValue::Integer(25)]
        );
    }

    #[test]
    fn test_header_row_offset_discards_leading_rows() {
        let content = "exported by tool v2\n\
                       name,score\n\
                       a,1\n\
                       b,2\n\
                       c,3";
        let table = TableParser::new().parse(content, 1).unwrap();

        assert_eq!(table.column_names(), vec!["name", "score"]);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_header_row_out_of_range() {
        let content = "a,b\n1,2";
        let err = TableParser::new().parse(content, 5).unwrap_err();
        assert!(matches!(err, crate::domain::error::AppError::ParseError(_)));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = TableParser::new().parse("", 0).unwrap_err();
        assert!(matches!(err, crate::domain::error::AppError::ParseError(_)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(TableParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(TableParser::detect_delimiter("a;b;c\nd;e;f"), b';');
    }

    #[test]
    fn test_parse_auto_detect_semicolons() {
        let content = "x;y\n1;2\n3;4";
        let table = TableParser::parse_auto_detect(content, 0).unwrap();
        assert_eq!(table.column_names(), vec!["x", "y"]);
        assert_eq!(
            table.column("y").unwrap().values(),
            vec![CellValue::Integer(2), CellValue::Integer(4)]
        );
    }

    #[test]
    fn test_row_count_matches_rectangular_input() {
        // n rows with header at h leaves n - h - 1 data rows.
        let n = 6;
        let h = 2;
        let mut lines: Vec<String> = (0..h).map(|i| format!("junk{},junk", i)).collect();
        lines.push("a,b".to_string());
        for i in 0..(n - h - 1) {
            lines.push(format!("{},{}", i, i * 2));
        }
        let content = lines.join("\n");

        let table = TableParser::new().parse(&content, h).unwrap();
        assert_eq!(table.row_count(), n - h - 1);
        assert_eq!(table.column("a").unwrap().len(), n - h - 1);
    }

    #[test]
    fn test_decode_utf8_passthrough() {
        assert_eq!(TableParser::decode("a,b\n1,2".as_bytes()), "a,b\n1,2");
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // 0xE9 is e-acute in Windows-1252 and invalid as a UTF-8 start byte.
        let bytes = b"caf\xe9,1";
        assert_eq!(TableParser::decode(bytes), "café,1");
    }
}
