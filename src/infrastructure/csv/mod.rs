// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Delimited-text parsing, encoding detection, delimiter detection

mod table_parser;

pub use table_parser::TableParser;
