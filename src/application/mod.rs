pub mod use_cases;

pub use use_cases::chart_data::{ChartDataService, ChartMode};
