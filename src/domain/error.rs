use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    MissingUpload,
    InvalidExtension(String),
    ParseError(String),
    ColumnNotFound(String),
    InsufficientData(String),
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingUpload => write!(f, "No file part in request"),
            AppError::InvalidExtension(name) => write!(f, "Invalid file extension: {}", name),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ColumnNotFound(name) => write!(f, "Column not found: {}", name),
            AppError::InsufficientData(msg) => write!(f, "Insufficient data: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
