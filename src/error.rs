use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnricherError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid record{}: {message}", line_suffix(.line))]
    Validation {
        line: Option<usize>,
        message: String,
    },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Company not available in the current selection: {0}")]
    UnknownCompany(String),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, EnricherError>;
