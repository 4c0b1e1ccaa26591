use thiserror::Error;

pub type T2lResult<T> = Result<T, T2lError>;

#[derive(Error, Debug)]
pub enum T2lError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel read error: {0}")]
    Excel(String),

    #[error("Excel export error: {0}")]
    Export(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Please enter at least one Chassis number.")]
    NoChassis,

    #[error("Please upload a CSV file first.")]
    NoStock,

    #[error("Mismatch! Number of VINs ({vins}) and Codes ({codes}) must match.")]
    Mismatch { vins: usize, codes: usize },
}
