#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Unknown {kind} field '{field}'")]
    UnknownField { kind: &'static str, field: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
