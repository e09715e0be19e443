#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// TOML serialization error while writing a config out.
    #[error("config serialize error: {0}")]
    ConfigSerialize(String),
    /// Config validation error (missing major column, bad start row, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A column reference that is not a spreadsheet column letter.
    #[error("{side}: invalid column '{column}'")]
    InvalidColumn { side: String, column: String },
    /// The ledger sheet produced no rooms, so there is nothing to audit.
    #[error("ledger sheet contains no usable rows (expected data from row {start_row})")]
    EmptyLedger { start_row: usize },
    /// CSV decoding error while building an in-memory sheet.
    #[error("CSV error: {0}")]
    Csv(String),
}
