#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("unsupported data file format '{extension}'. Expected .csv, .xls or .xlsx")]
    UnsupportedFormat { extension: String },

    #[error(
        "malformed Medications entry for '{patient}': expected 4 pipe-separated fields, found {found}"
    )]
    MedicationFieldCount { patient: String, found: usize },

    #[error(
        "unable to read the uploaded PDF template ({reason}). Please re-save it using 'Print to PDF' and try again"
    )]
    TemplateUnreadable { reason: String },

    #[error("spreadsheet parsing failed: {0}")]
    Spreadsheet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
