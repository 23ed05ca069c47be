use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("catalog response does not contain a list of entries")]
    UnexpectedShape,
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("could not read spreadsheet: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("could not parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not parse JSON rows: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported spreadsheet format: {0:?}")]
    UnsupportedFormat(String),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("spreadsheet has no header row")]
    EmptySheet,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not build template workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No valid questions found")]
    NoValidQuestions,

    #[error("Question type catalog is empty, rows cannot be validated")]
    MissingCatalog,

    /// The server answered but refused the batch.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unexpected response from server: {0}")]
    Catalog(#[from] CatalogError),
}
