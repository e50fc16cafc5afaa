use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "xlsx")]
    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unsupported format. Use .xlsx, .xls, or .csv files.")]
    UnsupportedFormat(String),

    #[error("No readable sheets were found in this file.")]
    NoSheets,

    #[error("The sheet is empty. Please provide data to work with.")]
    EmptySheet,

    #[error("No columns were detected. Please ensure the first row contains headers.")]
    NoColumns,

    #[error("The sheet is too large to write as .xlsx.")]
    TooLarge,

    #[error("Could not read that file. Please verify the format and try again.")]
    Unreadable(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SheetError>;
