use serde::Serialize;
use thiserror::Error;

pub type SiftResult<T> = Result<T, SiftError>;

#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Missing input: {0}")]
    InputMissing(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    UploadTooLarge(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Closed set of failure causes, reported alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputMissing,
    ParseError,
    ValidationError,
    UploadTooLarge,
    ExportError,
    IoError,
}

impl SiftError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SiftError::InputMissing(_) => ErrorKind::InputMissing,
            SiftError::Parse(_) => ErrorKind::ParseError,
            SiftError::Validation(_) => ErrorKind::ValidationError,
            SiftError::UploadTooLarge(_) => ErrorKind::UploadTooLarge,
            SiftError::Export(_) => ErrorKind::ExportError,
            SiftError::Io(_) => ErrorKind::IoError,
        }
    }

    /// True when the caller sent something unusable (as opposed to a server-side failure)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SiftError::InputMissing(_)
                | SiftError::Parse(_)
                | SiftError::Validation(_)
                | SiftError::UploadTooLarge(_)
        )
    }
}

impl From<calamine::XlsxError> for SiftError {
    fn from(e: calamine::XlsxError) -> Self {
        SiftError::Parse(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SiftError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SiftError::Export(e.to_string())
    }
}
