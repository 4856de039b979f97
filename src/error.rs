use thiserror::Error;

/// Classifies rule loading errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Required path or URL not configured
    NotConfigured,
    /// File open/read failure
    FileError,
    /// List content is unusable (no rules, unparseable line, etc.)
    InvalidData,
    /// Download or verification failure
    DownloadFailed,
}

/// Extraction error types
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Label length must be between 1 and 63 octets, got {length}")]
    LabelOutOfRange { length: usize },

    #[error("Domain length must not exceed 255 octets, got {length}")]
    DomainOutOfRange { length: usize },

    #[error("Invalid punycode: {0}")]
    InvalidEncoding(String),

    #[error("Invalid host: {0}")]
    InvalidHost(String),

    #[error("Invalid extraction policy: {0:#x}")]
    InvalidPolicy(u32),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Inconsistent rules: {0}")]
    InconsistentRules(String),

    #[error("Load error: {message}")]
    LoadError {
        kind: LoadErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    pub(crate) fn load(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        ExtractError::LoadError {
            kind,
            message: message.into(),
        }
    }
}
