use thiserror::Error;

/// Failure taxonomy for the mutation engine.
///
/// Parse and translation failures (`InvalidFormat`) are raised before any
/// remote call. Remote failures carry the remote status message so callers
/// see what the API actually rejected. `NoOp` is not a failure: it marks a
/// well-formed request that resolved to zero primitive operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("spreadsheet has no sheets")]
    EmptyDocument,

    #[error("element at index {0} is not a table")]
    NotATable(i64),

    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("request resolved to no operations")]
    NoOp,
}

impl EngineError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn index_out_of_range(message: impl Into<String>) -> Self {
        Self::IndexOutOfRange(message.into())
    }

    /// True for failures produced locally, before any remote call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat(_) | Self::IndexOutOfRange(_) | Self::NoOp
        )
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct InvalidParamsError {
    tool: &'static str,
    message: String,
    path: Option<String>,
}

impl InvalidParamsError {
    pub fn new(tool: &'static str, message: impl Into<String>) -> Self {
        Self {
            tool,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn tool(&self) -> &'static str {
        self.tool
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
