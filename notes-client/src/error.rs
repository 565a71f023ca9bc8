use crate::transport::GraphQlError;

/// Coarse error classes reported by the server in `extensions.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed arguments.
    Validation,
    /// The operation referenced a note that does not exist.
    NotFound,
    /// Anything that went wrong on the server side.
    Internal,
}

impl ErrorKind {
    fn from_code(code: &str) -> Self {
        // Has to be kept in sync with the server's error codes.
        match code {
            "VALIDATION_ERROR" => Self::Validation,
            "NOT_FOUND" => Self::NotFound,
            _ => Self::Internal,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to reach the notes service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notes service responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("{message}")]
    GraphQl { kind: ErrorKind, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Builds an error from the first entry of a response's `errors`.
    /// Requests rejected before execution come back without `data` and
    /// without a code, those are validation failures.
    pub(crate) fn from_graphql(errors: &[GraphQlError], has_data: bool) -> Self {
        let first = errors.first();
        let message = first.map_or_else(|| "unknown error".to_string(), |e| e.message.clone());
        let kind = match first.and_then(GraphQlError::code) {
            Some(code) => ErrorKind::from_code(code),
            None if !has_data => ErrorKind::Validation,
            None => ErrorKind::Internal,
        };

        Self::GraphQl { kind, message }
    }

    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::GraphQl { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether the service could not be reached at all.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status(_))
    }
}
