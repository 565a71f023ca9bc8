//! Maps service errors onto GraphQL errors.
//!
//! Every error carries a coarse `code` extension so that clients can tell a
//! bad request from a missing note or a server-side failure without parsing
//! messages. The codes have to stay in sync with the client's `ErrorKind`.

use async_graphql::{Error, ErrorExtensions};

use crate::service::ServiceError;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

impl ServiceError {
    const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => VALIDATION_ERROR,
            Self::NotFound(_) => NOT_FOUND,
            Self::Storage(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> Error {
        let code = self.code();
        Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

/// Logs `err` in the context of `operation` and converts it for the response.
/// Storage details only go to the log, the caller sees a generic message.
pub fn field_error(operation: &str, err: &ServiceError) -> Error {
    match err {
        ServiceError::Storage(source) => {
            tracing::error!("{operation} failed: {source}");
        }
        other => tracing::debug!("{operation} rejected: {other}"),
    }

    err.extend()
}
