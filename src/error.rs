//! Request-level errors and their HTTP mapping

use hyper::StatusCode;

/// Errors surfaced to clients by the student routes.
///
/// Each variant maps to exactly one status code and a fixed plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No route matches the method and path
    #[error("not found")]
    RouteNotFound,

    /// The id is well formed but nothing is stored under it
    #[error("user not found")]
    StudentNotFound,

    /// A body could not be decoded or a record could not be encoded
    #[error("json codec failure: {0}")]
    Codec(#[from] serde_json::Error),

    /// The request body could not be read (connection error or size limit)
    #[error("failed to read request body: {0}")]
    Body(String),

    /// The request task itself failed
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound | Self::StudentNotFound => StatusCode::NOT_FOUND,
            Self::Codec(_) | Self::Body(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body sent to the client. Internal detail stays in the error log.
    pub const fn body(&self) -> &'static str {
        match self {
            Self::RouteNotFound => "not found",
            Self::StudentNotFound => "user not found",
            Self::Codec(_) | Self::Body(_) | Self::Internal(_) => "internal server error",
        }
    }

    /// Whether the failure is worth an error-log line
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Codec(_) | Self::Body(_) | Self::Internal(_))
    }
}
