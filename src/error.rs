use thiserror::Error;

/// Authentication and API-call error types.
///
/// Each variant is distinguishable by the caller so the login form can
/// show accurate feedback instead of a generic failure.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No response was received at all (DNS failure, connection refused,
    /// timeout). Transient: never treated as proof the token is invalid.
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code.
    #[error("request failed ({status}): {message}")]
    BadStatus { status: u16, message: String },

    /// The server answered 2xx with an empty body.
    #[error("empty response from server")]
    EmptyBody,

    /// The server answered 2xx with a body that is not valid JSON.
    #[error("invalid response from server")]
    MalformedJson,

    /// Well-formed JSON envelope with `success != true`.
    #[error("{0}")]
    Rejected(String),

    /// Valid JSON missing the fields the operation requires.
    #[error("malformed response from server")]
    MalformedShape,

    /// The server answered 401/403: the bearer token is no longer valid.
    #[error("session expired or unauthorized")]
    InvalidToken,
}

impl AuthError {
    /// Check if the error is a transient connectivity failure.
    ///
    /// Transient failures must not evict the persisted token; every other
    /// variant means the server actually answered.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Transport(_))
    }

    /// Check if the error proves the current token is invalid.
    pub fn invalidates_token(&self) -> bool {
        matches!(self, AuthError::InvalidToken)
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err.to_string())
    }
}

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Authentication / API errors
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Token persistence errors
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if the error is a transient connectivity failure
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Auth(e) if e.is_transient())
    }

    /// Borrow the underlying auth error, if any
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            AppError::Auth(e) => Some(e),
            _ => None,
        }
    }
}
