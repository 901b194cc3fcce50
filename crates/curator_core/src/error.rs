use std::fmt;

/// A failed backend call, already classified. The message is what the user
/// sees in an error banner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No response: connection refused, DNS, timeout.
    Transport,
    /// Response received with a non-2xx status.
    HttpStatus(u16),
    /// Body is not the expected envelope.
    MalformedResponse,
    /// Envelope parsed but its code signals failure.
    Application { code: String },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Application { code } => write!(f, "application error {code}"),
        }
    }
}

/// Why the loader refused to issue a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("page numbers start at 1")]
    InvalidPage,
    #[error("a page request is already outstanding")]
    Busy,
}
