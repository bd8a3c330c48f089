use std::{error::Error as StdError, fmt};

use bytes::Bytes;
use http::StatusCode;

/// Library result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for request building, transport, and API responses.
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration or parameters.
    InvalidConfig { message: String },

    /// Transport-level failure (HTTP client, IO, TLS, timeouts).
    Transport {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },

    /// Service returned a non-success status.
    Api {
        operation: &'static str,
        status: StatusCode,
        body: Bytes,
        body_snippet: Option<String>,
    },

    /// Response decode or parse failure.
    Decode {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    },

    /// The caller cancelled the operation before it completed.
    Cancelled { operation: &'static str },
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { message } => f
                .debug_struct("InvalidConfig")
                .field("message", message)
                .finish(),
            Self::Transport { message, source } => f
                .debug_struct("Transport")
                .field("message", message)
                .field("source", source)
                .finish(),
            Self::Api {
                operation,
                status,
                body,
                body_snippet,
            } => f
                .debug_struct("Api")
                .field("operation", operation)
                .field("status", status)
                .field("body_len", &body.len())
                .field("body_snippet", body_snippet)
                .finish(),
            Self::Decode { message, source } => f
                .debug_struct("Decode")
                .field("message", message)
                .field("source", source)
                .finish(),
            Self::Cancelled { operation } => f
                .debug_struct("Cancelled")
                .field("operation", operation)
                .finish(),
        }
    }
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a transport error with optional source.
    pub fn transport(
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source,
        }
    }

    /// Creates a decode error with optional source.
    pub fn decode(
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self::Decode {
            message: message.into(),
            source,
        }
    }

    pub(crate) fn api(operation: &'static str, status: StatusCode, body: Bytes) -> Self {
        Self::Api {
            operation,
            status,
            body_snippet: body_snippet(&body),
            body,
        }
    }

    pub(crate) fn cancelled(operation: &'static str) -> Self {
        Self::Cancelled { operation }
    }

    /// Returns an HTTP status when available.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::InvalidConfig { .. }
            | Self::Transport { .. }
            | Self::Decode { .. }
            | Self::Cancelled { .. } => None,
        }
    }

    /// Returns the raw response body of a non-success response.
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Api { body, .. } => Some(body),
            Self::InvalidConfig { .. }
            | Self::Transport { .. }
            | Self::Decode { .. }
            | Self::Cancelled { .. } => None,
        }
    }

    /// Returns true for connection, TLS, IO, and timeout failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true if the response could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns true if the caller cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { message } => write!(f, "invalid config: {message}"),
            Self::Transport { message, .. } => write!(f, "transport error: {message}"),
            Self::Api {
                operation,
                status,
                body_snippet,
                ..
            } => match body_snippet.as_deref() {
                Some(snippet) if !snippet.trim().is_empty() => {
                    write!(f, "api error: {operation} returned {status} ({snippet})")
                }
                _ => write!(f, "api error: {operation} returned {status}"),
            },
            Self::Decode { message, .. } => write!(f, "decode error: {message}"),
            Self::Cancelled { operation } => write!(f, "{operation} was cancelled"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport { source, .. } | Self::Decode { source, .. } => {
                source.as_deref().map(|e| e as &(dyn StdError + 'static))
            }
            Self::InvalidConfig { .. } | Self::Api { .. } | Self::Cancelled { .. } => None,
        }
    }
}

const MAX_SNIPPET_LEN: usize = 4096;

/// Lossy UTF-8 prefix of an error body, cut on a char boundary.
fn body_snippet(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_SNIPPET_LEN {
        return Some(text.into_owned());
    }

    let mut cut = MAX_SNIPPET_LEN;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    Some(format!("{}...", &text[..cut]))
}
