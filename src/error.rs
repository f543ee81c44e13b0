//! Error type shared by the encoder, the response validator, and the client.
//!
//! Every fallible operation in the library returns [`Result`]. Errors are
//! handed back to the caller as-is; nothing is retried or logged here.

/// A specialized `Result` for hn-search operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tag or filter condition supplied by the caller is malformed.
    #[error("invalid search parameter '{value}': {reason}")]
    Validation { value: String, reason: String },

    /// The response payload does not match the expected shape.
    ///
    /// `path` points at the failing field, e.g. `hits[2].created_at`.
    #[error("schema mismatch at {path}: {message}")]
    Schema { path: String, message: String },

    /// A hit's `_tags` list names none of the known item kinds.
    #[error("unknown item kind for tags {tags:?}")]
    UnknownKind { tags: Vec<String> },

    /// A sort order other than `relevance` or `date`.
    #[error("unknown sort order '{0}': expected relevance or date")]
    InvalidSortOrder(String),

    /// Client settings are out of range or the endpoint URL cannot be built.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("search API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn validation(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}
