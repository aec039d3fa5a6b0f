//! Error types shared across the crate

use axum::http::StatusCode;
use std::fmt;

/// Result alias used by library code
pub type Result<T> = std::result::Result<T, Error>;

/// Library error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structurally invalid input (wrong shape, missing required option)
    #[error("validation error: {0}")]
    Validation(String),

    /// A post's frontmatter cannot be used
    #[error("invalid metadata in {path}: {reason}")]
    InvalidMetadata { path: String, reason: String },

    /// Requested content does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// No route matches the requested path
    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("markdown parse error: {0}")]
    Markdown(String),

    #[error("rss generation failed: {0}")]
    Rss(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Message(String),
}

/// Coarse classification of an error, used for status codes and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    RateLimit,
    Server,
    Unknown,
    ContentNotFound,
    InvalidMetadata,
    RouteNotFound,
    MarkdownParse,
    RssGeneration,
}

impl ErrorKind {
    /// Guess the kind of an error from its message.
    ///
    /// Errors coming from collaborators (post sources, custom hooks) only
    /// carry a message, so the order of the checks below matters: the more
    /// specific phrases are tested first.
    pub fn infer(message: &str) -> Self {
        let msg = message.to_lowercase();
        let has = |needle: &str| msg.contains(needle);

        if has("not found") || has("404") {
            if has("route") {
                ErrorKind::RouteNotFound
            } else {
                ErrorKind::ContentNotFound
            }
        } else if has("rate limit") || has("too many requests") || has("429") {
            ErrorKind::RateLimit
        } else if has("network") || has("fetch") || has("timeout") || has("connection") {
            ErrorKind::Network
        } else if has("metadata") || has("frontmatter") || has("front-matter") {
            ErrorKind::InvalidMetadata
        } else if has("markdown") || has("parse") {
            ErrorKind::MarkdownParse
        } else if has("rss") || has("feed") {
            ErrorKind::RssGeneration
        } else if has("validation") || has("invalid") || has("required") {
            ErrorKind::Validation
        } else if has("server") || has("500") {
            ErrorKind::Server
        } else {
            ErrorKind::Unknown
        }
    }

    /// HTTP status that a route should answer with for this kind
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::ContentNotFound | ErrorKind::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Network => "NETWORK",
            ErrorKind::RateLimit => "RATE_LIMIT",
            ErrorKind::Server => "SERVER",
            ErrorKind::Unknown => "UNKNOWN",
            ErrorKind::ContentNotFound => "CONTENT_NOT_FOUND",
            ErrorKind::InvalidMetadata => "INVALID_METADATA",
            ErrorKind::RouteNotFound => "ROUTE_NOT_FOUND",
            ErrorKind::MarkdownParse => "MARKDOWN_PARSE",
            ErrorKind::RssGeneration => "RSS_GENERATION",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Kind of this error; explicit variants map directly, the rest fall
    /// back to message inference.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::InvalidMetadata { .. } => ErrorKind::InvalidMetadata,
            Error::NotFound(_) => ErrorKind::ContentNotFound,
            Error::RouteNotFound(_) => ErrorKind::RouteNotFound,
            Error::Markdown(_) => ErrorKind::MarkdownParse,
            Error::Rss(_) => ErrorKind::RssGeneration,
            Error::Yaml(_) => ErrorKind::MarkdownParse,
            Error::Io(_) | Error::Json(_) | Error::Message(_) => {
                ErrorKind::infer(&self.to_string())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_kind() {
        assert_eq!(ErrorKind::infer("Post not found"), ErrorKind::ContentNotFound);
        assert_eq!(ErrorKind::infer("Route not found: /x"), ErrorKind::RouteNotFound);
        assert_eq!(ErrorKind::infer("Rate limit exceeded"), ErrorKind::RateLimit);
        assert_eq!(ErrorKind::infer("network timeout"), ErrorKind::Network);
        assert_eq!(ErrorKind::infer("bad frontmatter"), ErrorKind::InvalidMetadata);
        assert_eq!(ErrorKind::infer("RSS feed broke"), ErrorKind::RssGeneration);
        assert_eq!(ErrorKind::infer("siteUrl is required"), ErrorKind::Validation);
        assert_eq!(ErrorKind::infer("something odd"), ErrorKind::Unknown);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::NotFound("post".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Validation("siteUrl".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Message("internal server error".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ErrorKind::ContentNotFound.to_string(), "CONTENT_NOT_FOUND");
    }
}
