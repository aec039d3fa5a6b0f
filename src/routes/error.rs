//! Errors returned by route handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::fmt;

use crate::error::{Error, ErrorKind};

/// An error carrying the HTTP status a route answers with
#[derive(Debug, Clone)]
pub struct RouteError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub message: String,
}

impl RouteError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            kind: ErrorKind::infer(&message),
            message,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            kind: ErrorKind::ContentNotFound,
            message: message.into(),
        }
    }
}

impl From<&Error> for RouteError {
    fn from(err: &Error) -> Self {
        Self {
            status: err.status(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<Error> for RouteError {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for RouteError {}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "status": self.status.as_u16(),
                "kind": self.kind.to_string(),
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error() {
        let err = RouteError::from(Error::NotFound("Post".into()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.kind, ErrorKind::ContentNotFound);
        assert_eq!(err.message, "Post not found");

        let err = RouteError::new(StatusCode::INTERNAL_SERVER_ERROR, "connection reset");
        assert_eq!(err.kind, ErrorKind::Network);
    }

    #[test]
    fn test_response_status() {
        let response = RouteError::not_found("nothing here").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
