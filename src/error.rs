//! Error types shared by the API client and the interactive menu.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single HTTP call failed.
#[derive(Debug, Error)]
pub enum RequestFailure {
    /// Network error, timeout, or an undecodable response body.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{status} - {body}")]
    Status { status: StatusCode, body: String },
}

impl RequestFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestFailure::Transport(e) => e.status(),
            RequestFailure::Status { status, .. } => Some(*status),
        }
    }
}

/// Errors returned by [`crate::api::ApiClient`], tagged by operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("connection failed: {0}")]
    Connection(#[source] RequestFailure),

    #[error("listing failed: {0}")]
    List(#[source] RequestFailure),

    #[error("search failed: {0}")]
    Search(#[source] RequestFailure),

    #[error("grab failed: {0}")]
    Grab(#[source] RequestFailure),
}

impl ApiError {
    fn failure(&self) -> &RequestFailure {
        match self {
            ApiError::Connection(f) | ApiError::List(f) | ApiError::Search(f) | ApiError::Grab(f) => f,
        }
    }

    /// HTTP status reported by the server, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        self.failure().status()
    }

    /// Classify a failed grab by status code.
    pub fn grab_failure(&self) -> GrabFailure {
        GrabFailure::from_status(self.status())
    }
}

/// The grab outcomes the operator is told about separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabFailure {
    /// The release reference expired from the server's search cache.
    NotInCache,
    /// The server could not download the release from its indexer.
    IndexerFetchFailed,
    Other,
}

impl GrabFailure {
    pub fn from_status(status: Option<StatusCode>) -> Self {
        match status {
            Some(StatusCode::NOT_FOUND) => GrabFailure::NotInCache,
            Some(StatusCode::CONFLICT) => GrabFailure::IndexerFetchFailed,
            _ => GrabFailure::Other,
        }
    }
}

/// Operator input the menu could not use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid option. Please select 1-5.")]
    InvalidOption,

    #[error("Invalid number.")]
    NotANumber,

    #[error("Invalid selection.")]
    OutOfRange { index: i64, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(code: u16) -> ApiError {
        ApiError::Grab(RequestFailure::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        })
    }

    #[test]
    fn grab_failures_are_classified_by_status() {
        assert_eq!(status_error(404).grab_failure(), GrabFailure::NotInCache);
        assert_eq!(status_error(409).grab_failure(), GrabFailure::IndexerFetchFailed);
        assert_eq!(status_error(500).grab_failure(), GrabFailure::Other);
        assert_eq!(GrabFailure::from_status(None), GrabFailure::Other);
    }

    #[test]
    fn messages_include_status_and_body() {
        let err = ApiError::Search(RequestFailure::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "indexers down".into(),
        });
        assert_eq!(err.to_string(), "search failed: 502 Bad Gateway - indexers down");
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }
}
