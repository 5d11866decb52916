//! The seam between request building and the network.
//!
//! The catalog core only needs one capability from the network: send a
//! `GET` for a fully-formed URL and get the response bytes back, or fail.
//! [`Transport`] captures exactly that, so the HTTP stack in [`http`] can
//! be swapped for a fixture in tests.
//!
//! Deadlines, cancellation and retries are the transport's business. The
//! core never interprets a [`TransportError`] beyond passing it upward.
//!
//! [`http`]: crate::http

use std::fmt;

use async_trait::async_trait;
use http::StatusCode;
use url::Url;

use crate::error::Result;

/// Executes catalog requests.
///
/// Implementations must be safe to share between concurrent fetches.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a `GET` request for `url` and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Transport`] error on connection failures,
    /// timeouts and non-2xx responses.
    ///
    /// [`ErrorKind::Transport`]: crate::error::ErrorKind::Transport
    async fn get(&self, url: Url) -> Result<Vec<u8>>;
}

/// Failure reported by a [`Transport`].
///
/// Carries the HTTP status and raw error body when the service answered,
/// so callers can inspect what went wrong without the core interpreting it.
#[derive(Debug)]
pub struct TransportError {
    /// HTTP status, if a response was received
    pub status: Option<StatusCode>,

    /// Raw response body, if any was received
    pub body: Option<String>,

    /// Underlying client error, if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Creates an error for a non-2xx response.
    #[must_use]
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            status: Some(status),
            body: (!body.is_empty()).then_some(body),
            source: None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.source) {
            (Some(status), _) => write!(f, "HTTP {status}")?,
            (None, Some(source)) => write!(f, "{source}")?,
            (None, None) => write!(f, "no response")?,
        }

        if let Some(ref body) = self.body {
            write!(f, " ({body})")?;
        }

        Ok(())
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status(),
            body: None,
            source: Some(Box::new(err)),
        }
    }
}
