//! Error handling for musicatalog.
//!
//! Provides a unified error type whose [`ErrorKind`] tells callers what
//! stage of a catalog query failed:
//!
//! * [`ErrorKind::MalformedRequest`] - inputs that cannot form a valid request
//! * [`ErrorKind::UnsupportedProperty`] - property expansion not registered for a kind
//! * [`ErrorKind::Transport`] - network, timeout or non-2xx failures
//! * [`ErrorKind::Decode`] - a populated response key had the wrong shape
//! * [`ErrorKind::NotFound`] - a single-identifier lookup matched nothing
//! * [`ErrorKind::AlreadyExists`] - a registry entry would be overwritten
//! * [`ErrorKind::InvalidConfig`] - the configuration file is unreadable or invalid
//!
//! Request-building errors (`MalformedRequest`, `UnsupportedProperty`) are
//! raised before any network call is issued.
//!
//! # Example
//!
//! ```rust
//! use musicatalog::error::{Error, ErrorKind, Result};
//!
//! fn first<T>(items: Vec<T>, id: &str) -> Result<T> {
//!     items
//!         .into_iter()
//!         .next()
//!         .ok_or_else(|| Error::not_found(format!("no match for `{id}`")))
//! }
//! ```

use std::fmt;
use thiserror::Error;

use crate::transport::TransportError;

/// Main error type combining error kind and details.
#[derive(Debug)]
pub struct Error {
    /// Classification of the error
    pub kind: ErrorKind,

    /// Details of the underlying error
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

impl Error {
    /// Attempts to downcast the underlying error to a concrete type.
    ///
    /// # Example
    /// ```
    /// if let Some(transport) = error.downcast::<TransportError>() {
    ///     println!("status: {:?}", transport.status);
    /// }
    /// ```
    #[must_use]
    pub fn downcast<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.error.downcast_ref::<E>()
    }

    /// The HTTP status of a failed transport call, if the service answered.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        self.downcast::<TransportError>()
            .and_then(|transport| transport.status)
    }
}

/// Standard result type for musicatalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories of a catalog query.
#[expect(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorKind {
    /// Inputs cannot form a valid request. Not retryable.
    #[error("malformed request")]
    MalformedRequest,

    /// A requested expansion property is not registered for the entity kind.
    #[error("unsupported property")]
    UnsupportedProperty,

    /// Network or transport failure, including non-2xx responses.
    #[error("transport failure")]
    Transport,

    /// Response bytes do not match the expected shape.
    #[error("decode error")]
    Decode,

    /// A single-identifier lookup returned zero matches.
    #[error("not found")]
    NotFound,

    /// Attempt to overwrite something that is already registered.
    #[error("already exists")]
    AlreadyExists,

    /// Configuration could not be read or is invalid.
    #[error("invalid configuration")]
    InvalidConfig,
}

impl Error {
    /// Creates a new error with specified kind and details.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let err = Error::new(ErrorKind::NotFound, "record label not found");
    /// assert_eq!(err.kind, ErrorKind::NotFound);
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            kind,
            error: error.into(),
        }
    }

    /// Creates an error for inputs that cannot form a valid request.
    ///
    /// Indicates a caller or storefront resolver bug: well-formed inputs
    /// never produce it.
    pub fn malformed_request<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::MalformedRequest, error)
    }

    /// Creates an error for expansion properties that are not registered.
    pub fn unsupported_property<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::UnsupportedProperty, error)
    }

    /// Creates an error for network and transport failures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let err = Error::transport(TransportError::status(StatusCode::UNAUTHORIZED, "{}"));
    /// assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    /// ```
    pub fn transport<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Transport, error)
    }

    /// Creates an error for response payloads of the wrong shape.
    ///
    /// The message should name the key that failed so schema drift can be
    /// diagnosed.
    pub fn decode<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Decode, error)
    }

    /// Creates an error for lookups that matched nothing.
    pub fn not_found<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::NotFound, error)
    }

    /// Creates an error for duplicate registrations.
    pub fn already_exists<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::AlreadyExists, error)
    }

    /// Creates an error for unreadable or invalid configuration.
    pub fn invalid_config<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::InvalidConfig, error)
    }
}

/// Returns the underlying error source.
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

/// Formats the error for display as `"{kind}: {details}"`.
impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}: ", self.kind)?;
        self.error.fmt(fmt)
    }
}

/// Converts HTTP client errors into transport failures.
///
/// Builder errors mean the request itself could not be formed and are
/// reported as `MalformedRequest` instead.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return Self::malformed_request(err);
        }

        Self::transport(TransportError::from(err))
    }
}

/// Converts JSON errors to `Decode`.
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err)
    }
}

/// Converts URL parsing errors to `MalformedRequest`.
impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::malformed_request(e)
    }
}

/// Converts invalid header errors to `MalformedRequest`.
impl From<http::header::InvalidHeaderValue> for Error {
    fn from(e: http::header::InvalidHeaderValue) -> Self {
        Self::malformed_request(e)
    }
}

/// Converts I/O errors to `InvalidConfig`.
///
/// The crate only touches the filesystem to load its configuration.
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::invalid_config(e)
    }
}

/// Converts TOML errors to `InvalidConfig`.
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::invalid_config(e)
    }
}
