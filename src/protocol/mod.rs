//! Wire types and parsing for the music catalog service.
//!
//! # Submodules
//!
//! * [`catalog`] - entity kinds, entities, collections, chart and resource
//!   requests, and the URL builder
//!
//! # Shared Functionality
//!
//! [`json`] parses a response body into a typed value and logs it:
//!
//! ```
//! use musicatalog::protocol;
//!
//! let response: MyType = protocol::json(&body, "charts")?;
//!
//! // Response is logged at:
//! // - TRACE level if successful
//! // - ERROR level with details if parsing fails
//! ```

pub mod catalog;

use crate::error::Result;
use serde::Deserialize;
use std::fmt::Debug;

/// Parses and logs JSON responses from the catalog service.
///
/// # Arguments
///
/// * `body` - Response body bytes to parse
/// * `origin` - Description of API endpoint for logging
///
/// # Errors
///
/// Returns a `Decode` error if:
/// * Response body is not valid JSON
/// * JSON structure doesn't match type `T`
///
/// # Logging
///
/// * Success: Logs parsed structure at TRACE level
/// * Parse Error: Logs raw JSON at TRACE level if valid JSON
/// * Invalid JSON: Logs error and raw text at ERROR level
pub fn json<T>(body: &[u8], origin: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Debug,
{
    match serde_json::from_slice(body) {
        Ok(result) => {
            trace!("{}: {result:#?}", origin);
            Ok(result)
        }
        Err(e) => {
            if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
                error!("{}: unexpected response shape ({e})", origin);
                trace!("{}: {json:#?}", origin);
            } else {
                error!("{}: failed parsing response ({e:?})", origin);
                trace!("{}", String::from_utf8_lossy(body));
            }
            Err(e.into())
        }
    }
}
