//! Storefront (region) resolution.
//!
//! Every catalog query is scoped to a storefront, a short region code such
//! as `us` or `nl`. The code is resolved once per request and copied into
//! the request URL.
//!
//! * [`Storefront`] resolves to itself, for callers with a fixed region.
//! * [`UserStorefront`] asks the service for the storefront of the account
//!   behind the configured user token.

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use url::Url;

use crate::{
    error::{Error, Result},
    protocol,
    transport::Transport,
};

/// Supplies the storefront to query against.
#[async_trait]
pub trait StorefrontResolver: Send + Sync {
    /// Returns the caller's current storefront.
    ///
    /// # Errors
    ///
    /// Resolver-specific; errors are propagated to the caller unchanged.
    async fn current_storefront(&self) -> Result<Storefront>;
}

/// A validated storefront code.
///
/// Codes are lowercased and may only contain ASCII alphanumerics, `-` and
/// `_`, so they always form a single clean URL path segment.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, DeserializeFromStr)]
pub struct Storefront(String);

impl Storefront {
    /// Returns the storefront code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Storefront {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::malformed_request("storefront must not be empty"));
        }

        if let Some(illegal) = s
            .chars()
            .find(|chr| !(chr.is_ascii_alphanumeric() || *chr == '-' || *chr == '_'))
        {
            return Err(Error::malformed_request(format!(
                "storefront `{s}` contains illegal character `{illegal}`"
            )));
        }

        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
impl StorefrontResolver for Storefront {
    async fn current_storefront(&self) -> Result<Storefront> {
        Ok(self.clone())
    }
}

/// Resolves the storefront of the signed-in user.
///
/// Queries `GET /v1/me/storefront`, which requires the transport to send a
/// user token.
pub struct UserStorefront {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

/// Response shape of the user storefront endpoint.
#[derive(Clone, Debug, Deserialize)]
struct StorefrontResponse {
    #[serde(default)]
    data: Vec<StorefrontData>,
}

#[derive(Clone, Debug, Deserialize)]
struct StorefrontData {
    id: Storefront,
}

impl UserStorefront {
    /// Path of the user storefront endpoint, relative to the base URL.
    const STOREFRONT_PATH: [&'static str; 3] = ["v1", "me", "storefront"];

    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }
}

#[async_trait]
impl StorefrontResolver for UserStorefront {
    async fn current_storefront(&self) -> Result<Storefront> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| {
                Error::malformed_request(format!("`{}` cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(Self::STOREFRONT_PATH);

        debug!("resolving user storefront: {url}");
        let body = self.transport.get(url).await?;

        let response: StorefrontResponse = protocol::json(&body, "user storefront")?;
        response
            .data
            .into_iter()
            .next()
            .map(|data| data.id)
            .ok_or_else(|| Error::not_found("no storefront for user"))
    }
}
