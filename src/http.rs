//! HTTP transport with rate limiting for the catalog service.
//!
//! This module provides a wrapper around `reqwest::Client` that adds:
//! * Request rate limiting to stay within the service's quotas
//! * Authorization headers for the developer and user tokens
//! * Consistent timeouts and headers
//!
//! # Rate Limiting
//!
//! * 20 calls per second
//! * Allows bursts up to the maximum calls per interval
//! * Requests that would exceed the limit are delayed
//!
//! Requests are never retried: a failed request surfaces as a `Transport`
//! error carrying the status and raw body.
//!
//! # Example
//!
//! ```rust
//! use musicatalog::{config::Config, http::Client, transport::Transport};
//!
//! let client = Client::new(&config)?;
//! let body = client.get(url).await?;
//! ```

use std::{num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION},
    Url,
};

use crate::{
    config::Config,
    error::{Error, Result},
    transport::{Transport, TransportError},
};

/// HTTP client with built-in rate limiting and authorization.
pub struct Client {
    /// Underlying client carrying the default headers and timeouts.
    http_client: reqwest::Client,

    /// Rate limiter for API quota compliance.
    rate_limiter: DefaultDirectRateLimiter,
}

impl Client {
    /// Standard rate limit interval.
    const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(1);

    /// Maximum allowed API calls per interval.
    const RATE_LIMIT_CALLS_PER_INTERVAL: u8 = 20;

    /// Duration to keep idle connections alive.
    const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Duration to wait for individual network reads.
    const READ_TIMEOUT: Duration = Duration::from_secs(10);

    /// Duration to wait for a complete request, including the body.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Header carrying the user token.
    const MUSIC_USER_TOKEN: HeaderName = HeaderName::from_static("music-user-token");

    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if a token cannot be sent as a
    /// header value, or if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // Not having `Accept-Language` set is non-fatal.
        if let Ok(lang) = HeaderValue::from_str(&config.app_lang) {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", config.developer_token))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        if let Some(ref token) = config.music_user_token {
            let mut user_token = HeaderValue::from_str(token)?;
            user_token.set_sensitive(true);
            headers.insert(Self::MUSIC_USER_TOKEN, user_token);
        }

        let http_client = reqwest::Client::builder()
            .tcp_keepalive(Self::KEEPALIVE_TIMEOUT)
            .read_timeout(Self::READ_TIMEOUT)
            .timeout(Self::REQUEST_TIMEOUT)
            .default_headers(headers)
            .user_agent(&config.user_agent);

        // Rate limit own requests as to not DoS the catalog infrastructure.
        let replenish_interval =
            Self::RATE_LIMIT_INTERVAL / u32::from(Self::RATE_LIMIT_CALLS_PER_INTERVAL);
        let quota = Quota::with_period(replenish_interval)
            .ok_or_else(|| Error::malformed_request("quota time interval is zero"))?
            .allow_burst(
                NonZeroU32::new(Self::RATE_LIMIT_CALLS_PER_INTERVAL.into())
                    .ok_or_else(|| Error::malformed_request("calls per interval is zero"))?,
            );

        Ok(Self {
            http_client: http_client.build()?,
            rate_limiter: governor::RateLimiter::direct(quota),
        })
    }
}

#[async_trait]
impl Transport for Client {
    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        // No need to await with jitter because the level of concurrency is low.
        self.rate_limiter.until_ready().await;

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body);
            warn!("catalog service answered {status}");
            trace!("{body}");
            return Err(Error::transport(TransportError::status(status, body)));
        }

        Ok(body.to_vec())
    }
}
