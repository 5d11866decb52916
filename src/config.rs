//! Client configuration.
//!
//! Tokens are supplied verbatim; how they are obtained is up to the
//! caller. A configuration file looks like:
//!
//! ```toml
//! developer_token = "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9..."
//! music_user_token = "AkZ3..."  # optional
//! storefront = "us"             # optional
//! base_url = "https://api.music.apple.com"  # optional
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use url::Url;
use veil::Redact;

use crate::{
    error::{Error, Result},
    storefront::Storefront,
};

#[derive(Clone, Hash, PartialEq, Eq, Redact)]
pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub app_lang: String,

    pub user_agent: String,

    /// Root of the catalog service; request paths are appended to it.
    pub base_url: Url,

    /// Signed token authorizing catalog access, sent as `Bearer`.
    #[redact]
    pub developer_token: String,

    /// Token of a user account, required to resolve the user's storefront.
    #[redact]
    pub music_user_token: Option<String>,

    /// Fixed storefront; when unset, the user's storefront is resolved.
    pub storefront: Option<Storefront>,
}

/// On-disk configuration.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    developer_token: String,

    #[serde(default)]
    music_user_token: Option<String>,

    #[serde(default)]
    storefront: Option<Storefront>,

    #[serde(default)]
    base_url: Option<Url>,
}

impl Config {
    /// Default root of the catalog service.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.music.apple.com";

    /// Configuration files larger than this are refused.
    const MAX_FILE_SIZE: u64 = 16 * 1024;

    /// Creates a configuration with the default base URL.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidConfig` error if the token is empty, or the
    /// application or OS identification cannot form a `User-Agent`.
    pub fn with_developer_token(developer_token: impl Into<String>) -> Result<Self> {
        let developer_token = developer_token.into();
        if developer_token.trim().is_empty() {
            return Err(Error::invalid_config("developer token must not be empty"));
        }

        let app_name = env!("CARGO_PKG_NAME").to_owned();
        let app_version = env!("CARGO_PKG_VERSION").to_owned();
        let app_lang = "en".to_owned();
        let user_agent = user_agent(&app_name, &app_version, &app_lang)?;

        Ok(Self {
            app_name,
            app_version,
            app_lang,

            user_agent,

            base_url: Url::parse(Self::DEFAULT_BASE_URL)?,

            developer_token,
            music_user_token: None,
            storefront: None,
        })
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidConfig` error if the file cannot be read, is too
    /// large, or is not valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Prevent out-of-memory condition: the file should be small.
        let file_size = fs::metadata(path)?.len();
        if file_size > Self::MAX_FILE_SIZE {
            return Err(Error::invalid_config(format!(
                "{} is too large ({file_size} bytes)",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        debug!("loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Parses the configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidConfig` error if the text is not valid
    /// configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;

        let mut config = Self::with_developer_token(file.developer_token)?;
        config.music_user_token = file
            .music_user_token
            .filter(|token| !token.trim().is_empty());
        config.storefront = file.storefront;

        if let Some(base_url) = file.base_url {
            if base_url.cannot_be_a_base() {
                return Err(Error::invalid_config(format!(
                    "`{base_url}` cannot be a base URL"
                )));
            }
            config.base_url = base_url;
        }

        Ok(config)
    }
}

/// Composes the `User-Agent` from application and OS identification.
fn user_agent(app_name: &str, app_version: &str, app_lang: &str) -> Result<String> {
    // Additional `User-Agent` string checks on top of `reqwest::HeaderValue`.
    let illegal_chars = |chr| chr == '/' || chr == ';';
    if app_name.is_empty()
        || app_name.contains(illegal_chars)
        || app_version.is_empty()
        || app_version.contains(illegal_chars)
        || app_lang.chars().count() != 2
        || app_lang.contains(illegal_chars)
    {
        return Err(Error::invalid_config(format!(
            "application name, version and/or language invalid (\"{app_name}\"; \"{app_version}\"; \"{app_lang}\")"
        )));
    }

    let os_name = match std::env::consts::OS {
        "macos" => "osx",
        other => other,
    };
    let os_version = sysinfo::System::os_version().unwrap_or_else(|| String::from("0"));
    let os_version = os_version.replace(illegal_chars, "-");

    let user_agent = format!("{app_name}/{app_version} (Rust; {os_name}/{os_version}; {app_lang})");
    trace!("user agent: {user_agent}");

    Ok(user_agent)
}
