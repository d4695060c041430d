//! Application configuration loaded via OrthoConfig.
//!
//! Every value may come from `EATOPIA_*` environment variables, a config
//! file or the command line. Provider keys are optional: a missing key
//! selects the fixture adapter for that port, so a bare checkout serves the
//! whole API without credentials.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Configuration values controlling the server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EATOPIA")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string; in-memory storage when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Identity Toolkit web API key.
    pub identity_api_key: Option<String>,
    /// EmailJS service id.
    pub emailjs_service_id: Option<String>,
    /// EmailJS template id.
    pub emailjs_template_id: Option<String>,
    /// EmailJS public key.
    pub emailjs_public_key: Option<String>,
    /// Unsplash access key.
    pub unsplash_access_key: Option<String>,
    /// Pixabay API key.
    pub pixabay_api_key: Option<String>,
    /// Gemini API key.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: Option<String>,
    /// Timeout applied to every outbound HTTP request.
    pub http_timeout_secs: Option<u64>,
    /// Comma-separated origins allowed to open WebSocket connections.
    pub allowed_origins: Option<String>,
    /// Also accept `http://localhost:<port>` origins.
    #[ortho_config(default = false)]
    pub allow_localhost: bool,
}

/// A configured value that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid allowed origin '{value}': {source}")]
    InvalidOrigin {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// EmailJS credentials, present only when all three are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsKeys<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub public_key: &'a str,
}

impl AppSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }

    /// Return the outbound HTTP timeout, falling back to ten seconds.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Return the pool size, falling back to ten connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Return the EmailJS credentials when every part is set and non-blank.
    pub fn emailjs_keys(&self) -> Option<EmailJsKeys<'_>> {
        Some(EmailJsKeys {
            service_id: non_blank(self.emailjs_service_id.as_deref())?,
            template_id: non_blank(self.emailjs_template_id.as_deref())?,
            public_key: non_blank(self.emailjs_public_key.as_deref())?,
        })
    }

    /// Return a provider key, treating blank values as unset.
    pub fn key(value: Option<&str>) -> Option<String> {
        non_blank(value).map(str::to_owned)
    }

    /// Parse the configured WebSocket origin allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidOrigin`] for the first entry that is
    /// not an absolute URL.
    pub fn allowed_origins(&self) -> Result<Vec<Url>, SettingsError> {
        self.allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::InvalidOrigin {
                    value: value.to_owned(),
                    source,
                })
            })
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
