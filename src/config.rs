//! Transport configuration.

use serde::Deserialize;
use thiserror::Error;

/// Configuration could not be assembled from the environment.
#[derive(Debug, Error)]
#[error("missing or invalid transport config: {0}")]
pub struct ConfigError(pub String);

/// How the connection is secured.
///
/// Submission servers usually expect STARTTLS on port 587; `Implicit`
/// covers the TLS-from-the-first-byte style used on port 465. Either way
/// the session ends up encrypted before authentication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Upgrade a plaintext connection with `STARTTLS` (default).
    #[default]
    StartTls,
    /// Negotiate TLS before the first SMTP byte.
    Implicit,
}

/// Configuration for an SMTP submission transport.
///
/// Immutable once handed to a transport; one instance may back any number
/// of concurrent deliveries.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// SMTP server hostname.
    #[serde(rename = "smtp_host")]
    pub host: String,

    /// SMTP server port (default: 587).
    #[serde(rename = "smtp_port", default = "default_port")]
    pub port: u16,

    /// Username for authentication.
    #[serde(rename = "smtp_username")]
    pub username: String,

    /// Password for authentication.
    #[serde(rename = "smtp_password")]
    pub password: String,

    /// Identity announced in the HELO/EHLO greeting, when overridden.
    #[serde(rename = "smtp_helo", default)]
    pub helo: Option<String>,

    /// TLS negotiation mode (default: STARTTLS).
    #[serde(rename = "smtp_tls", default)]
    pub tls: TlsMode,

    /// Deliver to the accepted subset when some recipients are rejected
    /// (default: false; any rejection fails the whole delivery).
    #[serde(rename = "smtp_allow_partial", default)]
    pub allow_partial: bool,
}

fn default_port() -> u16 {
    587
}

impl TransportConfig {
    /// Config with the default port, STARTTLS, and the strict
    /// all-or-nothing recipient policy.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: username.into(),
            password: password.into(),
            helo: None,
            tls: TlsMode::default(),
            allow_partial: false,
        }
    }

    /// Override the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Announce `helo` as the client identity instead of the default.
    pub fn helo(mut self, helo: impl Into<String>) -> Self {
        self.helo = Some(helo.into());
        self
    }

    /// Select the TLS negotiation mode.
    pub fn tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// Allow delivery to the accepted subset when some recipients are
    /// rejected during the RCPT phase.
    pub fn allow_partial(mut self, allow: bool) -> Self {
        self.allow_partial = allow;
        self
    }

    /// Read configuration from environment variables.
    ///
    /// Reads `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
    /// `SMTP_HELO`, `SMTP_TLS`, and `SMTP_ALLOW_PARTIAL`, after loading a
    /// `.env` file if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        serde_env::from_env().map_err(|e| ConfigError(e.to_string()))
    }
}
