//! Configuration structures for Saisei clients.
//!
//! [`SaiseiConfig`] describes where the appliance lives and how requests to it
//! behave. [`Credentials`] are kept apart so that configuration can be
//! serialized and logged without ever carrying the password.

use crate::client::{StatusPolicy, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// URL scheme used to reach the appliance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP
    Http,
    /// HTTP over TLS
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme as it appears in a URL.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a Saisei client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaiseiConfig {
    /// Appliance host name or IP address
    #[validate(length(min = 1))]
    pub host: String,

    /// REST API port
    #[validate(range(min = 1))]
    #[serde(default = "default_port")]
    pub port: u16,

    /// URL scheme
    #[serde(default)]
    pub scheme: Scheme,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Which response statuses are handed back as successes
    #[serde(default)]
    pub status_policy: StatusPolicy,

    /// Log every request and response at `info` level, bodies included
    #[serde(default)]
    pub verbose: bool,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SaiseiConfig {
    /// Create a new configuration for the given appliance host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or does not form a valid URL.
    pub fn new(host: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            host: host.into(),
            port: default_port(),
            scheme: Scheme::default(),
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            status_policy: StatusPolicy::default(),
            verbose: false,
        };

        config.check()?;
        Ok(config)
    }

    /// Set the REST API port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the URL scheme.
    #[must_use]
    pub const fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the response status policy.
    #[must_use]
    pub const fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Enable or disable verbose request logging.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Render `scheme://host:port`.
    ///
    /// A bare IPv6 literal such as `::1` is bracketed; `[::1]` is accepted
    /// as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot form a URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let raw = format!("{}://{}:{}", self.scheme, host, self.port);
        Url::parse(&raw)
            .map_err(|e| Error::ConfigError(format!("Invalid appliance URL `{raw}`: {e}")))
    }

    /// Run field validation and make sure the base URL can be built.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first problem found.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()?;
        self.base_url().map(|_| ())
    }
}

/// Basic-auth credentials for the REST API.
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials from a user name and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// The user name sent in the `Authorization` header.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password sent in the `Authorization` header.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
