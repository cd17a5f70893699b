//! HTTP connection and request execution.
//!
//! A [`Connection`] owns the HTTP client, the appliance base URL, the
//! credentials and the response policy. It runs exactly one
//! [`SaiseiRequest`] per call: no retries, no fallback endpoints.

use crate::config::{Credentials, SaiseiConfig};
use crate::request::{RawResponse, SaiseiRequest};
use crate::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// Default REST API port on a Saisei appliance.
pub const DEFAULT_PORT: u16 = 5029;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Statuses accepted under [`StatusPolicy::Strict`].
pub const ACCEPTED_STATUS_CODES: [u16; 3] = [200, 201, 202];

const USER_AGENT: &str = concat!("saisei-core/", env!("CARGO_PKG_VERSION"));
const JSON_CONTENT_TYPE: &str = "application/json";

/// Which response statuses are handed back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Only 200, 201 and 202 succeed; anything else is [`Error::HttpStatus`]
    #[default]
    Strict,
    /// Every status is returned and left for the caller to interpret
    Passthrough,
}

impl StatusPolicy {
    /// Returns true if a response with this status should be returned.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Self::Strict => ACCEPTED_STATUS_CODES.contains(&status),
            Self::Passthrough => true,
        }
    }
}

/// Live connection parameters shared by every request a client makes.
#[derive(Debug)]
pub struct Connection {
    http: Client,
    base_url: Url,
    credentials: Credentials,
    status_policy: StatusPolicy,
    verbose: bool,
}

impl Connection {
    /// Build a connection from validated configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid or the
    /// HTTP client cannot be created.
    pub fn new(config: &SaiseiConfig, credentials: Credentials) -> Result<Self> {
        config.check()?;
        let base_url = config.base_url()?;

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        if !config.tls_verify {
            warn!(host = %config.host, "TLS verification disabled for Saisei client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build Saisei HTTP client: {err}"))
        })?;

        Ok(Self {
            http,
            base_url,
            credentials,
            status_policy: config.status_policy,
            verbose: config.verbose,
        })
    }

    /// Return the base URL (`scheme://host:port/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the user name used for basic auth.
    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Return the response status policy.
    #[must_use]
    pub const fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Send one request and return the raw response.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`] if the URL cannot be assembled
    /// - [`Error::Transport`] on connection, TLS, timeout or body-read failure
    /// - [`Error::HttpStatus`] if the status policy rejects the response
    pub async fn execute(&self, request: SaiseiRequest) -> Result<RawResponse> {
        let verb = request.verb;
        let path = request.path.clone();

        self.send(request).await.map_err(|err| {
            if err.should_log() {
                error!(
                    method = %verb,
                    path = %path,
                    code = err.error_code(),
                    error = %err,
                    "Saisei request failed"
                );
            } else {
                debug!(
                    method = %verb,
                    path = %path,
                    code = err.error_code(),
                    "Saisei request failed"
                );
            }
            err
        })
    }

    async fn send(&self, request: SaiseiRequest) -> Result<RawResponse> {
        let url = request.url(&self.base_url)?;
        let verb = request.verb;

        let mut builder = self
            .http
            .request(verb.as_method(), url.clone())
            .basic_auth(self.credentials.username(), Some(self.credentials.password()))
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if self.verbose {
            info!(
                method = %verb,
                url = %url,
                body = request.body.as_deref().unwrap_or(""),
                "Sending Saisei request"
            );
        } else {
            debug!(
                method = %verb,
                url = %url,
                has_body = request.body.is_some(),
                "Sending Saisei request"
            );
        }

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if self.verbose {
            info!(method = %verb, url = %url, status, body = %body, "Saisei response");
        } else {
            debug!(method = %verb, url = %url, status, bytes = body.len(), "Saisei response");
        }

        if !self.status_policy.accepts(status) {
            return Err(Error::HttpStatus { code: status, body });
        }

        Ok(RawResponse::new(status, body))
    }
}
