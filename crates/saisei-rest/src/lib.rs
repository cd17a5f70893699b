//! Client for the Saisei running-configuration REST API.
//!
//! Provides one asynchronous method per resource operation (interfaces,
//! hosts, users, policies and flow classes), each returning the decoded JSON
//! response.
//!
//! ```no_run
//! use saisei_rest::{ListOptions, SaiseiClient};
//! use serde_json::json;
//!
//! # async fn example() -> saisei_rest::Result<()> {
//! let client = SaiseiClient::builder("appliance.example.com")?
//!     .with_basic_auth("admin", "admin")
//!     .build()?;
//!
//! let interfaces = client.get_interfaces(&ListOptions::new()).await?;
//! let host = client.get_host("h1").await?;
//! let user = client.add_user(&json!({"name": "alice"})).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{SaiseiClient, SaiseiClientBuilder};
pub use models::ListOptions;
pub use saisei_core::{
    Credentials, Error, RawResponse, Resource, SaiseiConfig, SaiseiRequest, Scheme, StatusPolicy,
    Verb,
};

/// Convenient result alias that reuses the shared Saisei error type.
pub type Result<T> = saisei_core::Result<T>;
