//! # saisei-core
//!
//! Connection handling, request execution and error types for the Saisei
//! REST management API.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy shared by every operation
//! - [`config`] - Appliance configuration and basic-auth credentials
//! - [`client`] - Connection, status policy and request execution
//! - [`request`] - Single-use request builder and raw response
//! - [`query`] - Query parameter builder
//! - [`types`] - Resource table and configuration-root paths

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod request;
pub mod types;

// Re-export commonly used types
pub use client::{Connection, StatusPolicy};
pub use config::{Credentials, SaiseiConfig, Scheme};
pub use error::{Error, Result};
pub use request::{RawResponse, SaiseiRequest, Verb};
pub use types::Resource;
