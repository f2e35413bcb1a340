//! # ghe-core
//!
//! Shared building blocks for GitHub Enterprise API bindings.
//!
//! ## Modules
//!
//! - [`error`] - Error type, API error bodies and conversions
//! - [`client`] - HTTP client configuration and the shared [`client::ServiceClient`] transport
//! - [`config`] - Validated connection configuration
//! - [`fields`] - Accessor generation for optional-field records

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod fields;

// Re-export commonly used types
pub use error::{Error, Result};
