//! Admin API client and data models for GitHub Enterprise.
//!
//! Provides typed records and an asynchronous client for the site-admin
//! endpoints: LDAP mappings for users and teams, user creation and user
//! renaming.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{AdminClient, AdminClientBuilder};
pub use models::{AdminMessage, Plan, TeamLdapMapping, User, UserLdapMapping};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = ghe_core::Result<T>;
