//! REST client module for the Pactflow administration API.
//!
//! This module provides the `ApiClient`, the single authenticated gateway
//! for creating, reading, updating and deleting pacticipants, teams, users,
//! roles and secrets.
//!
//! Every request carries the configured access token as a bearer token.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, Result};
