//! Core library for the Pactflow administration API.
//!
//! - `api`: the authenticated `ApiClient` and its error taxonomy
//! - `models`: wire shapes for pacticipants, teams, users, roles and secrets
//! - `config`: client configuration from environment, config file and keychain
//! - `auth`: OS keychain storage for access tokens

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use config::Config;
