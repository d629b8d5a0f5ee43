//! Credential storage for broker access tokens.
//!
//! `TokenStore` keeps one token per broker base URL in the OS keychain so
//! that tokens never have to live in the config file.

pub mod credentials;

pub use credentials::TokenStore;
