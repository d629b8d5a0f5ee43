use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "pactflow";

pub struct TokenStore;

impl TokenStore {
    /// Keychain accounts are keyed by base URL without a trailing slash.
    fn account(base_url: &str) -> &str {
        base_url.trim().trim_end_matches('/')
    }

    /// Store the access token for a broker in the OS keychain
    pub fn store(base_url: &str, token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, Self::account(base_url))
            .context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store access token in keychain")?;
        Ok(())
    }

    /// Retrieve the access token for a broker from the OS keychain
    pub fn get_token(base_url: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, Self::account(base_url))
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve access token from keychain")
    }

    /// Delete the stored token for a broker
    pub fn delete(base_url: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, Self::account(base_url))
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete access token from keychain")?;
        Ok(())
    }
}
