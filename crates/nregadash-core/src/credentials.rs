use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "nregadash";

/// Keychain account name for the data.gov.in API key
const API_KEY_ACCOUNT: &str = "data.gov.in";

pub struct CredentialStore;

impl CredentialStore {
    /// Store the portal API key in the OS keychain
    pub fn store_api_key(api_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(api_key)
            .context("Failed to store API key in keychain")?;
        Ok(())
    }

    /// Retrieve the portal API key, if one is stored
    pub fn get_api_key() -> Option<String> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ACCOUNT).ok()?;
        match entry.get_password() {
            Ok(key) => Some(key),
            Err(e) => {
                debug!(error = %e, "No API key in keychain");
                None
            }
        }
    }

    /// Delete the stored API key
    pub fn delete_api_key() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ACCOUNT)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete API key from keychain")?;
        Ok(())
    }
}
