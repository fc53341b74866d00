//! Process-wide client handle
//!
//! The client is built once during startup and then read by any part of the
//! program. Initialization is explicit: nothing happens until
//! [`AppContext::bootstrap`] (or one of the functions below) runs.

use crate::core::client::{Client, ClientError};
use crate::core::config::{ClientConfig, ConfigError};
use once_cell::sync::OnceCell;
use tracing::info;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Return the shared client, building it from `load` on first use.
///
/// Later calls return the same instance and never call `load`. If `load` or
/// construction fails the handle stays unset.
pub fn get_or_init_with<F>(load: F) -> Result<&'static Client, ClientError>
where
    F: FnOnce() -> Result<ClientConfig, ConfigError>,
{
    CLIENT.get_or_try_init(|| {
        let client = Client::new(load()?)?;
        info!("Initialized shared client {}", client.id());
        Ok(client)
    })
}

/// Return the shared client, loading configuration from the environment on
/// first use
pub fn get_or_init_from_env() -> Result<&'static Client, ClientError> {
    get_or_init_with(ClientConfig::from_env)
}

/// Install an already constructed client as the shared instance
///
/// # Errors
///
/// Returns [`ClientError::AlreadyInitialized`] if a shared client exists.
pub fn install(client: Client) -> Result<&'static Client, ClientError> {
    CLIENT
        .try_insert(client)
        .map_err(|_| ClientError::AlreadyInitialized)
}

/// The shared client, if it has been initialized
pub fn get() -> Option<&'static Client> {
    CLIENT.get()
}

/// Handle passed to the parts of the program that need the client
#[derive(Debug, Clone, Copy)]
pub struct AppContext {
    client: &'static Client,
}

impl AppContext {
    /// Initialize the shared client from the environment and wrap it
    pub fn bootstrap() -> Result<Self, ClientError> {
        Ok(Self {
            client: get_or_init_from_env()?,
        })
    }

    /// Wrap the shared client, initializing it from `load` if needed
    pub fn bootstrap_with<F>(load: F) -> Result<Self, ClientError>
    where
        F: FnOnce() -> Result<ClientConfig, ConfigError>,
    {
        Ok(Self {
            client: get_or_init_with(load)?,
        })
    }

    pub fn client(&self) -> &'static Client {
        self.client
    }
}
