//! Endpoint presets for CloudKit Web Services and local test servers.

use crate::{Environment, Error, Result};

/// A preconfigured endpoint + container + environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    endpoint: String,
    container: String,
    environment: Environment,
}

impl Preset {
    /// Returns the service endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the container identifier.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Returns the container environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Builds an async client builder from the preset.
    #[cfg(feature = "async")]
    pub fn async_client_builder(&self) -> Result<crate::ClientBuilder> {
        crate::Client::builder(&self.endpoint).map(|b| {
            b.container(self.container.clone())
                .environment(self.environment)
        })
    }

    /// Builds a blocking client builder from the preset.
    #[cfg(feature = "blocking")]
    pub fn blocking_client_builder(&self) -> Result<crate::BlockingClientBuilder> {
        crate::BlockingClient::builder(&self.endpoint).map(|b| {
            b.container(self.container.clone())
                .environment(self.environment)
        })
    }
}

/// Builds a preset for the public CloudKit Web Services endpoint.
pub fn apple_cloudkit(container: impl AsRef<str>, environment: Environment) -> Result<Preset> {
    let container = container.as_ref().trim();
    if container.is_empty() {
        return Err(Error::invalid_config("container must not be empty"));
    }

    Ok(Preset {
        endpoint: crate::DEFAULT_ENDPOINT.to_string(),
        container: container.to_string(),
        environment,
    })
}

/// Local preset for development against a mock server on `127.0.0.1`.
pub fn local(port: u16, container: impl AsRef<str>) -> Result<Preset> {
    let container = container.as_ref().trim();
    if container.is_empty() {
        return Err(Error::invalid_config("container must not be empty"));
    }
    if port == 0 {
        return Err(Error::invalid_config("port must not be zero"));
    }

    Ok(Preset {
        endpoint: format!("http://127.0.0.1:{port}"),
        container: container.to_string(),
        environment: Environment::Development,
    })
}
