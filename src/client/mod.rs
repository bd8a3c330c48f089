#[cfg(feature = "async")]
mod async_client;
#[cfg(feature = "blocking")]
mod blocking_client;

#[cfg(feature = "async")]
pub use async_client::{Client, ClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{BlockingClient, BlockingClientBuilder};

use crate::{
    error::{Error, Result},
    types::Environment,
    util::url::ContainerPath,
};

/// Public CloudKit Web Services endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.apple-cloudkit.com";

const DEFAULT_API_VERSION: &str = "1";

pub(crate) struct EnvConfig {
    pub(crate) endpoint: String,
    pub(crate) container: String,
    pub(crate) environment: Option<Environment>,
}

pub(crate) fn env_config() -> Result<EnvConfig> {
    let endpoint = std::env::var("CLOUDKIT_ENDPOINT")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let container = std::env::var("CLOUDKIT_CONTAINER")
        .map_err(|_| Error::invalid_config("missing CLOUDKIT_CONTAINER"))?;
    let environment = match std::env::var("CLOUDKIT_ENVIRONMENT") {
        Ok(v) if !v.trim().is_empty() => Some(v.parse::<Environment>()?),
        _ => None,
    };

    Ok(EnvConfig {
        endpoint,
        container,
        environment,
    })
}

pub(crate) fn container_path(
    container: Option<String>,
    environment: Environment,
    api_version: Option<String>,
) -> Result<ContainerPath> {
    let container = container
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| Error::invalid_config("container is required"))?;
    let api_version = api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
    if api_version.trim().is_empty() {
        return Err(Error::invalid_config("api_version must not be empty"));
    }

    Ok(ContainerPath {
        api_version,
        container: container.trim().to_string(),
        environment,
    })
}

pub(crate) fn query_param(name: String, value: String) -> Result<(String, String)> {
    if name.trim().is_empty() {
        return Err(Error::invalid_config("query parameter name must not be empty"));
    }
    Ok((name, value))
}
