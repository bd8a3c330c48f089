use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    api,
    error::Result,
    transport::{HttpRequest, HttpResponse, async_transport::AsyncTransport},
    types::{Database, Environment},
    util::{self, url::ContainerPath},
};

/// Async CloudKit asset client.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    endpoint: Url,
    container: Option<String>,
    environment: Environment,
    api_version: Option<String>,
    default_query: Vec<(String, String)>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<reqwest::Client>,
}

struct Inner {
    endpoint: Url,
    path: ContainerPath,
    default_query: Vec<(String, String)>,
    transport: AsyncTransport,
}

impl Client {
    /// Starts building a client for the given service endpoint.
    pub fn builder(endpoint: impl AsRef<str>) -> Result<ClientBuilder> {
        ClientBuilder::new(endpoint.as_ref())
    }

    /// Starts building a client from `CLOUDKIT_*` environment variables.
    ///
    /// See [`ClientBuilder::from_env`].
    pub fn from_env() -> Result<ClientBuilder> {
        ClientBuilder::from_env()
    }

    /// Asset upload operations.
    pub fn assets(&self) -> api::AssetsService {
        api::AssetsService::new(self.clone())
    }

    pub(crate) fn upload_urls_url(&self, database: Database) -> Result<Url> {
        util::url::upload_urls_url(
            &self.inner.endpoint,
            &self.inner.path,
            database,
            &self.inner.default_query,
        )
    }

    pub(crate) async fn execute(
        &self,
        operation: &'static str,
        request: HttpRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<HttpResponse> {
        #[cfg(feature = "tracing")]
        {
            use tracing::Instrument as _;

            let span = tracing::info_span!(
                "cloudkit.request",
                operation,
                container = self.inner.path.container.as_str(),
                host = request.url.host_str().unwrap_or(""),
            );
            return self
                .inner
                .transport
                .send(operation, request, cancellation)
                .instrument(span)
                .await;
        }

        #[cfg(not(feature = "tracing"))]
        self.inner
            .transport
            .send(operation, request, cancellation)
            .await
    }
}

impl ClientBuilder {
    fn new(endpoint: &str) -> Result<Self> {
        let endpoint = util::url::parse_endpoint(endpoint)?;

        Ok(Self {
            endpoint,
            container: None,
            environment: Environment::default(),
            api_version: None,
            default_query: Vec::new(),
            timeout: None,
            user_agent: None,
            http_client: None,
        })
    }

    /// Builds from `CLOUDKIT_ENDPOINT`, `CLOUDKIT_CONTAINER`, and `CLOUDKIT_ENVIRONMENT`.
    pub fn from_env() -> Result<Self> {
        let cfg = super::env_config()?;
        let mut builder = Self::new(&cfg.endpoint)?.container(cfg.container);
        if let Some(environment) = cfg.environment {
            builder = builder.environment(environment);
        }
        Ok(builder)
    }

    /// Container identifier, e.g. `iCloud.com.example.app`.
    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Adds a query parameter sent with every upload URL request.
    pub fn default_query(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let param = super::query_param(name.into(), value.into())?;
        self.default_query.push(param);
        Ok(self)
    }

    /// Overall timeout for each request. Ignored when a custom HTTP client is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Uses the given HTTP client for every request, including uploads.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<Client> {
        let path = super::container_path(self.container, self.environment, self.api_version)?;
        let transport = match self.http_client {
            Some(client) => AsyncTransport::with_client(client, self.user_agent)?,
            None => AsyncTransport::new(self.user_agent, self.timeout)?,
        };

        Ok(Client {
            inner: Arc::new(Inner {
                endpoint: self.endpoint,
                path,
                default_query: self.default_query,
                transport,
            }),
        })
    }
}
