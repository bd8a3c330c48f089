use std::{sync::Arc, time::Duration};

use url::Url;

use crate::{
    api,
    error::Result,
    transport::{HttpRequest, HttpResponse, blocking_transport::BlockingTransport},
    types::{Database, Environment},
    util::{self, url::ContainerPath},
};

/// Blocking CloudKit asset client.
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<Inner>,
}

/// Builder for [`BlockingClient`].
pub struct BlockingClientBuilder {
    endpoint: Url,
    container: Option<String>,
    environment: Environment,
    api_version: Option<String>,
    default_query: Vec<(String, String)>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    agent: Option<ureq::Agent>,
}

struct Inner {
    endpoint: Url,
    path: ContainerPath,
    default_query: Vec<(String, String)>,
    transport: BlockingTransport,
}

impl BlockingClient {
    pub fn builder(endpoint: impl AsRef<str>) -> Result<BlockingClientBuilder> {
        BlockingClientBuilder::new(endpoint.as_ref())
    }

    /// Starts building a client from `CLOUDKIT_*` environment variables.
    pub fn from_env() -> Result<BlockingClientBuilder> {
        BlockingClientBuilder::from_env()
    }

    pub fn assets(&self) -> api::BlockingAssetsService {
        api::BlockingAssetsService::new(self.clone())
    }

    pub(crate) fn upload_urls_url(&self, database: Database) -> Result<Url> {
        util::url::upload_urls_url(
            &self.inner.endpoint,
            &self.inner.path,
            database,
            &self.inner.default_query,
        )
    }

    pub(crate) fn execute(
        &self,
        operation: &'static str,
        request: HttpRequest,
    ) -> Result<HttpResponse> {
        #[cfg(feature = "tracing")]
        let _guard = tracing::info_span!(
            "cloudkit.request",
            operation,
            container = self.inner.path.container.as_str(),
            host = request.url.host_str().unwrap_or(""),
        )
        .entered();

        self.inner.transport.send(operation, request)
    }
}

impl BlockingClientBuilder {
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
            agent: None,
        })
    }

    pub fn from_env() -> Result<Self> {
        let cfg = super::env_config()?;
        let mut builder = Self::new(&cfg.endpoint)?.container(cfg.container);
        if let Some(environment) = cfg.environment {
            builder = builder.environment(environment);
        }
        Ok(builder)
    }

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

    pub fn default_query(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let param = super::query_param(name.into(), value.into())?;
        self.default_query.push(param);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Uses the given agent for every request, including uploads.
    pub fn agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn build(self) -> Result<BlockingClient> {
        let path = super::container_path(self.container, self.environment, self.api_version)?;
        let transport = match self.agent {
            Some(agent) => BlockingTransport::with_agent(agent, self.user_agent, self.timeout),
            None => BlockingTransport::new(self.user_agent, self.timeout)?,
        };

        Ok(BlockingClient {
            inner: Arc::new(Inner {
                endpoint: self.endpoint,
                path,
                default_query: self.default_query,
                transport,
            }),
        })
    }
}
