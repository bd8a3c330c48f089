use std::time::Duration;

#[cfg(feature = "metrics")]
use std::time::Instant;

use http::HeaderValue;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Error, Result},
    transport::{HttpRequest, HttpResponse, default_user_agent, request_context},
};

#[cfg(feature = "metrics")]
use crate::transport::{method_label, status_class};

pub(crate) struct AsyncTransport {
    client: reqwest::Client,
    user_agent: HeaderValue,
}

impl AsyncTransport {
    pub(crate) fn new(user_agent: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        #[cfg(feature = "rustls")]
        crate::transport::install_crypto_provider();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::transport("failed to build HTTP client", Some(Box::new(e))))?;

        Self::with_client(client, user_agent)
    }

    /// Wraps a caller-provided client; its own timeout and proxy settings apply.
    pub(crate) fn with_client(client: reqwest::Client, user_agent: Option<String>) -> Result<Self> {
        let user_agent = HeaderValue::from_str(&user_agent.unwrap_or_else(default_user_agent))
            .map_err(|_| Error::invalid_config("invalid User-Agent header"))?;
        Ok(Self { client, user_agent })
    }

    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: HttpRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<HttpResponse> {
        let Some(token) = cancellation else {
            return self.exchange(operation, request).await;
        };

        if token.is_cancelled() {
            return Err(Error::cancelled(operation));
        }

        tokio::select! {
            biased;
            () = token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!(operation, "request cancelled");
                Err(Error::cancelled(operation))
            }
            res = self.exchange(operation, request) => res,
        }
    }

    async fn exchange(&self, operation: &'static str, request: HttpRequest) -> Result<HttpResponse> {
        #[cfg(feature = "tracing")]
        {
            use tracing::Instrument as _;

            let span = tracing::debug_span!(
                "cloudkit.http",
                method = %request.method,
                host = request.url.host_str().unwrap_or(""),
                path = request.url.path(),
            );
            return self.perform(operation, request).instrument(span).await;
        }

        #[cfg(not(feature = "tracing"))]
        self.perform(operation, request).await
    }

    async fn perform(&self, operation: &'static str, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            mut headers,
            body,
            timeout,
        } = request;

        #[cfg(feature = "metrics")]
        metrics::counter!("cloudkit_http_requests_total", "method" => method_label(&method))
            .increment(1);
        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let context = request_context(&method, &url);
        headers
            .entry(http::header::USER_AGENT)
            .or_insert_with(|| self.user_agent.clone());

        let mut req = self
            .client
            .request(method.clone(), url)
            .headers(headers)
            .body(body);
        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(err) => {
                #[cfg(feature = "metrics")]
                metrics::counter!(
                    "cloudkit_http_errors_total",
                    "method" => method_label(&method),
                    "kind" => "transport"
                )
                .increment(1);
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, "transport error");

                return Err(Error::transport(
                    format!("{operation} request failed: {context}"),
                    Some(Box::new(err)),
                ));
            }
        };

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| {
            Error::transport(
                format!("{operation} failed to read response body: {context}"),
                Some(Box::new(e)),
            )
        })?;

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(
                "cloudkit_http_responses_total",
                "method" => method_label(&method),
                "class" => status_class(status),
            )
            .increment(1);
            metrics::histogram!(
                "cloudkit_http_request_duration_seconds",
                "method" => method_label(&method),
            )
            .record(start.elapsed().as_secs_f64());
        }

        Ok(HttpResponse { status, body })
    }
}
