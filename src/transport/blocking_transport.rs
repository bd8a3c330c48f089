use std::{io::Read as _, time::Duration};

#[cfg(feature = "metrics")]
use std::time::Instant;

use bytes::Bytes;
use http::HeaderMap;

use crate::{
    error::{Error, Result},
    transport::{HttpRequest, HttpResponse, default_user_agent, request_context},
};

#[cfg(feature = "metrics")]
use crate::transport::{method_label, status_class};

pub(crate) struct BlockingTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
    user_agent: String,
}

impl BlockingTransport {
    pub(crate) fn new(user_agent: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        #[cfg(feature = "rustls")]
        crate::transport::install_crypto_provider();

        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();

        Ok(Self::with_agent(
            ureq::Agent::new_with_config(config),
            user_agent,
            timeout,
        ))
    }

    /// Wraps a caller-provided agent; status handling is overridden per request.
    pub(crate) fn with_agent(
        agent: ureq::Agent,
        user_agent: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            agent,
            timeout,
            user_agent: user_agent.unwrap_or_else(default_user_agent),
        }
    }

    pub(crate) fn send(&self, operation: &'static str, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        #[cfg(feature = "metrics")]
        metrics::counter!("cloudkit_http_requests_total", "method" => method_label(&method))
            .increment(1);
        #[cfg(feature = "tracing")]
        let _guard = tracing::debug_span!(
            "cloudkit.http",
            method = %method,
            host = url.host_str().unwrap_or(""),
            path = url.path(),
        )
        .entered();
        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let result = match method.as_str() {
            "POST" => {
                let req = apply_headers(
                    self.agent.post(url.as_str()),
                    &headers,
                    &self.user_agent,
                    timeout.or(self.timeout),
                );
                req.send(body.as_ref())
            }
            _ => return Err(Error::invalid_config("unsupported HTTP method")),
        };

        let resp = match result {
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
                tracing::debug!(error = ?err, "transport error");

                return Err(Error::transport(
                    format!(
                        "{operation} request failed: {}",
                        request_context(&method, &url)
                    ),
                    Some(Box::new(err)),
                ));
            }
        };

        let status = resp.status();
        let body = read_body_bytes(resp.into_body()).map_err(|e| {
            Error::transport(
                format!(
                    "{operation} failed to read response body: {}",
                    request_context(&method, &url)
                ),
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

fn read_body_bytes(body: ureq::Body) -> std::io::Result<Bytes> {
    let mut out = Vec::new();
    body.into_reader().read_to_end(&mut out)?;
    Ok(Bytes::from(out))
}

fn apply_headers<B>(
    mut req: ureq::RequestBuilder<B>,
    headers: &HeaderMap,
    user_agent: &str,
    timeout: Option<Duration>,
) -> ureq::RequestBuilder<B> {
    if !headers.contains_key(http::header::USER_AGENT) {
        req = req.header(http::header::USER_AGENT, user_agent);
    }
    for (name, value) in headers.iter() {
        let Ok(value_str) = value.to_str() else {
            continue;
        };
        req = req.header(name.as_str(), value_str);
    }

    let mut config = req.config().http_status_as_error(false);
    if let Some(timeout) = timeout {
        config = config.timeout_global(Some(timeout));
    }
    config.build()
}
