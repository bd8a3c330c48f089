use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

#[cfg(feature = "async")]
pub(crate) mod async_transport;
#[cfg(feature = "blocking")]
pub(crate) mod blocking_transport;

/// Installs the ring provider once unless the application already chose one.
#[cfg(feature = "rustls")]
pub(crate) fn install_crypto_provider() {
    static INSTALLED: std::sync::Once = std::sync::Once::new();
    INSTALLED.call_once(|| {
        if rustls::crypto::CryptoProvider::get_default().is_none() {
            let _ = rustls::crypto::ring::default_provider().install_default();
        }
    });
}

/// A single outbound exchange. The body is sent in one write.
pub(crate) struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) timeout: Option<Duration>,
}

/// A fully read response; nothing of the connection outlives it.
#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Bytes,
}

impl HttpResponse {
    /// Returns the body, or an API error for non-success statuses.
    pub(crate) fn into_success_body(
        self,
        operation: &'static str,
    ) -> crate::error::Result<Bytes> {
        if !self.status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!(operation, status = %self.status, "non-success response");
            return Err(crate::error::Error::api(operation, self.status, self.body));
        }
        Ok(self.body)
    }
}

pub(crate) fn request_context(method: &Method, url: &Url) -> String {
    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    if authority.is_empty() {
        format!("{method} {}", url.path())
    } else {
        format!("{method} {authority}{}", url.path())
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("cloudkit-assets/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(feature = "metrics")]
pub(crate) fn status_class(status: StatusCode) -> &'static str {
    if status.is_informational() {
        "1xx"
    } else if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

#[cfg(feature = "metrics")]
pub(crate) fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        _ => "OTHER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_context_includes_authority_and_path() {
        let url = Url::parse("http://127.0.0.1:9000/database/1/c/development/public/assets/upload?ckAPIToken=secret").unwrap();
        let ctx = request_context(&Method::POST, &url);
        assert_eq!(
            ctx,
            "POST 127.0.0.1:9000/database/1/c/development/public/assets/upload"
        );
        assert!(!ctx.contains("secret"));
    }

    #[test]
    fn non_success_response_becomes_api_error() {
        let resp = HttpResponse {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Bytes::from_static(b"down"),
        };
        let err = resp.into_success_body("upload_asset").unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.body().map(|b| b.as_ref()), Some(&b"down"[..]));
    }

    #[test]
    fn success_response_yields_body() {
        let resp = HttpResponse {
            status: StatusCode::OK,
            body: Bytes::from_static(b"{}"),
        };
        assert_eq!(resp.into_success_body("upload_asset").unwrap().as_ref(), b"{}");
    }
}
