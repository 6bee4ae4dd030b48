//! Transport boundary.
//!
//! # Design
//! A round-trip is two awaits: `Transport::send` resolves once the status and
//! headers are in, and `BodyReader::read` then pulls the body. Keeping them
//! apart lets the client observe (and cancel) the gap between "got a status"
//! and "got a body". Non-2xx statuses are not transport errors; only failures
//! to complete the exchange are.
//!
//! `ReqwestTransport` is the default implementation, behind the `reqwest`
//! feature.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::HttpRequest;

/// Status line and headers of a response whose body has not been read yet.
#[derive(Debug)]
pub struct ResponseHead<B> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: B,
}

/// The second stage of a round-trip.
#[async_trait]
pub trait BodyReader: Send {
    async fn read(self) -> Result<String, TransportError>;
}

/// Executes `HttpRequest`s.
///
/// Cancellation is signalled by dropping the future returned from `send` or
/// `read`. An implementation that hands work to another task must tie that
/// work to the future's lifetime (an abort or drop guard) so it stops too.
#[async_trait]
pub trait Transport: Send + Sync {
    type Body: BodyReader;

    async fn send(&self, request: HttpRequest) -> Result<ResponseHead<Self::Body>, TransportError>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::{ReqwestBody, ReqwestTransport, ReqwestTransportBuilder};

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    use super::{BodyReader, ResponseHead, Transport};
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest};

    /// Default request timeout in seconds.
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Builder for configuring a [`ReqwestTransport`].
    #[derive(Debug)]
    pub struct ReqwestTransportBuilder {
        timeout: Duration,
        default_headers: HeaderMap,
    }

    impl ReqwestTransportBuilder {
        fn new() -> Self {
            Self {
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
                default_headers: HeaderMap::new(),
            }
        }

        /// Sets the timeout for a whole round-trip, body included.
        pub fn timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        /// Adds a header sent with every request.
        ///
        /// ## Errors
        ///
        /// Returns an error if the header name or value is invalid.
        pub fn default_header(
            mut self,
            name: impl AsRef<str>,
            value: impl AsRef<str>,
        ) -> Result<Self, TransportError> {
            let name = HeaderName::try_from(name.as_ref())
                .map_err(|e| TransportError::Build(format!("invalid header name: {e}")))?;
            let value = HeaderValue::try_from(value.as_ref())
                .map_err(|e| TransportError::Build(format!("invalid header value: {e}")))?;
            self.default_headers.insert(name, value);
            Ok(self)
        }

        pub fn build(self) -> Result<ReqwestTransport, TransportError> {
            let client = reqwest::Client::builder()
                .timeout(self.timeout)
                .default_headers(self.default_headers)
                .build()
                .map_err(|e| TransportError::Build(e.to_string()))?;
            Ok(ReqwestTransport { client })
        }
    }

    /// [`Transport`] over a pooled `reqwest::Client`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn builder() -> ReqwestTransportBuilder {
            ReqwestTransportBuilder::new()
        }

        /// A transport with default settings.
        pub fn new() -> Result<Self, TransportError> {
            Self::builder().build()
        }
    }

    /// Body of a response received by [`ReqwestTransport`].
    #[derive(Debug)]
    pub struct ReqwestBody(reqwest::Response);

    #[async_trait]
    impl BodyReader for ReqwestBody {
        async fn read(self) -> Result<String, TransportError> {
            self.0.text().await.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        url: e.url().map(ToString::to_string).unwrap_or_default(),
                    }
                } else {
                    TransportError::Body(Box::new(e))
                }
            })
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        type Body = ReqwestBody;

        async fn send(
            &self,
            request: HttpRequest,
        ) -> Result<ResponseHead<ReqwestBody>, TransportError> {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| classify(e, &request.url))?;

            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();

            Ok(ResponseHead {
                status: response.status().as_u16(),
                headers,
                body: ReqwestBody(response),
            })
        }
    }

    fn classify(err: reqwest::Error, url: &str) -> TransportError {
        let url = url.to_string();
        if err.is_timeout() {
            TransportError::Timeout { url }
        } else if err.is_connect() {
            TransportError::Connect {
                url,
                source: Box::new(err),
            }
        } else {
            TransportError::Request {
                url,
                source: Box::new(err),
            }
        }
    }

}
