//! Fluent request chains over a root URL.
//!
//! # Design
//! `FluentClient` holds only a root URL and a transport and carries no state
//! between calls. Every operation starts a fresh `CurriedRequest`, which owns
//! its path chain and is moved through `find` and consumed by the terminal
//! call, so reusing the client can never leak segments from one request into
//! the next.
//!
//! Both types implement `FluentRequest`; all operations are provided methods
//! written against `into_request`, so the root and an in-progress chain behave
//! identically.
//!
//! Terminal calls are split the same way as the plain-data API: `build_*`
//! produces an `HttpRequest`, the transport executes it in two stages, and
//! `ResponseEnvelope::from_response` maps the result.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{field, instrument, Span};

use crate::envelope::ResponseEnvelope;
use crate::error::{ClientError, Stage};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::path::PathSegment;
use crate::resource::Resource;
use crate::transport::{BodyReader, Transport};
use crate::types::ErrorBody;

#[cfg(feature = "reqwest")]
use crate::transport::ReqwestTransport;

/// Entry point bound to a root URL.
///
/// `E` is the error body decoded from non-2xx responses.
pub struct FluentClient<T, E = ErrorBody> {
    root_url: String,
    transport: T,
    _error: PhantomData<fn() -> E>,
}

#[cfg(feature = "reqwest")]
impl FluentClient<ReqwestTransport, ErrorBody> {
    /// A client using the default `ReqwestTransport` and `ErrorBody`.
    pub fn new(root_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_transport(root_url, ReqwestTransport::new()?))
    }
}

impl<T, E> FluentClient<T, E> {
    pub fn with_transport(root_url: &str, transport: T) -> Self {
        Self {
            root_url: root_url.trim_end_matches('/').to_string(),
            transport,
            _error: PhantomData,
        }
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// A fresh, empty request chain.
    pub fn request(&self) -> CurriedRequest<'_, T, E> {
        CurriedRequest::new(self)
    }
}

impl<T: Clone, E> Clone for FluentClient<T, E> {
    fn clone(&self) -> Self {
        Self {
            root_url: self.root_url.clone(),
            transport: self.transport.clone(),
            _error: PhantomData,
        }
    }
}

impl<T, E> fmt::Debug for FluentClient<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluentClient")
            .field("root_url", &self.root_url)
            .finish_non_exhaustive()
    }
}

/// An in-progress request chain.
///
/// Created by any operation on a `FluentClient`. `find` extends it; `get`,
/// `post`, `list`, `put` and `delete` consume it.
pub struct CurriedRequest<'a, T, E> {
    client: &'a FluentClient<T, E>,
    path: PathSegment,
    cancel: CancellationToken,
}

impl<'a, T, E> CurriedRequest<'a, T, E> {
    fn new(client: &'a FluentClient<T, E>) -> Self {
        Self {
            client,
            path: PathSegment::empty(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn path(&self) -> &PathSegment {
        &self.path
    }

    /// Append an arbitrary segment (or a whole chain) to the path.
    pub fn segment(mut self, segment: PathSegment) -> Self {
        self.path = self.path.chain(segment);
        self
    }

    fn push_collection<R: Resource>(mut self) -> Self {
        self.path = self.path.chain(PathSegment::collection::<R>());
        self
    }

    fn push_id(mut self, id: impl fmt::Display) -> Self {
        self.path = self.path.chain(PathSegment::literal(id));
        self
    }

    /// Render the chain against the root URL into a JSON request.
    ///
    /// Identifiers are percent-encoded in the URL.
    pub fn build(
        &self,
        method: HttpMethod,
        body: Option<String>,
    ) -> Result<HttpRequest, ClientError> {
        let path = self.path.render_encoded()?;
        let url = format!("{}/{path}", self.client.root_url);
        Ok(HttpRequest::json(method, url, body))
    }

    /// The GET request `get::<R>(id)` would send, without sending it.
    pub fn build_get<R: Resource>(
        self,
        id: impl fmt::Display,
    ) -> Result<HttpRequest, ClientError> {
        self.push_collection::<R>()
            .push_id(id)
            .build(HttpMethod::Get, None)
    }

    /// The POST request `post::<R>(body)` would send, without sending it.
    pub fn build_post<R: Resource + Serialize>(
        self,
        body: &R,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(body).map_err(ClientError::Serialization)?;
        self.push_collection::<R>().build(HttpMethod::Post, Some(body))
    }
}

impl<'a, T, E> CurriedRequest<'a, T, E>
where
    T: Transport,
{
    async fn execute<R>(
        self,
        request: Result<HttpRequest, ClientError>,
    ) -> Result<ResponseEnvelope<R, E>, ClientError>
    where
        R: DeserializeOwned,
        E: DeserializeOwned,
    {
        let response = dispatch(&self.client.transport, request?, &self.cancel).await?;
        ResponseEnvelope::from_response(response)
    }
}

impl<T, E> Clone for CurriedRequest<'_, T, E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            path: self.path.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T, E> fmt::Debug for CurriedRequest<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurriedRequest")
            .field("root_url", &self.client.root_url)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Operations shared by the root client and an in-progress chain.
///
/// `find` and `get` append the collection name of `R` followed by `id`;
/// `post` and `list` append only the collection name.
pub trait FluentRequest<'a, T, E>: Sized
where
    T: Transport + 'a,
    E: DeserializeOwned + Send + 'a,
{
    /// The chain this value stands for: a fresh one for the root client,
    /// itself for a chain.
    fn into_request(self) -> CurriedRequest<'a, T, E>;

    /// Run the terminal call under `token`; firing it fails the call with
    /// `ClientError::Cancelled`.
    fn with_cancellation(self, token: CancellationToken) -> CurriedRequest<'a, T, E> {
        let mut request = self.into_request();
        request.cancel = token;
        request
    }

    fn find<R: Resource>(self, id: impl fmt::Display) -> CurriedRequest<'a, T, E> {
        self.into_request().push_collection::<R>().push_id(id)
    }

    fn get<R>(
        self,
        id: impl fmt::Display,
    ) -> impl Future<Output = Result<ResponseEnvelope<R, E>, ClientError>> + Send + 'a
    where
        R: Resource + DeserializeOwned + Send + 'a,
    {
        let request = self.into_request().push_collection::<R>().push_id(id);
        let prepared = request.build(HttpMethod::Get, None);
        request.execute(prepared)
    }

    fn post<R>(
        self,
        body: &R,
    ) -> impl Future<Output = Result<ResponseEnvelope<R, E>, ClientError>> + Send + 'a
    where
        R: Resource + Serialize + DeserializeOwned + Send + 'a,
    {
        let request = self.into_request().push_collection::<R>();
        let prepared = serde_json::to_string(body)
            .map_err(ClientError::Serialization)
            .and_then(|body| request.build(HttpMethod::Post, Some(body)));
        request.execute(prepared)
    }

    fn list<R>(
        self,
    ) -> impl Future<Output = Result<ResponseEnvelope<Vec<R>, E>, ClientError>> + Send + 'a
    where
        R: Resource + DeserializeOwned + Send + 'a,
    {
        let request = self.into_request().push_collection::<R>();
        let prepared = request.build(HttpMethod::Get, None);
        request.execute(prepared)
    }

    fn put<R>(
        self,
        id: impl fmt::Display,
        body: &R,
    ) -> impl Future<Output = Result<ResponseEnvelope<R, E>, ClientError>> + Send + 'a
    where
        R: Resource + Serialize + DeserializeOwned + Send + 'a,
    {
        let request = self.into_request().push_collection::<R>().push_id(id);
        let prepared = serde_json::to_string(body)
            .map_err(ClientError::Serialization)
            .and_then(|body| request.build(HttpMethod::Put, Some(body)));
        request.execute(prepared)
    }

    fn delete<R>(
        self,
        id: impl fmt::Display,
    ) -> impl Future<Output = Result<ResponseEnvelope<R, E>, ClientError>> + Send + 'a
    where
        R: Resource + DeserializeOwned + Send + 'a,
    {
        let request = self.into_request().push_collection::<R>().push_id(id);
        let prepared = request.build(HttpMethod::Delete, None);
        request.execute(prepared)
    }
}

impl<'a, T, E> FluentRequest<'a, T, E> for &'a FluentClient<T, E>
where
    T: Transport + 'a,
    E: DeserializeOwned + Send + 'a,
{
    fn into_request(self) -> CurriedRequest<'a, T, E> {
        self.request()
    }
}

impl<'a, T, E> FluentRequest<'a, T, E> for CurriedRequest<'a, T, E>
where
    T: Transport + 'a,
    E: DeserializeOwned + Send + 'a,
{
    fn into_request(self) -> CurriedRequest<'a, T, E> {
        self
    }
}

/// Run one round-trip, racing each stage against `cancel`.
#[instrument(
    name = "rest_request",
    skip_all,
    fields(
        http.method = %request.method,
        http.url = %request.url,
        http.status_code = field::Empty,
        otel.kind = "client",
    )
)]
async fn dispatch<T: Transport>(
    transport: &T,
    request: HttpRequest,
    cancel: &CancellationToken,
) -> Result<HttpResponse, ClientError> {
    let head = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(cancelled(Stage::AwaitingResponse)),
        head = transport.send(request) => head.inspect_err(|e| tracing::warn!(error = %e, "request failed"))?,
    };

    Span::current().record("http.status_code", head.status);
    tracing::debug!(status = head.status, "response received, reading body");

    let body = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(cancelled(Stage::ReadingBody)),
        body = head.body.read() => body.inspect_err(|e| tracing::warn!(error = %e, "reading body failed"))?,
    };

    Ok(HttpResponse {
        status: head.status,
        headers: head.headers,
        body,
    })
}

fn cancelled(stage: Stage) -> ClientError {
    tracing::debug!(%stage, "request cancelled");
    ClientError::Cancelled { stage }
}
