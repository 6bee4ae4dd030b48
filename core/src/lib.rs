//! Convention-based client for JSON REST APIs.
//!
//! # Overview
//! Resource paths are derived from resource names and chained identifiers
//! instead of being configured per endpoint:
//!
//! ```no_run
//! use clutch_core::{FluentClient, FluentRequest, Resource};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct User;
//! impl Resource for User {
//!     const NAME: &'static str = "user";
//! }
//!
//! #[derive(Deserialize)]
//! struct Room {
//!     city: String,
//! }
//! impl Resource for Room {
//!     const NAME: &'static str = "room";
//! }
//!
//! # async fn run() -> Result<(), clutch_core::ClientError> {
//! let client = FluentClient::new("http://my.api.com/v1/")?;
//! // GET http://my.api.com/v1/users/1/rooms/123
//! let room = client.find::<User>(1).get::<Room>("123").await?;
//! if let Some(room) = room.entity() {
//!     println!("{}", room.city);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `FluentClient` is stateless: it holds the root URL and a transport, and
//!   every operation starts a new chain.
//! - Non-2xx responses are data. Terminal calls return a `ResponseEnvelope`
//!   with the status and a typed error body; `ClientError` is reserved for
//!   unrenderable paths, transport failures, cancellation and success bodies
//!   that do not decode.
//! - The network is reached only through the `Transport` trait, in two
//!   stages (head, then body), each raced against a cancellation token.

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod path;
pub mod resource;
pub mod transport;
pub mod types;

pub use client::{CurriedRequest, FluentClient, FluentRequest};
pub use envelope::ResponseEnvelope;
pub use error::{ClientError, Stage, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use path::{PathSegment, Segment};
pub use resource::{collection_name, Resource};
#[cfg(feature = "reqwest")]
pub use transport::{ReqwestTransport, ReqwestTransportBuilder};
pub use transport::{BodyReader, ResponseHead, Transport};
pub use types::ErrorBody;
pub use tokio_util::sync::CancellationToken;
