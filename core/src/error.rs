//! Error types for the fluent REST client.
//!
//! # Design
//! Only conditions that should interrupt the caller live here: a chain that
//! cannot be rendered, a failed or cancelled round-trip, and a success body
//! that does not decode. Non-2xx responses are not errors; they are carried by
//! `ResponseEnvelope` together with the raw status code.

use std::fmt;

use thiserror::Error;

/// Boxed error used to carry the transport's own failure as a source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by terminal calls on a request chain.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The chain ended without any literal value to render.
    #[error("cannot render request path: chain ends without a value")]
    PathRender,

    /// The transport could not complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The cancellation token fired before the call completed.
    #[error("request cancelled while {stage}")]
    Cancelled { stage: Stage },

    /// A 2xx body was present but could not be decoded as the entity type.
    #[error("HTTP {status}: response body could not be decoded")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized to JSON.
    #[error("request body could not be serialized")]
    Serialization(#[source] serde_json::Error),
}

/// The two await points of a terminal call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for the status line and headers.
    AwaitingResponse,
    /// Status received, waiting for the body.
    ReadingBody,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::AwaitingResponse => write!(f, "awaiting response"),
            Stage::ReadingBody => write!(f, "reading body"),
        }
    }
}

/// Failures reported by a `Transport` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("could not connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to read response body")]
    Body(#[source] BoxError),

    /// The transport itself could not be constructed.
    #[error("failed to build HTTP transport: {0}")]
    Build(String),
}
