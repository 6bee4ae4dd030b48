//! Typed success-or-error results.
//!
//! # Design
//! Ordinary HTTP failures are data. A 401 or 404 comes back as an envelope
//! with the raw status and, when the server sent a decodable error body, the
//! typed error. The only decoding failure that escapes is a 2xx body that
//! does not match the entity type.

use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::http::HttpResponse;

#[derive(Debug, Clone, PartialEq)]
enum Outcome<T, E> {
    Entity(T),
    Error(E),
    Empty,
}

/// Result of a terminal call: the status code plus at most one of a typed
/// entity or a typed error body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope<T, E> {
    status: u16,
    outcome: Outcome<T, E>,
}

impl<T, E> ResponseEnvelope<T, E> {
    pub fn with_entity(status: u16, entity: T) -> Self {
        Self {
            status,
            outcome: Outcome::Entity(entity),
        }
    }

    pub fn with_error(status: u16, error: E) -> Self {
        Self {
            status,
            outcome: Outcome::Error(error),
        }
    }

    /// Neither entity nor error: a void success on 2xx, or a failure the
    /// server did not describe.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            outcome: Outcome::Empty,
        }
    }

    /// Map a raw response.
    ///
    /// On 2xx an empty body yields an empty envelope and any other body must
    /// decode as `T`. Otherwise the body is decoded as `E` when possible and
    /// ignored when not.
    pub fn from_response(response: HttpResponse) -> Result<Self, ClientError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        let status = response.status;

        if response.succeeded() {
            return match response.body() {
                None => Ok(Self::empty(status)),
                Some(body) => serde_json::from_str(body)
                    .map(|entity| Self::with_entity(status, entity))
                    .map_err(|source| ClientError::Decode { status, source }),
            };
        }

        let Some(body) = response.body() else {
            return Ok(Self::empty(status));
        };
        match serde_json::from_str(body) {
            Ok(error) => Ok(Self::with_error(status, error)),
            Err(err) => {
                tracing::debug!(status, error = %err, "error body is not decodable, dropping it");
                Ok(Self::empty(status))
            }
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    pub fn entity(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match &self.outcome {
            Outcome::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<T> {
        match self.outcome {
            Outcome::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn into_error(self) -> Option<E> {
        match self.outcome {
            Outcome::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Split into `(status, entity, error)`. At most one side is `Some`.
    pub fn into_parts(self) -> (u16, Option<T>, Option<E>) {
        match self.outcome {
            Outcome::Entity(entity) => (self.status, Some(entity), None),
            Outcome::Error(error) => (self.status, None, Some(error)),
            Outcome::Empty => (self.status, None, None),
        }
    }
}
