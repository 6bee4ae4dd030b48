//! Wire DTOs shared by every client.

use serde::{Deserialize, Serialize};

/// Conventional JSON error body, e.g. `{"status":401,"message":"Authenticate"}`.
///
/// Used as the default error type of `FluentClient`. Missing fields decode to
/// their defaults so partially filled error bodies still come through.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
}
