//! Request and response types exchanged over the public JSON API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Hellos endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /hellos`.
///
/// The recipient is assigned by the server; clients only supply who the
/// greeting is from and what it says. The storage-assigned identifier is
/// deliberately absent so it cannot be set from the outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloRequest {
    /// Address of the greeting author.
    pub sender: String,
    /// Free-form greeting text.
    pub message: String,
}

/// Response body for a single hello, used both for `POST /hellos` and as the
/// element type of the `GET /hellos` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloResponse {
    /// Address of the greeting author.
    pub sender: String,
    /// Free-form greeting text.
    pub message: String,
    /// Server-assigned recipient of the greeting.
    pub recipient: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error payload returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// User-facing error message.
    pub msg: String,
    /// Full root cause, for diagnostics.
    pub error: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a message and its root cause.
    pub fn new(msg: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            error: error.into(),
        }
    }
}
