//! Core types for the upload guard
//!
//! Wire-facing types use camelCase JSON serialization.

use serde::{Deserialize, Serialize};

/// Status code returned when every record passed the extension check
pub const STATUS_OK: u16 = 200;

/// Status code returned when a record carried a disallowed extension
pub const STATUS_REJECTED: u16 = 400;

const VALIDATED_MESSAGE: &str = "Files validated successfully";
const UNAUTHORIZED_MESSAGE: &str = "Unauthorized file type";

/// One object-creation occurrence in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEvent {
    /// Bucket the object was written to
    pub bucket: String,

    /// Object key, including any prefix path
    pub key: String,

    /// Object size in bytes
    pub size: u64,
}

impl ObjectEvent {
    /// Create a new object event
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, size: u64) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size,
        }
    }
}

/// Aggregate outcome for a whole batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// 200 or 400
    pub status_code: u16,

    /// Human-readable outcome
    pub message: String,
}

impl BatchResult {
    /// All evaluated records had allowed extensions
    pub fn validated() -> Self {
        Self {
            status_code: STATUS_OK,
            message: VALIDATED_MESSAGE.to_string(),
        }
    }

    /// A record with a disallowed extension was found
    pub fn unauthorized_file_type() -> Self {
        Self {
            status_code: STATUS_REJECTED,
            message: UNAUTHORIZED_MESSAGE.to_string(),
        }
    }

    /// Whether the batch passed
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// Convert into the response document returned to the invoker
    pub fn to_response(&self) -> InvocationResponse {
        InvocationResponse::from(self)
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::validated()
    }
}

/// Response document handed back to the invoking system
///
/// `body` holds the JSON-encoded message, so `"Unauthorized file type"`
/// is carried as `"\"Unauthorized file type\""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl From<&BatchResult> for InvocationResponse {
    fn from(result: &BatchResult) -> Self {
        Self {
            status_code: result.status_code,
            body: serde_json::Value::String(result.message.clone()).to_string(),
        }
    }
}
