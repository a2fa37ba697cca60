//! Alert message construction

use crate::policy::Violation;
use crate::types::ObjectEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Subject line used for every alert
pub const ALERT_SUBJECT: &str = "S3 File Validation Alert";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A formatted alert ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub subject: String,
    pub body: String,
}

impl Alert {
    /// Alert for an object whose extension is not on the allow-list
    ///
    /// `captured_at` is the wall-clock time of evaluation, not the
    /// event time.
    pub fn disallowed_extension(
        event: &ObjectEvent,
        extension: &str,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let body = format!(
            "ALERT: Unauthorized file type uploaded\n\
             File: {}\n\
             Extension: {}\n\
             Bucket: {}\n\
             Time: {}",
            event.key,
            extension,
            event.bucket,
            captured_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        );
        Self::with_body(body)
    }

    /// Alert for an object larger than `limit` bytes
    pub fn oversized(event: &ObjectEvent, limit: u64) -> Self {
        let body = format!(
            "ALERT: File size exceeds limit\n\
             File: {}\n\
             Size: {:.2}MB\n\
             Limit: {}MB\n\
             Bucket: {}",
            event.key,
            to_mib(event.size),
            format_limit(to_mib(limit)),
            event.bucket,
        );
        Self::with_body(body)
    }

    /// Build the alert matching a violation, if any
    pub fn for_violation(
        event: &ObjectEvent,
        violation: &Violation,
        captured_at: impl FnOnce() -> DateTime<Utc>,
    ) -> Option<Self> {
        match violation {
            Violation::Compliant => None,
            Violation::DisallowedExtension { extension } => {
                Some(Self::disallowed_extension(event, extension, captured_at()))
            }
            Violation::OversizedFile { limit, .. } => Some(Self::oversized(event, *limit)),
        }
    }

    fn with_body(body: String) -> Self {
        Self {
            subject: ALERT_SUBJECT.to_string(),
            body,
        }
    }
}

fn to_mib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}

// Shortest round-trip form: 10 MiB renders as "10.0", 2.5 MiB as "2.5".
// Below 1e-4 the exponent is written with at least two digits, so a
// one-byte limit renders as "9.5367431640625e-07".
fn format_limit(mib: f64) -> String {
    let scientific = format!("{:e}", mib);
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if exponent < -4 {
                return format!("{}e-{:02}", mantissa, -exponent);
            }
        }
    }
    format!("{:?}", mib)
}
