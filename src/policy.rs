//! Upload policy and violation classification
//!
//! A `Policy` is an allow-list of file extensions plus a size ceiling.
//! Classification is a pure function of an `ObjectEvent` and a `Policy`.

use crate::error::{GuardError, Result};
use crate::types::ObjectEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Extensions accepted when no policy is configured
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 9] = [
    ".html", ".css", ".js", ".jpg", ".jpeg", ".png", ".gif", ".ico", ".svg",
];

/// 10 MiB
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// What the pipeline does with the rest of a batch after a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationAction {
    /// Stop evaluating the batch immediately
    #[default]
    Halt,
    /// Keep evaluating the remaining records
    Continue,
}

/// Classification of a single object against a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Compliant,
    DisallowedExtension { extension: String },
    OversizedFile { size: u64, limit: u64 },
}

impl Violation {
    /// Whether the object violated the policy
    pub fn is_violation(&self) -> bool {
        !matches!(self, Violation::Compliant)
    }
}

/// Upload policy
///
/// Deserialization goes through the same checks as [`Policy::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPolicy")]
pub struct Policy {
    /// Lower-case, dot-prefixed extensions
    allowed_extensions: BTreeSet<String>,

    max_size_bytes: u64,

    /// Only `Halt` returns before later records are evaluated
    on_disallowed_extension: ViolationAction,
}

/// Unchecked policy as written in configuration
#[derive(Deserialize)]
struct RawPolicy {
    #[serde(default = "default_raw_extensions")]
    allowed_extensions: Vec<String>,

    #[serde(default = "default_max_size_bytes")]
    max_size_bytes: u64,

    #[serde(default)]
    on_disallowed_extension: ViolationAction,
}

impl TryFrom<RawPolicy> for Policy {
    type Error = GuardError;

    fn try_from(raw: RawPolicy) -> Result<Self> {
        Ok(Policy::new(raw.allowed_extensions, raw.max_size_bytes)?
            .with_on_disallowed_extension(raw.on_disallowed_extension))
    }
}

fn default_allowed_extensions() -> BTreeSet<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_raw_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_SIZE_BYTES
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            on_disallowed_extension: ViolationAction::default(),
        }
    }
}

impl Policy {
    /// Create a policy from an extension list and a size ceiling
    ///
    /// Extensions are lower-cased and given a leading dot when missing.
    pub fn new<I, S>(allowed_extensions: I, max_size_bytes: u64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;

        let policy = Self {
            allowed_extensions,
            max_size_bytes,
            on_disallowed_extension: ViolationAction::default(),
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Set the action taken after a disallowed extension
    pub fn with_on_disallowed_extension(mut self, action: ViolationAction) -> Self {
        self.on_disallowed_extension = action;
        self
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.max_size_bytes == 0 {
            return Err(GuardError::Config(
                "max_size_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn allowed_extensions(&self) -> &BTreeSet<String> {
        &self.allowed_extensions
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn on_disallowed_extension(&self) -> ViolationAction {
        self.on_disallowed_extension
    }

    /// Whether `extension` (as returned by [`extension_of`]) is allowed
    pub fn allows_extension(&self, extension: &str) -> bool {
        !extension.is_empty() && self.allowed_extensions.contains(extension)
    }

    /// Classify an object against this policy
    ///
    /// The extension check runs first; an object with a disallowed
    /// extension is never reported as oversized.
    pub fn classify(&self, event: &ObjectEvent) -> Violation {
        let extension = extension_of(&event.key);
        if !self.allows_extension(&extension) {
            return Violation::DisallowedExtension { extension };
        }

        if event.size > self.max_size_bytes {
            return Violation::OversizedFile {
                size: event.size,
                limit: self.max_size_bytes,
            };
        }

        Violation::Compliant
    }
}

/// Extract the lower-cased extension of an object key
///
/// Only the final path segment is considered. Leading dots belong to the
/// name, so `dir/.env` has no extension. Returns an empty string when
/// there is no extension.
pub fn extension_of(key: &str) -> String {
    let name = key.rsplit('/').next().unwrap_or(key);
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(idx) => name[stem_start + idx..].to_lowercase(),
        None => String::new(),
    }
}

fn normalize_extension(ext: &str) -> Result<String> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return Err(GuardError::Config(format!(
            "Invalid allowed extension: '{}'",
            ext
        )));
    }
    Ok(format!(".{}", trimmed.to_lowercase()))
}
