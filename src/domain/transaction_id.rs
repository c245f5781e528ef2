//! Caller-supplied transaction identifier.

use std::fmt;

use serde::Serialize;

/// Opaque identifier correlating a checkout attempt across the browser,
/// the relay, and the external confirmation source.
///
/// The only constraint is that it is non-empty. Uniqueness is not enforced:
/// a later registration for the same id replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wraps `raw` as a transaction id. Returns `None` for an empty string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
