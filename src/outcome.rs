//! Two-slot `(error, value)` envelope.
//!
//! `Outcome` turns a failed operation into data so that callers outside the
//! pipeline check the error slot instead of handling an `Err` path.

use std::future::Future;

use serde::{Serialize, Serializer};

/// Holds exactly one of an error message or a value.
///
/// Serializes as a two-element array, `[error, value]`, with `null` in the
/// empty slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    error: Option<String>,
    value: Option<T>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            error: None,
            value: Some(value),
        }
    }

    /// An empty message is replaced so the error slot is never blank.
    pub fn err(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "Unknown error".to_string();
        }
        Self {
            error: Some(message),
            value: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.error, self.value) {
            (None, Some(value)) => Ok(value),
            (Some(error), _) => Err(error),
            // Constructors always fill one slot
            (None, None) => Err("Unknown error".to_string()),
        }
    }
}

impl<T> From<anyhow::Result<T>> for Outcome<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::ok(value),
            // Alternate form renders the whole context chain
            Err(e) => Outcome::err(format!("{e:#}")),
        }
    }
}

/// Awaits `future`, capturing its error in the envelope.
pub async fn safe_try<T, F>(future: F) -> Outcome<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    Outcome::from(future.await)
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.error, &self.value).serialize(serializer)
    }
}
