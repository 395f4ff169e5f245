use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_VALUE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum StorageOperation {
    Read { key: String },
    Write { key: String, value: Vec<u8> },
}

impl StorageOperation {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key } | Self::Write { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum StorageOutput {
    /// `None` when nothing was stored under the key.
    Value(Option<Vec<u8>>),
    Written,
}

impl StorageOutput {
    #[must_use]
    pub fn into_value(self) -> Option<Vec<u8>> {
        match self {
            Self::Value(value) => value,
            Self::Written => None,
        }
    }
}

pub type StorageResult = Result<StorageOutput, StorageError>;

impl Operation for StorageOperation {
    type Output = StorageResult;
}

pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason: "key cannot be empty".to_string(),
        });
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::InvalidKey {
            key: key.chars().take(50).collect::<String>() + "...",
            reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
        });
    }

    if key.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidKey {
            key: key.escape_default().to_string(),
            reason: "key contains control characters".to_string(),
        });
    }

    Ok(())
}

/// Byte storage keyed by string, backed by the shell's local storage.
#[derive(crux_core::macros::Capability)]
pub struct Storage<Ev> {
    context: CapabilityContext<StorageOperation, Ev>,
}

impl<Ev> Storage<Ev> {
    pub fn new(context: CapabilityContext<StorageOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Storage<Ev>
where
    Ev: Send + 'static,
{
    pub fn read<F>(&self, key: impl Into<String>, make_event: F)
    where
        F: FnOnce(StorageResult) -> Ev + Send + 'static,
    {
        self.request(StorageOperation::Read { key: key.into() }, make_event);
    }

    pub fn write<F>(&self, key: impl Into<String>, value: Vec<u8>, make_event: F)
    where
        F: FnOnce(StorageResult) -> Ev + Send + 'static,
    {
        self.request(
            StorageOperation::Write {
                key: key.into(),
                value,
            },
            make_event,
        );
    }

    fn request<F>(&self, operation: StorageOperation, make_event: F)
    where
        F: FnOnce(StorageResult) -> Ev + Send + 'static,
    {
        // Invalid requests never reach the shell.
        let rejected = validate_key(operation.key()).and_then(|()| match &operation {
            StorageOperation::Write { value, .. } if value.len() > MAX_VALUE_SIZE => {
                Err(StorageError::ValueTooLarge {
                    size: value.len(),
                    max: MAX_VALUE_SIZE,
                })
            }
            _ => Ok(()),
        });

        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = match rejected {
                Ok(()) => ctx.request_from_shell(operation).await,
                Err(e) => Err(e),
            };
            ctx.update_app(make_event(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_keys() {
        assert!(validate_key("travelPlannerTrips").is_ok());
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey { .. })));
        assert!(matches!(validate_key("   "), Err(StorageError::InvalidKey { .. })));
        assert!(matches!(validate_key("a\0b"), Err(StorageError::InvalidKey { .. })));
        assert!(validate_key(&"k".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }

    #[test]
    fn output_value_extraction() {
        assert_eq!(StorageOutput::Value(Some(vec![1])).into_value(), Some(vec![1]));
        assert_eq!(StorageOutput::Value(None).into_value(), None);
        assert_eq!(StorageOutput::Written.into_value(), None);
    }

    #[test]
    fn operation_wire_format() {
        let op = StorageOperation::Read {
            key: "travelPlannerTrips".into(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "Read");
        assert_eq!(json["data"]["key"], "travelPlannerTrips");
    }
}
