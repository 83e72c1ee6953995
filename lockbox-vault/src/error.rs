//! Store error taxonomy.

use lockbox_crypto::CryptoError;
use lockbox_model::ModelError;
use lockbox_storage::StorageError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by [`crate::StoreHandle`].
///
/// `Authentication`, `Decode` and `NotFound` are always distinct: a wrong
/// master credential never looks like a missing record or corrupted data.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("cannot decode {bucket}/{name}: {reason}")]
    Decode {
        bucket: String,
        name: String,
        reason: String,
    },

    #[error("authentication failed for {bucket}/{name} (wrong master credential?)")]
    Authentication { bucket: String, name: String },

    #[error("{bucket}/{name} does not exist")]
    NotFound { bucket: String, name: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("crypto error: {0}")]
    Crypto(CryptoError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse error class, for callers that map errors to user-facing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreErrorKind {
    Validation,
    Encode,
    Decode,
    Authentication,
    NotFound,
    Storage,
    Crypto,
    Config,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Validation(_) => StoreErrorKind::Validation,
            StoreError::Encode(_) => StoreErrorKind::Encode,
            StoreError::Decode { .. } => StoreErrorKind::Decode,
            StoreError::Authentication { .. } => StoreErrorKind::Authentication,
            StoreError::NotFound { .. } => StoreErrorKind::NotFound,
            StoreError::Storage(_) => StoreErrorKind::Storage,
            StoreError::Crypto(_) => StoreErrorKind::Crypto,
            StoreError::Config(_) => StoreErrorKind::Config,
        }
    }

    pub(crate) fn not_found(bucket: &str, name: &str) -> Self {
        StoreError::NotFound {
            bucket: bucket.to_string(),
            name: name.to_string(),
        }
    }

    /// Classify a failure to open a stored blob.
    pub(crate) fn from_open(bucket: &str, name: &str, err: CryptoError) -> Self {
        match err {
            CryptoError::Authentication => StoreError::Authentication {
                bucket: bucket.to_string(),
                name: name.to_string(),
            },
            CryptoError::Malformed(reason) => StoreError::Decode {
                bucket: bucket.to_string(),
                name: name.to_string(),
                reason,
            },
            other => StoreError::Crypto(other),
        }
    }

    pub(crate) fn from_decode(bucket: &str, name: &str, err: ModelError) -> Self {
        let reason = match err {
            ModelError::Decode(reason) => reason,
            other => other.to_string(),
        };
        StoreError::Decode {
            bucket: bucket.to_string(),
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn from_model(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => StoreError::Validation(msg),
            ModelError::Encode(msg) => StoreError::Encode(msg),
            other => StoreError::Encode(other.to_string()),
        }
    }
}
