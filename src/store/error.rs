//! Document Store Error Types

use thiserror::Error;

/// Store error taxonomy
///
/// `CasMismatch` is the only conflict signal; callers decide whether to
/// retry. `Unavailable` covers transport-level failures.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    #[error("Document not found: {collection}/{key}")]
    NotFound { collection: String, key: String },

    #[error("Document already exists: {collection}/{key}")]
    AlreadyExists { collection: String, key: String },

    #[error("Version token mismatch: {collection}/{key}")]
    CasMismatch { collection: String, key: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: &str, key: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    pub fn already_exists(collection: &str, key: &str) -> Self {
        Self::AlreadyExists {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    pub fn cas_mismatch(collection: &str, key: &str) -> Self {
        Self::CasMismatch {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    /// Check if this is a write conflict (safe to retry from a fresh read)
    #[inline]
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::CasMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_conflict() {
        assert!(StoreError::cas_mismatch("profile", "p1").is_conflict());
        assert!(!StoreError::not_found("profile", "p1").is_conflict());
        assert!(!StoreError::Unavailable("down".into()).is_conflict());
    }

    #[test]
    fn test_display() {
        let err = StoreError::not_found("airline", "airline_10");
        assert_eq!(err.to_string(), "Document not found: airline/airline_10");
    }
}
