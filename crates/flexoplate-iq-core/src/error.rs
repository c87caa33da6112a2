//! Error taxonomy shared by every core operation.
//!
//! Missing optional plate data is never an error: the scorer degrades to
//! neutral credit and the exposure calculator leaves the affected time
//! unset. Only structural problems surface here.

use thiserror::Error;

/// Errors produced by catalog lookups, equivalency search, and exposure math.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced record does not resolve in the catalog.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A caller-supplied value is out of range or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The catalog backend failed while reading.
    #[error(transparent)]
    Catalog(#[from] anyhow::Error),
}

impl CoreError {
    pub fn plate_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "plate",
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidInput(message.into())
    }

    /// True for errors that map to a 4xx-class response at a service boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::NotFound { .. } | CoreError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CoreError::plate_not_found("p-42");
        assert_eq!(err.to_string(), "plate not found: p-42");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_catalog_error_is_transparent() {
        let err: CoreError = anyhow::anyhow!("catalog offline").into();
        assert_eq!(err.to_string(), "catalog offline");
        assert!(!err.is_client_error());
    }
}
