//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LuxmonError`]
//! via `#[from]` or an explicit `From` impl — no `String` variants.

/// Top-level error type shared by services, ports, and adapters.
#[derive(Debug, thiserror::Error)]
pub enum LuxmonError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// An adapter-level storage failure, boxed to keep the domain
    /// independent of any particular storage crate.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A name field was empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A job type label was empty.
    #[error("job type must not be empty")]
    EmptyJobType,

    /// A reading value was negative, NaN, or infinite.
    #[error("reading value must be finite and non-negative")]
    InvalidReadingValue,

    /// A rule window or threshold was zero.
    #[error("{0} must be greater than zero")]
    ZeroThreshold(&'static str),

    /// An identifier string could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A timestamp string could not be parsed as RFC 3339.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// A lookup by id found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// The kind of record that was missing (e.g. `"Site"`).
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_luxmon_error() {
        let err: LuxmonError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            LuxmonError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_convert_not_found_error_into_luxmon_error() {
        let err: LuxmonError = NotFoundError {
            entity: "Site",
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, LuxmonError::NotFound(_)));
    }

    #[test]
    fn should_format_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Job",
            id: "123".to_string(),
        };
        assert_eq!(err.to_string(), "Job 123 not found");
    }
}
