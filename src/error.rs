//! Error type for price feed validation.

/// Raised when a JSON payload does not satisfy the price feed schema.
///
/// Validation is all-or-nothing: the first mismatch aborts with this error,
/// which names the offending key path (e.g. `$.metadata.attestation_time`),
/// the shape the schema expected there, and what was actually found.
///
/// Accessors never produce this error; "price not currently available" is
/// `None`, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed input at {path}: expected {expected}, found {actual}")]
pub struct MalformedInput {
    /// Key path from the root (`$`) to the offending value.
    pub path: String,

    /// Rendered schema descriptor that the value failed to match.
    pub expected: String,

    /// The actual value (or "absent") at that path.
    pub actual: String,
}

impl MalformedInput {
    pub(crate) fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_path() {
        let err = MalformedInput::new("$.expo", "number", "\"4\"");
        assert_eq!(
            err.to_string(),
            "malformed input at $.expo: expected number, found \"4\""
        );
    }
}
