//! Errors raised by the yield projection.
use std::error::Error;

/// Indicates that a projection could not be computed.
///
/// The projection either returns a complete result or one of these errors; it never returns a
/// partial sequence.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ProjectionError {
    /// The projection input is malformed (e.g. empty or unordered years, a negative yield or more
    /// infected palms than palms in total)
    #[display("Invalid input: {_0}")]
    InvalidInput(String),
    /// The input refers to something the model is not configured for (e.g. an unknown soil
    /// condition when the strict soil policy is in force)
    #[display("Invalid configuration: {_0}")]
    InvalidConfiguration(String),
}

impl ProjectionError {
    /// Create a new [`ProjectionError::InvalidInput`]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new [`ProjectionError::InvalidConfiguration`]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// This is needed so that `ProjectionError` can be treated like standard errors are.
impl Error for ProjectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ProjectionError::invalid_input("`years` is empty").to_string(),
            "Invalid input: `years` is empty"
        );
        assert_eq!(
            ProjectionError::invalid_configuration("Unknown soil condition: clay").to_string(),
            "Invalid configuration: Unknown soil condition: clay"
        );
    }
}
