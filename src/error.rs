use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for scene construction and configuration loading.
///
/// Runtime geometry never errors: precondition violations fail loudly via
/// assertions, and recoverable conditions (a missed removal, a degenerate
/// touching overlap) are logged or ignored without corrupting state.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected scene or index configuration (bad ranges, degenerate extents).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure reading a configuration file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure parsing a JSON scene configuration.
    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidConfig("object_size range is empty".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("object_size"));
    }
}
