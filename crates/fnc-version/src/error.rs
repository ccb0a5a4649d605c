//! Error types for version parsing

/// Failure to parse a persisted major-version value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    /// Not one of `~1`, `~2`, `~3`, `~4` or `custom`
    #[error("unrecognized runtime major version: {0:?}")]
    Unrecognized(String),
}
