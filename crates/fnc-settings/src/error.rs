//! Error types for settings snapshots

/// Snapshot construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A setting name appears more than once
    #[error("duplicate application setting: {0}")]
    DuplicateName(String),

    /// A setting has an empty name
    #[error("application setting name must not be empty")]
    EmptyName,
}
