//! Error types for the runtime-version control
//!
//! Provides error handling for:
//! - Transitions the state machine refuses
//! - Probe lookups that fail or time out
//! - Scenario files that cannot be loaded

use std::path::PathBuf;

use fnc_version::MajorVersion;

use crate::view::DisabledReason;

/// Transitions refused by the controller
///
/// A refused transition leaves the controller state and the working
/// snapshot untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The dropdown is disabled
    #[error("runtime version control is disabled: {0}")]
    ControlDisabled(DisabledReason),

    /// The requested option is shown but cannot be picked
    #[error("runtime version {0} is not selectable")]
    OptionDisabled(MajorVersion),

    /// The requested version is not in the option set at all
    #[error("runtime version {0} is not offered for this app")]
    OptionUnavailable(MajorVersion),

    /// A confirmation is already open
    #[error("a change to {0} is awaiting confirmation")]
    ConfirmationPending(MajorVersion),

    /// Confirm or dismiss without an open confirmation
    #[error("no runtime version change is awaiting confirmation")]
    NothingPending,
}

impl TransitionError {
    /// Whether the request failed only because of a transient state
    ///
    /// Loading probes, saves and open dialogs resolve on their own; the
    /// other refusals need a different input.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ControlDisabled(DisabledReason::FunctionCountLoading | DisabledReason::Saving)
                | Self::ConfirmationPending(_)
        )
    }
}

/// Probe source failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The source answered with an error
    #[error("probe unavailable: {0}")]
    Unavailable(String),

    /// The source did not answer in time
    #[error("probe timed out after {0}ms")]
    TimedOut(u64),
}

/// Scenario loading errors
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Reading the file failed
    #[error("failed to read scenario {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON scenario
    #[error("invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid YAML scenario
    #[error("invalid YAML scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
