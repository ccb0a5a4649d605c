//! Probe results and running-version resolution
//!
//! Two lookups run independently of each other when the settings form loads:
//! the number of functions deployed to the app and the host status. Each
//! moves from `Loading` to `Complete` or `Failed` exactly once.

use serde::{Deserialize, Serialize};

use crate::version::{parse_configured_runtime_version, parse_exact_runtime_version, MajorVersion};

/// Observed state of an asynchronous lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ProbeResult<T> {
    /// No answer yet
    Loading,
    /// The lookup succeeded
    Complete(T),
    /// The lookup failed; its value is unknown for the rest of the session
    Failed,
}

impl<T> ProbeResult<T> {
    /// Whether the lookup is still running
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ProbeResult::Loading)
    }

    /// Whether the lookup failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, ProbeResult::Failed)
    }

    /// Whether the lookup reached a terminal state
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    /// Completed value, if any
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            ProbeResult::Complete(value) => Some(value),
            _ => None,
        }
    }

    /// Map the completed value
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProbeResult<U> {
        match self {
            ProbeResult::Loading => ProbeResult::Loading,
            ProbeResult::Complete(value) => ProbeResult::Complete(f(value)),
            ProbeResult::Failed => ProbeResult::Failed,
        }
    }
}

impl<T> Default for ProbeResult<T> {
    fn default() -> Self {
        ProbeResult::Loading
    }
}

impl<T, E> From<Result<T, E>> for ProbeResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ProbeResult::Complete(value),
            Err(_) => ProbeResult::Failed,
        }
    }
}

/// Function host lifecycle state as reported by the host status endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostState {
    /// Not yet reported
    #[default]
    Default,
    /// Host initialized
    Initialized,
    /// Host running
    Running,
    /// Host in an error state; its version is not trusted
    Error,
    /// Host offline
    Offline,
}

/// Host status payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStatus {
    /// Lifecycle state
    #[serde(default)]
    pub state: HostState,
    /// Exact runtime version, possibly empty or invalid
    #[serde(default)]
    pub version: String,
}

impl HostStatus {
    /// Status for a host in `state` reporting `version`
    #[inline]
    pub fn new(state: HostState, version: impl Into<String>) -> Self {
        Self {
            state,
            version: version.into(),
        }
    }

    /// Running host reporting `version`
    #[inline]
    pub fn running(version: impl Into<String>) -> Self {
        Self::new(HostState::Running, version)
    }
}

/// Resolve the major version the app is actually executing
///
/// Prefers the exact version from a healthy, completed host status. Falls
/// back to the extension-version the form was loaded with. `None` when
/// neither yields a recognized version.
#[must_use]
pub fn resolve_version_in_use(
    host_status: &ProbeResult<HostStatus>,
    configured_extension_version: Option<&str>,
) -> Option<MajorVersion> {
    let from_host = host_status
        .value()
        .filter(|status| status.state != HostState::Error)
        .and_then(|status| parse_exact_runtime_version(&status.version));

    if let Some(version) = from_host {
        return Some(version);
    }

    let from_config = configured_extension_version.and_then(parse_configured_runtime_version);
    tracing::debug!(
        host_status_loading = host_status.is_loading(),
        ?from_config,
        "host status gave no running version, using configured extension version"
    );
    from_config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_host_status_wins() {
        let host = ProbeResult::Complete(HostStatus::running("4.0.1.16815"));
        assert_eq!(resolve_version_in_use(&host, Some("~3")), Some(MajorVersion::V4));
    }

    #[test]
    fn error_state_falls_back_to_configuration() {
        let host = ProbeResult::Complete(HostStatus::new(HostState::Error, "4.0.1"));
        assert_eq!(resolve_version_in_use(&host, Some("~3")), Some(MajorVersion::V3));
    }

    #[test]
    fn invalid_reported_version_falls_back() {
        let host = ProbeResult::Complete(HostStatus::running(""));
        assert_eq!(resolve_version_in_use(&host, Some("~2")), Some(MajorVersion::V2));
    }

    #[test]
    fn loading_and_failed_fall_back() {
        assert_eq!(resolve_version_in_use(&ProbeResult::Loading, Some("~1")), Some(MajorVersion::V1));
        assert_eq!(resolve_version_in_use(&ProbeResult::Failed, Some("beta")), Some(MajorVersion::V1));
    }

    #[test]
    fn unresolvable_is_none() {
        assert_eq!(resolve_version_in_use(&ProbeResult::Failed, None), None);
        assert_eq!(resolve_version_in_use(&ProbeResult::Failed, Some("custom")), None);
    }

    #[test]
    fn result_conversion() {
        let ok: ProbeResult<u32> = Ok::<_, ()>(3).into();
        let err: ProbeResult<u32> = Err::<u32, _>("boom").into();
        assert_eq!(ok, ProbeResult::Complete(3));
        assert_eq!(err, ProbeResult::Failed);
    }
}
