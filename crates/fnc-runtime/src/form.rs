//! Form inputs and the facts derived from them
//!
//! Everything the control decides is a function of the two snapshots, the
//! latest probe results and the user's permissions. Nothing here is cached;
//! callers derive fresh facts on every event.

use fnc_settings::{AppSettingKey, ConfigurationSnapshot, SettingsStore, SitePlatform};
use fnc_version::{HostStatus, MajorVersion, ProbeResult};
use serde::{Deserialize, Serialize};

/// What the signed-in user may do with the settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    /// User has write access to the app
    pub app_write: bool,
    /// The form is editable (not locked by the resource)
    pub editable: bool,
    /// A save is in flight
    pub saving: bool,
}

impl Permissions {
    /// Writable, editable, not saving
    #[inline]
    #[must_use]
    pub const fn writable() -> Self {
        Self {
            app_write: true,
            editable: true,
            saving: false,
        }
    }

    /// No write access
    #[inline]
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            app_write: false,
            editable: false,
            saving: false,
        }
    }

    /// Whether the control renders at all (as opposed to a read-only stub)
    #[inline]
    #[must_use]
    pub const fn can_edit(&self) -> bool {
        self.app_write && self.editable
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::writable()
    }
}

/// Borrowed view of everything the controller reads
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    /// Baseline snapshot the session was loaded with
    pub initial: &'a ConfigurationSnapshot,
    /// Snapshot being edited
    pub working: &'a ConfigurationSnapshot,
    /// Number of functions deployed to the app
    pub function_count: &'a ProbeResult<u32>,
    /// Host status of the running app
    pub host_status: &'a ProbeResult<HostStatus>,
    /// User permissions
    pub permissions: Permissions,
}

/// Whether functions are known to exist
///
/// Only a completed probe with a positive count counts; loading and failed
/// probes are handled by disabling the control instead.
#[inline]
#[must_use]
pub fn has_existing_functions(function_count: &ProbeResult<u32>) -> bool {
    matches!(function_count, ProbeResult::Complete(count) if *count > 0)
}

/// Whether a custom `~4` value may still be changed through the control
///
/// Requires the live extension-version to be exactly `~4`, both worker
/// runtimes present and equal ignoring case, and the initial one not the
/// in-process .NET worker.
#[must_use]
pub fn is_eligible_for_v4<S: SettingsStore>(initial: &S, working: &S, dotnet: &str) -> bool {
    let present = |store: &S| {
        store
            .setting(AppSettingKey::FunctionsWorkerRuntime)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    };

    let live_is_v4 = working.setting(AppSettingKey::FunctionsExtensionVersion)
        == Some(MajorVersion::V4.setting_value());

    match (present(working), present(initial)) {
        (Some(current), Some(baseline)) => {
            live_is_v4
                && current.eq_ignore_ascii_case(&baseline)
                && !baseline.eq_ignore_ascii_case(dotnet)
        }
        _ => false,
    }
}

/// Facts derived from a pair of snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFacts<'a> {
    /// Extension-version the session was loaded with
    pub initial_extension_version: Option<&'a str>,
    /// Extension-version currently in the form
    pub extension_version: Option<&'a str>,
    /// Dropdown key of the initial value
    pub initial_major: MajorVersion,
    /// Dropdown key of the current value
    pub current_major: MajorVersion,
    /// Site platform
    pub platform: SitePlatform,
    /// See [`is_eligible_for_v4`]
    pub eligible_for_v4: bool,
}

impl<'a> FormFacts<'a> {
    /// Derive facts from the baseline and working snapshots
    #[must_use]
    pub fn derive(
        initial: &'a ConfigurationSnapshot,
        working: &'a ConfigurationSnapshot,
        dotnet: &str,
    ) -> Self {
        let initial_extension_version = initial.setting(AppSettingKey::FunctionsExtensionVersion);
        let extension_version = working.setting(AppSettingKey::FunctionsExtensionVersion);

        Self {
            initial_extension_version,
            extension_version,
            initial_major: MajorVersion::classify_setting(initial_extension_version),
            current_major: MajorVersion::classify_setting(extension_version),
            platform: working.platform(),
            eligible_for_v4: is_eligible_for_v4(initial, working, dotnet),
        }
    }

    /// Whether the current value has no dedicated dropdown entry
    #[inline]
    #[must_use]
    pub fn has_custom_version(&self) -> bool {
        self.current_major == MajorVersion::Custom
    }

    /// Whether the current value is exactly `~4`
    #[inline]
    #[must_use]
    pub fn is_live_v4(&self) -> bool {
        self.extension_version == Some(MajorVersion::V4.setting_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(AppSettingKey, &str)]) -> ConfigurationSnapshot {
        pairs
            .iter()
            .fold(ConfigurationSnapshot::new(SitePlatform::Windows), |acc, (key, value)| {
                acc.with_setting(*key, *value)
            })
    }

    #[test]
    fn v4_eligibility_requires_matching_non_dotnet_runtime() {
        use AppSettingKey::{FunctionsExtensionVersion as Ext, FunctionsWorkerRuntime as Worker};

        let initial = snapshot(&[(Ext, "~4"), (Worker, "node")]);
        assert!(is_eligible_for_v4(&initial, &snapshot(&[(Ext, "~4"), (Worker, "NODE")]), "dotnet"));
        assert!(!is_eligible_for_v4(&initial, &snapshot(&[(Ext, "~4"), (Worker, "python")]), "dotnet"));
        assert!(!is_eligible_for_v4(&initial, &snapshot(&[(Ext, "~3"), (Worker, "node")]), "dotnet"));
        assert!(!is_eligible_for_v4(&initial, &snapshot(&[(Ext, "~4")]), "dotnet"));

        let dotnet = snapshot(&[(Ext, "~4"), (Worker, "dotnet")]);
        assert!(!is_eligible_for_v4(&dotnet, &dotnet, "dotnet"));
    }

    #[test]
    fn empty_worker_runtime_counts_as_missing() {
        use AppSettingKey::{FunctionsExtensionVersion as Ext, FunctionsWorkerRuntime as Worker};

        let both_empty = snapshot(&[(Ext, "~4"), (Worker, "")]);
        assert!(!is_eligible_for_v4(&both_empty, &both_empty, "dotnet"));
    }

    #[test]
    fn existing_functions_only_for_positive_complete_count() {
        assert!(has_existing_functions(&ProbeResult::Complete(1)));
        assert!(!has_existing_functions(&ProbeResult::Complete(0)));
        assert!(!has_existing_functions(&ProbeResult::Loading));
        assert!(!has_existing_functions(&ProbeResult::Failed));
    }

    #[test]
    fn facts_classify_both_snapshots() {
        let initial = snapshot(&[(AppSettingKey::FunctionsExtensionVersion, "~2")]);
        let working = snapshot(&[(AppSettingKey::FunctionsExtensionVersion, "~4")]);
        let facts = FormFacts::derive(&initial, &working, "dotnet");

        assert_eq!(facts.initial_major, MajorVersion::V2);
        assert_eq!(facts.current_major, MajorVersion::Custom);
        assert!(facts.has_custom_version());
        assert!(facts.is_live_v4());
        assert!(!facts.eligible_for_v4);
    }
}
