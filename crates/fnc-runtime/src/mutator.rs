//! Settings mutator
//!
//! Computes the replacement working snapshot for an approved target version.
//! Every derived setting is recomputed from the inputs on each call, so
//! applying the same target twice gives the same result as applying it once.

use fnc_settings::{AppSettingKey, SettingsStore};
use fnc_version::MajorVersion;

use crate::config::RuntimeSettingsConfig;
use crate::form::is_eligible_for_v4;

/// Applies an approved runtime version to a working snapshot
#[derive(Debug, Clone, Copy)]
pub struct SettingsMutator<'a> {
    config: &'a RuntimeSettingsConfig,
}

impl<'a> SettingsMutator<'a> {
    /// Mutator using `config` for derived defaults
    #[inline]
    #[must_use]
    pub fn new(config: &'a RuntimeSettingsConfig) -> Self {
        Self { config }
    }

    /// Version actually persisted for `target`
    ///
    /// A custom pick on an app eligible for `~4` is written as `~4` so the
    /// control stays enabled after the change.
    #[must_use]
    pub fn persisted_version<S: SettingsStore>(
        &self,
        working: &S,
        initial: &S,
        target: MajorVersion,
    ) -> MajorVersion {
        if target == MajorVersion::Custom
            && is_eligible_for_v4(initial, working, &self.config.worker_runtime.dotnet)
        {
            MajorVersion::V4
        } else {
            target
        }
    }

    /// Full replacement snapshot for `target`
    #[must_use]
    pub fn apply<S: SettingsStore + Clone>(&self, working: &S, initial: &S, target: MajorVersion) -> S {
        let persisted = self.persisted_version(working, initial, target);

        let mut next = working
            .clone()
            .drop_setting(AppSettingKey::AzureJobsExtensionVersion);

        if target == MajorVersion::V1 {
            next = next.drop_setting(AppSettingKey::FunctionsWorkerRuntime);
        } else if let Some(runtime) = initial
            .setting(AppSettingKey::FunctionsWorkerRuntime)
            .filter(|value| !value.is_empty())
        {
            next = next.put_setting(AppSettingKey::FunctionsWorkerRuntime, runtime);
        }

        let node_version = self.config.node_versions.for_version(target);
        tracing::debug!(%target, %persisted, node_version, "applying runtime version");

        next.put_setting(AppSettingKey::WebsiteNodeDefaultVersion, node_version)
            .put_setting(AppSettingKey::FunctionsExtensionVersion, persisted.setting_value())
    }
}

/// [`SettingsMutator::apply`] with the default configuration
#[must_use]
pub fn apply_version<S: SettingsStore + Clone>(working: &S, initial: &S, target: MajorVersion) -> S {
    SettingsMutator::new(&RuntimeSettingsConfig::default()).apply(working, initial, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnc_settings::{ConfigurationSnapshot, SitePlatform};

    fn base() -> ConfigurationSnapshot {
        ConfigurationSnapshot::new(SitePlatform::Windows)
            .with_setting(AppSettingKey::FunctionsExtensionVersion, "~2")
            .with_setting(AppSettingKey::FunctionsWorkerRuntime, "python")
            .with_setting(AppSettingKey::AzureJobsExtensionVersion, "~1")
    }

    #[test]
    fn legacy_jobs_setting_is_removed() {
        let next = apply_version(&base(), &base(), MajorVersion::V3);
        assert_eq!(next.setting(AppSettingKey::AzureJobsExtensionVersion), None);
    }

    #[test]
    fn node_version_follows_target() {
        let v2 = apply_version(&base(), &base(), MajorVersion::V2);
        let v3 = apply_version(&base(), &base(), MajorVersion::V3);
        let v1 = apply_version(&base(), &base(), MajorVersion::V1);

        assert_eq!(v2.setting(AppSettingKey::WebsiteNodeDefaultVersion), Some("~10"));
        assert_eq!(v3.setting(AppSettingKey::WebsiteNodeDefaultVersion), Some("~12"));
        assert_eq!(v1.setting(AppSettingKey::WebsiteNodeDefaultVersion), Some("6.5.0"));
    }

    #[test]
    fn custom_node_versions_from_config() {
        let config = RuntimeSettingsConfig::from_toml_str("[node_versions]\nv3 = \"~14\"\n").unwrap();
        let next = SettingsMutator::new(&config).apply(&base(), &base(), MajorVersion::V3);
        assert_eq!(next.setting(AppSettingKey::WebsiteNodeDefaultVersion), Some("~14"));
    }

    #[test]
    fn custom_without_eligibility_is_written_verbatim() {
        let next = apply_version(&base(), &base(), MajorVersion::Custom);
        assert_eq!(next.setting(AppSettingKey::FunctionsExtensionVersion), Some("custom"));
    }

    #[test]
    fn inputs_are_untouched() {
        let working = base();
        let initial = base();
        let _ = apply_version(&working, &initial, MajorVersion::V1);
        assert_eq!(working, base());
        assert_eq!(initial, base());
    }
}
