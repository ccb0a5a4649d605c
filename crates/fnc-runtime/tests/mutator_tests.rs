use fnc_runtime::{apply_version, RuntimeSettingsConfig, SettingsMutator};
use fnc_settings::{AppSettingKey, ConfigurationSnapshot, SitePlatform};
use fnc_test_utils::{app, snapshot, windows_app};
use fnc_version::MajorVersion;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_apply_twice_matches_apply_once() {
    let initial = windows_app("~3").with_setting(AppSettingKey::AzureJobsExtensionVersion, "~1");

    let once = apply_version(&initial, &initial, MajorVersion::V2);
    let twice = apply_version(&once, &initial, MajorVersion::V2);

    assert_eq!(once, twice);
    assert_eq!(once.len(), 3);
}

#[test]
fn test_v1_strips_worker_runtime() {
    let initial = app(SitePlatform::Windows, "~3", "java");
    let next = apply_version(&initial, &initial, MajorVersion::V1);

    assert!(!next.contains(AppSettingKey::FunctionsWorkerRuntime.as_str()));
    assert_eq!(next.setting(AppSettingKey::FunctionsExtensionVersion), Some("~1"));
    assert_eq!(next.setting(AppSettingKey::WebsiteNodeDefaultVersion), Some("6.5.0"));
}

#[test]
fn test_worker_runtime_restored_from_initial() {
    let initial = app(SitePlatform::Windows, "~3", "python");

    let v1 = apply_version(&initial, &initial, MajorVersion::V1);
    let v3 = apply_version(&v1, &initial, MajorVersion::V3);

    assert_eq!(v3.setting(AppSettingKey::FunctionsWorkerRuntime), Some("python"));
}

#[test]
fn test_initial_worker_runtime_overrides_edits() {
    let initial = app(SitePlatform::Windows, "~3", "python");
    let working = initial.clone().with_setting(AppSettingKey::FunctionsWorkerRuntime, "node");

    let next = apply_version(&working, &initial, MajorVersion::V2);
    assert_eq!(next.setting(AppSettingKey::FunctionsWorkerRuntime), Some("python"));
}

#[test]
fn test_missing_initial_worker_runtime_keeps_working_value() {
    let initial = snapshot(SitePlatform::Windows, &[(AppSettingKey::FunctionsExtensionVersion, "~2")]);
    let working = initial.clone().with_setting(AppSettingKey::FunctionsWorkerRuntime, "node");

    let next = apply_version(&working, &initial, MajorVersion::V3);
    assert_eq!(next.setting(AppSettingKey::FunctionsWorkerRuntime), Some("node"));
}

#[test]
fn test_custom_normalized_to_v4_when_eligible() {
    let initial = windows_app("~4");
    let next = apply_version(&initial, &initial, MajorVersion::Custom);

    assert_eq!(next.setting(AppSettingKey::FunctionsExtensionVersion), Some("~4"));
    assert_eq!(next.setting(AppSettingKey::WebsiteNodeDefaultVersion), Some("6.5.0"));
}

#[test]
fn test_dotnet_custom_not_normalized() {
    let initial = app(SitePlatform::Windows, "~4", "dotnet");
    let next = apply_version(&initial, &initial, MajorVersion::Custom);

    assert_eq!(next.setting(AppSettingKey::FunctionsExtensionVersion), Some("custom"));
}

#[test]
fn test_unrelated_settings_survive() {
    let initial = windows_app("~2").upsert("AzureWebJobsStorage", "UseDevelopmentStorage=true");
    let next = apply_version(&initial, &initial, MajorVersion::V3);

    assert_eq!(next.get("AzureWebJobsStorage"), Some("UseDevelopmentStorage=true"));
}

#[test]
fn test_persisted_version_respects_config_dotnet_name() {
    let mut config = RuntimeSettingsConfig::default();
    config.worker_runtime.dotnet = "node".to_string();
    let initial = windows_app("~4");

    let mutator = SettingsMutator::new(&config);
    assert_eq!(
        mutator.persisted_version(&initial, &initial, MajorVersion::Custom),
        MajorVersion::Custom
    );
}

fn arb_target() -> impl Strategy<Value = MajorVersion> {
    prop_oneof![
        Just(MajorVersion::V1),
        Just(MajorVersion::V2),
        Just(MajorVersion::V3),
        Just(MajorVersion::V4),
        Just(MajorVersion::Custom),
    ]
}

fn arb_snapshot() -> impl Strategy<Value = ConfigurationSnapshot> {
    let value = prop_oneof![
        Just("~1"),
        Just("~2"),
        Just("~3"),
        Just("~4"),
        Just("node"),
        Just("dotnet"),
        Just(""),
    ];
    (
        proptest::collection::vec((0..AppSettingKey::ALL.len(), value), 0..6),
        any::<bool>(),
    )
        .prop_map(|(entries, linux)| {
            let platform = if linux { SitePlatform::Linux } else { SitePlatform::Windows };
            entries
                .into_iter()
                .fold(ConfigurationSnapshot::new(platform), |acc, (index, value)| {
                    acc.with_setting(AppSettingKey::ALL[index], value)
                })
        })
}

proptest! {
    #[test]
    fn prop_apply_is_idempotent(
        initial in arb_snapshot(),
        working in arb_snapshot(),
        target in arb_target(),
    ) {
        let once = apply_version(&working, &initial, target);
        let twice = apply_version(&once, &initial, target);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_apply_never_keeps_legacy_jobs_setting(
        initial in arb_snapshot(),
        working in arb_snapshot(),
        target in arb_target(),
    ) {
        let next = apply_version(&working, &initial, target);
        prop_assert_eq!(next.setting(AppSettingKey::AzureJobsExtensionVersion), None);
        prop_assert!(next.setting(AppSettingKey::FunctionsExtensionVersion).is_some());
    }

    #[test]
    fn prop_inputs_are_not_mutated(
        initial in arb_snapshot(),
        working in arb_snapshot(),
        target in arb_target(),
    ) {
        let before = (initial.clone(), working.clone());
        let _ = apply_version(&working, &initial, target);
        prop_assert_eq!((initial, working), before);
    }
}
