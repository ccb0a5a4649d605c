//! Probe driver tests

use std::time::Duration;

use fnc_runtime::{resolve_probes, ProbeSummary, RuntimeSettingsConfig, SettingsSession};
use fnc_test_utils::{windows_app, FixedSource, HangingSource};
use fnc_version::{HostStatus, MajorVersion, ProbeResult};
use parking_lot::Mutex;

fn new_session(extension_version: &str) -> Mutex<SettingsSession> {
    Mutex::new(SettingsSession::new(
        RuntimeSettingsConfig::default(),
        windows_app(extension_version),
    ))
}

#[tokio::test]
async fn test_both_probes_settle_the_session() {
    let session = new_session("~3");
    let counts = FixedSource::ok(4_u32);
    let hosts = FixedSource::ok(HostStatus::running("4.0.1.0"));

    let summary = resolve_probes(&session, &counts, &hosts, Duration::from_secs(5)).await;

    assert_eq!(
        summary,
        ProbeSummary {
            function_count_accepted: true,
            host_status_accepted: true,
        }
    );
    let session = session.lock();
    assert_eq!(session.function_count(), &ProbeResult::Complete(4));
    assert_eq!(session.view().version_in_use, Some(MajorVersion::V4));
    assert!(!session.view().disabled);
}

#[tokio::test]
async fn test_source_error_becomes_failed() {
    let session = new_session("~3");
    let counts = FixedSource::<u32>::failing("functions endpoint returned 500");
    let hosts = FixedSource::<HostStatus>::failing("host unreachable");

    resolve_probes(&session, &counts, &hosts, Duration::from_secs(5)).await;

    let session = session.lock();
    assert_eq!(session.function_count(), &ProbeResult::Failed);
    assert_eq!(session.host_status(), &ProbeResult::Failed);
    // configured version is still usable
    assert_eq!(session.view().version_in_use, Some(MajorVersion::V3));
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_probe_times_out_as_failed() {
    let session = new_session("~3");
    let hosts = FixedSource::ok(HostStatus::running("3.0.1.0"));

    let summary = resolve_probes(&session, &HangingSource, &hosts, Duration::from_secs(30)).await;

    assert!(summary.function_count_accepted);
    assert!(summary.host_status_accepted);
    assert_eq!(session.lock().function_count(), &ProbeResult::Failed);
}

#[tokio::test(start_paused = true)]
async fn test_results_for_reloaded_session_are_dropped() {
    let session = new_session("~3");
    let counts = FixedSource::ok(2_u32).with_delay(Duration::from_millis(50));
    let hosts = FixedSource::ok(HostStatus::running("3.0.1.0")).with_delay(Duration::from_millis(50));

    let reload = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.lock().load(windows_app("~2"))
    };
    let (summary, new_id) = tokio::join!(
        resolve_probes(&session, &counts, &hosts, Duration::from_secs(5)),
        reload
    );

    assert_eq!(summary, ProbeSummary::default());
    assert_eq!(counts.calls(), 1);

    let session = session.lock();
    assert_eq!(session.id(), new_id);
    assert_eq!(session.function_count(), &ProbeResult::Loading);
    assert_eq!(session.host_status(), &ProbeResult::Loading);
}

#[tokio::test]
async fn test_second_resolution_is_ignored() {
    let session = new_session("~3");
    resolve_probes(
        &session,
        &FixedSource::ok(1_u32),
        &FixedSource::ok(HostStatus::running("3.0.1.0")),
        Duration::from_secs(5),
    )
    .await;

    let summary = resolve_probes(
        &session,
        &FixedSource::ok(0_u32),
        &FixedSource::<HostStatus>::failing("late"),
        Duration::from_secs(5),
    )
    .await;

    assert_eq!(summary, ProbeSummary::default());
    assert_eq!(session.lock().function_count(), &ProbeResult::Complete(1));
}
