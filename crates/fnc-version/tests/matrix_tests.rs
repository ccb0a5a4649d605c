use fnc_version::{allowed_targets, is_transition_safe, MajorVersion, ProbeResult, HostStatus};
use proptest::prelude::*;

use MajorVersion::{Custom, V1, V2, V3, V4};

#[test]
fn test_v1_is_locked() {
    assert!(is_transition_safe(Some(V1), V1));

    // Invalid
    assert!(!is_transition_safe(Some(V1), V2));
    assert!(!is_transition_safe(Some(V1), V3));
    assert!(!is_transition_safe(Some(V1), V4));
}

#[test]
fn test_v2_v3_move_freely() {
    assert!(is_transition_safe(Some(V2), V3));
    assert!(is_transition_safe(Some(V3), V2));
    assert!(is_transition_safe(Some(V2), V2));
    assert!(is_transition_safe(Some(V3), V3));

    assert!(!is_transition_safe(Some(V2), V1));
    assert!(!is_transition_safe(Some(V3), V1));
    assert!(!is_transition_safe(Some(V3), V4));
}

#[test]
fn test_v4_blocks_everything_but_custom() {
    assert!(!is_transition_safe(Some(V4), V1));
    assert!(!is_transition_safe(Some(V4), V3));
    assert!(!is_transition_safe(Some(V4), V4));
    assert!(is_transition_safe(Some(V4), Custom));
}

#[test]
fn test_custom_on_either_side_is_safe() {
    assert!(is_transition_safe(Some(Custom), V2));
    assert!(is_transition_safe(Some(Custom), V1));
    assert!(is_transition_safe(Some(V1), Custom));
}

#[test]
fn test_allowed_targets_table() {
    assert_eq!(allowed_targets(Some(V1)), vec![V1, Custom]);
    assert_eq!(allowed_targets(Some(V2)), vec![V2, V3, Custom]);
    assert_eq!(allowed_targets(Some(V4)), vec![Custom]);
    assert_eq!(allowed_targets(None), MajorVersion::ALL.to_vec());
}

#[test]
fn probe_result_wire_format() {
    let complete: ProbeResult<u32> = serde_json::from_str(r#"{"state":"complete","value":3}"#).unwrap();
    let loading: ProbeResult<u32> = serde_json::from_str(r#"{"state":"loading"}"#).unwrap();
    let host: ProbeResult<HostStatus> =
        serde_json::from_str(r#"{"state":"complete","value":{"state":"Running","version":"4.0.1"}}"#)
            .unwrap();

    assert_eq!(complete, ProbeResult::Complete(3));
    assert_eq!(loading, ProbeResult::Loading);
    assert_eq!(host, ProbeResult::Complete(HostStatus::running("4.0.1")));
}

fn any_version() -> impl Strategy<Value = MajorVersion> {
    prop_oneof![Just(V1), Just(V2), Just(V3), Just(V4), Just(Custom)]
}

proptest! {
    #[test]
    fn prop_unknown_old_version_never_blocks(new in any_version()) {
        prop_assert!(is_transition_safe(None, new));
    }

    #[test]
    fn prop_allowed_targets_match_matrix(old in proptest::option::of(any_version()), new in any_version()) {
        let allowed = allowed_targets(old);
        prop_assert_eq!(allowed.contains(&new), is_transition_safe(old, new));
    }

    #[test]
    fn prop_staying_put_is_safe_below_v4(old in prop_oneof![Just(V1), Just(V2), Just(V3), Just(Custom)]) {
        prop_assert!(is_transition_safe(Some(old), old));
    }
}
