//! Runtime-version compatibility matrix
//!
//! Which moves between major versions an app with existing functions can
//! make without asking the user first.

use crate::version::MajorVersion::{self, Custom, V1, V2, V3};

/// Whether moving from `old` to `new` needs no confirmation
///
/// `None` means the running version could not be determined; that case never
/// blocks, because the caller has nothing meaningful to ask the user about.
#[must_use]
pub fn is_transition_safe(old: Option<MajorVersion>, new: MajorVersion) -> bool {
    if old == Some(Custom) || new == Custom {
        return true;
    }

    match old {
        None => true,
        Some(V1) => new == V1,
        Some(V2 | V3) => matches!(new, V2 | V3),
        Some(_) => false,
    }
}

/// Targets reachable from `old` without confirmation
#[must_use]
pub fn allowed_targets(old: Option<MajorVersion>) -> Vec<MajorVersion> {
    MajorVersion::ALL
        .into_iter()
        .filter(|&new| is_transition_safe(old, new))
        .collect()
}
