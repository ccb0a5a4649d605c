//! Runtime major versions and their string forms
//!
//! Three different strings map onto [`MajorVersion`]:
//! - the persisted extension-version setting (`~3`, `custom`, ...)
//! - the exact version a running host reports (`3.0.15417.0`)
//! - loosely configured values accepted by the platform (`beta`, `~4`, `4.0.1`)
//!
//! None of the parsers fail hard: anything unrecognized becomes `None` or
//! [`MajorVersion::Custom`] so a bad value never aborts evaluation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionParseError;

/// Functions runtime major version
///
/// The variants are not ordered; which transitions are allowed is decided by
/// [`crate::compat::is_transition_safe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorVersion {
    /// Runtime 1.x
    #[serde(rename = "~1")]
    V1,
    /// Runtime 2.x
    #[serde(rename = "~2")]
    V2,
    /// Runtime 3.x
    #[serde(rename = "~3")]
    V3,
    /// Runtime 4.x
    #[serde(rename = "~4")]
    V4,
    /// Any other pinned or custom value
    #[serde(rename = "custom")]
    Custom,
}

impl MajorVersion {
    /// Every variant, in declaration order
    pub const ALL: [MajorVersion; 5] = [
        MajorVersion::V1,
        MajorVersion::V2,
        MajorVersion::V3,
        MajorVersion::V4,
        MajorVersion::Custom,
    ];

    /// Value written to the extension-version setting
    #[inline]
    #[must_use]
    pub const fn setting_value(self) -> &'static str {
        match self {
            MajorVersion::V1 => "~1",
            MajorVersion::V2 => "~2",
            MajorVersion::V3 => "~3",
            MajorVersion::V4 => "~4",
            MajorVersion::Custom => "custom",
        }
    }

    /// Classify a persisted extension-version into its dropdown key
    ///
    /// Only `~1`, `~2` and `~3` have dedicated entries. Everything else,
    /// `~4` and a missing setting included, is [`MajorVersion::Custom`].
    #[must_use]
    pub fn classify_setting(value: Option<&str>) -> Self {
        match value {
            Some("~1") => MajorVersion::V1,
            Some("~2") => MajorVersion::V2,
            Some("~3") => MajorVersion::V3,
            _ => MajorVersion::Custom,
        }
    }

    /// Major version of a numeric major component
    #[inline]
    #[must_use]
    pub const fn from_major(major: u32) -> Option<Self> {
        match major {
            1 => Some(MajorVersion::V1),
            2 => Some(MajorVersion::V2),
            3 => Some(MajorVersion::V3),
            4 => Some(MajorVersion::V4),
            _ => None,
        }
    }
}

impl fmt::Display for MajorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.setting_value())
    }
}

impl FromStr for MajorVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MajorVersion::ALL
            .into_iter()
            .find(|version| version.setting_value() == s)
            .ok_or_else(|| VersionParseError::Unrecognized(s.to_string()))
    }
}

/// Parse the exact version a running host reports, e.g. `3.0.15417.0`
///
/// The major component must be followed by at least one more dotted
/// component. Returns `None` for empty, malformed or unknown majors.
#[must_use]
pub fn parse_exact_runtime_version(exact: &str) -> Option<MajorVersion> {
    let (major, rest) = exact.trim().split_once('.')?;
    if rest.is_empty() {
        return None;
    }
    major.parse::<u32>().ok().and_then(MajorVersion::from_major)
}

/// Parse a configured extension-version into the major version it selects
///
/// Accepts the `~N` forms, the legacy `beta` alias of V1 and exact versions.
/// `custom` and anything unrecognized yield `None`.
#[must_use]
pub fn parse_configured_runtime_version(configured: &str) -> Option<MajorVersion> {
    match configured.trim() {
        "" => None,
        "~1" | "beta" => Some(MajorVersion::V1),
        "~2" => Some(MajorVersion::V2),
        "~3" => Some(MajorVersion::V3),
        "~4" => Some(MajorVersion::V4),
        other => parse_exact_runtime_version(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_only_pins_first_three_majors() {
        assert_eq!(MajorVersion::classify_setting(Some("~1")), MajorVersion::V1);
        assert_eq!(MajorVersion::classify_setting(Some("~2")), MajorVersion::V2);
        assert_eq!(MajorVersion::classify_setting(Some("~3")), MajorVersion::V3);
        assert_eq!(MajorVersion::classify_setting(Some("~4")), MajorVersion::Custom);
        assert_eq!(MajorVersion::classify_setting(Some("3.0.1")), MajorVersion::Custom);
        assert_eq!(MajorVersion::classify_setting(None), MajorVersion::Custom);
    }

    #[test]
    fn exact_versions() {
        assert_eq!(parse_exact_runtime_version("1.0.13112.0"), Some(MajorVersion::V1));
        assert_eq!(parse_exact_runtime_version("2.0.12961.0"), Some(MajorVersion::V2));
        assert_eq!(parse_exact_runtime_version("3.0.15417.0"), Some(MajorVersion::V3));
        assert_eq!(parse_exact_runtime_version("4.0.1"), Some(MajorVersion::V4));
        assert_eq!(parse_exact_runtime_version("5.0.0"), None);
        assert_eq!(parse_exact_runtime_version("4"), None);
        assert_eq!(parse_exact_runtime_version("4."), None);
        assert_eq!(parse_exact_runtime_version("~4"), None);
        assert_eq!(parse_exact_runtime_version(""), None);
        assert_eq!(parse_exact_runtime_version("garbage"), None);
    }

    #[test]
    fn configured_versions() {
        assert_eq!(parse_configured_runtime_version("beta"), Some(MajorVersion::V1));
        assert_eq!(parse_configured_runtime_version("~4"), Some(MajorVersion::V4));
        assert_eq!(parse_configured_runtime_version(" ~3 "), Some(MajorVersion::V3));
        assert_eq!(parse_configured_runtime_version("2.0.12961.0"), Some(MajorVersion::V2));
        assert_eq!(parse_configured_runtime_version("custom"), None);
        assert_eq!(parse_configured_runtime_version(""), None);
    }

    #[test]
    fn setting_value_parses_back() {
        for version in MajorVersion::ALL {
            assert_eq!(version.setting_value().parse::<MajorVersion>(), Ok(version));
        }
        assert!("~5".parse::<MajorVersion>().is_err());
    }
}
