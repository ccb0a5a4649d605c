//! Dropdown option set
//!
//! Hidden options are dropped at render time only. Selection and gating
//! always see the full list so hiding an entry never changes a decision.

use fnc_settings::SitePlatform;
use fnc_version::MajorVersion;
use serde::{Deserialize, Serialize};

use crate::form::FormFacts;

/// Label shown for a custom value that is not `~4`
pub const CUSTOM_LABEL: &str = "Custom";

/// One selectable runtime version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionOption {
    /// Key emitted when the option is picked
    pub version: MajorVersion,
    /// Display text
    pub label: String,
    /// Whether the option can be picked
    pub enabled: bool,
    /// Whether the option is rendered
    pub visible: bool,
}

impl VersionOption {
    /// Enabled, visible option labelled with its setting value
    #[inline]
    #[must_use]
    pub fn new(version: MajorVersion) -> Self {
        Self::labelled(version, version.setting_value())
    }

    /// Enabled, visible option with an explicit label
    #[inline]
    pub fn labelled(version: MajorVersion, label: impl Into<String>) -> Self {
        Self {
            version,
            label: label.into(),
            enabled: true,
            visible: true,
        }
    }

    /// Set whether the option can be picked
    #[inline]
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set whether the option is rendered
    #[inline]
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Compute the full option set for the current form
#[must_use]
pub fn build_options(facts: &FormFacts<'_>) -> Vec<VersionOption> {
    let v4_label = MajorVersion::V4.setting_value();

    if facts.has_custom_version() {
        if facts.eligible_for_v4 {
            return vec![
                VersionOption::new(MajorVersion::V3),
                VersionOption::labelled(MajorVersion::Custom, v4_label),
            ];
        }

        let label = if facts.is_live_v4() { v4_label } else { CUSTOM_LABEL };
        return vec![VersionOption::labelled(MajorVersion::Custom, label)];
    }

    vec![
        VersionOption::new(MajorVersion::V1).enabled(facts.platform != SitePlatform::Linux),
        VersionOption::new(MajorVersion::V2).visible(facts.initial_major == MajorVersion::V2),
        VersionOption::new(MajorVersion::V3),
    ]
}

/// Options that are rendered, in order
pub fn visible_options(options: &[VersionOption]) -> Vec<VersionOption> {
    options.iter().filter(|option| option.visible).cloned().collect()
}

/// Find the option for `version`, hidden ones included
#[must_use]
pub fn find_option(options: &[VersionOption], version: MajorVersion) -> Option<&VersionOption> {
    options.iter().find(|option| option.version == version)
}
