//! Render model of the runtime-version control
//!
//! Plain data for the host UI layer. Message text lives with the host's
//! translations; the `Display` impls here are the English defaults used by
//! the CLI and logs.

use std::fmt;

use fnc_version::MajorVersion;
use serde::{Deserialize, Serialize};

use crate::options::VersionOption;

/// Why the dropdown cannot be changed right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledReason {
    /// No write access or the form is locked
    ReadOnly,
    /// A save is in flight
    Saving,
    /// Function count not known yet
    FunctionCountLoading,
    /// Function count could not be determined
    FunctionCountFailed,
    /// Custom value that cannot be changed through the dropdown
    CustomVersionLocked,
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisabledReason::ReadOnly => "settings are read-only",
            DisabledReason::Saving => "a save is in progress",
            DisabledReason::FunctionCountLoading => "function count is still loading",
            DisabledReason::FunctionCountFailed => "function count could not be loaded",
            DisabledReason::CustomVersionLocked => "a custom runtime version is configured",
        })
    }
}

/// Placeholder text shown in the dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placeholder {
    /// Waiting for the function count
    Loading,
    /// The function count lookup failed
    LoadingFailed,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Placeholder::Loading => "Loading...",
            Placeholder::LoadingFailed => "Failed to load",
        })
    }
}

/// Info bubble next to the dropdown label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoBubble {
    /// The extension version is a custom value the dropdown cannot express
    CustomVersion,
}

impl fmt::Display for InfoBubble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoBubble::CustomVersion => f.write_str(
                "The runtime version is set to a custom value. Edit the FUNCTIONS_EXTENSION_VERSION application setting to change it.",
            ),
        }
    }
}

/// Non-blocking notice raised by an applied change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// The app was loaded on `~2` and moved to `~3`
    MovingFromV2,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MovingFromV2 => f.write_str(
                "Moving from ~2 to ~3 may require changes to your function code or bindings.",
            ),
        }
    }
}

/// Banner shown when the selected version is unsafe for deployed functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingFunctionsWarning {
    /// Version the app is running, if known
    pub version_in_use: Option<MajorVersion>,
    /// Version currently selected in the form
    pub selected: MajorVersion,
}

impl fmt::Display for ExistingFunctionsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Your app is running {} and has existing functions. Changing to {} may break them.",
            VersionName(self.version_in_use),
            self.selected
        )
    }
}

/// Blocking confirmation for an unsafe transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationDialog {
    /// Version the app is running, if known
    pub version_in_use: Option<MajorVersion>,
    /// Version waiting to be applied
    pub target: MajorVersion,
}

impl ConfirmationDialog {
    /// Dialog title
    pub const TITLE: &'static str = "Change runtime version";
}

impl fmt::Display for ConfirmationDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Your app has existing functions running on {}. Changing to {} may break them. Continue?",
            VersionName(self.version_in_use),
            self.target
        )
    }
}

struct VersionName(Option<MajorVersion>);

impl fmt::Display for VersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(version) => write!(f, "{version}"),
            None => f.write_str("an unknown version"),
        }
    }
}

/// Everything the host needs to render the control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlView {
    /// The user cannot edit; render a disabled, empty dropdown
    pub read_only: bool,
    /// Visible options in order
    pub options: Vec<VersionOption>,
    /// Selected key
    pub selected: Option<MajorVersion>,
    /// Whether the dropdown is disabled
    pub disabled: bool,
    /// First reason the dropdown is disabled
    pub disabled_reason: Option<DisabledReason>,
    /// Working value differs from the loaded one
    pub dirty: bool,
    /// Placeholder text
    pub placeholder: Option<Placeholder>,
    /// Info bubble
    pub info_bubble: Option<InfoBubble>,
    /// Running version resolved from the probes
    pub version_in_use: Option<MajorVersion>,
    /// Existing-functions banner
    pub existing_functions_warning: Option<ExistingFunctionsWarning>,
    /// Advisory raised by the last applied change
    pub advisory: Option<Advisory>,
    /// Open confirmation dialog
    pub confirmation: Option<ConfirmationDialog>,
}

impl ControlView {
    /// Disabled stub for users without edit rights
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            options: Vec::new(),
            selected: None,
            disabled: true,
            disabled_reason: Some(DisabledReason::ReadOnly),
            dirty: false,
            placeholder: None,
            info_bubble: None,
            version_in_use: None,
            existing_functions_warning: None,
            advisory: None,
            confirmation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_version_in_messages() {
        let dialog = ConfirmationDialog {
            version_in_use: None,
            target: MajorVersion::V1,
        };
        assert!(dialog.to_string().contains("an unknown version"));
        assert!(dialog.to_string().contains("~1"));
    }

    #[test]
    fn warning_names_both_versions() {
        let warning = ExistingFunctionsWarning {
            version_in_use: Some(MajorVersion::V4),
            selected: MajorVersion::V3,
        };
        let text = warning.to_string();
        assert!(text.contains("~4"));
        assert!(text.contains("~3"));
    }
}
