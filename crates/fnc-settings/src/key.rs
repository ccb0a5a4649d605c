//! Known application-setting names
//!
//! The settings list is string-keyed at the boundary, but the core only ever
//! reads or writes names from this closed vocabulary so a typo cannot
//! silently create a dead setting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Application settings the runtime-version control reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppSettingKey {
    /// Language worker the host loads (`FUNCTIONS_WORKER_RUNTIME`)
    #[serde(rename = "FUNCTIONS_WORKER_RUNTIME")]
    FunctionsWorkerRuntime,
    /// Runtime extension version (`FUNCTIONS_EXTENSION_VERSION`)
    #[serde(rename = "FUNCTIONS_EXTENSION_VERSION")]
    FunctionsExtensionVersion,
    /// Node.js version pinned for the site (`WEBSITE_NODE_DEFAULT_VERSION`)
    #[serde(rename = "WEBSITE_NODE_DEFAULT_VERSION")]
    WebsiteNodeDefaultVersion,
    /// Legacy WebJobs extension version (`AZUREJOBS_EXTENSION_VERSION`)
    #[serde(rename = "AZUREJOBS_EXTENSION_VERSION")]
    AzureJobsExtensionVersion,
}

impl AppSettingKey {
    /// Every known key, in declaration order
    pub const ALL: [AppSettingKey; 4] = [
        AppSettingKey::FunctionsWorkerRuntime,
        AppSettingKey::FunctionsExtensionVersion,
        AppSettingKey::WebsiteNodeDefaultVersion,
        AppSettingKey::AzureJobsExtensionVersion,
    ];

    /// Setting name as stored in the snapshot (case-sensitive)
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AppSettingKey::FunctionsWorkerRuntime => "FUNCTIONS_WORKER_RUNTIME",
            AppSettingKey::FunctionsExtensionVersion => "FUNCTIONS_EXTENSION_VERSION",
            AppSettingKey::WebsiteNodeDefaultVersion => "WEBSITE_NODE_DEFAULT_VERSION",
            AppSettingKey::AzureJobsExtensionVersion => "AZUREJOBS_EXTENSION_VERSION",
        }
    }
}

impl fmt::Display for AppSettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not part of the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application setting: {0}")]
pub struct UnknownSettingKey(pub String);

impl FromStr for AppSettingKey {
    type Err = UnknownSettingKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppSettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSettingKey(s.to_string()))
    }
}
