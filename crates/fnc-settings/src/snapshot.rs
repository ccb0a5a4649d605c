//! Configuration snapshots
//!
//! A snapshot is the editable form of an app's settings: an ordered list of
//! unique, case-sensitive names mapped to string values, plus the platform
//! the site runs on. Snapshots are values; every edit returns a new one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::key::AppSettingKey;

/// Operating system the site is hosted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitePlatform {
    /// Windows workers
    #[default]
    Windows,
    /// Linux workers
    Linux,
}

impl SitePlatform {
    /// Derive the platform from a site `kind` string such as
    /// `functionapp,linux`
    #[must_use]
    pub fn from_site_kind(kind: &str) -> Self {
        if kind.to_ascii_lowercase().contains("linux") {
            SitePlatform::Linux
        } else {
            SitePlatform::Windows
        }
    }
}

/// One `(name, value)` pair as exchanged with the form store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppSettingEntry {
    /// Setting name
    pub name: String,
    /// Setting value
    pub value: String,
}

impl AppSettingEntry {
    /// Create an entry
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered application settings plus derived site fields
///
/// Equality compares names, values and platform; entry order is kept for
/// display only and does not take part in comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotDocument", into = "SnapshotDocument")]
pub struct ConfigurationSnapshot {
    platform: SitePlatform,
    settings: IndexMap<String, String>,
}

impl ConfigurationSnapshot {
    /// Empty snapshot for a site on `platform`
    #[inline]
    #[must_use]
    pub fn new(platform: SitePlatform) -> Self {
        Self {
            platform,
            settings: IndexMap::new(),
        }
    }

    /// Build a snapshot from entries, rejecting empty or repeated names
    ///
    /// # Errors
    /// Returns [`SettingsError::EmptyName`] or [`SettingsError::DuplicateName`].
    pub fn from_entries<I>(platform: SitePlatform, entries: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = AppSettingEntry>,
    {
        let mut settings = IndexMap::new();
        for AppSettingEntry { name, value } in entries {
            if name.is_empty() {
                return Err(SettingsError::EmptyName);
            }
            if settings.contains_key(&name) {
                return Err(SettingsError::DuplicateName(name));
            }
            settings.insert(name, value);
        }
        Ok(Self { platform, settings })
    }

    /// Site platform
    #[inline]
    #[must_use]
    pub fn platform(&self) -> SitePlatform {
        self.platform
    }

    /// Whether the site runs on Linux workers
    #[inline]
    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.platform == SitePlatform::Linux
    }

    /// Value of the setting called `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.settings.get(name).map(String::as_str)
    }

    /// Value of a known setting
    #[inline]
    #[must_use]
    pub fn setting(&self, key: AppSettingKey) -> Option<&str> {
        self.get(key.as_str())
    }

    /// Whether a setting called `name` exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    /// Insert or replace a setting
    ///
    /// An existing setting keeps its position; a new one is appended.
    #[must_use]
    pub fn upsert(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    /// Remove a setting, preserving the order of the rest
    #[must_use]
    pub fn remove(mut self, name: &str) -> Self {
        self.settings.shift_remove(name);
        self
    }

    /// Insert or replace a known setting
    #[inline]
    #[must_use]
    pub fn with_setting(self, key: AppSettingKey, value: impl Into<String>) -> Self {
        self.upsert(key.as_str(), value)
    }

    /// Remove a known setting
    #[inline]
    #[must_use]
    pub fn without_setting(self, key: AppSettingKey) -> Self {
        self.remove(key.as_str())
    }

    /// Settings in display order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Owned entries in display order
    #[must_use]
    pub fn to_entries(&self) -> Vec<AppSettingEntry> {
        self.iter()
            .map(|(name, value)| AppSettingEntry::new(name, value))
            .collect()
    }

    /// Number of settings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether the snapshot has no settings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Wire shape of a snapshot: platform plus the ordered entry list
///
/// A document may carry the raw site `kind` instead of `platform`; an
/// explicit `platform` wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    platform: Option<SitePlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default)]
    settings: Vec<AppSettingEntry>,
}

impl TryFrom<SnapshotDocument> for ConfigurationSnapshot {
    type Error = SettingsError;

    fn try_from(doc: SnapshotDocument) -> Result<Self, Self::Error> {
        let platform = doc
            .platform
            .or_else(|| doc.kind.as_deref().map(SitePlatform::from_site_kind))
            .unwrap_or_default();
        ConfigurationSnapshot::from_entries(platform, doc.settings)
    }
}

impl From<ConfigurationSnapshot> for SnapshotDocument {
    fn from(snapshot: ConfigurationSnapshot) -> Self {
        Self {
            platform: Some(snapshot.platform),
            kind: None,
            settings: snapshot.to_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigurationSnapshot {
        ConfigurationSnapshot::new(SitePlatform::Windows)
            .upsert("A", "1")
            .upsert("B", "2")
            .upsert("C", "3")
    }

    #[test]
    fn upsert_keeps_position_of_existing_name() {
        let snapshot = sample().upsert("B", "20");
        let names: Vec<_> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(snapshot.get("B"), Some("20"));
    }

    #[test]
    fn remove_preserves_order_of_remaining() {
        let snapshot = sample().remove("A");
        let names: Vec<_> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["B", "C"]);
    }

    #[test]
    fn remove_missing_name_is_noop() {
        assert_eq!(sample().remove("Z"), sample());
    }

    #[test]
    fn names_are_case_sensitive() {
        let snapshot = sample();
        assert_eq!(snapshot.get("a"), None);
        assert!(snapshot.contains("A"));
    }

    #[test]
    fn from_entries_rejects_duplicates() {
        let result = ConfigurationSnapshot::from_entries(
            SitePlatform::Linux,
            vec![AppSettingEntry::new("A", "1"), AppSettingEntry::new("A", "2")],
        );
        assert_eq!(result, Err(SettingsError::DuplicateName("A".to_string())));
    }

    #[test]
    fn from_entries_rejects_empty_name() {
        let result = ConfigurationSnapshot::from_entries(
            SitePlatform::Linux,
            vec![AppSettingEntry::new("", "1")],
        );
        assert_eq!(result, Err(SettingsError::EmptyName));
    }

    #[test]
    fn platform_from_site_kind() {
        assert_eq!(SitePlatform::from_site_kind("functionapp,linux"), SitePlatform::Linux);
        assert_eq!(SitePlatform::from_site_kind("FunctionApp,Linux,Container"), SitePlatform::Linux);
        assert_eq!(SitePlatform::from_site_kind("functionapp"), SitePlatform::Windows);
    }
}
