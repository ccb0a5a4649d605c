//! Form store contract
//!
//! The host form owns the working settings; the runtime-version core only
//! reads values and proposes replacement snapshots through this trait.

use crate::key::AppSettingKey;
use crate::snapshot::ConfigurationSnapshot;

/// Lookup, insert/update and remove-by-name over an ordered settings list
///
/// Mutating operations consume the store and return the updated one so a
/// caller can build a full replacement before writing it back.
pub trait SettingsStore: Sized {
    /// Value of the setting called `name`
    fn get(&self, name: &str) -> Option<&str>;

    /// Insert or replace a setting
    #[must_use]
    fn upsert(self, name: &str, value: &str) -> Self;

    /// Remove a setting if present
    #[must_use]
    fn remove(self, name: &str) -> Self;

    /// Value of a known setting
    #[inline]
    fn setting(&self, key: AppSettingKey) -> Option<&str> {
        self.get(key.as_str())
    }

    /// Insert or replace a known setting
    #[inline]
    #[must_use]
    fn put_setting(self, key: AppSettingKey, value: &str) -> Self {
        self.upsert(key.as_str(), value)
    }

    /// Remove a known setting
    #[inline]
    #[must_use]
    fn drop_setting(self, key: AppSettingKey) -> Self {
        self.remove(key.as_str())
    }
}

impl SettingsStore for ConfigurationSnapshot {
    #[inline]
    fn get(&self, name: &str) -> Option<&str> {
        ConfigurationSnapshot::get(self, name)
    }

    #[inline]
    fn upsert(self, name: &str, value: &str) -> Self {
        ConfigurationSnapshot::upsert(self, name, value)
    }

    #[inline]
    fn remove(self, name: &str) -> Self {
        ConfigurationSnapshot::remove(self, name)
    }
}
